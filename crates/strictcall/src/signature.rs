//! Function signature representation and argument binding.
//!
//! A [`Signature`] is built once per wrapped callable and describes its formal
//! parameters: name, optional declared type, optional default. Every parameter is
//! positional-or-keyword. Binding a call produces [`BoundArguments`], a fresh map
//! from parameter name to value that lives for a single invocation.

use std::fmt::{self, Write as _};

use indexmap::IndexMap;

use crate::{
    args::CallArgs,
    exception::{ExcType, RunResult},
    object::Object,
    types::Type,
};

/// A single formal parameter.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Param {
    name: String,
    /// Declared type, `None` means the parameter is never checked.
    annotation: Option<Type>,
    default: Option<Object>,
}

impl Param {
    /// A required parameter with no declared type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
        }
    }

    /// Sets the declared type.
    #[must_use]
    pub fn typed(mut self, annotation: Type) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Gives the parameter a default, making it optional.
    #[must_use]
    pub fn default(mut self, value: impl Into<Object>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn annotation(&self) -> Option<Type> {
        self.annotation
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Object> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(annotation) = self.annotation {
            write!(f, ": {annotation}")?;
        }
        match (&self.default, self.annotation) {
            (Some(default), Some(_)) => write!(f, " = {}", default.py_repr()),
            (Some(default), None) => write!(f, "={}", default.py_repr()),
            (None, _) => Ok(()),
        }
    }
}

/// The formal parameter list of a callable, plus the name used in error messages.
///
/// Build one with [`Signature::builder`] or the [`signature!`](crate::signature!) macro.
///
/// # Binding
///
/// [`Signature::bind`] follows Python's calling convention for positional-or-keyword
/// parameters:
/// 1. Positional arguments fill parameters left to right
/// 2. Keyword arguments fill parameters by name
/// 3. Every parameter without a default must have been filled
///
/// Defaults are applied separately with [`Signature::apply_defaults`], so a caller can
/// tell which values were actually supplied.
///
/// Deserializing goes through [`SignatureBuilder::build`], so a serialized signature
/// is validated exactly like one declared in code.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "SignatureBuilder")]
pub struct Signature {
    name: String,
    params: Vec<Param>,
}

impl Signature {
    /// Starts building a signature for a callable called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SignatureBuilder {
        SignatureBuilder {
            name: name.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Number of parameters without a default.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| !p.has_default()).count()
    }

    /// Binds arguments to parameters according to Python's calling conventions.
    ///
    /// The result holds only the supplied arguments, in parameter order. Call
    /// [`Signature::apply_defaults`] to fill in the rest.
    ///
    /// # Errors
    /// Returns a `BindingError` if:
    /// - More positional arguments are given than there are parameters
    /// - A keyword names no parameter
    /// - The same parameter is given by position and by keyword
    /// - A required parameter is left without a value
    pub fn bind(&self, args: CallArgs) -> RunResult<BoundArguments> {
        self.bind_inner(args, false)
    }

    /// Like [`Signature::bind`] but allows required parameters to stay unbound.
    pub fn bind_partial(&self, args: CallArgs) -> RunResult<BoundArguments> {
        self.bind_inner(args, true)
    }

    /// Inserts the default of every parameter not yet bound, keeping parameter order.
    pub fn apply_defaults(&self, bound: &mut BoundArguments) {
        if bound.arguments.len() == self.params.len() {
            return;
        }
        let mut arguments = IndexMap::with_capacity(self.params.len());
        for param in &self.params {
            if let Some(value) = bound.arguments.shift_remove(&param.name) {
                arguments.insert(param.name.clone(), value);
            } else if let Some(default) = &param.default {
                arguments.insert(param.name.clone(), default.clone());
            }
        }
        bound.arguments = arguments;
    }

    fn bind_inner(&self, args: CallArgs, partial: bool) -> RunResult<BoundArguments> {
        let func = self.name.as_str();
        let expanded = args.expand(func)?;

        let positional_count = expanded.positional.len();
        if positional_count > self.params.len() {
            return Err(ExcType::binding_error_too_many_positional(
                func,
                self.params.len(),
                positional_count,
            ));
        }

        // One slot per parameter, so the result comes out in parameter order
        let mut slots: Vec<Option<Object>> = vec![None; self.params.len()];

        // 1. Bind positional args
        for (slot, value) in slots.iter_mut().zip(expanded.positional) {
            *slot = Some(value);
        }

        // 2. Bind keyword args
        for (key, value) in expanded.keywords {
            let Some(idx) = self.params.iter().position(|p| p.name == key) else {
                return Err(ExcType::binding_error_unexpected_keyword(func, &key));
            };
            if slots[idx].is_some() {
                return Err(ExcType::binding_error_duplicate_arg(func, &key));
            }
            slots[idx] = Some(value);
        }

        // 3. Check that all required params are bound
        if !partial {
            let missing: Vec<&str> = self
                .params
                .iter()
                .zip(&slots)
                .filter(|(param, slot)| slot.is_none() && !param.has_default())
                .map(|(param, _)| param.name.as_str())
                .collect();
            if !missing.is_empty() {
                return Err(ExcType::binding_error_missing(func, &missing));
            }
        }

        let arguments = self
            .params
            .iter()
            .zip(slots)
            .filter_map(|(param, slot)| slot.map(|value| (param.name.clone(), value)))
            .collect();
        Ok(BoundArguments { arguments })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_char(')')
    }
}

/// Incrementally declares a [`Signature`]; validated once in [`SignatureBuilder::build`].
#[derive(Debug, Clone, serde::Deserialize)]
#[must_use]
pub struct SignatureBuilder {
    name: String,
    params: Vec<Param>,
}

impl SignatureBuilder {
    /// Appends a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Appends a required parameter with a declared type.
    pub fn typed(self, name: impl Into<String>, annotation: Type) -> Self {
        self.param(Param::new(name).typed(annotation))
    }

    /// Appends an optional parameter with a declared type.
    pub fn typed_default(self, name: impl Into<String>, annotation: Type, default: impl Into<Object>) -> Self {
        self.param(Param::new(name).typed(annotation).default(default))
    }

    /// Appends a required parameter that accepts any value.
    pub fn untyped(self, name: impl Into<String>) -> Self {
        self.param(Param::new(name))
    }

    /// Validates and returns the signature.
    ///
    /// # Errors
    /// Returns a `SignatureError` if a name is declared twice, or if a parameter without a
    /// default follows one with a default.
    pub fn build(self) -> RunResult<Signature> {
        let mut seen_default = false;
        for (i, param) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(ExcType::signature_error_duplicate_param(&self.name, &param.name));
            }
            if param.has_default() {
                seen_default = true;
            } else if seen_default {
                return Err(ExcType::signature_error_non_default_after_default(&self.name, &param.name));
            }
        }
        Ok(Signature {
            name: self.name,
            params: self.params,
        })
    }
}

impl TryFrom<SignatureBuilder> for Signature {
    type Error = crate::exception::Exception;

    fn try_from(builder: SignatureBuilder) -> RunResult<Self> {
        builder.build()
    }
}

/// Parameter name to value for a single invocation, in parameter order.
///
/// Produced by [`Signature::bind`]; after [`Signature::apply_defaults`] its keys are
/// exactly the signature's parameters.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct BoundArguments {
    arguments: IndexMap<String, Object>,
}

impl BoundArguments {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Object> {
        self.arguments.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Object> {
        self.arguments.iter()
    }

    /// Values in parameter order, as a positional argument list.
    #[must_use]
    pub fn args(&self) -> Vec<&Object> {
        self.arguments.values().collect()
    }

    /// Returns an integer argument, raising `TypeError` if it is absent or not integral.
    pub fn int(&self, name: &str) -> RunResult<i64> {
        let value = self.require(name)?;
        value
            .as_int()
            .ok_or_else(|| ExcType::TypeError.msg(format!("'{name}' must be int, not {}", value.py_type())))
    }

    /// Returns a float argument, widening ints.
    pub fn float(&self, name: &str) -> RunResult<f64> {
        let value = self.require(name)?;
        value
            .as_float()
            .ok_or_else(|| ExcType::TypeError.msg(format!("'{name}' must be float, not {}", value.py_type())))
    }

    pub fn str(&self, name: &str) -> RunResult<&str> {
        let value = self.require(name)?;
        value
            .as_str()
            .ok_or_else(|| ExcType::TypeError.msg(format!("'{name}' must be str, not {}", value.py_type())))
    }

    fn require(&self, name: &str) -> RunResult<&Object> {
        self.get(name)
            .ok_or_else(|| ExcType::BindingError.msg(format!("no value bound for argument '{name}'")))
    }
}

impl<'a> IntoIterator for &'a BoundArguments {
    type Item = (&'a String, &'a Object);
    type IntoIter = indexmap::map::Iter<'a, String, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.iter()
    }
}

impl IntoIterator for BoundArguments {
    type Item = (String, Object);
    type IntoIter = indexmap::map::IntoIter<String, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.into_iter()
    }
}
