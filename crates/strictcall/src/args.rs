use smallvec::SmallVec;

use crate::{
    exception::{ExcType, RunResult},
    object::Object,
};

/// One entry of the positional part of a call, in the order the caller wrote it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
enum PosArg {
    /// `f(x)`
    Value(Object),
    /// `f(*xs)`, expanded when the call is bound.
    Splat(Object),
}

/// One entry of the keyword part of a call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
enum KwArg {
    /// `f(name=x)`
    Named(String, Object),
    /// `f(**mapping)`, expanded when the call is bound.
    Splat(Object),
}

/// Arguments supplied by a caller: positional values plus keyword pairs.
///
/// Most calls have at most two positional arguments, so they are stored inline.
/// Keywords are kept as an ordered list rather than a map so that a name given twice
/// can be reported when the call is bound.
///
/// ```
/// use strictcall::CallArgs;
///
/// let args = CallArgs::new().arg(1).kwarg("b", 2);
/// assert_eq!(args.positional_len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CallArgs {
    positional: SmallVec<[PosArg; 2]>,
    keywords: Vec<KwArg>,
}

/// Call arguments with every splat expanded, ready to be bound to a signature.
#[derive(Debug)]
pub(crate) struct ExpandedArgs {
    pub positional: Vec<Object>,
    pub keywords: Vec<(String, Object)>,
}

impl CallArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates call arguments from positional values only.
    pub fn positional(values: impl IntoIterator<Item = impl Into<Object>>) -> Self {
        Self {
            positional: values.into_iter().map(|v| PosArg::Value(v.into())).collect(),
            keywords: Vec::new(),
        }
    }

    /// Creates call arguments from keyword pairs only.
    pub fn keywords<K: Into<String>, V: Into<Object>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            positional: SmallVec::new(),
            keywords: pairs.into_iter().map(|(k, v)| KwArg::Named(k.into(), v.into())).collect(),
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Object>) -> Self {
        self.positional.push(PosArg::Value(value.into()));
        self
    }

    /// Appends a keyword argument.
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Object>) -> Self {
        self.keywords.push(KwArg::Named(name.into(), value.into()));
        self
    }

    /// Appends `*value`: each item of a list or tuple becomes a positional argument.
    #[must_use]
    pub fn extend_args(mut self, value: impl Into<Object>) -> Self {
        self.positional.push(PosArg::Splat(value.into()));
        self
    }

    /// Appends `**value`: each entry of a dict with string keys becomes a keyword argument.
    #[must_use]
    pub fn extend_kwargs(mut self, value: impl Into<Object>) -> Self {
        self.keywords.push(KwArg::Splat(value.into()));
        self
    }

    /// Number of positional entries as written, counting each splat once.
    #[must_use]
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    /// Number of keyword entries as written, counting each splat once.
    #[must_use]
    pub fn keyword_len(&self) -> usize {
        self.keywords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    /// Expands splats and rejects keywords given more than once.
    ///
    /// `func_name` is only used in error messages.
    pub(crate) fn expand(self, func_name: &str) -> RunResult<ExpandedArgs> {
        let mut positional = Vec::with_capacity(self.positional.len());
        for arg in self.positional {
            match arg {
                PosArg::Value(value) => positional.push(value),
                PosArg::Splat(Object::List(items) | Object::Tuple(items)) => positional.extend(items),
                PosArg::Splat(other) => {
                    return Err(ExcType::binding_error_args_not_iterable(func_name, other.py_type()));
                }
            }
        }

        let mut keywords: Vec<(String, Object)> = Vec::with_capacity(self.keywords.len());
        let mut push_keyword = |name: String, value: Object| -> RunResult<()> {
            if keywords.iter().any(|(existing, _)| *existing == name) {
                return Err(ExcType::binding_error_multiple_values(func_name, &name));
            }
            keywords.push((name, value));
            Ok(())
        };
        for kwarg in self.keywords {
            match kwarg {
                KwArg::Named(name, value) => push_keyword(name, value)?,
                KwArg::Splat(Object::Dict(pairs)) => {
                    for (key, value) in pairs {
                        let Object::String(name) = key else {
                            return Err(ExcType::binding_error_kwargs_nonstring_key());
                        };
                        push_keyword(name, value)?;
                    }
                }
                KwArg::Splat(other) => {
                    return Err(ExcType::binding_error_kwargs_not_mapping(func_name, other.py_type()));
                }
            }
        }

        Ok(ExpandedArgs { positional, keywords })
    }
}
