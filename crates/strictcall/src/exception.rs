use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::types::Type;

/// Result type alias for operations that can raise an [`Exception`].
pub type RunResult<T> = Result<T, Exception>;

/// Kinds of error a guarded call can produce.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `Into<&'static str>` implementations.
/// The string representation matches the variant name exactly (e.g., `TypeError` -> "TypeError").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum ExcType {
    /// Arguments could not be mapped onto the parameter list.
    BindingError,
    /// A bound value does not satisfy its parameter's declared type.
    TypeError,
    /// A signature was declared inconsistently (raised when it is built, never per call).
    SignatureError,

    // --- raised by wrapped bodies ---
    ValueError,
    OverflowError,
    ZeroDivisionError,
    RuntimeError,
}

/// Structured detail of a failed type check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgMismatch {
    /// Name of the offending parameter.
    pub param: String,
    /// Type declared on the parameter.
    pub expected: Type,
    /// Runtime type of the value that was supplied (or defaulted).
    pub actual: Type,
}

/// An error raised by a guarded call.
///
/// Binding and type-check failures are produced by the guard itself; every other
/// kind comes from the wrapped body and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    exc_type: ExcType,
    message: String,
    #[serde(default)]
    mismatch: Option<ArgMismatch>,
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.exc_type, self.message)
    }
}

impl std::error::Error for Exception {}

impl Exception {
    /// Creates a new exception with the given type and message.
    #[must_use]
    pub fn new(exc_type: ExcType, message: impl fmt::Display) -> Self {
        Self {
            exc_type,
            message: message.to_string(),
            mismatch: None,
        }
    }

    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The failed check, present only on guard-raised `TypeError`s.
    #[must_use]
    pub fn mismatch(&self) -> Option<&ArgMismatch> {
        self.mismatch.as_ref()
    }

    #[must_use]
    pub fn is_binding_error(&self) -> bool {
        self.exc_type == ExcType::BindingError
    }

    #[must_use]
    pub fn is_type_error(&self) -> bool {
        self.exc_type == ExcType::TypeError
    }
}

impl ExcType {
    /// Creates an exception of this kind with the given message.
    #[must_use]
    pub fn msg(self, message: impl fmt::Display) -> Exception {
        Exception::new(self, message)
    }

    /// Creates a TypeError for an argument whose runtime type does not match its declaration.
    ///
    /// Matches CPython's format: `{name}() argument '{param}' must be {expected}, not {actual}`
    #[must_use]
    pub(crate) fn type_error_arg(name: &str, param: &str, expected: Type, actual: Type) -> Exception {
        Exception {
            exc_type: Self::TypeError,
            message: format!("{name}() argument '{param}' must be {expected}, not {actual}"),
            mismatch: Some(ArgMismatch {
                param: param.to_owned(),
                expected,
                actual,
            }),
        }
    }

    /// Creates a BindingError for missing positional arguments.
    ///
    /// Matches CPython's format: `{name}() missing {count} required positional argument(s): 'a' and 'b'`
    #[must_use]
    pub(crate) fn binding_error_missing(name: &str, missing_names: &[&str]) -> Exception {
        let count = missing_names.len();
        let names_str = format_param_names(missing_names);
        if count == 1 {
            Self::BindingError.msg(format!("{name}() missing 1 required positional argument: {names_str}"))
        } else {
            Self::BindingError.msg(format!(
                "{name}() missing {count} required positional arguments: {names_str}"
            ))
        }
    }

    /// Creates a BindingError for too many positional arguments.
    ///
    /// Matches CPython's format: `{name}() takes {max} positional argument(s) but {actual} were given`
    #[must_use]
    pub(crate) fn binding_error_too_many_positional(name: &str, max: usize, actual: usize) -> Exception {
        let takes_word = if max == 1 { "argument" } else { "arguments" };
        let given_word = if actual == 1 { "was" } else { "were" };
        Self::BindingError.msg(format!(
            "{name}() takes {max} positional {takes_word} but {actual} {given_word} given"
        ))
    }

    /// Creates a BindingError for a parameter bound both by position and by keyword.
    ///
    /// Matches CPython's format: `{name}() got multiple values for argument '{param}'`
    #[must_use]
    pub(crate) fn binding_error_duplicate_arg(name: &str, param: &str) -> Exception {
        Self::BindingError.msg(format!("{name}() got multiple values for argument '{param}'"))
    }

    /// Creates a BindingError for the same keyword supplied twice.
    ///
    /// Matches CPython's format: `{name}() got multiple values for keyword argument '{key}'`
    #[must_use]
    pub(crate) fn binding_error_multiple_values(name: &str, key: &str) -> Exception {
        Self::BindingError.msg(format!("{name}() got multiple values for keyword argument '{key}'"))
    }

    /// Creates a BindingError for unexpected keyword argument.
    ///
    /// Matches CPython's format: `{name}() got an unexpected keyword argument '{key}'`
    #[must_use]
    pub(crate) fn binding_error_unexpected_keyword(name: &str, key: &str) -> Exception {
        Self::BindingError.msg(format!("{name}() got an unexpected keyword argument '{key}'"))
    }

    /// Creates a BindingError for a `*` splat of something that is not a sequence.
    #[must_use]
    pub(crate) fn binding_error_args_not_iterable(name: &str, type_: Type) -> Exception {
        Self::BindingError.msg(format!("{name}() argument after * must be an iterable, not {type_}"))
    }

    /// Creates a BindingError for a `**` splat of something that is not a mapping.
    ///
    /// Matches CPython's format: `{name}() argument after ** must be a mapping, not {type_name}`
    #[must_use]
    pub(crate) fn binding_error_kwargs_not_mapping(name: &str, type_: Type) -> Exception {
        Self::BindingError.msg(format!("{name}() argument after ** must be a mapping, not {type_}"))
    }

    #[must_use]
    pub(crate) fn binding_error_kwargs_nonstring_key() -> Exception {
        Self::BindingError.msg("keywords must be strings")
    }

    /// Creates a SignatureError for a parameter name declared twice.
    #[must_use]
    pub(crate) fn signature_error_duplicate_param(name: &str, param: &str) -> Exception {
        Self::SignatureError.msg(format!("duplicate argument '{param}' in function definition of {name}()"))
    }

    /// Creates a SignatureError for a required parameter declared after a defaulted one.
    #[must_use]
    pub(crate) fn signature_error_non_default_after_default(name: &str, param: &str) -> Exception {
        Self::SignatureError.msg(format!(
            "non-default argument '{param}' follows default argument in {name}()"
        ))
    }
}

/// Formats a list of parameter names the way CPython lists them in argument errors.
fn format_param_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => format!("'{only}'"),
        [first, second] => format!("'{first}' and '{second}'"),
        [rest @ .., last] => {
            let rest: Vec<_> = rest.iter().map(|n| format!("'{n}'")).collect();
            format!("{} and '{last}'", rest.join(", "))
        }
    }
}
