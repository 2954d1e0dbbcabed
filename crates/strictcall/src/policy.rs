use crate::exception::{ExcType, RunResult};

/// Controls how loosely declared numeric types are matched.
///
/// The default is strict: a `bool` does not satisfy `int` and an `int` does not
/// satisfy `float`. Each relationship of the Python numeric tower can be switched
/// on explicitly.
///
/// Policies deserialize from JSON with every field optional:
/// ```
/// use strictcall::TypePolicy;
///
/// let policy = TypePolicy::from_json(r#"{"bool_is_int": true}"#).unwrap();
/// assert!(policy.bool_is_int);
/// assert!(!policy.int_is_float);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TypePolicy {
    /// Accept `True`/`False` where `int` is declared.
    pub bool_is_int: bool,
    /// Accept `int` values where `float` is declared.
    pub int_is_float: bool,
}

impl TypePolicy {
    /// Strict matching, identical to `TypePolicy::default()`.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            bool_is_int: false,
            int_is_float: false,
        }
    }

    /// Python's own `isinstance` numeric tower: `bool` is an `int`.
    ///
    /// `int_is_float` stays off because `isinstance(1, float)` is false in Python too.
    #[must_use]
    pub const fn python() -> Self {
        Self {
            bool_is_int: true,
            int_is_float: false,
        }
    }

    #[must_use]
    pub const fn with_bool_is_int(mut self, bool_is_int: bool) -> Self {
        self.bool_is_int = bool_is_int;
        self
    }

    #[must_use]
    pub const fn with_int_is_float(mut self, int_is_float: bool) -> Self {
        self.int_is_float = int_is_float;
        self
    }

    /// Parses a policy from a JSON object, missing fields take their defaults.
    pub fn from_json(json: &str) -> RunResult<Self> {
        serde_json::from_str(json).map_err(|err| ExcType::ValueError.msg(format!("invalid type policy: {err}")))
    }
}
