use std::fmt;

use strum::{EnumIter, EnumString, IntoEnumIterator};

use crate::policy::TypePolicy;

/// Represents the runtime type of a value, and the type declared on a parameter.
///
/// The same tag serves both roles: [`Object::py_type`](crate::Object::py_type) reports
/// what a value is, and a [`Param`](crate::Param) carries the tag it must satisfy.
/// Parsed from and displayed as the Python spelling (`"int"`, `"str"`, `"NoneType"`).
#[derive(Debug, Clone, Copy, EnumString, EnumIter, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum Type {
    #[strum(serialize = "NoneType", serialize = "None")]
    NoneType,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Tuple,
    Dict,
    /// The universal supertype: every value is an instance of `object`.
    Object,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoneType => f.write_str("NoneType"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Str => f.write_str("str"),
            Self::Bytes => f.write_str("bytes"),
            Self::List => f.write_str("list"),
            Self::Tuple => f.write_str("tuple"),
            Self::Dict => f.write_str("dict"),
            Self::Object => f.write_str("object"),
        }
    }
}

impl Type {
    /// Checks if a value of type `self` is an instance of `declared`.
    ///
    /// Exact identity always matches and `object` matches everything. The two numeric
    /// tower relationships are opt-in through `policy`:
    /// - `bool` counts as `int` only with [`TypePolicy::bool_is_int`]
    /// - `int` counts as `float` only with [`TypePolicy::int_is_float`]
    ///
    /// `float` never satisfies `int`, and `str` never satisfies a numeric type.
    #[must_use]
    pub fn is_instance_of(self, declared: Self, policy: &TypePolicy) -> bool {
        if self == declared || declared == Self::Object {
            true
        } else if self == Self::Bool && declared == Self::Int {
            policy.bool_is_int
        } else if declared == Self::Float {
            policy.int_is_float && (self == Self::Int || (self == Self::Bool && policy.bool_is_int))
        } else {
            false
        }
    }

    /// Whether this type belongs to the numeric tower (`bool`, `int`, `float`).
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Float)
    }

    /// Iterates over every type tag, in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}
