use std::fmt::{self, Write};

use indexmap::IndexMap;

use crate::types::Type;

/// A dynamically typed value passed through a guarded call.
///
/// `Object` owns all its data and can be freely cloned, serialized, or stored.
/// Its variants mirror the Python builtin types that a declared parameter type can
/// name, see [`Type`].
///
/// # JSON Serialization
///
/// Besides the derived serde format (externally tagged, e.g. `{"Int": 42}`), `Object`
/// converts to and from natural JSON with [`Object::from_json_value`] and
/// [`Object::to_json_value`]:
/// - `None` ↔ `null`
/// - `Bool` ↔ `true`/`false`
/// - `Int` ↔ integer, `Float` ↔ float
/// - `String` ↔ string
/// - `List` ↔ array
/// - `Dict` ↔ object (string keys)
/// - `Tuple` → `{"$tuple": [...]}`, `Bytes` → `{"$bytes": [...]}` (output only)
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Object {
    /// Python's `None` singleton.
    #[serde(alias = "none", alias = "NoneType")]
    None,
    /// Python boolean (`True` or `False`).
    #[serde(alias = "bool")]
    Bool(bool),
    /// Python integer (64-bit signed).
    #[serde(alias = "int")]
    Int(i64),
    /// Python float (64-bit IEEE 754).
    #[serde(alias = "float")]
    Float(f64),
    /// Python string (UTF-8).
    #[serde(alias = "str")]
    String(String),
    /// Python bytes object.
    #[serde(alias = "bytes")]
    Bytes(Vec<u8>),
    /// Python list (mutable sequence).
    #[serde(alias = "list")]
    List(Vec<Self>),
    /// Python tuple (immutable sequence).
    #[serde(alias = "tuple")]
    Tuple(Vec<Self>),
    /// Python dictionary (insertion-ordered mapping).
    #[serde(alias = "dict")]
    Dict(DictPairs),
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            _ => self.repr_fmt(f),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            // Use to_bits() so NaN compares equal to itself, values are data here, not arithmetic
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            _ => false,
        }
    }
}

impl Object {
    /// Returns the runtime type of this value.
    #[must_use]
    pub fn py_type(&self) -> Type {
        match self {
            Self::None => Type::NoneType,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::String(_) => Type::Str,
            Self::Bytes(_) => Type::Bytes,
            Self::List(_) => Type::List,
            Self::Tuple(_) => Type::Tuple,
            Self::Dict(_) => Type::Dict,
        }
    }

    /// Returns the Python `repr()` of this value, e.g. `'a'` for a string or `(1,)` for a tuple.
    #[must_use]
    pub fn py_repr(&self) -> String {
        let mut s = String::new();
        // writing into a String cannot fail
        let _ = self.repr_fmt(&mut s);
        s
    }

    /// Returns the integer value, treating `bool` as `0`/`1` like Python's `int` subclass.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Returns the value as a float, widening `int` and `bool`.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            Self::Bool(b) => Some(f64::from(u8::from(*b))),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a JSON value to an `Object`.
    ///
    /// - `null` → `None`
    /// - `true`/`false` → `Bool`
    /// - integer → `Int` (integers beyond `i64` become `Float`)
    /// - float → `Float`
    /// - string → `String`
    /// - array → `List`
    /// - object → `Dict` with string keys
    #[must_use]
    pub fn from_json_value(value: serde_json::Value) -> Self {
        use serde_json::Value as JV;
        match value {
            JV::Null => Self::None,
            JV::Bool(b) => Self::Bool(b),
            JV::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JV::String(s) => Self::String(s),
            JV::Array(arr) => Self::List(arr.into_iter().map(Self::from_json_value).collect()),
            JV::Object(map) => Self::Dict(
                map.into_iter()
                    .map(|(k, v)| (Self::String(k), Self::from_json_value(v)))
                    .collect(),
            ),
        }
    }

    /// Converts this value to a natural JSON representation.
    ///
    /// Dict keys that are not strings are rendered through their repr. Non-finite floats
    /// become `null`.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        use serde_json::{Value as JV, json};
        match self {
            Self::None => JV::Null,
            Self::Bool(b) => JV::Bool(*b),
            Self::Int(i) => json!(i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(JV::Null, JV::Number),
            Self::String(s) => JV::String(s.clone()),
            Self::Bytes(b) => json!({"$bytes": b}),
            Self::List(items) => JV::Array(items.iter().map(Self::to_json_value).collect()),
            Self::Tuple(items) => {
                let items: Vec<JV> = items.iter().map(Self::to_json_value).collect();
                json!({"$tuple": items})
            }
            Self::Dict(pairs) => {
                let map: serde_json::Map<String, JV> = pairs
                    .iter()
                    .map(|(k, v)| {
                        let key = match k {
                            Self::String(s) => s.clone(),
                            other => other.py_repr(),
                        };
                        (key, v.to_json_value())
                    })
                    .collect();
                JV::Object(map)
            }
        }
    }

    fn repr_fmt(&self, f: &mut impl Write) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&float_repr(*v)),
            Self::String(s) => string_repr_fmt(s, f),
            Self::Bytes(b) => bytes_repr_fmt(b, f),
            Self::List(l) => {
                f.write_char('[')?;
                repr_items(l, f)?;
                f.write_char(']')
            }
            Self::Tuple(t) => {
                f.write_char('(')?;
                repr_items(t, f)?;
                if t.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Self::Dict(pairs) => {
                f.write_char('{')?;
                let mut first = true;
                for (k, v) in pairs {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    k.repr_fmt(f)?;
                    f.write_str(": ")?;
                    v.repr_fmt(f)?;
                }
                f.write_char('}')
            }
        }
    }
}

fn repr_items(items: &[Object], f: &mut impl Write) -> fmt::Result {
    let mut iter = items.iter();
    if let Some(first) = iter.next() {
        first.repr_fmt(f)?;
        for item in iter {
            f.write_str(", ")?;
            item.repr_fmt(f)?;
        }
    }
    Ok(())
}

/// Formats a float the way CPython's `repr()` does.
fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f.is_sign_negative() { "-inf" } else { "inf" }.to_string();
    }

    // ryu gives the shortest round-tripping digits, CPython writes "1e+20" where ryu writes "1e20"
    let mut buffer = ryu::Buffer::new();
    let s = buffer.format(f);
    if let Some(e_pos) = s.find('e') {
        let (mantissa, exp_part) = s.split_at(e_pos);
        let exp = &exp_part[1..];
        if exp.starts_with('-') {
            return s.to_string();
        }
        return format!("{mantissa}e+{exp}");
    }
    if s.contains('.') { s.to_string() } else { format!("{s}.0") }
}

/// Writes a Python string literal, preferring single quotes like CPython.
fn string_repr_fmt(s: &str, f: &mut impl Write) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if c.is_control() => write!(f, "\\x{:02x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

fn bytes_repr_fmt(bytes: &[u8], f: &mut impl Write) -> fmt::Result {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') { '"' } else { '\'' };
    f.write_char('b')?;
    f.write_char(quote)?;
    for &b in bytes {
        match b {
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            b if char::from(b) == quote => {
                f.write_char('\\')?;
                f.write_char(quote)?;
            }
            0x20..=0x7e => f.write_char(char::from(b))?,
            b => write!(f, "\\x{b:02x}")?,
        }
    }
    f.write_char(quote)
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Object {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Object {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<u8>> for Object {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl<T: Into<Self>> From<Option<T>> for Object {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

/// A collection of key-value pairs representing Python dictionary contents.
///
/// Used by `Object::Dict` to store dictionary entries while preserving
/// insertion order. Keys and values are both `Object` instances.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DictPairs(Vec<(Object, Object)>);

impl DictPairs {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Object, Object)> {
        self.0.iter()
    }
}

impl From<Vec<(Object, Object)>> for DictPairs {
    fn from(pairs: Vec<(Object, Object)>) -> Self {
        Self(pairs)
    }
}

impl From<IndexMap<String, Object>> for DictPairs {
    fn from(map: IndexMap<String, Object>) -> Self {
        map.into_iter().map(|(k, v)| (Object::String(k), v)).collect()
    }
}

impl FromIterator<(Object, Object)> for DictPairs {
    fn from_iter<I: IntoIterator<Item = (Object, Object)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for DictPairs {
    type Item = (Object, Object);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DictPairs {
    type Item = &'a (Object, Object);
    type IntoIter = std::slice::Iter<'a, (Object, Object)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
