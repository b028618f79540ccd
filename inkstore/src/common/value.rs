use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

use crate::collection::Document;

// NaN compares equal to itself here so Value equality is a proper
// equivalence relation, and +0.0 equals -0.0 through the regular compare.
#[inline]
fn num_eq_float(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || a == b
}

/// Represents a value stored in a document.
///
/// Documents are JSON-like: values are null, booleans, numbers, strings,
/// nested documents, or arrays of values. Numeric variants compare across
/// widths, so a counter written as `I32(5)` equals one read back as
/// `I64(5)`.
///
/// # Examples
///
/// ```ignore
/// let v = Value::from("blue");
/// assert!(v.is_string());
/// assert_eq!(v.as_str(), Some("blue"));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 32-bit integer value.
    I32(i32),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents an unsigned 64-bit integer value.
    U64(u64),
    /// Represents an unsigned 128-bit integer value. Used for epoch
    /// millisecond timestamps.
    U128(u128),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a nested document.
    Document(Document),
    /// Represents an array value.
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::I32(_) | Value::I64(_) | Value::U64(_) | Value::U128(_) | Value::F64(_)
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns the string slice if the value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested document if the value is a document.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Returns the array if the value is an array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the value as an `i64` if it is an integer of any width that
    /// fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I32(v) => Some(*v as i64),
            Value::I64(v) => Some(*v),
            Value::U64(v) => i64::try_from(*v).ok(),
            Value::U128(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Returns the value as a `u128` if it is a non-negative integer. Used
    /// to read timestamp fields back.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            Value::I32(v) => u128::try_from(*v).ok(),
            Value::I64(v) => u128::try_from(*v).ok(),
            Value::U64(v) => Some(*v as u128),
            Value::U128(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any numeric value widened to `f64`.
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::I32(v) => Some(*v as f64),
            Value::I64(v) => Some(*v as f64),
            Value::U64(v) => Some(*v as f64),
            Value::U128(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Renders a scalar value as an index key. Nulls, documents, and arrays
    /// are not indexable and return `None`.
    pub fn as_key_string(&self) -> Option<String> {
        match self {
            Value::Null | Value::Document(_) | Value::Array(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Renders the value as compact JSON. Strings are quoted here, unlike
    /// the bare [`Display`] rendering.
    pub fn to_json(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::U128(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::String(v) => format!("{:?}", v),
            Value::Document(doc) => doc.to_json(),
            Value::Array(values) => {
                let items: Vec<String> = values.iter().map(|v| v.to_json()).collect();
                format!("[{}]", items.join(","))
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Document(a), Value::Document(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => {
                match (a.as_decimal(), b.as_decimal()) {
                    (Some(x), Some(y)) => num_eq_float(x, y),
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::U128(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Document(doc) => write!(f, "{}", doc.to_json()),
            Value::Array(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::U64(value)
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        Value::U128(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        let value = Value::default();
        assert!(value.is_null());
    }

    #[test]
    fn test_numeric_equality_across_widths() {
        assert_eq!(Value::I32(5), Value::I64(5));
        assert_eq!(Value::U64(42), Value::I32(42));
        assert_eq!(Value::F64(2.0), Value::I32(2));
        assert_ne!(Value::I32(5), Value::I32(6));
    }

    #[test]
    fn test_nan_equals_itself() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
        assert_ne!(Value::F64(f64::NAN), Value::F64(0.0));
    }

    #[test]
    fn test_string_not_equal_to_number() {
        assert_ne!(Value::from("5"), Value::I32(5));
    }

    #[test]
    fn test_as_i64_coercion() {
        assert_eq!(Value::I32(7).as_i64(), Some(7));
        assert_eq!(Value::U64(7).as_i64(), Some(7));
        assert_eq!(Value::from("7").as_i64(), None);
    }

    #[test]
    fn test_as_key_string_scalars_only() {
        assert_eq!(Value::from("home-page").as_key_string(), Some("home-page".to_string()));
        assert_eq!(Value::I32(3).as_key_string(), Some("3".to_string()));
        assert_eq!(Value::Null.as_key_string(), None);
        assert_eq!(Value::Array(vec![]).as_key_string(), None);
    }

    #[test]
    fn test_to_json_quotes_strings() {
        assert_eq!(Value::from("blue").to_json(), "\"blue\"");
        assert_eq!(Value::I32(1).to_json(), "1");
        assert_eq!(Value::Array(vec![Value::I32(1), Value::from("a")]).to_json(), "[1,\"a\"]");
    }

    #[test]
    fn test_display_strings_bare() {
        assert_eq!(format!("{}", Value::from("blue")), "blue");
        assert_eq!(format!("{}", Value::Null), "null");
    }

    #[test]
    fn test_from_conversions() {
        assert!(Value::from(true).is_bool());
        assert!(Value::from(1.5).is_number());
        assert!(Value::from("text").is_string());
        assert!(Value::from(vec![Value::I32(1)]).is_array());
    }
}
