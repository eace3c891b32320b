//! Dynamic value representation for QSN data.
//!
//! [`Value`] is the closed set of shapes QSN can carry: null, booleans, numbers,
//! strings, arrays and string-keyed objects. Numbers are plain `f64`; QSN does not
//! distinguish integers from floats.
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_qsn::{qsn, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = qsn!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_object());
//! ```
//!
//! ## Text Conversion
//!
//! `Display` writes the QSN encoding and `FromStr` parses it:
//!
//! ```rust
//! use serde_qsn::{qsn, Value};
//!
//! let value = qsn!([1, "two", null]);
//! assert_eq!(value.to_string(), "(!1,two,!n)");
//!
//! let back: Value = "(!1,two,!n)".parse().unwrap();
//! assert_eq!(back, value);
//! ```

use crate::QsnMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Any value representable in QSN.
///
/// # Examples
///
/// ```rust
/// use serde_qsn::Value;
///
/// let num = Value::Number(42.0);
/// let text = Value::String("hello".to_string());
///
/// assert!(Value::Null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(QsnMap),
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` for null, booleans, numbers and strings.
    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a number, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a whole number within `i64` range, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_qsn::Value;
    ///
    /// assert_eq!(Value::Number(42.0).as_i64(), Some(42));
    /// assert_eq!(Value::Number(42.5).as_i64(), None);
    /// assert_eq!(Value::from("42").as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => whole_number_to_i64(*n),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&QsnMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up a key in an object. Returns `None` for other kinds.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Short name of the value's kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

pub(crate) fn whole_number_to_i64(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

/// Writes the QSN encoding. Non-finite numbers, which cannot be encoded, are
/// written as `!n`; use [`crate::stringify`] to get an error instead.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::ser::stringify_lossy(self))
    }
}

impl FromStr for Value {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        crate::parse(s)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid QSN value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = QsnMap::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => whole_number_to_i64(n).ok_or_else(|| {
                crate::Error::custom(format!("cannot convert number {} to i64", n))
            }),
            other => Err(crate::Error::type_mismatch("integer", other.kind())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n),
            other => Err(crate::Error::type_mismatch("number", other.kind())),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(crate::Error::type_mismatch("boolean", other.kind())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(crate::Error::type_mismatch("string", other.kind())),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<QsnMap> for Value {
    fn from(value: QsnMap) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_i64() {
        let result: i64 = TryFrom::try_from(Value::Number(42.0)).unwrap();
        assert_eq!(result, 42);

        assert!(i64::try_from(Value::Number(42.5)).is_err());
        assert!(i64::try_from(Value::String("test".to_string())).is_err());
    }

    #[test]
    fn test_tryfrom_other_kinds() {
        assert_eq!(f64::try_from(Value::Number(3.5)).unwrap(), 3.5);
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");

        let err = bool::try_from(Value::Number(1.0)).unwrap_err();
        assert_eq!(err, crate::Error::type_mismatch("boolean", "number"));
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Number(42.0));
        assert_eq!(Value::from(7u64), Value::Number(7.0));
        assert_eq!(Value::from(3.5f64), Value::Number(3.5));
        assert_eq!(Value::from("test"), Value::String("test".to_string()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_from_collections() {
        let vec = vec![Value::from(1i32), Value::from(2i32)];
        assert_eq!(Value::from(vec.clone()), Value::Array(vec.clone()));
        assert_eq!(vec.into_iter().collect::<Value>().as_array().map(Vec::len), Some(2));

        let mut map = QsnMap::new();
        map.insert("key".to_string(), Value::from(42i32));
        let value = Value::from(map.clone());
        assert_eq!(value, Value::Object(map));
        assert_eq!(value.get("key"), Some(&Value::Number(42.0)));
    }

    #[test]
    fn test_display_and_from_str() {
        let value = Value::Array(vec![Value::Null, Value::from("a,b"), Value::from(-1.5)]);
        assert_eq!(value.to_string(), "(!n,a!,b,!-1.5)");
        assert_eq!("(!n,a!,b,!-1.5)".parse::<Value>().unwrap(), value);
    }

    #[test]
    fn test_display_writes_null_for_non_finite() {
        let value = Value::Array(vec![Value::Number(f64::NAN), Value::Number(1.0)]);
        assert_eq!(value.to_string(), "(!n,!1)");
    }

    #[test]
    fn test_kind_and_leaf() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Object(QsnMap::new()).kind(), "object");
        assert!(Value::from(1).is_leaf());
        assert!(!Value::Array(vec![]).is_leaf());
    }
}
