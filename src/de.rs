//! QSN deserialization.
//!
//! This module provides the [`Deserializer`] that turns QSN text into Rust data
//! structures. Text is first parsed into a [`Value`] tree, which is then walked by
//! serde's visitors; [`from_value`] exposes that second half directly.
//!
//! ## Usage
//!
//! ```rust
//! use serde_qsn::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, y: i32 }
//!
//! let data: Data = from_str("(x:!1,y:!2)").unwrap();
//! assert_eq!(data, Data { x: 1, y: 2 });
//! ```
//!
//! ## Numbers
//!
//! Whole numbers are offered to visitors as integers and everything else as `f64`,
//! so integer fields accept `!3` but not `!3.5`.
//!
//! ## Absent values
//!
//! The empty string decodes as `None` when the target is an `Option`:
//!
//! ```rust
//! let missing: Option<u8> = serde_qsn::from_str("").unwrap();
//! assert_eq!(missing, None);
//! ```

use crate::parser::Parser;
use crate::{Error, QsnMap, QsnOptions, Result, Value};
use serde::de::{self, Deserialize, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// The QSN deserializer.
///
/// Parses QSN text into Rust values implementing `Deserialize`.
/// Created via [`Deserializer::from_str`] or [`Deserializer::with_options`].
pub struct Deserializer<'de> {
    input: &'de str,
    options: QsnOptions,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Deserializer::with_options(input, QsnOptions::default())
    }

    pub fn with_options(input: &'de str, options: QsnOptions) -> Self {
        Deserializer { input, options }
    }

    fn parse_value(&self) -> Result<Value> {
        Parser::new(self.input, &self.options).parse()
    }
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.parse_value()?).deserialize_any(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match Parser::new(self.input, &self.options).parse_optional()? {
            None | Some(Value::Null) => visitor.visit_none(),
            Some(value) => visitor.visit_some(ValueDeserializer::new(value)),
        }
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.parse_value()?).deserialize_enum(name, variants, visitor)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.parse_value()?).deserialize_char(visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// Deserializes a `T` from an already parsed [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_qsn::{from_value, qsn};
///
/// let pair: (String, bool) = from_value(qsn!(["on", true])).unwrap();
/// assert_eq!(pair, ("on".to_string(), true));
/// ```
///
/// # Errors
///
/// Returns a data error when the value does not fit `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(ValueDeserializer::new(value))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: QsnMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Externally tagged enum: `(Variant:payload)`.
struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            other => Err(Error::type_mismatch("unit variant", other.kind())),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            other => Err(Error::type_mismatch("tuple variant", other.kind())),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            other => Err(Error::type_mismatch("struct variant", other.kind())),
        }
    }
}

struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

/// Upper bound (exclusive) for whole numbers handed to `visit_u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn visit_number<'de, V>(n: f64, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    if n.fract() != 0.0 || !n.is_finite() {
        return visitor.visit_f64(n);
    }
    if n >= 0.0 && n < U64_LIMIT {
        visitor.visit_u64(n as u64)
    } else if let Some(i) = crate::value::whole_number_to_i64(n) {
        visitor.visit_i64(i)
    } else {
        visitor.visit_f64(n)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => visit_number(n, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let found = self.value.kind();
        if let Value::String(s) = &self.value {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return visitor.visit_char(c);
            }
        }
        Err(Error::type_mismatch("single character", found))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) if obj.len() == 1 => {
                let mut entries = obj.into_iter();
                match entries.next() {
                    Some((variant, value)) => {
                        visitor.visit_enum(EnumDeserializer { variant, value })
                    }
                    None => Err(Error::type_mismatch("enum variant", "object")),
                }
            }
            other => Err(Error::type_mismatch("enum variant", other.kind())),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qsn;
    use serde::Deserialize;
    use std::collections::HashMap;

    fn from_str<'a, T: Deserialize<'a>>(s: &'a str) -> Result<T> {
        T::deserialize(&mut Deserializer::from_str(s))
    }

    #[test]
    fn test_primitives() {
        assert_eq!(from_str::<u8>("!255").unwrap(), 255);
        assert_eq!(from_str::<i64>("!-42").unwrap(), -42);
        assert_eq!(from_str::<f64>("!1.5e-7").unwrap(), 1.5e-7);
        assert_eq!(from_str::<f32>("!2").unwrap(), 2.0);
        assert!(from_str::<bool>("!t").unwrap());
        assert_eq!(from_str::<String>("a!,b").unwrap(), "a,b");
        assert_eq!(from_str::<char>("!(").unwrap(), '(');
        from_str::<()>("!n").unwrap();
    }

    #[test]
    fn test_integer_targets_reject_fractions_and_overflow() {
        assert!(from_str::<i32>("!3.5").is_err());
        assert!(from_str::<u8>("!256").is_err());
        assert!(from_str::<u32>("!-1").is_err());
    }

    #[test]
    fn test_options() {
        assert_eq!(from_str::<Option<u8>>("").unwrap(), None);
        assert_eq!(from_str::<Option<u8>>("!n").unwrap(), None);
        assert_eq!(from_str::<Option<u8>>("!7").unwrap(), Some(7));
        assert_eq!(
            from_str::<Vec<Option<bool>>>("(!n,!f)").unwrap(),
            vec![None, Some(false)]
        );
        assert_eq!(from_str::<u8>(""), Err(Error::Empty));
    }

    #[test]
    fn test_collections() {
        assert_eq!(from_str::<Vec<u8>>("()").unwrap(), Vec::<u8>::new());
        assert_eq!(from_str::<(u8, String)>("(!1,x)").unwrap(), (1, "x".to_string()));

        let map: HashMap<String, Vec<i32>> = from_str("(a:(!1,!2),b:())").unwrap();
        assert_eq!(map["a"], vec![1, 2]);
        assert!(map["b"].is_empty());
    }

    #[test]
    fn test_enums() {
        #[derive(Deserialize, Debug, PartialEq)]
        enum Shape {
            Dot,
            Circle(f64),
            Line(i32, i32),
            Rect { w: u8, h: u8 },
        }
        assert_eq!(from_str::<Shape>("Dot").unwrap(), Shape::Dot);
        assert_eq!(from_str::<Shape>("(Circle:!1.5)").unwrap(), Shape::Circle(1.5));
        assert_eq!(from_str::<Shape>("(Line:(!1,!2))").unwrap(), Shape::Line(1, 2));
        assert_eq!(
            from_str::<Shape>("(Rect:(w:!3,h:!4))").unwrap(),
            Shape::Rect { w: 3, h: 4 }
        );
        assert!(from_str::<Shape>("(Circle:!1,Dot:!n)").is_err());
        assert!(from_str::<Shape>("!5").is_err());
    }

    #[test]
    fn test_type_mismatch_is_data_error() {
        let err = from_str::<Vec<u8>>("(a:!1)").unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::Data);
    }

    #[test]
    fn test_from_value() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Page {
            size: u16,
            tags: Vec<String>,
        }
        let page: Page = from_value(qsn!({"size": 20, "tags": ["a", "b"]})).unwrap();
        assert_eq!(
            page,
            Page {
                size: 20,
                tags: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn test_value_round_trip_through_deserializer() {
        let value: Value = from_str("(a:(!1,!n,x),b:(:))").unwrap();
        assert_eq!(value, qsn!({"a": [1, null, "x"], "b": {}}));
    }
}
