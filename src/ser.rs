//! QSN serialization.
//!
//! Two writers live here:
//!
//! - [`stringify`] and friends walk a [`Value`] directly, one match arm per kind
//! - [`Serializer`] implements `serde::Serializer` and writes QSN for any
//!   `T: Serialize` without building an intermediate `Value`
//!
//! Both produce identical text for the same data. [`ValueSerializer`] converts a
//! `T: Serialize` into a [`Value`] (see [`crate::to_value`]).
//!
//! ## Usage
//!
//! ```rust
//! use serde_qsn::{qsn, stringify, to_string};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Filter { tag: String, page: u32 }
//!
//! let text = to_string(&Filter { tag: "a,b".to_string(), page: 2 }).unwrap();
//! assert_eq!(text, "(tag:a!,b,page:!2)");
//!
//! assert_eq!(stringify(&qsn!({"tag": "a,b", "page": 2})).unwrap(), text);
//! ```
//!
//! ## Absent values
//!
//! A top-level `None` has no encoding and is written as the empty string. A `None`
//! nested inside a collection is written as `!n`.

use crate::escape::escape_into;
use crate::grammar::{
    CLOSE, EMPTY_ARRAY_TOKEN, EMPTY_OBJECT_TOKEN, FALSE_TOKEN, KEY_VALUE, NULL_TOKEN, OPEN,
    SEPARATOR, TRUE_TOKEN,
};
use crate::number::write_number;
use crate::{Error, QsnMap, QsnOptions, Result, Value};
use serde::{ser, Serialize};

/// Encodes a [`Value`] as QSN text.
///
/// # Errors
///
/// Returns an encoding error if the value holds a NaN or infinite number.
pub fn stringify(value: &Value) -> Result<String> {
    stringify_with_options(value, &QsnOptions::default())
}

/// Encodes a [`Value`] as QSN text, honouring `options.max_depth`.
///
/// # Errors
///
/// Returns an encoding error for non-finite numbers and
/// [`Error::DepthLimitExceeded`] for values nested deeper than allowed.
pub fn stringify_with_options(value: &Value, options: &QsnOptions) -> Result<String> {
    let mut out = String::with_capacity(64);
    ValueWriter {
        out: &mut out,
        options,
        lossy: false,
    }
    .write(value, 0)?;
    Ok(out)
}

/// Encodes an optional value; `None` becomes the empty string.
///
/// ```rust
/// use serde_qsn::{stringify_optional, Value};
///
/// assert_eq!(stringify_optional(None).unwrap(), "");
/// assert_eq!(stringify_optional(Some(&Value::Null)).unwrap(), "!n");
/// ```
///
/// # Errors
///
/// Same as [`stringify`].
pub fn stringify_optional(value: Option<&Value>) -> Result<String> {
    match value {
        Some(value) => stringify(value),
        None => Ok(String::new()),
    }
}

/// `Display` support: never fails, writing `!n` where a number cannot be encoded.
pub(crate) fn stringify_lossy(value: &Value) -> String {
    let mut out = String::with_capacity(64);
    let options = QsnOptions::default();
    let written = ValueWriter {
        out: &mut out,
        options: &options,
        lossy: true,
    }
    .write(value, 0);
    debug_assert!(written.is_ok());
    out
}

struct ValueWriter<'a> {
    out: &'a mut String,
    options: &'a QsnOptions,
    lossy: bool,
}

impl ValueWriter<'_> {
    fn write(&mut self, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Null => self.out.push_str(NULL_TOKEN),
            Value::Bool(b) => self.out.push_str(if *b { TRUE_TOKEN } else { FALSE_TOKEN }),
            Value::Number(n) => {
                if self.lossy && !n.is_finite() {
                    self.out.push_str(NULL_TOKEN);
                } else {
                    self.out.push(crate::grammar::ESCAPE);
                    write_number(*n, self.out)?;
                }
            }
            Value::String(s) => escape_into(s, self.out),
            Value::Array(items) => {
                self.enter(depth + 1)?;
                if items.is_empty() {
                    self.out.push_str(EMPTY_ARRAY_TOKEN);
                    return Ok(());
                }
                self.out.push(OPEN);
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(SEPARATOR);
                    }
                    self.write(item, depth + 1)?;
                }
                self.out.push(CLOSE);
            }
            Value::Object(entries) => {
                self.enter(depth + 1)?;
                if entries.is_empty() {
                    self.out.push_str(EMPTY_OBJECT_TOKEN);
                    return Ok(());
                }
                self.out.push(OPEN);
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push(SEPARATOR);
                    }
                    escape_into(key, self.out);
                    self.out.push(KEY_VALUE);
                    self.write(item, depth + 1)?;
                }
                self.out.push(CLOSE);
            }
        }
        Ok(())
    }

    fn enter(&self, level: usize) -> Result<()> {
        if self.lossy {
            return Ok(());
        }
        self.options.check_depth(level)
    }
}

/// The QSN serializer.
///
/// Writes QSN text for values implementing `Serialize`. Structs and maps become
/// objects, sequences and tuples become arrays, and enums use the externally tagged
/// layout (`Variant`, `(Variant:value)`).
pub struct Serializer {
    output: String,
    options: QsnOptions,
    depth: usize,
}

impl Serializer {
    pub fn new(options: QsnOptions) -> Self {
        Serializer {
            output: String::with_capacity(64),
            options,
            depth: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        self.options.check_depth(self.depth)
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Opens `(variant:` for newtype, tuple and struct variants.
    fn open_variant(&mut self, variant: &str) -> Result<()> {
        self.enter()?;
        self.output.push(OPEN);
        escape_into(variant, &mut self.output);
        self.output.push(KEY_VALUE);
        Ok(())
    }

    fn close_variant(&mut self) {
        self.output.push(CLOSE);
        self.leave();
    }

    fn begin(&mut self, kind: CompoundKind, variant: Option<&str>) -> Result<Compound<'_>> {
        if let Some(variant) = variant {
            self.open_variant(variant)?;
        }
        self.enter()?;
        self.output.push(OPEN);
        Ok(Compound {
            ser: self,
            kind,
            first: true,
            variant: variant.is_some(),
        })
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Compound<'a>;
    type SerializeTuple = Compound<'a>;
    type SerializeTupleStruct = Compound<'a>;
    type SerializeTupleVariant = Compound<'a>;
    type SerializeMap = Compound<'a>;
    type SerializeStruct = Compound<'a>;
    type SerializeStructVariant = Compound<'a>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        self.output.push_str(if v { TRUE_TOKEN } else { FALSE_TOKEN });
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        self.serialize_f64(v as f64)
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        self.output.push(crate::grammar::ESCAPE);
        write_number(v, &mut self.output)
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        let mut buf = [0u8; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        escape_into(v, &mut self.output);
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        use ser::SerializeSeq;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        if self.depth > 0 {
            self.output.push_str(NULL_TOKEN);
        }
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        self.output.push_str(NULL_TOKEN);
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        self.open_variant(variant)?;
        value.serialize(&mut *self)?;
        self.close_variant();
        Ok(())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.begin(CompoundKind::Array, None)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        self.begin(CompoundKind::Array, None)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.begin(CompoundKind::Array, None)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.begin(CompoundKind::Array, Some(variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.begin(CompoundKind::Object, None)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.begin(CompoundKind::Object, None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.begin(CompoundKind::Object, Some(variant))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CompoundKind {
    Array,
    Object,
}

/// In-progress array or object. `(` is already written.
pub struct Compound<'a> {
    ser: &'a mut Serializer,
    kind: CompoundKind,
    first: bool,
    variant: bool,
}

impl Compound<'_> {
    fn separate(&mut self) {
        if !self.first {
            self.ser.output.push(SEPARATOR);
        }
        self.first = false;
    }

    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.separate();
        value.serialize(&mut *self.ser)
    }

    fn field<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.separate();
        escape_into(key, &mut self.ser.output);
        self.ser.output.push(KEY_VALUE);
        value.serialize(&mut *self.ser)
    }

    fn finish(self) -> Result<()> {
        if self.first && self.kind == CompoundKind::Object {
            // `()` is the empty array; the empty object needs its marker.
            self.ser.output.push(KEY_VALUE);
        }
        self.ser.output.push(CLOSE);
        self.ser.leave();
        if self.variant {
            self.ser.close_variant();
        }
        Ok(())
    }
}

impl ser::SerializeSeq for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTuple for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeMap for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.separate();
        key.serialize(MapKeySerializer {
            output: &mut self.ser.output,
        })?;
        self.ser.output.push(KEY_VALUE);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeStruct for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

fn key_must_be_string() -> Error {
    Error::encoding("map keys must be strings")
}

/// Accepts only string-like map keys and writes them escaped.
struct MapKeySerializer<'a> {
    output: &'a mut String,
}

impl ser::Serializer for MapKeySerializer<'_> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = ser::Impossible<(), Error>;
    type SerializeTuple = ser::Impossible<(), Error>;
    type SerializeTupleStruct = ser::Impossible<(), Error>;
    type SerializeTupleVariant = ser::Impossible<(), Error>;
    type SerializeMap = ser::Impossible<(), Error>;
    type SerializeStruct = ser::Impossible<(), Error>;
    type SerializeStructVariant = ser::Impossible<(), Error>;

    fn serialize_str(self, v: &str) -> Result<()> {
        escape_into(v, self.output);
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_i8(self, _v: i8) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_i16(self, _v: i16) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_i32(self, _v: i32) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_u8(self, _v: u8) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_u16(self, _v: u16) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_u32(self, _v: u32) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_none(self) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_string())
    }

    fn serialize_unit(self) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Err(key_must_be_string())
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_string())
    }
}

/// Serializer producing a [`Value`] instead of text.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<String>,
}

pub struct SerializeMap {
    map: QsnMap,
    current_key: Option<String>,
    variant: Option<String>,
}

/// Wraps `value` as `{variant: value}`.
fn tag_variant(variant: Option<String>, value: Value) -> Value {
    match variant {
        Some(variant) => {
            let mut outer = QsnMap::with_capacity(1);
            outer.insert(variant, value);
            Value::Object(outer)
        }
        None => value,
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(
            v.iter().map(|&b| Value::Number(f64::from(b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let inner = to_value(value)?;
        Ok(tag_variant(Some(variant.to_string()), inner))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant.to_string())))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant.to_string())))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<String>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        Ok(tag_variant(self.variant, Value::Array(self.vec)))
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<String>) -> Self {
        SerializeMap {
            map: QsnMap::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Result<Value> {
        Ok(tag_variant(self.variant, Value::Object(self.map)))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(key_must_be_string()),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}
