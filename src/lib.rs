//! # serde_qsn
//!
//! A Serde-compatible library for QSN (Query String Notation), a compact encoding of
//! JSON-like values that can be dropped into a URL component.
//!
//! ## What is QSN?
//!
//! QSN writes the same data model as JSON (null, booleans, numbers, strings, arrays
//! and objects) using six structural characters, `! , : ( ) '`, all of which are
//! legal in a query string. Ordinary text is copied through unchanged, so values
//! stay readable in the address bar:
//!
//! ```text
//! JSON: {"q":"rust serde","page":2,"tags":["a","b"],"exact":false}
//! QSN:  (q:rust serde,page:!2,tags:(a,b),exact:!f)
//! ```
//!
//! See [`grammar`] for the full format reference.
//!
//! ## Key Features
//!
//! - **URL friendly**: only spaces and genuinely reserved characters need
//!   percent-encoding (see [`uri`])
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]` types
//! - **Dynamic values**: [`Value`] plus the [`qsn!`] macro for untyped data
//! - **Exact offsets**: decoding errors carry the byte offset into the input
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_qsn = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_qsn::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Search {
//!     query: String,
//!     page: u32,
//!     exact: bool,
//! }
//!
//! let search = Search {
//!     query: "rust, serde".to_string(),
//!     page: 2,
//!     exact: false,
//! };
//!
//! let text = to_string(&search).unwrap();
//! assert_eq!(text, "(query:rust!, serde,page:!2,exact:!f)");
//!
//! let back: Search = from_str(&text).unwrap();
//! assert_eq!(search, back);
//! ```
//!
//! ### Dynamic Values
//!
//! ```rust
//! use serde_qsn::{parse, qsn, stringify};
//!
//! let value = qsn!({"sort": ["name", "date"], "limit": 10});
//! let text = stringify(&value).unwrap();
//! assert_eq!(text, "(sort:(name,date),limit:!10)");
//! assert_eq!(parse(&text).unwrap(), value);
//! ```
//!
//! ### Inside a URL
//!
//! ```rust
//! use serde_qsn::{decode, encode, qsn};
//!
//! let filter = qsn!({"city": "São Paulo"});
//! let component = encode(&filter).unwrap();
//! assert_eq!(component, "(city:S%C3%A3o%20Paulo)");
//! assert_eq!(decode(&component).unwrap(), filter);
//! ```
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - serde round trip of a struct
//! - **`macro.rs`** - building values with the qsn! macro
//! - **`url_params.rs`** - QSN inside a query string
//! - **`dynamic_values.rs`** - inspecting parsed values
//! - **`strict_parsing.rs`** - strict mode and depth limits
//! - **`size_comparison.rs`** - QSN vs percent-encoded JSON
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod escape;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod number;
pub mod options;
mod parser;
mod scanner;
pub mod ser;
pub mod uri;
pub mod value;

pub use de::{from_value, Deserializer};
pub use error::{Error, ErrorCategory, Result};
pub use map::QsnMap;
pub use options::QsnOptions;
pub use ser::{stringify, stringify_optional, stringify_with_options, Serializer, ValueSerializer};
pub use uri::{decode, encode};
pub use value::Value;

use serde::{Deserialize, Serialize};
use std::io;

/// Parses QSN text into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_qsn::{parse, qsn};
///
/// assert_eq!(parse("(!1,two,!n)").unwrap(), qsn!([1, "two", null]));
/// assert_eq!(parse("(a:!t)").unwrap(), qsn!({"a": true}));
/// assert!(parse("").is_err());
/// ```
///
/// # Errors
///
/// Returns a decoding error if the text is empty or not valid QSN.
pub fn parse(text: &str) -> Result<Value> {
    parse_with_options(text, &QsnOptions::default())
}

/// Parses QSN text with custom options.
///
/// # Errors
///
/// Returns a decoding error if the text is empty, not valid QSN, or rejected by the
/// options (strict mode, depth limit).
pub fn parse_with_options(text: &str, options: &QsnOptions) -> Result<Value> {
    parser::Parser::new(text, options).parse()
}

/// Parses QSN text where the empty string stands for "no value".
///
/// ```rust
/// use serde_qsn::{parse_optional, Value};
///
/// assert_eq!(parse_optional("").unwrap(), None);
/// assert_eq!(parse_optional("!n").unwrap(), Some(Value::Null));
/// ```
///
/// # Errors
///
/// Returns a decoding error for non-empty text that is not valid QSN.
pub fn parse_optional(text: &str) -> Result<Option<Value>> {
    parser::Parser::new(text, &QsnOptions::default()).parse_optional()
}

/// Serialize any `T: Serialize` to a QSN string.
///
/// # Examples
///
/// ```rust
/// use serde_qsn::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: -2 }).unwrap(), "(x:!1,y:!-2)");
/// ```
///
/// # Errors
///
/// Returns an encoding error for non-finite numbers and non-string map keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, QsnOptions::default())
}

/// Serialize any `T: Serialize` to a QSN string with custom options.
///
/// # Errors
///
/// Returns an encoding error, or [`Error::DepthLimitExceeded`] when the value nests
/// deeper than `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: QsnOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new(options);
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_qsn::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.get("x"), Some(&Value::Number(1.0)));
/// ```
///
/// # Errors
///
/// Returns an encoding error for non-string map keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to a writer in QSN format.
///
/// # Examples
///
/// ```rust
/// use serde_qsn::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec!["a", "b"]).unwrap();
/// assert_eq!(buffer, b"(a,b)");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a string of QSN text.
///
/// # Examples
///
/// ```rust
/// use serde_qsn::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("(x:!1,y:!2)").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns a decoding error if the input is not valid QSN, or a data error if it
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::from_str(s);
    T::deserialize(&mut deserializer)
}

/// Deserialize an instance of type `T` from QSN text with custom options.
///
/// # Errors
///
/// Same as [`from_str`], plus strict-mode and depth-limit rejections.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<'a, T>(s: &'a str, options: QsnOptions) -> Result<T>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::with_options(s, options);
    T::deserialize(&mut deserializer)
}

/// Deserialize an instance of type `T` from an I/O stream of QSN.
///
/// # Examples
///
/// ```rust
/// use serde_qsn::from_reader;
/// use std::io::Cursor;
///
/// let numbers: Vec<u8> = from_reader(Cursor::new(b"(!1,!2)")).unwrap();
/// assert_eq!(numbers, vec![1, 2]);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not valid QSN,
/// or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: for<'de> Deserialize<'de>,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of QSN text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid QSN, or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::syntax("", e.valid_up_to(), &e.to_string()))?;
    from_str(s)
}
