//! Error types for QSN encoding and decoding.
//!
//! Errors fall into two families that mirror the two directions of the codec:
//!
//! - **Encoding errors**: the value cannot be expressed in QSN (non-string map key,
//!   NaN or infinite number)
//! - **Decoding errors**: the text is not valid QSN (unbalanced brackets, dangling
//!   escape character, malformed numeric leaf, missing key separator)
//!
//! Data errors (a valid value that does not fit the requested Rust type) and I/O
//! errors from the reader/writer entry points make up the rest.
//!
//! Decoding errors carry the byte offset into the original input.
//!
//! ## Examples
//!
//! ```rust
//! use serde_qsn::{parse, ErrorCategory};
//!
//! let err = parse("(a,b").unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Decoding);
//! assert!(err.to_string().contains("offset"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during QSN serialization/deserialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The value violates the QSN data model
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// NaN and the infinities have no QSN representation
    #[error("Encoding error: non-finite number {0} cannot be encoded")]
    NonFiniteNumber(f64),

    /// Syntax error with a snippet of the surrounding input
    #[error("Syntax error at offset {offset}: {msg}\n  near: {context}")]
    Syntax {
        offset: usize,
        msg: String,
        context: String,
    },

    /// A collection whose brackets do not pair up
    #[error("Unbalanced brackets at offset {offset}: {msg}")]
    UnbalancedBrackets { offset: usize, msg: String },

    /// An escape character at the end of a token
    #[error("Dangling escape character at offset {offset}")]
    DanglingEscape { offset: usize },

    /// A `!`-tagged leaf that looks numeric but is not a finite number
    #[error("Invalid number at offset {offset}: {token}")]
    InvalidNumber { offset: usize, token: String },

    /// Repeated key in one object (strict mode only)
    #[error("Duplicate key at offset {offset}: {key:?}")]
    DuplicateKey { offset: usize, key: String },

    /// Empty input where a value was required
    #[error("Unexpected empty input: expected a value")]
    Empty,

    /// Nesting deeper than the configured limit
    #[error("Nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },

    /// Type mismatch during deserialization
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The value could not be written as QSN.
    Encoding,
    /// The text is not valid QSN.
    Decoding,
    /// The decoded value does not fit the requested type, or a serde impl reported a problem.
    Data,
    /// Reading or writing failed.
    Io,
}

/// Length of the input excerpt attached to syntax errors, in bytes on each side.
const CONTEXT_RADIUS: usize = 16;

impl Error {
    /// Creates a syntax error, quoting the input around `offset`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_qsn::Error;
    ///
    /// let err = Error::syntax("(a:!1,b)", 6, "expected ':' after object key");
    /// assert!(err.to_string().contains("offset 6"));
    /// assert!(err.to_string().contains("(a:!1,b)"));
    /// ```
    pub fn syntax(input: &str, offset: usize, msg: &str) -> Self {
        Error::Syntax {
            offset,
            msg: msg.to_string(),
            context: excerpt(input, offset),
        }
    }

    /// Creates an unbalanced-brackets error.
    pub fn unbalanced(offset: usize, msg: &str) -> Self {
        Error::UnbalancedBrackets {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates an invalid-number error for the token starting at `offset`.
    pub fn invalid_number(offset: usize, token: &str) -> Self {
        Error::InvalidNumber {
            offset,
            token: token.to_string(),
        }
    }

    /// Creates an encoding error for a value that breaks the QSN data model.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_qsn::Error;
    ///
    /// let err = Error::encoding("map keys must be strings");
    /// assert!(err.is_encoding());
    /// ```
    pub fn encoding<T: fmt::Display>(msg: T) -> Self {
        Error::Encoding(msg.to_string())
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Io(_) => ErrorCategory::Io,
            Error::Encoding(_) | Error::NonFiniteNumber(_) => ErrorCategory::Encoding,
            Error::Syntax { .. }
            | Error::UnbalancedBrackets { .. }
            | Error::DanglingEscape { .. }
            | Error::InvalidNumber { .. }
            | Error::DuplicateKey { .. }
            | Error::Empty
            | Error::DepthLimitExceeded { .. } => ErrorCategory::Decoding,
            Error::TypeMismatch { .. } | Error::Custom(_) => ErrorCategory::Data,
        }
    }

    /// Returns `true` for errors raised while writing QSN.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        self.category() == ErrorCategory::Encoding
    }

    /// Returns `true` for errors raised while reading QSN.
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        self.category() == ErrorCategory::Decoding
    }

    /// Byte offset into the input for decoding errors that have one.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Syntax { offset, .. }
            | Error::UnbalancedBrackets { offset, .. }
            | Error::DanglingEscape { offset }
            | Error::InvalidNumber { offset, .. }
            | Error::DuplicateKey { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Cuts a window of the input around `offset`, widened to char boundaries.
fn excerpt(input: &str, offset: usize) -> String {
    let mut start = offset.saturating_sub(CONTEXT_RADIUS).min(input.len());
    while !input.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = offset.saturating_add(CONTEXT_RADIUS).min(input.len());
    while !input.is_char_boundary(end) {
        end += 1;
    }
    input[start..end].to_string()
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(Error::NonFiniteNumber(f64::NAN).is_encoding());
        assert!(Error::encoding("bad key").is_encoding());
        assert!(Error::DanglingEscape { offset: 3 }.is_decoding());
        assert!(Error::Empty.is_decoding());
        assert_eq!(
            Error::type_mismatch("string", "number").category(),
            ErrorCategory::Data
        );
        assert_eq!(Error::io("closed").category(), ErrorCategory::Io);
    }

    #[test]
    fn test_syntax_error_context_respects_char_boundaries() {
        let input = "(ключ:значение,ещё:больше,текста:здесь)";
        let err = Error::syntax(input, 17, "boom");
        match &err {
            Error::Syntax { context, .. } => assert!(input.contains(context.as_str())),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.offset(), Some(17));
    }

    #[test]
    fn test_offset_absent_for_encoding_errors() {
        assert_eq!(Error::encoding("x").offset(), None);
    }
}
