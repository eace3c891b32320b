//! Percent-encoding wrapper for placing QSN text inside a URL component.
//!
//! [`encode_component`] percent-encodes every byte except the
//! `encodeURIComponent` unreserved set (`A-Z a-z 0-9 - _ . ! ~ * ' ( )`) and the
//! two QSN delimiters `,` and `:`, which are legal in query strings and would
//! otherwise bloat every collection. All of QSN's grammar characters therefore
//! survive unencoded:
//!
//! ```rust
//! use serde_qsn::{decode, encode, qsn};
//!
//! let value = qsn!({"q": "hello world", "tags": ["a", "b"]});
//! let text = encode(&value).unwrap();
//! assert_eq!(text, "(q:hello%20world,tags:(a,b))");
//! assert_eq!(decode(&text).unwrap(), value);
//! ```

use crate::{Error, Result, Value};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;

/// Bytes left literal by [`encode_component`]; everything else is percent-encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b',')
    .remove(b':');

/// Percent-encodes `text` for a URL component, keeping `,` and `:` literal.
///
/// Multi-byte characters are encoded byte by byte in upper-case hex.
///
/// ```rust
/// use serde_qsn::uri::encode_component;
///
/// assert_eq!(encode_component("a/b?c=d&e"), "a%2Fb%3Fc%3Dd%26e");
/// assert_eq!(encode_component("a,b:c"), "a,b:c");
/// ```
#[must_use]
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Reverses [`encode_component`]. Also accepts `%2C` / `%3A` and any other
/// percent-encoded byte, as produced by stricter encoders.
///
/// # Errors
///
/// Returns a decoding error if the decoded bytes are not valid UTF-8.
pub fn decode_component(text: &str) -> Result<String> {
    percent_decode_str(text)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| Error::syntax(text, 0, "percent-decoded text is not valid UTF-8"))
}

/// Encodes a value as QSN and then percent-encodes it for a URL component.
///
/// # Errors
///
/// Same as [`crate::stringify`].
pub fn encode(value: &Value) -> Result<String> {
    Ok(encode_component(&crate::stringify(value)?))
}

/// Percent-decodes a URL component and parses the result as QSN.
///
/// # Errors
///
/// Returns a decoding error for invalid UTF-8 or invalid QSN.
pub fn decode(text: &str) -> Result<Value> {
    crate::parse(&decode_component(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_and_delimiters_stay_literal() {
        let literal = "AZaz09-_.!~*'(),:";
        assert_eq!(encode_component(literal), literal);
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        assert_eq!(encode_component("hello world"), "hello%20world");
        assert_eq!(encode_component("100%"), "100%25");
        assert_eq!(encode_component("a+b#c"), "a%2Bb%23c");
    }

    #[test]
    fn test_unicode_is_encoded_upper_case() {
        assert_eq!(
            encode_component("你好,世界:!"),
            "%E4%BD%A0%E5%A5%BD,%E4%B8%96%E7%95%8C:!"
        );
    }

    #[test]
    fn test_decode_accepts_encoded_delimiters() {
        assert_eq!(decode_component("a%2Cb%3ac").unwrap(), "a,b:c");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = decode_component("%FF%FE").unwrap_err();
        assert!(err.is_decoding());
    }
}
