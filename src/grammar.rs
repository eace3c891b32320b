//! QSN grammar characters and format reference.
//!
//! # Overview
//!
//! QSN (Query String Notation) is a compact textual encoding for JSON-like values
//! that survives URL components with little or no percent-encoding. Every value is
//! encoded with six structural characters; all other characters pass through untouched.
//!
//! | role | character |
//! |------|-----------|
//! | escape / leaf tag | `!` |
//! | array / entry separator | `,` |
//! | key / value separator | `:` |
//! | collection open | `(` |
//! | collection close | `)` |
//! | empty-string quote | `'` |
//!
//! # Leaves
//!
//! | Value | Encoding |
//! |-------|----------|
//! | `null` | `!n` |
//! | `true` / `false` | `!t` / `!f` |
//! | number | `!` + canonical number text, e.g. `!42`, `!-0.5`, `!1.234e25` |
//! | string | the string with every grammar character prefixed by `!` |
//! | empty string | `''` |
//!
//! A string is never prefixed with a tag, so `hello` is the string `"hello"` and
//! `!!` is the one-character string `"!"`.
//!
//! # Collections
//!
//! ```text
//! ()                 empty array
//! (:)                empty object
//! (!1,two,!f)        [1, "two", false]
//! (a:!1,b:(x,y))     {"a": 1, "b": ["x", "y"]}
//! ```
//!
//! An object is recognised when its body does not start with `(` and the first
//! top-level unescaped `:` comes before the first top-level unescaped `,`.
//! Everything else is an array.
//!
//! # Known ambiguity
//!
//! The object test is a heuristic, not a type tag. A hand-written `(a:b)` reads as
//! the object `{"a": "b"}`. Encoders never produce that text for `["a:b"]` because
//! the colon inside the string is escaped (`(a!:b)`).

/// Escape character; also tags `null`, booleans and numbers.
pub const ESCAPE: char = '!';

/// Separates array elements and object entries.
pub const SEPARATOR: char = ',';

/// Separates an object key from its value.
pub const KEY_VALUE: char = ':';

/// Opens an array or object.
pub const OPEN: char = '(';

/// Closes an array or object.
pub const CLOSE: char = ')';

/// Quote character; `''` is the empty string.
pub const QUOTE: char = '\'';

/// Every character that must be escaped inside strings and keys.
pub const ESCAPABLE: [char; 6] = [ESCAPE, SEPARATOR, KEY_VALUE, OPEN, CLOSE, QUOTE];

pub(crate) const ESCAPE_BYTE: u8 = ESCAPE as u8;
pub(crate) const SEPARATOR_BYTE: u8 = SEPARATOR as u8;
pub(crate) const KEY_VALUE_BYTE: u8 = KEY_VALUE as u8;
pub(crate) const OPEN_BYTE: u8 = OPEN as u8;
pub(crate) const CLOSE_BYTE: u8 = CLOSE as u8;
pub(crate) const QUOTE_BYTE: u8 = QUOTE as u8;

/// Encoding of `null`.
pub const NULL_TOKEN: &str = "!n";

/// Encoding of `true`.
pub const TRUE_TOKEN: &str = "!t";

/// Encoding of `false`.
pub const FALSE_TOKEN: &str = "!f";

/// Encoding of the empty string.
pub const EMPTY_STRING_TOKEN: &str = "''";

/// Encoding of the empty array.
pub const EMPTY_ARRAY_TOKEN: &str = "()";

/// Encoding of the empty object.
pub const EMPTY_OBJECT_TOKEN: &str = "(:)";

/// Returns `true` if `c` is one of the six grammar characters.
///
/// # Examples
///
/// ```rust
/// use serde_qsn::grammar::is_escapable;
///
/// assert!(is_escapable(','));
/// assert!(!is_escapable('/'));
/// ```
#[inline]
#[must_use]
pub const fn is_escapable(c: char) -> bool {
    matches!(c, ESCAPE | SEPARATOR | KEY_VALUE | OPEN | CLOSE | QUOTE)
}

/// Byte form of [`is_escapable`]. Grammar characters are all ASCII, so a byte
/// test never matches inside a multi-byte UTF-8 sequence.
#[inline]
pub(crate) const fn is_escapable_byte(b: u8) -> bool {
    matches!(
        b,
        ESCAPE_BYTE | SEPARATOR_BYTE | KEY_VALUE_BYTE | OPEN_BYTE | CLOSE_BYTE | QUOTE_BYTE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapable_table_matches_predicate() {
        for c in ESCAPABLE {
            assert!(is_escapable(c));
            assert!(is_escapable_byte(c as u8));
        }
        for c in ['a', ' ', '"', '/', '%', '&', '=', '?', '+', '~', '*'] {
            assert!(!is_escapable(c));
        }
    }

    #[test]
    fn test_tokens_use_grammar_characters() {
        assert!(NULL_TOKEN.starts_with(ESCAPE));
        assert_eq!(EMPTY_OBJECT_TOKEN, format!("{}{}{}", OPEN, KEY_VALUE, CLOSE));
        assert_eq!(EMPTY_STRING_TOKEN, format!("{}{}", QUOTE, QUOTE));
    }
}
