//! Escaping of leaf strings and object keys.
//!
//! Only the six grammar characters (see [`crate::grammar::ESCAPABLE`]) are escaped,
//! by prefixing them with `!`. Everything else, including non-ASCII text, control
//! characters, `"` and `/`, is copied through unchanged. The empty string becomes
//! the two-character token `''` so that it never produces an empty token.
//!
//! ```rust
//! use serde_qsn::escape::{escape, unescape};
//!
//! assert_eq!(escape("a,b"), "a!,b");
//! assert_eq!(escape(""), "''");
//! assert_eq!(unescape("a!,b"), "a,b");
//! assert_eq!(unescape(&escape("!key,:(")), "!key,:(");
//! ```

use crate::grammar::{is_escapable_byte, EMPTY_STRING_TOKEN, ESCAPE, ESCAPE_BYTE};
use std::borrow::Cow;

pub use crate::grammar::is_escapable;

/// Returns `true` if `s` contains at least one grammar character.
#[inline]
#[must_use]
pub fn needs_escape(s: &str) -> bool {
    s.bytes().any(is_escapable_byte)
}

/// Escapes a string for use as a QSN leaf or object key.
///
/// Borrows the input when nothing needs escaping.
#[must_use]
pub fn escape(s: &str) -> Cow<'_, str> {
    if s.is_empty() {
        return Cow::Borrowed(EMPTY_STRING_TOKEN);
    }
    if !needs_escape(s) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 4);
    escape_into(s, &mut out);
    Cow::Owned(out)
}

/// Appends the escaped form of `s` to `out`.
pub fn escape_into(s: &str, out: &mut String) {
    if s.is_empty() {
        out.push_str(EMPTY_STRING_TOKEN);
        return;
    }
    let mut segment_start = 0;
    for (i, b) in s.bytes().enumerate() {
        if is_escapable_byte(b) {
            out.push_str(&s[segment_start..i]);
            out.push(ESCAPE);
            segment_start = i;
        }
    }
    out.push_str(&s[segment_start..]);
}

/// Reverses [`escape`].
///
/// `''` decodes to the empty string. An escape character that is not followed by a
/// grammar character is kept as-is.
#[must_use]
pub fn unescape(s: &str) -> Cow<'_, str> {
    if s == EMPTY_STRING_TOKEN {
        return Cow::Borrowed("");
    }
    if !s.contains(ESCAPE) {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut segment_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == ESCAPE_BYTE && i + 1 < bytes.len() && is_escapable_byte(bytes[i + 1]) {
            out.push_str(&s[segment_start..i]);
            segment_start = i + 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    out.push_str(&s[segment_start..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_string_is_borrowed() {
        assert!(matches!(escape("hello world"), Cow::Borrowed("hello world")));
        assert!(matches!(unescape("hello world"), Cow::Borrowed("hello world")));
    }

    #[test]
    fn test_escape_every_grammar_character() {
        assert_eq!(escape("!"), "!!");
        assert_eq!(escape(","), "!,");
        assert_eq!(escape(":"), "!:");
        assert_eq!(escape("("), "!(");
        assert_eq!(escape(")"), "!)");
        assert_eq!(escape("'"), "!'");
        assert_eq!(escape("!key,:("), "!!key!,!:!(");
    }

    #[test]
    fn test_escape_leaves_other_characters() {
        let s = "\"/\\ \u{8}\u{c}\t 你好 &=?%+~*";
        assert_eq!(escape(s), s);
    }

    #[test]
    fn test_empty_string_token() {
        assert_eq!(escape(""), "''");
        assert_eq!(unescape("''"), "");
        // A literal pair of quotes is escaped and never collides with the token.
        assert_eq!(escape("''"), "!'!'");
        assert_eq!(unescape("!'!'"), "''");
    }

    #[test]
    fn test_unescape_runs_of_escape_characters() {
        for s in ["!", "!!", "!!!", "!!!!,", "a!!b", "!,!,!,", "((()))", "'x'"] {
            assert_eq!(unescape(&escape(s)), s, "failed for {:?}", s);
        }
    }

    #[test]
    fn test_unescape_keeps_unpaired_escape() {
        assert_eq!(unescape("a!b"), "a!b");
        assert_eq!(unescape("a!"), "a!");
    }

    #[test]
    fn test_escape_into_appends() {
        let mut out = String::from("(");
        escape_into("a:b", &mut out);
        out.push(')');
        assert_eq!(out, "(a!:b)");
    }
}
