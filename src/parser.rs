//! Recursive QSN parser.
//!
//! The parser never slices out substrings to recurse on. Every step works on a
//! `(start, end)` byte range of the one input buffer, so error offsets always point
//! into the text the caller passed in.
//!
//! A range is classified by its first byte:
//!
//! - `!` starts a tagged leaf: `!n`, `!t`, `!f`, a number, or an escaped string whose
//!   first character is a grammar character
//! - `(` starts a collection, which must be closed by the range's last byte
//! - anything else is a plain string
//!
//! Brackets are matched once for the whole input when the parser is built. Each
//! collection then looks up its own closing bracket and walks only its direct
//! children's delimiters.

use crate::escape::unescape;
use crate::grammar::{
    is_escapable_byte, EMPTY_OBJECT_TOKEN, EMPTY_STRING_TOKEN, ESCAPE_BYTE, FALSE_TOKEN,
    NULL_TOKEN, OPEN_BYTE, TRUE_TOKEN,
};
use crate::number::parse_number;
use crate::scanner::{Brackets, MarkKind};
use crate::{Error, QsnMap, QsnOptions, Result, Value};

pub(crate) struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    brackets: Brackets,
    options: &'a QsnOptions,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: &'a QsnOptions) -> Self {
        Parser {
            input,
            bytes: input.as_bytes(),
            brackets: Brackets::scan(input.as_bytes()),
            options,
        }
    }

    /// Parses the whole input. The empty input is not a value.
    pub fn parse(&self) -> Result<Value> {
        if self.input.is_empty() {
            return Err(Error::Empty);
        }
        self.parse_range(0, self.input.len(), 0)
    }

    /// Parses the whole input, mapping the empty input to `None`.
    pub fn parse_optional(&self) -> Result<Option<Value>> {
        if self.input.is_empty() {
            return Ok(None);
        }
        self.parse_range(0, self.input.len(), 0).map(Some)
    }

    /// `depth` is the number of collections enclosing this range.
    fn parse_range(&self, start: usize, end: usize, depth: usize) -> Result<Value> {
        if start == end {
            return Err(Error::syntax(self.input, start, "expected a value"));
        }
        match self.bytes[start] {
            ESCAPE_BYTE => self.parse_tagged(start, end),
            OPEN_BYTE => self.parse_collection(start, end, depth + 1),
            _ => self.parse_string(start, end).map(Value::String),
        }
    }

    fn parse_tagged(&self, start: usize, end: usize) -> Result<Value> {
        let token = &self.input[start..end];
        match token {
            NULL_TOKEN => return Ok(Value::Null),
            TRUE_TOKEN => return Ok(Value::Bool(true)),
            FALSE_TOKEN => return Ok(Value::Bool(false)),
            _ => {}
        }

        match self.bytes.get(start + 1) {
            Some(b) if start + 1 < end && (b.is_ascii_digit() || *b == b'-') => {
                parse_number(&token[1..])
                    .map(Value::Number)
                    .ok_or_else(|| Error::invalid_number(start, token))
            }
            _ => self.parse_string(start, end).map(Value::String),
        }
    }

    fn parse_string(&self, start: usize, end: usize) -> Result<String> {
        self.check_leaf(start, end)?;
        Ok(unescape(&self.input[start..end]).into_owned())
    }

    /// Rejects a trailing unpaired escape character and, in strict mode, anything the
    /// encoder would never write inside a string.
    fn check_leaf(&self, start: usize, end: usize) -> Result<()> {
        let strict = self.options.strict;
        if strict && &self.input[start..end] == EMPTY_STRING_TOKEN {
            return Ok(());
        }

        let mut i = start;
        while i < end {
            let b = self.bytes[i];
            if b == ESCAPE_BYTE {
                if i + 1 == end {
                    return Err(Error::DanglingEscape { offset: i });
                }
                if is_escapable_byte(self.bytes[i + 1]) {
                    i += 2;
                    continue;
                }
                if strict {
                    return Err(Error::syntax(
                        self.input,
                        i,
                        "escape character must precede a grammar character",
                    ));
                }
            } else if strict && is_escapable_byte(b) {
                return Err(Error::syntax(
                    self.input,
                    i,
                    "unescaped grammar character inside a string",
                ));
            }
            i += 1;
        }
        Ok(())
    }

    fn parse_collection(&self, start: usize, end: usize, level: usize) -> Result<Value> {
        self.brackets.check_enclosed(self.bytes, start, end)?;
        self.options.check_depth(level)?;

        let inner_start = start + 1;
        let inner_end = end - 1;
        if inner_start == inner_end {
            return Ok(Value::Array(Vec::new()));
        }
        if &self.input[start..end] == EMPTY_OBJECT_TOKEN {
            return Ok(Value::Object(QsnMap::new()));
        }

        let found = self.brackets.top_level(self.bytes, inner_start, inner_end);
        if found.is_object(self.bytes[inner_start] == OPEN_BYTE) {
            self.parse_object(inner_start, inner_end, level)
        } else {
            self.parse_array(inner_start, inner_end, level)
        }
    }

    fn parse_array(&self, start: usize, end: usize, level: usize) -> Result<Value> {
        let mut items = Vec::new();
        let mut cursor = start;
        for mark in self.brackets.delimiters(self.bytes, start, end) {
            if mark.is_top_level(MarkKind::Separator) {
                items.push(self.parse_range(cursor, mark.pos, level)?);
                cursor = mark.pos + 1;
            }
        }
        items.push(self.parse_range(cursor, end, level)?);
        Ok(Value::Array(items))
    }

    fn parse_object(&self, start: usize, end: usize, level: usize) -> Result<Value> {
        let mut map = QsnMap::new();
        let mut cursor = start;
        let mut key_end = None;
        for mark in self.brackets.delimiters(self.bytes, start, end) {
            match mark.kind {
                MarkKind::KeyValue if key_end.is_none() => key_end = Some(mark.pos),
                MarkKind::Separator => {
                    self.parse_entry(&mut map, cursor, key_end, mark.pos, level)?;
                    cursor = mark.pos + 1;
                    key_end = None;
                }
                _ => {}
            }
        }
        self.parse_entry(&mut map, cursor, key_end, end, level)?;
        Ok(Value::Object(map))
    }

    fn parse_entry(
        &self,
        map: &mut QsnMap,
        start: usize,
        key_end: Option<usize>,
        end: usize,
        level: usize,
    ) -> Result<()> {
        let key_end = key_end
            .ok_or_else(|| Error::syntax(self.input, end, "expected ':' after object key"))?;
        if start == key_end {
            return Err(Error::syntax(self.input, start, "expected an object key"));
        }

        let key = self.parse_string(start, key_end)?;
        let value = self.parse_range(key_end + 1, end, level)?;
        if map.contains_key(&key) && self.options.strict {
            return Err(Error::DuplicateKey { offset: start, key });
        }
        map.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Value> {
        Parser::new(s, &QsnOptions::default()).parse()
    }

    fn parse_strict(s: &str) -> Result<Value> {
        Parser::new(s, &QsnOptions::strict()).parse()
    }

    #[test]
    fn test_leaf_tokens() {
        assert_eq!(parse("!n").unwrap(), Value::Null);
        assert_eq!(parse("!t").unwrap(), Value::Bool(true));
        assert_eq!(parse("!f").unwrap(), Value::Bool(false));
        assert_eq!(parse("!-12.5").unwrap(), Value::Number(-12.5));
        assert_eq!(parse("!!").unwrap(), Value::from("!"));
        assert_eq!(parse("''").unwrap(), Value::from(""));
        assert_eq!(parse("hello").unwrap(), Value::from("hello"));
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(parse("()").unwrap(), Value::Array(vec![]));
        assert_eq!(parse("(:)").unwrap(), Value::Object(QsnMap::new()));
    }

    #[test]
    fn test_invalid_number_offset() {
        match parse("(!1,(!2,!1.2.3))").unwrap_err() {
            Error::InvalidNumber { offset, token } => {
                assert_eq!(offset, 8);
                assert_eq!(token, "!1.2.3");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_separator() {
        match parse("(a:!1,b)").unwrap_err() {
            Error::Syntax { offset, msg, .. } => {
                assert_eq!(offset, 7);
                assert!(msg.contains("':'"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_elements_rejected() {
        assert!(parse("(,)").is_err());
        assert!(parse("(!1,)").is_err());
        assert!(parse("(a:)").is_err());
        assert!(parse("(:!1)").is_err());
    }

    #[test]
    fn test_dangling_escape() {
        assert_eq!(parse("!"), Err(Error::DanglingEscape { offset: 0 }));
        assert_eq!(parse("abc!"), Err(Error::DanglingEscape { offset: 3 }));
        assert_eq!(parse("(a,b!!!)"), Err(Error::DanglingEscape { offset: 6 }));
        assert_eq!(
            parse("(a,b!!)").unwrap(),
            Value::Array(vec![Value::from("a"), Value::from("b!")])
        );
    }

    #[test]
    fn test_lenient_versus_strict_leaves() {
        assert_eq!(parse("a!b").unwrap(), Value::from("a!b"));
        assert!(parse_strict("a!b").is_err());

        assert_eq!(parse("x(y)").unwrap(), Value::from("x(y)"));
        assert!(parse_strict("x(y)").is_err());

        assert_eq!(parse("!nope").unwrap(), Value::from("!nope"));
        assert!(parse_strict("!nope").is_err());

        assert_eq!(parse_strict("''").unwrap(), Value::from(""));
    }

    #[test]
    fn test_duplicate_keys() {
        let value = parse("(a:!1,a:!2)").unwrap();
        assert_eq!(value.get("a"), Some(&Value::Number(2.0)));
        assert!(matches!(
            parse_strict("(a:!1,a:!2)"),
            Err(Error::DuplicateKey { offset: 6, .. })
        ));
    }

    #[test]
    fn test_deep_nesting_parses_in_linear_time() {
        let handle = std::thread::Builder::new()
            .stack_size(256 << 20)
            .spawn(|| {
                let levels = 20_000;
                let text = format!("{}{}", "(".repeat(levels), ")".repeat(levels));
                let started = std::time::Instant::now();
                let value = parse(&text).unwrap();
                let elapsed = started.elapsed();

                let mut depth = 0;
                let mut cursor = &value;
                while let Value::Array(items) = cursor {
                    depth += 1;
                    match items.first() {
                        Some(next) => cursor = next,
                        None => break,
                    }
                }
                assert_eq!(depth, levels);
                assert!(
                    elapsed < std::time::Duration::from_secs(2),
                    "parsing {} levels took {:?}",
                    levels,
                    elapsed
                );
            })
            .unwrap();
        handle.join().unwrap();
    }
}
