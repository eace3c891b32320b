//! Escape- and depth-aware scanning of QSN text.
//!
//! The parser needs to find structural characters that are neither escaped nor
//! nested inside an inner collection. [`Marks`] makes a single forward pass over a
//! byte range, tracking two pieces of state: whether the current byte is escaped
//! (it follows an odd-length run of `!`) and the bracket depth relative to the
//! start of the range. It yields every unescaped `(`, `)`, `,` and `:` together with
//! the depth at which it sits.
//!
//! [`Brackets`] runs `Marks` once over the whole input and records the matching `)`
//! of every `(`. After that, checking a collection's brackets is a lookup, and
//! [`Delimiters`] jumps over nested collections instead of stepping through them. Each
//! byte is scanned once by the collection that directly contains it, so parse time
//! stays linear in the input length at any nesting depth.
//!
//! All positions are absolute byte offsets into the original input. Grammar
//! characters are ASCII, so they never match inside a multi-byte UTF-8 sequence.

use crate::grammar::{CLOSE_BYTE, ESCAPE_BYTE, KEY_VALUE_BYTE, OPEN_BYTE, SEPARATOR_BYTE};
use crate::{Error, Result};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MarkKind {
    Open,
    Close,
    Separator,
    KeyValue,
}

/// An unescaped structural byte.
///
/// `depth` is the depth of the enclosing range the byte belongs to: an `Open` reports
/// the depth before it, a `Close` the depth after it. A top-level delimiter has depth 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Mark {
    pub pos: usize,
    pub kind: MarkKind,
    pub depth: isize,
}

impl Mark {
    #[inline]
    pub fn is_top_level(&self, kind: MarkKind) -> bool {
        self.depth == 0 && self.kind == kind
    }
}

/// Iterator over the unescaped structural bytes of `bytes[start..end]`.
pub(crate) struct Marks<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    depth: isize,
    escaped: bool,
}

impl<'a> Marks<'a> {
    pub fn new(bytes: &'a [u8], start: usize, end: usize) -> Self {
        Marks {
            bytes,
            pos: start,
            end,
            depth: 0,
            escaped: false,
        }
    }
}

impl Iterator for Marks<'_> {
    type Item = Mark;

    fn next(&mut self) -> Option<Mark> {
        while self.pos < self.end {
            let pos = self.pos;
            let b = self.bytes[pos];
            self.pos += 1;

            if self.escaped {
                self.escaped = false;
                continue;
            }

            let kind = match b {
                ESCAPE_BYTE => {
                    self.escaped = true;
                    continue;
                }
                OPEN_BYTE => {
                    let depth = self.depth;
                    self.depth += 1;
                    return Some(Mark {
                        pos,
                        kind: MarkKind::Open,
                        depth,
                    });
                }
                CLOSE_BYTE => {
                    self.depth -= 1;
                    MarkKind::Close
                }
                SEPARATOR_BYTE => MarkKind::Separator,
                KEY_VALUE_BYTE => MarkKind::KeyValue,
                _ => continue,
            };
            return Some(Mark {
                pos,
                kind,
                depth: self.depth,
            });
        }
        None
    }
}

/// Matching close position for every unescaped `(` of one input.
#[derive(Debug, Default)]
pub(crate) struct Brackets {
    closes: HashMap<usize, usize>,
}

impl Brackets {
    pub fn scan(bytes: &[u8]) -> Self {
        let mut closes = HashMap::new();
        let mut open = Vec::new();
        for mark in Marks::new(bytes, 0, bytes.len()) {
            match mark.kind {
                MarkKind::Open => open.push(mark.pos),
                MarkKind::Close => {
                    // A stray `)` outside any collection belongs to a leaf string.
                    if let Some(start) = open.pop() {
                        closes.insert(start, mark.pos);
                    }
                }
                _ => {}
            }
        }
        Brackets { closes }
    }

    #[inline]
    pub fn close_of(&self, open: usize) -> Option<usize> {
        self.closes.get(&open).copied()
    }

    /// Checks that the `(` at `start` is closed by the `)` at `end - 1` and not earlier.
    pub fn check_enclosed(&self, bytes: &[u8], start: usize, end: usize) -> Result<()> {
        match self.close_of(start) {
            Some(close) if close + 1 == end => Ok(()),
            Some(close) if close < end => Err(Error::unbalanced(
                close + 1,
                "collection closed before the end of its token",
            )),
            _ if escaped_last_byte(bytes, start, end) => {
                Err(Error::DanglingEscape { offset: end - 2 })
            }
            _ => Err(Error::unbalanced(start, "collection is never closed")),
        }
    }

    /// Top-level `,` and `:` of `bytes[start..end]`, skipping nested collections.
    pub fn delimiters<'a>(&'a self, bytes: &'a [u8], start: usize, end: usize) -> Delimiters<'a> {
        Delimiters {
            bytes,
            brackets: self,
            pos: start,
            end,
            escaped: false,
        }
    }

    /// Finds the first top-level separator and key/value character in `bytes[start..end]`.
    pub fn top_level(&self, bytes: &[u8], start: usize, end: usize) -> TopLevel {
        let mut found = TopLevel::default();
        for mark in self.delimiters(bytes, start, end) {
            match mark.kind {
                MarkKind::Separator if found.separator.is_none() => {
                    found.separator = Some(mark.pos)
                }
                MarkKind::KeyValue if found.key_value.is_none() => {
                    found.key_value = Some(mark.pos)
                }
                _ => {}
            }
            if found.separator.is_some() && found.key_value.is_some() {
                break;
            }
        }
        found
    }
}

/// True when the last byte of the range follows an odd run of `!`.
fn escaped_last_byte(bytes: &[u8], start: usize, end: usize) -> bool {
    let run = bytes[start..end - 1]
        .iter()
        .rev()
        .take_while(|&&b| b == ESCAPE_BYTE)
        .count();
    run % 2 == 1
}

/// Iterator over the depth-0 `,` and `:` of a range whose brackets already balance.
pub(crate) struct Delimiters<'a> {
    bytes: &'a [u8],
    brackets: &'a Brackets,
    pos: usize,
    end: usize,
    escaped: bool,
}

impl Iterator for Delimiters<'_> {
    type Item = Mark;

    fn next(&mut self) -> Option<Mark> {
        while self.pos < self.end {
            let pos = self.pos;
            let b = self.bytes[pos];
            self.pos += 1;

            if self.escaped {
                self.escaped = false;
                continue;
            }

            let kind = match b {
                ESCAPE_BYTE => {
                    self.escaped = true;
                    continue;
                }
                OPEN_BYTE => {
                    self.pos = match self.brackets.close_of(pos) {
                        Some(close) if close < self.end => close + 1,
                        _ => self.end,
                    };
                    continue;
                }
                SEPARATOR_BYTE => MarkKind::Separator,
                KEY_VALUE_BYTE => MarkKind::KeyValue,
                _ => continue,
            };
            return Some(Mark {
                pos,
                kind,
                depth: 0,
            });
        }
        None
    }
}

/// Positions of the first top-level `,` and `:` in a collection body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TopLevel {
    pub separator: Option<usize>,
    pub key_value: Option<usize>,
}

impl TopLevel {
    /// Object/array decision for a non-empty collection body.
    ///
    /// The body is an object when it does not itself start with `(` and a top-level
    /// `:` comes before any top-level `,`.
    pub fn is_object(&self, starts_with_open: bool) -> bool {
        if starts_with_open {
            return false;
        }
        match (self.key_value, self.separator) {
            (Some(kv), Some(sep)) => kv < sep,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}
