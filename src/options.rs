//! Configuration options for QSN encoding and decoding.
//!
//! The grammar itself is fixed; options only control how forgiving the decoder is
//! and how deep values may nest.
//!
//! ## Examples
//!
//! ```rust
//! use serde_qsn::{parse_with_options, QsnOptions};
//!
//! // Lenient (default): an escape before an ordinary character is kept as text.
//! let value = parse_with_options("a!b", &QsnOptions::new()).unwrap();
//! assert_eq!(value.as_str(), Some("a!b"));
//!
//! // Strict: the same input is rejected.
//! assert!(parse_with_options("a!b", &QsnOptions::strict()).is_err());
//! ```

/// Configuration options for QSN encoding and decoding.
///
/// # Examples
///
/// ```rust
/// use serde_qsn::QsnOptions;
///
/// let options = QsnOptions::new();
/// assert!(!options.strict);
/// assert_eq!(options.max_depth, None);
///
/// let options = QsnOptions::strict().with_max_depth(32);
/// assert!(options.strict);
/// assert_eq!(options.max_depth, Some(32));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QsnOptions {
    /// Reject input that the encoder can never produce: escape characters before
    /// ordinary characters, bare brackets inside strings and keys, and duplicate
    /// object keys.
    pub strict: bool,
    /// Maximum collection nesting. `None` leaves recursion bounded by the stack only.
    pub max_depth: Option<usize>,
}

impl QsnOptions {
    /// Creates default options (lenient decoding, no depth limit).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with strict decoding enabled.
    #[must_use]
    pub fn strict() -> Self {
        QsnOptions {
            strict: true,
            ..Default::default()
        }
    }

    /// Enables or disables strict decoding.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the maximum nesting depth for both directions.
    ///
    /// A depth of 0 allows only leaves; 1 allows one level of collection, and so on.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Returns `Err` if `depth` exceeds the configured limit.
    pub(crate) fn check_depth(&self, depth: usize) -> crate::Result<()> {
        match self.max_depth {
            Some(limit) if depth > limit => Err(crate::Error::DepthLimitExceeded { limit }),
            _ => Ok(()),
        }
    }
}
