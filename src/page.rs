//! Page entity and identifier schemes.
//!
//! # Identifier Schemes
//! - `Title`: human-assigned alphanumeric token, used by the file backend
//! - `PageId`: store-assigned integer, used by the relational backend
//!
//! A deployment uses exactly one scheme. Everything above the store is
//! generic over [`PageKey`] so the two never mix.

use std::fmt;

/// Identifier capability shared by both schemes.
pub trait PageKey: Clone + Eq + fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// Parse a single path segment into a key.
    /// Returns `None` when the segment does not fit the grammar.
    fn from_segment(segment: &str) -> Option<Self>;
}

/// Longest title whose `<title>.txt` file name fits in 255 bytes.
pub const MAX_TITLE_LEN: usize = 251;

/// Page title used as identifier in file mode.
///
/// Always 1 to [`MAX_TITLE_LEN`] ASCII alphanumerics, which also makes it
/// safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Title(String);

impl Title {
    /// Validate and wrap a title.
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.is_empty()
            && raw.len() <= MAX_TITLE_LEN
            && raw.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PageKey for Title {
    fn from_segment(segment: &str) -> Option<Self> {
        Self::parse(segment)
    }
}

/// Store-assigned identifier used in relational mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(i64);

impl PageId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PageKey for PageId {
    fn from_segment(segment: &str) -> Option<Self> {
        // Digits only: rejects signs and whitespace that `i64::from_str` would accept.
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        segment.parse().ok().map(Self)
    }
}

/// A stored (or placeholder) page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<K> {
    /// Identifier. `None` only for placeholder pages that were never stored.
    pub id: Option<K>,
    /// Display name.
    pub title: String,
    /// Raw page content.
    pub content: Vec<u8>,
}

impl<K: PageKey> Page<K> {
    pub fn new(id: K, title: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Blank page backing the "new page" form.
    pub fn empty() -> Self {
        Self {
            id: None,
            title: String::new(),
            content: Vec::new(),
        }
    }

    /// Stand-in for a page that was requested for editing but does not exist.
    pub fn not_found(id: K) -> Self {
        Self {
            id: Some(id),
            title: "not found".to_string(),
            content: Vec::new(),
        }
    }
}
