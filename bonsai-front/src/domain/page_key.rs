//! Page keys and the title encoder that produces their canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a content page as it appears in URLs.
///
/// A key taken from a request is not necessarily canonical. [`encode_title`]
/// produces the canonical form, which is the only form pages are stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(String);

impl PageKey {
    /// Wrap a string without encoding it.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// True when encoding the key leaves it unchanged.
    pub fn is_canonical(&self) -> bool {
        encode_title(&self.0) == *self
    }

    /// Case-insensitive lookup form used for page aliases.
    pub fn alias_key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Human-readable title derived from the key.
    pub fn title(&self) -> String {
        decode_title(&self.0)
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PageKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for PageKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PageKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Encode a page title (or a raw key from a URL) into its canonical key.
///
/// Spaces and underscores are interchangeable word separators: every run of
/// whitespace and underscores becomes a single `_`, and separators at either
/// end are dropped. All other characters are kept as they are. The result is
/// a fixed point, so encoding a canonical key returns it unchanged.
pub fn encode_title(raw: &str) -> PageKey {
    let mut output = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for ch in raw.chars() {
        if ch == '_' || ch.is_whitespace() {
            pending_separator = !output.is_empty();
            continue;
        }
        if pending_separator {
            output.push('_');
            pending_separator = false;
        }
        output.push(ch);
    }

    PageKey(output)
}

/// Turn a key back into a display title.
pub fn decode_title(key: &str) -> String {
    key.replace('_', " ")
}
