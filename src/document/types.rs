//! Core document types.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Metadata parsed from a post's front-matter header.
///
/// Keys keep the order they first appeared in. Assigning an existing key
/// again overwrites its value in place, so the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: Vec<(String, String)>,
}

impl FrontMatter {
    /// Create an empty mapping.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set `key` to `value`, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the document had no header or the header held no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FrontMatter {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut meta = Self::new();
        for (k, v) in iter {
            meta.insert(k, v);
        }
        meta
    }
}

impl Serialize for FrontMatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A raw document separated into its header metadata and body text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitDocument {
    /// Parsed front matter (empty when the document has no header)
    pub meta: FrontMatter,
    /// Everything after the closing delimiter, or the whole input
    pub body: String,
}

/// Heading level that participates in the table of contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum TocLevel {
    H2,
    H3,
}

impl TocLevel {
    /// Numeric heading level, as in `<h2>`/`<h3>` and the `toc-h*` classes.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }
}

impl From<TocLevel> for u8 {
    fn from(level: TocLevel) -> Self {
        level.as_u8()
    }
}

/// A heading anchor found in a rendered fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingEntry {
    pub level: TocLevel,
    pub anchor_id: String,
    pub title: String,
}

impl HeadingEntry {
    /// Build an entry from an already rendered anchor id and title.
    pub fn new(level: TocLevel, anchor_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            level,
            anchor_id: anchor_id.into(),
            title: title.into(),
        }
    }
}

/// A post's source run through the whole conversion: metadata, HTML
/// fragment and table-of-contents entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Post identifier (file stem in the posts index)
    pub id: String,
    pub meta: FrontMatter,
    /// Rendered HTML fragment of the body
    pub html: String,
    pub headings: Vec<HeadingEntry>,
}

impl Post {
    /// Split, render and index the headings of `raw` in one pass.
    pub fn from_source(id: impl Into<String>, raw: &str) -> Self {
        let SplitDocument { meta, body } = super::split(raw);
        let html = super::render(&body);
        let headings = super::extract_headings(&html);
        Self {
            id: id.into(),
            meta,
            html,
            headings,
        }
    }

    /// Front-matter title, falling back to the post id.
    pub fn title(&self) -> &str {
        self.non_empty("title").unwrap_or(&self.id)
    }

    pub fn description(&self) -> &str {
        self.non_empty("description").unwrap_or_default()
    }

    pub fn date(&self) -> &str {
        self.non_empty("date").unwrap_or_default()
    }

    pub fn tags(&self) -> &str {
        self.non_empty("tags").unwrap_or_default()
    }

    // An empty header value counts as absent.
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.meta.get(key).filter(|v| !v.is_empty())
    }
}
