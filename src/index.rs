//! The `posts/index.json` catalogue mapping post ids to source files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::encoding::TextEncoding;

/// One catalogue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub id: String,
    /// Blog-relative source path, e.g. `posts/web/intro.txt`
    pub path: String,
    /// Display category
    #[serde(default)]
    pub category: String,
}

impl PostEntry {
    /// Entry for a post stored at `posts/{category}/{id}.txt`.
    pub fn new(category: &str, id: &str) -> Self {
        Self {
            id: id.to_string(),
            path: format!("posts/{category}/{id}.txt"),
            category: capitalize(category),
        }
    }

    /// Directory segment after `posts/`, used in page URLs.
    pub fn category_dir(&self) -> &str {
        self.path.split('/').nth(1).unwrap_or_default()
    }

    /// Blog-relative path of the generated page.
    pub fn html_path(&self) -> String {
        self.path.replacen(".txt", ".html", 1)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// The full catalogue. Unknown top-level fields are kept for rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostsIndex {
    pub posts: Vec<PostEntry>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl PostsIndex {
    /// Read and parse the index file.
    ///
    /// # Errors
    /// Fails when the file cannot be read or decoded, or is not a valid index.
    pub fn load(path: &Path, encoding: TextEncoding) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read index {}", path.display()))?;
        let text = encoding.decode(&bytes, path)?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse index {}", path.display()))
    }

    /// Write the index as two-space indented JSON.
    ///
    /// # Errors
    /// Fails when serialization or the write fails.
    pub fn save(&self, path: &Path, encoding: TextEncoding) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize index")?;
        fs::write(path, encoding.encode(&json))
            .with_context(|| format!("Failed to write index {}", path.display()))
    }

    pub fn find(&self, id: &str) -> Option<&PostEntry> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Replace the entry with the same id in place, or put a new one first.
    pub fn upsert(&mut self, entry: PostEntry) {
        if let Some(existing) = self.posts.iter_mut().find(|p| p.id == entry.id) {
            *existing = entry;
        } else {
            self.posts.insert(0, entry);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<PostEntry> {
        let pos = self.posts.iter().position(|p| p.id == id)?;
        Some(self.posts.remove(pos))
    }
}
