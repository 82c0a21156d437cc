//! Saving and deleting individual posts.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::BlogConfig;
use crate::error::Error;
use crate::index::{PostEntry, PostsIndex};

use super::build::write_page;

/// Write a post's source, generate its page and record it in the index.
///
/// # Errors
/// Returns [`Error::InvalidPostId`] when `category` or `id` is not a single
/// path segment, or any I/O failure along the way.
pub fn publish(
    config: &BlogConfig,
    category: &str,
    id: &str,
    content: &str,
    today: NaiveDate,
) -> Result<PostEntry> {
    validate_segment(category)?;
    validate_segment(id)?;

    let entry = PostEntry::new(category, id);
    let source_path = config.resolve(&entry.path);
    if let Some(parent) = source_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create post dir {}", parent.display()))?;
    }
    fs::write(&source_path, config.encoding.encode(content))
        .with_context(|| format!("Failed to write post {}", source_path.display()))?;
    write_page(config, &entry, content, today)?;

    let index_path = config.index_path();
    let mut index = load_or_empty(&index_path, config)?;
    index.upsert(entry.clone());
    index.save(&index_path, config.encoding)?;
    tracing::info!(id, category, "post published");
    Ok(entry)
}

/// Delete a post's source and page and drop it from the index.
///
/// # Errors
/// Returns [`Error::PostNotFound`] when the id is not in the index.
pub fn remove(config: &BlogConfig, id: &str) -> Result<PostEntry> {
    let index_path = config.index_path();
    let mut index = PostsIndex::load(&index_path, config.encoding)?;
    let entry = index
        .remove(id)
        .ok_or_else(|| Error::PostNotFound(id.to_string()))?;

    for relative in [entry.path.clone(), entry.html_path()] {
        let path = config.resolve(&relative);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            tracing::debug!(path = %path.display(), "file deleted");
        }
    }

    index.save(&index_path, config.encoding)?;
    tracing::info!(id, "post removed");
    Ok(entry)
}

fn load_or_empty(path: &Path, config: &BlogConfig) -> Result<PostsIndex> {
    if path.exists() {
        PostsIndex::load(path, config.encoding)
    } else {
        Ok(PostsIndex::default())
    }
}

fn validate_segment(segment: &str) -> Result<(), Error> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\']);
    if invalid {
        return Err(Error::InvalidPostId(segment.to_string()));
    }
    Ok(())
}
