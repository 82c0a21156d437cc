//! Batch generation of post pages from the posts index.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::BlogConfig;
use crate::document::Post;
use crate::index::{PostEntry, PostsIndex};

use super::page::render_page;

/// Outcome of a batch build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub succeeded: Vec<String>,
    /// `(post id, error message)` for each post that failed
    pub failed: Vec<(String, String)>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Read one post's source, render its page, and write it next to the source.
///
/// Returns the path of the written page.
///
/// # Errors
/// Fails when the source cannot be read or decoded, or the page cannot be written.
pub fn build_one(config: &BlogConfig, entry: &PostEntry, today: NaiveDate) -> Result<PathBuf> {
    let source_path = config.resolve(&entry.path);
    let bytes = fs::read(&source_path)
        .with_context(|| format!("Failed to read post {}", source_path.display()))?;
    let raw = config.encoding.decode(&bytes, &source_path)?;
    write_page(config, entry, &raw, today)
}

/// Render `raw` as the page for `entry` and write it.
pub(super) fn write_page(
    config: &BlogConfig,
    entry: &PostEntry,
    raw: &str,
    today: NaiveDate,
) -> Result<PathBuf> {
    let started = Instant::now();
    let post = Post::from_source(entry.id.clone(), raw);
    let page = render_page(&post, entry.category_dir(), &config.site, today);

    let html_path = config.resolve(&entry.html_path());
    fs::write(&html_path, config.encoding.encode(&page))
        .with_context(|| format!("Failed to write page {}", html_path.display()))?;
    tracing::debug!(
        id = %entry.id,
        headings = post.headings.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "rendered post"
    );
    Ok(html_path)
}

/// Rebuild every post listed in the index.
///
/// A failing post is recorded in the report and the build moves on.
///
/// # Errors
/// Fails only when the index itself cannot be loaded.
pub fn build_all(config: &BlogConfig, today: NaiveDate) -> Result<BuildReport> {
    let index = PostsIndex::load(&config.index_path(), config.encoding)?;
    tracing::info!(root = %config.blog_root.display(), posts = index.posts.len(), "building posts");

    let mut report = BuildReport::default();
    for entry in &index.posts {
        match build_one(config, entry, today) {
            Ok(_) => report.succeeded.push(entry.id.clone()),
            Err(err) => {
                tracing::warn!(id = %entry.id, error = %format!("{err:#}"), "post build failed");
                report.failed.push((entry.id.clone(), format!("{err:#}")));
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "build finished"
    );
    Ok(report)
}
