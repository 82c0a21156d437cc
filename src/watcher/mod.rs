//! File watching for live rebuilds.
//!
//! Uses notify crate for cross-platform file system events.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// A debounced change to a post source or the posts index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileChange {
    pub path: PathBuf,
    /// Path relative to the blog root, e.g. `posts/web/intro.txt`
    pub relative_path: PathBuf,
}

impl FileChange {
    /// True for `posts/index.json`.
    pub fn is_index(&self) -> bool {
        self.relative_path == Path::new("posts").join("index.json")
    }
}

/// Watches `posts/` under a blog root and batches changes.
pub struct PostsWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    blog_root: PathBuf,
    index_path: PathBuf,
    debounce: Duration,
    pending: BTreeSet<PathBuf>,
    pending_since: Option<Instant>,
}

impl PostsWatcher {
    /// Start watching `blog_root/posts` recursively.
    ///
    /// # Errors
    /// Returns an error if the file watcher cannot be created or the directory cannot be watched.
    pub fn new(blog_root: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Canonicalize so event paths from the OS (which are always absolute
        // and canonical) match our stored paths.
        let blog_root = blog_root
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| blog_root.as_ref().to_path_buf());
        let posts_dir = blog_root.join("posts");
        let index_path = posts_dir.join("index.json");

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&posts_dir, RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            blog_root,
            index_path,
            debounce,
            pending: BTreeSet::new(),
            pending_since: None,
        })
    }

    /// The canonical blog root being watched.
    pub fn blog_root(&self) -> &Path {
        &self.blog_root
    }

    /// Drain queued events. Once no relevant event has arrived for the
    /// debounce interval, returns the accumulated changes; otherwise empty.
    pub fn take_changes(&mut self) -> Vec<FileChange> {
        let mut total_events = 0u32;
        let mut relevant_events = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            total_events += 1;
            match event {
                Ok(ev) => {
                    let relevant: Vec<PathBuf> = ev
                        .paths
                        .iter()
                        .filter(|p| self.is_relevant(p))
                        .cloned()
                        .collect();
                    if relevant.is_empty() {
                        tracing::trace!(kind = ?ev.kind, paths = ?ev.paths, "irrelevant event");
                        continue;
                    }
                    relevant_events += 1;
                    self.pending.extend(relevant);
                    self.pending_since = Some(Instant::now());
                }
                Err(err) => {
                    tracing::warn!(error = %err, "watcher error");
                }
            }
        }

        if total_events > 0 {
            tracing::debug!(
                total = total_events,
                relevant = relevant_events,
                pending = self.pending.len(),
                root = %self.blog_root.display(),
                "watcher poll"
            );
        }

        let Some(pending_since) = self.pending_since else {
            return Vec::new();
        };
        if pending_since.elapsed() < self.debounce {
            return Vec::new();
        }
        self.pending_since = None;
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|path| self.to_change(path))
            .collect()
    }

    fn is_relevant(&self, path: &Path) -> bool {
        path == self.index_path.as_path() || is_post_source(path)
    }

    fn to_change(&self, path: PathBuf) -> FileChange {
        let relative_path = path
            .strip_prefix(&self.blog_root)
            .map_or_else(|_| path.clone(), Path::to_path_buf);
        FileChange {
            path,
            relative_path,
        }
    }
}

fn is_post_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "txt")
}
