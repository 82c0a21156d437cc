// Transitive dependency version mismatches we can't control
#![allow(clippy::multiple_crate_versions)]

//! # Inkpost
//!
//! Local content tooling for a static personal blog.
//!
//! Posts are plain-text files with a small `---` delimited metadata header
//! and a body in a fixed markdown subset. Inkpost turns them into
//! standalone HTML pages:
//!
//! ```text
//! raw text -> split -> (meta, body) -> render -> fragment -> page template
//!                                                  |
//!                                                  +-> extract_headings -> TOC
//! ```
//!
//! ## Modules
//!
//! - [`document`]: Front-matter splitting, markdown rendering, TOC extraction
//! - [`site`]: Page template, batch build, publish and remove
//! - [`index`]: The `posts/index.json` catalogue
//! - [`config`]: `config.json` loading
//! - [`encoding`]: Configurable text encoding
//! - [`watcher`]: Debounced change notifications for live rebuilds

pub mod config;
pub mod document;
pub mod encoding;
pub mod error;
pub mod index;
pub mod site;
pub mod watcher;

pub use error::Error;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{BlogConfig, SiteConfig};
    pub use crate::document::{
        FrontMatter, HeadingEntry, Post, SplitDocument, TocLevel, extract_headings, render, split,
    };
    pub use crate::index::{PostEntry, PostsIndex};
}
