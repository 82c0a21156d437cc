//! Post document conversion.
//!
//! This module handles:
//! - Splitting the front-matter header from the body
//! - Rendering the markdown subset to an HTML fragment
//! - Extracting heading anchors for the table of contents
//!
//! Everything here is pure: no I/O, no state kept between calls.

mod front_matter;
mod renderer;
mod toc;
mod types;

pub use front_matter::split;
pub use renderer::{anchor_id, render};
pub use toc::{extract_headings, headings, render_toc_nav};
pub use types::{FrontMatter, HeadingEntry, Post, SplitDocument, TocLevel};
