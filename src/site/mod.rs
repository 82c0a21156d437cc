//! Static site generation around converted posts.
//!
//! - [`page`]: the full HTML page template
//! - [`build`]: batch rebuild from the posts index
//! - [`publish`]: saving and deleting single posts

pub mod build;
pub mod page;
pub mod publish;

pub use build::{BuildReport, build_all, build_one};
pub use page::{canonical_url, render_page};
pub use publish::{publish, remove};
