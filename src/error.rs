//! Error types for blog operations that callers may want to match on.
//!
//! Conversion itself never fails; these cover decoding and the posts index.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("Text encoding {0} can be read but not written")]
    UnwritableEncoding(String),

    #[error("{} is not valid {encoding} text", .path.display())]
    MalformedText { path: PathBuf, encoding: String },

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Invalid post id or category: {0:?}")]
    InvalidPostId(String),
}
