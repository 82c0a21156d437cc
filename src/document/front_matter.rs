//! Front-matter header splitting.
//!
//! A header is a `---` line at the very start of the document, any number
//! of `key: value` lines, and a closing `---` line followed by a newline.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{FrontMatter, SplitDocument};

static FRONT_MATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A---\n((?s:.*?))\n---\n((?s:.*))\z").expect("valid regex"));

/// Separate the optional metadata header from the body.
///
/// Input without a well-formed header comes back untouched as the body,
/// with empty metadata.
pub fn split(raw: &str) -> SplitDocument {
    let Some(caps) = FRONT_MATTER_RE.captures(raw) else {
        return SplitDocument {
            meta: FrontMatter::new(),
            body: raw.to_string(),
        };
    };
    let header = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str());

    SplitDocument {
        meta: parse_header(header),
        body: body.to_string(),
    }
}

/// Parse header lines at their first colon. Lines without a key are skipped.
fn parse_header(header: &str) -> FrontMatter {
    let mut meta = FrontMatter::new();
    for line in header.split('\n') {
        match line.find(':') {
            Some(idx) if idx > 0 => {
                meta.insert(line[..idx].trim(), line[idx + 1..].trim());
            }
            _ => {}
        }
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_header() {
        let doc = split("---\ntitle: A\n---\nbody");
        assert_eq!(doc.meta.get("title"), Some("A"));
        assert_eq!(doc.meta.len(), 1);
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_split_without_header_returns_input() {
        let raw = "# Title\n\nJust text.";
        let doc = split(raw);
        assert!(doc.meta.is_empty());
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn test_split_rejects_leading_blank_line() {
        let raw = "\n---\ntitle: A\n---\nbody";
        let doc = split(raw);
        assert!(doc.meta.is_empty());
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn test_split_requires_newline_after_closing_delimiter() {
        let raw = "---\ntitle: A\n---";
        let doc = split(raw);
        assert!(doc.meta.is_empty());
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn test_split_allows_empty_body() {
        let doc = split("---\ntitle: A\n---\n");
        assert_eq!(doc.meta.get("title"), Some("A"));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_split_adjacent_delimiters_are_not_a_header() {
        // The header capture must be preceded by its own newline.
        let raw = "---\n---\nbody";
        let doc = split(raw);
        assert!(doc.meta.is_empty());
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn test_split_empty_header_line() {
        let doc = split("---\n\n---\nbody");
        assert!(doc.meta.is_empty());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_split_stops_at_first_closing_delimiter() {
        let doc = split("---\na: 1\n---\nintro\n---\nmore");
        assert_eq!(doc.meta.get("a"), Some("1"));
        assert_eq!(doc.body, "intro\n---\nmore");
    }

    #[test]
    fn test_split_value_keeps_later_colons() {
        let doc = split("---\nurl: http://example.com:8080/x\n---\n");
        assert_eq!(doc.meta.get("url"), Some("http://example.com:8080/x"));
    }

    #[test]
    fn test_split_skips_lines_without_key() {
        let doc = split("---\nno colon here\n: orphan\ntitle:  Spaced  \n---\nb");
        assert_eq!(doc.meta.len(), 1);
        assert_eq!(doc.meta.get("title"), Some("Spaced"));
    }

    #[test]
    fn test_split_duplicate_keys_last_wins() {
        let doc = split("---\ntitle: One\ntitle: Two\n---\nb");
        assert_eq!(doc.meta.get("title"), Some("Two"));
    }

    #[test]
    fn test_split_keeps_list_literal_as_string() {
        let doc = split("---\ntags: [rust, web]\n---\nb");
        assert_eq!(doc.meta.get("tags"), Some("[rust, web]"));
    }

    #[test]
    fn test_split_whitespace_only_key_is_kept_as_empty() {
        // Colon is not at position 0, so the line counts; the key trims to "".
        let doc = split("---\n  : v\n---\nb");
        assert_eq!(doc.meta.get(""), Some("v"));
    }
}
