//! Table-of-contents extraction from rendered fragments.
//!
//! Headings are found by pattern, not by parsing HTML. A title that
//! contains nested markup (inline code, emphasis) is not matched.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{HeadingEntry, TocLevel};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<h([23]) id="([^"]+)">([^<]+)</h[23]>"#).expect("valid regex")
});

/// Collect `<h2>`/`<h3>` anchors from an HTML fragment, in document order.
pub fn extract_headings(html: &str) -> Vec<HeadingEntry> {
    headings(html).collect()
}

/// Lazy form of [`extract_headings`]. Calling it again restarts the scan.
pub fn headings(html: &str) -> impl Iterator<Item = HeadingEntry> + '_ {
    HEADING_RE.captures_iter(html).map(|caps| {
        let level = if &caps[1] == "2" {
            TocLevel::H2
        } else {
            TocLevel::H3
        };
        HeadingEntry::new(level, &caps[2], &caps[3])
    })
}

/// Jump-link markup for the page's navigation column.
///
/// Entries are joined with `separator` so the caller controls indentation.
pub fn render_toc_nav(headings: &[HeadingEntry], separator: &str) -> String {
    if headings.is_empty() {
        return r#"<p class="toc-empty">No table of contents</p>"#.to_string();
    }
    headings
        .iter()
        .map(|h| {
            format!(
                r##"<a href="#{id}" class="toc-h{level}" data-section="{id}">{title}</a>"##,
                id = h.anchor_id,
                level = h.level.as_u8(),
                title = h.title,
            )
        })
        .collect::<Vec<_>>()
        .join(separator)
}
