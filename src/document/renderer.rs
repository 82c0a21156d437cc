//! Markdown-subset to HTML conversion.
//!
//! The conversion is a fixed sequence of whole-text rewrites. Each stage
//! sees the output of the previous one, so the order below matters:
//! code is pulled out first so no later stage can touch it, and paragraph
//! wrapping runs after every stage that emits block markup so it can
//! recognise that markup and leave it alone.
//!
//! This is a deliberately small dialect, not `CommonMark`. Malformed input
//! never fails; it passes through as literal text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```([A-Za-z0-9_]*)\n?((?s:.*?))```").expect("valid regex")
});
static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));
static H3_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^### (.+)$").expect("valid regex"));
static H2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^## (.+)$").expect("valid regex"));
static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^# (.+)$").expect("valid regex"));
static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"));
static EM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("valid regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));
static IFRAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<iframe([^>]*)></iframe>").expect("valid regex"));
static UNORDERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^- (.+)$").expect("valid regex"));
static ORDERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^[0-9]+\. (.+)$").expect("valid regex"));
static EMPTY_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>\s*</p>").expect("valid regex"));
static DASH_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

const CODE_BLOCK_PREFIX: &str = "__CODE_BLOCK_";
const INLINE_CODE_PREFIX: &str = "__INLINE_CODE_";

/// Finished code markup set aside while the other stages run.
///
/// Lives for one `render` call only.
#[derive(Debug, Default)]
struct Protected {
    code_blocks: Vec<String>,
    inline_codes: Vec<String>,
}

type Stage = fn(&str, &mut Protected) -> String;

/// Conversion stages in execution order.
const PIPELINE: &[(&str, Stage)] = &[
    ("fenced_code", extract_fenced_code),
    ("inline_code", extract_inline_code),
    ("headings", render_headings),
    ("emphasis", render_emphasis),
    ("links", render_links),
    ("iframes", wrap_iframes),
    ("lists", render_lists),
    ("paragraphs", wrap_paragraphs),
    ("empty_paragraphs", drop_empty_paragraphs),
    ("restore_code", restore_code),
];

/// Convert a post body to an HTML fragment.
///
/// # Example
///
/// ```
/// use inkpost::document::render;
///
/// let html = render("## Hello World!\n\nSee [docs](http://x).");
/// assert_eq!(
///     html,
///     "<h2 id=\"hello-world\">Hello World!</h2>\n\
///      <p>See <a href=\"http://x\" target=\"_blank\">docs</a>.</p>"
/// );
/// ```
pub fn render(body: &str) -> String {
    let mut protected = Protected::default();
    PIPELINE
        .iter()
        .fold(body.to_string(), |text, (_, stage)| stage(&text, &mut protected))
}

/// Derive a heading anchor: lowercase, anything outside `[a-z0-9]` and
/// Hangul syllables becomes `-`, dash runs collapse to one.
///
/// Dashes at either end are dropped unless nothing else is left.
pub fn anchor_id(title: &str) -> String {
    let replaced: String = title
        .to_lowercase()
        .chars()
        .map(|c| if is_anchor_char(c) { c } else { '-' })
        .collect();
    let collapsed = DASH_RUN_RE.replace_all(&replaced, "-");
    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        // Keep "-" so the id stays non-empty and the TOC pattern still matches it.
        collapsed.into_owned()
    } else {
        trimmed.to_string()
    }
}

const fn is_anchor_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '\u{AC00}'..='\u{D7A3}')
}

// Stage 1. Runs on the raw body. Only `<` and `>` are escaped inside the
// block; `&` and quotes pass through.
fn extract_fenced_code(text: &str, protected: &mut Protected) -> String {
    FENCED_CODE_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let lang = match &caps[1] {
                "" => "text",
                lang => lang,
            };
            let code = caps[2].trim_matches('\n');
            let escaped = code.replace('<', "&lt;").replace('>', "&gt;");
            let placeholder = format!("{CODE_BLOCK_PREFIX}{}__", protected.code_blocks.len());
            protected
                .code_blocks
                .push(format!("<pre><code class=\"language-{lang}\">{escaped}</code></pre>"));
            placeholder
        })
        .into_owned()
}

// Stage 2. Fenced blocks are already placeholders. Inline code is kept
// verbatim, without escaping.
fn extract_inline_code(text: &str, protected: &mut Protected) -> String {
    INLINE_CODE_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let placeholder = format!("{INLINE_CODE_PREFIX}{}__", protected.inline_codes.len());
            protected.inline_codes.push(format!("<code>{}</code>", &caps[1]));
            placeholder
        })
        .into_owned()
}

// Stage 3. Longest marker first so `###` is never read as `#`. Line
// patterns run in CRLF mode: a `\r` ends the line and stays out of the title.
fn render_headings(text: &str, _: &mut Protected) -> String {
    let text = H3_RE.replace_all(text, |caps: &Captures<'_>| {
        format!("<h3 id=\"{}\">{}</h3>", anchor_id(&caps[1]), &caps[1])
    });
    let text = H2_RE.replace_all(&text, |caps: &Captures<'_>| {
        format!("<h2 id=\"{}\">{}</h2>", anchor_id(&caps[1]), &caps[1])
    });
    H1_RE.replace_all(&text, "<h1>${1}</h1>").into_owned()
}

// Stage 4. Bold first, so the single-asterisk pass never sees `**`.
fn render_emphasis(text: &str, _: &mut Protected) -> String {
    let text = STRONG_RE.replace_all(text, "<strong>${1}</strong>");
    EM_RE.replace_all(&text, "<em>${1}</em>").into_owned()
}

// Stage 5. Label and URL are inserted as-is.
fn render_links(text: &str, _: &mut Protected) -> String {
    LINK_RE
        .replace_all(text, "<a href=\"${2}\" target=\"_blank\">${1}</a>")
        .into_owned()
}

// Stage 6.
fn wrap_iframes(text: &str, _: &mut Protected) -> String {
    IFRAME_RE
        .replace_all(
            text,
            "<div class=\"iframe-container\"><iframe${1}></iframe></div>",
        )
        .into_owned()
}

// Stage 7. Every item line becomes its own one-item list, then the
// `</ul>\n<ul>` seams between consecutive lines are removed. Ordered
// lists follow the same rule.
fn render_lists(text: &str, _: &mut Protected) -> String {
    let text = UNORDERED_ITEM_RE.replace_all(text, "<ul><li>${1}</li></ul>");
    let text = ORDERED_ITEM_RE.replace_all(&text, "<ol><li>${1}</li></ol>");
    text.replace("</ul>\n<ul>", "\n").replace("</ol>\n<ol>", "\n")
}

// Stage 8. Block markup from stages 3-7 starts with `<` and is left as is,
// as are code block placeholders. Empty blocks still take part in the join.
fn wrap_paragraphs(text: &str, _: &mut Protected) -> String {
    text.split("\n\n")
        .map(|block| {
            let block = block.trim();
            if block.is_empty() {
                String::new()
            } else if block.starts_with('<') || block.starts_with(CODE_BLOCK_PREFIX) {
                block.to_string()
            } else {
                format!("<p>{block}</p>")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// Stage 9.
fn drop_empty_paragraphs(text: &str, _: &mut Protected) -> String {
    EMPTY_PARAGRAPH_RE.replace_all(text, "").into_owned()
}

// Stage 10. Each placeholder was inserted once and is replaced once, in
// insertion order. Inline spans go back first because one may have
// swallowed a code block placeholder.
fn restore_code(text: &str, protected: &mut Protected) -> String {
    let mut html = text.to_string();
    for (i, code) in protected.inline_codes.iter().enumerate() {
        html = html.replacen(&format!("{INLINE_CODE_PREFIX}{i}__"), code, 1);
    }
    for (i, block) in protected.code_blocks.iter().enumerate() {
        html = html.replacen(&format!("{CODE_BLOCK_PREFIX}{i}__"), block, 1);
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        let names: Vec<_> = PIPELINE.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "fenced_code",
                "inline_code",
                "headings",
                "emphasis",
                "links",
                "iframes",
                "lists",
                "paragraphs",
                "empty_paragraphs",
                "restore_code",
            ]
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_render_plain_text_single_paragraph() {
        assert_eq!(render("Hello world"), "<p>Hello world</p>");
        assert_eq!(render("line one\nline two"), "<p>line one\nline two</p>");
    }

    #[test]
    fn test_render_paragraph_is_trimmed() {
        assert_eq!(render("  padded  \n"), "<p>padded</p>");
    }

    #[test]
    fn test_render_multiple_paragraphs() {
        assert_eq!(render("one\n\ntwo"), "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_render_extra_blank_lines_keep_separator() {
        assert_eq!(render("one\n\n\n\ntwo"), "<p>one</p>\n\n<p>two</p>");
    }

    #[test]
    fn test_render_fenced_code_escapes_angle_brackets_only() {
        let html = render("```\n<script>\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-text\">&lt;script&gt;</code></pre>"
        );
        let html = render("```\na & \"b\"\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-text\">a & \"b\"</code></pre>"
        );
    }

    #[test]
    fn test_render_fenced_code_is_not_interpreted() {
        let html = render("```rust\n**bold** [a](b)\n## not a heading\n- item\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">**bold** [a](b)\n## not a heading\n- item</code></pre>"
        );
    }

    #[test]
    fn test_render_fenced_code_strips_surrounding_blank_lines() {
        let html = render("```js\n\n\nlet x = 1;\n\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-js\">let x = 1;</code></pre>"
        );
    }

    #[test]
    fn test_render_fenced_code_keeps_inner_blank_lines() {
        let html = render("```\na\n\nb\n```");
        assert_eq!(html, "<pre><code class=\"language-text\">a\n\nb</code></pre>");
    }

    #[test]
    fn test_render_fenced_code_between_paragraphs() {
        let html = render("before\n\n```sh\nls\n```\n\nafter");
        assert_eq!(
            html,
            "<p>before</p>\n<pre><code class=\"language-sh\">ls</code></pre>\n<p>after</p>"
        );
    }

    #[test]
    fn test_render_unclosed_fence_is_literal() {
        assert_eq!(render("```\ncode"), "<p>```\ncode</p>");
    }

    #[test]
    fn test_render_inline_code_is_verbatim() {
        assert_eq!(
            render("use `<b>*x*</b>` here"),
            "<p>use <code><b>*x*</b></code> here</p>"
        );
    }

    #[test]
    fn test_render_inline_code_does_not_span_lines() {
        assert_eq!(render("a `b\nc` d"), "<p>a `b\nc` d</p>");
    }

    #[test]
    fn test_render_inline_code_at_block_start_is_wrapped() {
        assert_eq!(render("`x` starts"), "<p><code>x</code> starts</p>");
    }

    #[test]
    fn test_render_headings() {
        assert_eq!(render("# Top"), "<h1>Top</h1>");
        assert_eq!(
            render("## Hello World!"),
            "<h2 id=\"hello-world\">Hello World!</h2>"
        );
        assert_eq!(
            render("### Deep   Dive"),
            "<h3 id=\"deep-dive\">Deep   Dive</h3>"
        );
    }

    #[test]
    fn test_render_heading_requires_space() {
        assert_eq!(render("#hashtag"), "<p>#hashtag</p>");
        assert_eq!(render("#### four"), "<p>#### four</p>");
    }

    #[test]
    fn test_render_heading_only_at_line_start() {
        assert_eq!(render("text ## not"), "<p>text ## not</p>");
    }

    #[test]
    fn test_render_heading_followed_by_text_line_is_unwrapped() {
        // The block starts with markup, so the trailing line stays bare.
        assert_eq!(
            render("## A\ntext"),
            "<h2 id=\"a\">A</h2>\ntext"
        );
    }

    #[test]
    fn test_render_crlf_heading_excludes_carriage_return() {
        let html = render("## Title\r\nbody");
        assert_eq!(html, "<h2 id=\"title\">Title</h2>\r\nbody");
        assert_eq!(
            crate::document::extract_headings(&html),
            vec![crate::document::HeadingEntry::new(
                crate::document::TocLevel::H2,
                "title",
                "Title"
            )]
        );
        assert_eq!(render("# Top\r\n"), "<h1>Top</h1>");
    }

    #[test]
    fn test_render_crlf_list_items_are_not_merged() {
        assert_eq!(
            render("- a\r\n- b"),
            "<ul><li>a</li></ul>\r\n<ul><li>b</li></ul>"
        );
        assert_eq!(
            render("1. a\r\n2. b"),
            "<ol><li>a</li></ol>\r\n<ol><li>b</li></ol>"
        );
    }

    #[test]
    fn test_symbol_only_heading_stays_in_toc() {
        let html = render("## !!!");
        assert_eq!(html, "<h2 id=\"-\">!!!</h2>");
        assert_eq!(
            crate::document::extract_headings(&html),
            vec![crate::document::HeadingEntry::new(
                crate::document::TocLevel::H2,
                "-",
                "!!!"
            )]
        );
    }

    #[test]
    fn test_anchor_id_rules() {
        assert_eq!(anchor_id("Hello World!"), "hello-world");
        assert_eq!(anchor_id("C++ & Rust"), "c-rust");
        assert_eq!(anchor_id("러스트 시작하기"), "러스트-시작하기");
        assert_eq!(anchor_id("v1.2 Notes"), "v1-2-notes");
        assert_eq!(anchor_id("(Intro)"), "intro");
        assert_eq!(anchor_id("!!!"), "-");
        assert_eq!(anchor_id("Ünïcode"), "n-code");
    }

    #[test]
    fn test_render_bold_and_italic() {
        assert_eq!(
            render("**bold** and *em*"),
            "<p><strong>bold</strong> and <em>em</em></p>"
        );
    }

    #[test]
    fn test_render_unmatched_asterisk_is_literal() {
        assert_eq!(render("2 * 3"), "<p>2 * 3</p>");
    }

    #[test]
    fn test_render_link() {
        assert_eq!(
            render("[click](http://x)"),
            "<p><a href=\"http://x\" target=\"_blank\">click</a></p>"
        );
    }

    #[test]
    fn test_render_link_inside_heading() {
        assert_eq!(
            render("## See [x](y)"),
            "<h2 id=\"see-x-y\">See <a href=\"y\" target=\"_blank\">x</a></h2>"
        );
    }

    #[test]
    fn test_render_iframe_wrapped() {
        let html = render("<iframe src=\"https://v\" allowfullscreen></iframe>");
        assert_eq!(
            html,
            "<div class=\"iframe-container\"><iframe src=\"https://v\" allowfullscreen></iframe></div>"
        );
    }

    #[test]
    fn test_render_contiguous_unordered_items_merge() {
        assert_eq!(render("- a\n- b"), "<ul><li>a</li>\n<li>b</li></ul>");
    }

    #[test]
    fn test_render_contiguous_ordered_items_merge() {
        assert_eq!(
            render("1. a\n2. b\n10. c"),
            "<ol><li>a</li>\n<li>b</li>\n<li>c</li></ol>"
        );
    }

    #[test]
    fn test_render_separated_lists_stay_separate() {
        assert_eq!(
            render("- a\n\n- b"),
            "<ul><li>a</li></ul>\n<ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_render_list_fuses_with_following_line() {
        assert_eq!(
            render("- a\n- b\nafter"),
            "<ul><li>a</li>\n<li>b</li></ul>\nafter"
        );
    }

    #[test]
    fn test_render_paragraph_then_list_without_blank_line() {
        assert_eq!(
            render("intro\n- a"),
            "<p>intro\n<ul><li>a</li></ul></p>"
        );
    }

    #[test]
    fn test_render_drops_empty_paragraph_markup() {
        assert_eq!(render("<p> </p>\n\ntext"), "\n<p>text</p>");
    }

    #[test]
    fn test_render_restores_every_placeholder() {
        let md = "```\none\n```\n\n```\ntwo\n```\n\n`a` `b` `c`";
        let html = render(md);
        assert!(!html.contains(CODE_BLOCK_PREFIX));
        assert!(!html.contains(INLINE_CODE_PREFIX));
        assert_eq!(
            html,
            "<pre><code class=\"language-text\">one</code></pre>\n\
             <pre><code class=\"language-text\">two</code></pre>\n\
             <p><code>a</code> <code>b</code> <code>c</code></p>"
        );
    }

    #[test]
    fn test_render_inline_span_around_fence_restores_both() {
        let html = render("`a```b```c`");
        assert!(!html.contains(CODE_BLOCK_PREFIX));
        assert_eq!(
            html,
            "<p><code>a<pre><code class=\"language-b\"></code></pre>c</code></p>"
        );
    }

    #[test]
    fn test_render_many_code_blocks_restore_in_order() {
        let md: Vec<String> = (0..12).map(|i| format!("```\nblock{i}\n```")).collect();
        let html = render(&md.join("\n\n"));
        for i in 0..12 {
            assert!(html.contains(&format!(">block{i}<")), "missing block{i}");
        }
        let first = html.find("block1<").unwrap();
        let tenth = html.find("block10<").unwrap();
        assert!(first < tenth);
    }

    #[test]
    fn test_render_calls_are_independent() {
        let first = render("`a`");
        let second = render("`a`");
        assert_eq!(first, second);
        assert_eq!(second, "<p><code>a</code></p>");
    }
}
