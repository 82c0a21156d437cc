//! Full-page template around a rendered post.

use chrono::NaiveDate;

use crate::config::SiteConfig;
use crate::document::{Post, render_toc_nav};

/// Indentation of TOC links inside the navigation element.
const TOC_INDENT: &str = "\n                    ";

/// Public URL of a post page.
pub fn canonical_url(site: &SiteConfig, category: &str, id: &str) -> String {
    format!("{}/posts/{category}/{id}.html", site.base_url)
}

/// Embed a post into a standalone HTML document.
///
/// `category` is the directory segment of the post's path. Metadata values
/// are inserted as written in the front matter, without escaping.
pub fn render_page(post: &Post, category: &str, site: &SiteConfig, today: NaiveDate) -> String {
    let title = post.title();
    let description = match post.description() {
        "" => title,
        d => d,
    };
    let keywords = match post.tags() {
        "" => site.default_keywords.as_str(),
        t => t,
    };
    let published = match post.date() {
        "" => today.format("%Y-%m-%d").to_string(),
        d => d.to_string(),
    };
    let url = canonical_url(site, category, &post.id);
    let toc = render_toc_nav(&post.headings, TOC_INDENT);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">

    <title>{title} - {site_name}</title>
    <meta name="description" content="{description}">
    <meta name="keywords" content="{keywords}">
    <meta name="author" content="{author}">

    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:type" content="article">
    <meta property="og:url" content="{url}">
    <meta property="og:site_name" content="{site_name}">
    <meta property="og:locale" content="{locale}">

    <meta name="twitter:card" content="summary">
    <meta name="twitter:title" content="{title}">
    <meta name="twitter:description" content="{description}">

    <meta name="robots" content="index, follow">
    <link rel="canonical" href="{url}">

    <link rel="stylesheet" href="{stylesheet}">

    <script type="application/ld+json">
    {{
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": "{title}",
        "description": "{description}",
        "url": "{url}",
        "datePublished": "{published}",
        "author": {{
            "@type": "Person",
            "name": "{author}"
        }}
    }}
    </script>
</head>
<body>
    <div class="blog-container">
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="blog-title"><a href="../../">{site_name}</a></h1>
            </div>
        </nav>

        <main class="content">
            <div class="content-header">
                <h2 id="content-title">{title}</h2>
                <div class="post-meta-header">
                    <span class="post-date">{date}</span>
                    <span class="post-category-tag">{category}</span>
                </div>
            </div>
            <div id="content-body" class="content-body">
                <div class="post-content">
                    {html}
                </div>
            </div>
        </main>

        <aside class="toc">
            <nav id="toc-nav" class="toc-nav">
                    {toc}
            </nav>
        </aside>
    </div>
</body>
</html>"#,
        lang = site.lang,
        site_name = site.name,
        author = site.author,
        locale = site.locale,
        stylesheet = site.stylesheet,
        date = post.date(),
        html = post.html,
    )
}
