use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::encoding::TextEncoding;

/// Environment variable that names the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "INKPOST_CONFIG";

/// On-disk shape of `config.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    blog_root: PathBuf,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    site: SiteConfig,
}

/// Resolved configuration passed to every I/O entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogConfig {
    /// Absolute (or config-relative resolved) blog repository root
    pub blog_root: PathBuf,
    pub encoding: TextEncoding,
    pub site: SiteConfig,
}

/// Values the page template fills in around a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub name: String,
    pub author: String,
    /// Public URL of the site, without a trailing slash
    pub base_url: String,
    pub lang: String,
    pub locale: String,
    /// Stylesheet href, relative to a post page
    pub stylesheet: String,
    /// Used for the keywords meta tag when a post has no tags
    pub default_keywords: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "My Blog".to_string(),
            author: String::new(),
            base_url: String::new(),
            lang: "en".to_string(),
            locale: "en_US".to_string(),
            stylesheet: "../../blog.css".to_string(),
            default_keywords: "blog".to_string(),
        }
    }
}

impl BlogConfig {
    /// Configuration rooted at `blog_root` with default encoding and site values.
    pub fn new(blog_root: impl Into<PathBuf>) -> Self {
        Self {
            blog_root: blog_root.into(),
            encoding: TextEncoding::default(),
            site: SiteConfig::default(),
        }
    }

    /// `posts/index.json` under the blog root.
    pub fn index_path(&self) -> PathBuf {
        self.blog_root.join("posts").join("index.json")
    }

    /// Absolute path of a blog-relative path such as `posts/web/a.txt`.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.blog_root.join(relative)
    }
}

/// Pick the config file: explicit flag, then [`CONFIG_ENV`], then `./config.json`.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from("config.json"), PathBuf::from)
}

/// Load and resolve a config file.
///
/// A relative `blogRoot` is taken relative to the directory holding the
/// config file.
///
/// # Errors
/// Fails when the file cannot be read or is not valid JSON, and when it
/// names an encoding that is unknown or cannot be written.
pub fn load_config(path: &Path) -> Result<BlogConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(&content, path.parent().unwrap_or_else(|| Path::new("")))
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn parse_config(content: &str, base_dir: &Path) -> Result<BlogConfig> {
    let raw: RawConfig = serde_json::from_str(content)?;
    let encoding = match raw.encoding.as_deref() {
        Some(label) => TextEncoding::from_label(label)?,
        None => TextEncoding::default(),
    };
    let blog_root = if raw.blog_root.is_absolute() {
        raw.blog_root
    } else {
        base_dir.join(raw.blog_root)
    };
    Ok(BlogConfig {
        blog_root,
        encoding,
        site: raw.site,
    })
}
