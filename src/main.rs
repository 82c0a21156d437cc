//! Inkpost - static blog content tool.
//!
//! # Usage
//!
//! ```bash
//! inkpost render posts/web/intro.txt
//! inkpost build
//! inkpost publish --category web --id intro draft.txt
//! inkpost watch
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

use inkpost::config::{BlogConfig, config_path, load_config};
use inkpost::document::{FrontMatter, HeadingEntry, Post};
use inkpost::encoding::TextEncoding;
use inkpost::index::PostsIndex;
use inkpost::site;
use inkpost::watcher::{FileChange, PostsWatcher};

/// Static blog content tool: render posts, build pages, watch for changes
#[derive(Parser, Debug)]
#[command(name = "inkpost", version, about, long_about = None)]
struct Cli {
    /// Path to config.json (defaults to $INKPOST_CONFIG, then ./config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the HTML fragment for a post source
    Render {
        /// Post source file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Emit `{meta, html, headings}` as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the table of contents of a post source
    Toc {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Rebuild every page listed in posts/index.json
    Build,

    /// Save a post into the blog, render its page, and index it
    Publish {
        #[arg(long)]
        category: String,

        #[arg(long)]
        id: String,

        /// Post source to copy in
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Delete a post's files and index entry
    Remove {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Rebuild pages whenever post sources change
    Watch {
        /// Quiet period before a batch of changes is rebuilt
        #[arg(long, default_value_t = 200)]
        debounce_ms: u64,
    },
}

#[derive(Serialize)]
struct RenderOutput<'a> {
    meta: &'a FrontMatter,
    html: &'a str,
    headings: &'a [HeadingEntry],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Render { file, json } => {
            let post = read_post(&file, encoding_for(cli.config.as_deref()))?;
            if json {
                let output = RenderOutput {
                    meta: &post.meta,
                    html: &post.html,
                    headings: &post.headings,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", post.html);
            }
        }
        Command::Toc { file } => {
            let post = read_post(&file, encoding_for(cli.config.as_deref()))?;
            for heading in &post.headings {
                let indent = if heading.level.as_u8() == 3 { "  " } else { "" };
                println!("{indent}- {} (#{})", heading.title, heading.anchor_id);
            }
        }
        Command::Build => {
            let config = blog_config(cli.config.as_deref())?;
            let report = site::build_all(&config, today())?;
            println!(
                "Build finished: {} succeeded, {} failed",
                report.succeeded.len(),
                report.failed.len()
            );
            for (id, err) in &report.failed {
                eprintln!("  failed {id}: {err}");
            }
            if !report.is_success() {
                anyhow::bail!("{} post(s) failed to build", report.failed.len());
            }
        }
        Command::Publish { category, id, file } => {
            let config = blog_config(cli.config.as_deref())?;
            let content = read_text(&file, config.encoding)?;
            let entry = site::publish(&config, &category, &id, &content, today())?;
            println!("Published {} -> {}", entry.id, entry.html_path());
        }
        Command::Remove { id } => {
            let config = blog_config(cli.config.as_deref())?;
            let entry = site::remove(&config, &id)?;
            println!("Removed {} ({})", entry.id, entry.path);
        }
        Command::Watch { debounce_ms } => {
            let config = blog_config(cli.config.as_deref())?;
            watch(&config, Duration::from_millis(debounce_ms))?;
        }
    }
    Ok(())
}

fn blog_config(explicit: Option<&Path>) -> Result<BlogConfig> {
    load_config(&config_path(explicit))
}

// Render and toc work without a config file; one is only used for its encoding.
fn encoding_for(explicit: Option<&Path>) -> TextEncoding {
    let path = config_path(explicit);
    if !path.exists() {
        return TextEncoding::default();
    }
    match load_config(&path) {
        Ok(config) => config.encoding,
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "ignoring unreadable config");
            TextEncoding::default()
        }
    }
}

fn read_text(path: &Path, encoding: TextEncoding) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(encoding.decode(&bytes, path)?)
}

fn read_post(path: &Path, encoding: TextEncoding) -> Result<Post> {
    let raw = read_text(path, encoding)?;
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Post::from_source(id, &raw))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn watch(config: &BlogConfig, debounce: Duration) -> Result<()> {
    let mut watcher = PostsWatcher::new(&config.blog_root, debounce)
        .with_context(|| format!("Failed to watch {}", config.blog_root.display()))?;
    println!("Watching {} (Ctrl-C to stop)", watcher.blog_root().display());

    loop {
        let changes = watcher.take_changes();
        if !changes.is_empty() {
            rebuild_changed(config, &changes);
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}

fn rebuild_changed(config: &BlogConfig, changes: &[FileChange]) {
    if changes.iter().any(FileChange::is_index) {
        match site::build_all(config, today()) {
            Ok(report) => println!(
                "Rebuilt all posts: {} succeeded, {} failed",
                report.succeeded.len(),
                report.failed.len()
            ),
            Err(err) => eprintln!("Rebuild failed: {err:#}"),
        }
        return;
    }

    let index = match PostsIndex::load(&config.index_path(), config.encoding) {
        Ok(index) => index,
        Err(err) => {
            eprintln!("Rebuild failed: {err:#}");
            return;
        }
    };
    for change in changes {
        let Some(entry) = index
            .posts
            .iter()
            .find(|p| Path::new(&p.path) == change.relative_path)
        else {
            tracing::debug!(path = %change.relative_path.display(), "changed file is not indexed");
            continue;
        };
        match site::build_one(config, entry, today()) {
            Ok(path) => println!("Rebuilt {}", path.display()),
            Err(err) => eprintln!("Failed {}: {err:#}", entry.id),
        }
    }
}
