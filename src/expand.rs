//! Template expansion.
//!
//! Expansion runs two passes over the template:
//!
//! 1. every `%{name}` placeholder is replaced by the content section `name`
//! 2. every `<galleria>` block in the result is replaced by its compiled
//!    widget, including blocks that arrived through section text
//!
//! [`run`] wires the passes to files: read the template and content file,
//! expand, and write `<output_dir>/<output_file>`. Resized images land in
//! `<output_dir>/images` and `<output_dir>/thumbs`.

use crate::cache::CacheStats;
use crate::config::{BlogitConfig, ConfigError};
use crate::content::{ContentError, Sections, load_content};
use crate::gallery::{Compiler, GalleryError};
use crate::imaging::{Quality, ResizeBackend};
use crate::metadata::ExifReader;
use crate::output::BuildEvent;
use crate::template::{Block, split_galleries, substitute_placeholders};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Default name of the page written by [`run`].
pub const DEFAULT_OUTPUT_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot read template {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gallery(#[from] GalleryError),
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Expand placeholders, then compile every gallery block.
pub fn expand(
    template: &str,
    sections: &Sections,
    compiler: &mut Compiler<'_>,
) -> Result<String, GalleryError> {
    let substituted = substitute_placeholders(template, sections);
    let mut html = String::with_capacity(substituted.len());
    for block in split_galleries(&substituted) {
        match block {
            Block::Text(text) => html.push_str(text),
            Block::Gallery(gallery) => html.push_str(&compiler.compile(gallery)?.html),
        }
    }
    Ok(html)
}

/// Write the page to `output_dir/output_file`, replacing any existing file.
///
/// The directory is not created; a missing directory is an error.
pub fn write_html(html: &str, output_dir: &Path, output_file: &str) -> Result<PathBuf, BuildError> {
    let path = output_dir.join(output_file);
    fs::write(&path, html).map_err(|source| BuildError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Inputs of one build.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub template: PathBuf,
    pub content: PathBuf,
    pub output_dir: PathBuf,
    pub output_file: String,
    /// Directory relative image paths in gallery bodies are resolved against.
    pub image_root: PathBuf,
    /// Regenerate every image variant (`--no-cache`).
    pub force: bool,
    pub config: BlogitConfig,
}

impl RunOptions {
    pub fn new(template: impl Into<PathBuf>, content: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            content: content.into(),
            output_dir: PathBuf::from("."),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            image_root: PathBuf::new(),
            force: false,
            config: BlogitConfig::default(),
        }
    }
}

/// Outcome of a successful build.
#[derive(Debug)]
pub struct RunResult {
    pub output_path: PathBuf,
    pub cache_stats: CacheStats,
}

/// Read, expand, and write one page.
///
/// Nothing is written if any gallery fails to compile.
pub fn run(
    options: &RunOptions,
    backend: &dyn ResizeBackend,
    exif: &dyn ExifReader,
    events: Option<Sender<BuildEvent>>,
) -> Result<RunResult, BuildError> {
    let template = fs::read_to_string(&options.template).map_err(|source| BuildError::Input {
        path: options.template.clone(),
        source,
    })?;
    let sections = load_content(&options.content)?;

    let mut compiler = Compiler::new(backend, exif, &options.config.gallery, &options.output_dir)
        .source_root(&options.image_root)
        .quality(Quality::new(options.config.resize.quality))
        .force(options.force);
    if let Some(tx) = &events {
        compiler = compiler.events(tx.clone());
    }

    let html = expand(&template, &sections, &mut compiler)?;
    let output_path = write_html(&html, &options.output_dir, &options.output_file)?;

    if let Some(tx) = &events {
        let _ = tx.send(BuildEvent::Written {
            path: output_path.clone(),
        });
    }
    Ok(RunResult {
        output_path,
        cache_stats: compiler.stats(),
    })
}
