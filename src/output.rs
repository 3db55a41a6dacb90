//! CLI progress output.
//!
//! # Information-First Display
//!
//! Each gallery leads with its position and photo count; each image leads
//! with its position and file name, with the source path, EXIF line and
//! per-variant cache status as indented context lines:
//!
//! ```text
//! Gallery 1 (2 photos)
//!     001 beach.jpg
//!         Source: photos/beach.jpg
//!         EXIF: 1/250 s | f/8 | 35mm | ISO 200
//!         image 1200x800: resized
//!         thumb x50: cached
//!     002 dunes.png
//!         Source: photos/dunes.png
//!         image 1200x800: resized
//!         thumb x50: resized
//! Wrote out/index.html
//! ```
//!
//! # Architecture
//!
//! The compiler sends [`BuildEvent`]s over a channel while it works; the CLI
//! prints them from a separate thread. [`format_build_event`] is pure and
//! returns the display lines, so formatting is tested without capturing
//! stdout.

use crate::cache::VariantStatus;
use std::path::{Path, PathBuf};

/// Cache outcome of one generated variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    /// Variant kind and geometry, e.g. `image 1200x800` or `thumb x50`.
    pub label: String,
    pub status: VariantStatus,
}

/// Progress reported while a template is expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// A gallery block is about to be compiled. `index` is 1-based.
    GalleryStarted { index: usize, image_count: usize },
    /// Both variants of one image are in place. `index` is the 1-based
    /// position within its gallery.
    ImageProcessed {
        index: usize,
        source_path: PathBuf,
        exif: String,
        variants: Vec<VariantInfo>,
    },
    /// The expanded page was written.
    Written { path: PathBuf },
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn status_label(status: VariantStatus) -> &'static str {
    match status {
        VariantStatus::Cached => "cached",
        VariantStatus::Resized => "resized",
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a single progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::GalleryStarted { index, image_count } => {
            let noun = if *image_count == 1 { "photo" } else { "photos" };
            vec![format!("Gallery {} ({} {})", index, image_count, noun)]
        }
        BuildEvent::ImageProcessed {
            index,
            source_path,
            exif,
            variants,
        } => {
            let mut lines = vec![
                format!(
                    "{}{} {}",
                    indent(1),
                    format_index(*index),
                    display_name(source_path)
                ),
                format!("{}Source: {}", indent(2), source_path.display()),
            ];
            if !exif.is_empty() {
                lines.push(format!("{}EXIF: {}", indent(2), exif));
            }
            for variant in variants {
                lines.push(format!(
                    "{}{}: {}",
                    indent(2),
                    variant.label,
                    status_label(variant.status)
                ));
            }
            lines
        }
        BuildEvent::Written { path } => vec![format!("Wrote {}", path.display())],
    }
}

/// Print one event to stdout.
pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{}", line);
    }
}
