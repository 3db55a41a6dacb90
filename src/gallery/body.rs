//! Gallery body parsing.
//!
//! Each body line either declares images or captions the most recently
//! declared one:
//!
//! ```text
//! beach.jpg "sunset over the bay.jpg"
//! Low tide at Praia da Adraga.
//! dunes.png
//! ```
//!
//! declares three images; the caption line belongs to
//! `sunset over the bay.jpg`. Filenames with spaces are quoted (single or
//! double) or written with `\ ` escapes.

use std::collections::HashMap;

const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// Whether `word` ends in an image extension (case-insensitive).
pub fn is_image(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Split a line into words, shell style.
///
/// Single and double quotes group words and a backslash escapes the next
/// character. A line with unbalanced quotes falls back to plain whitespace
/// splitting. Empty words are dropped.
pub fn split_words(line: &str) -> Vec<String> {
    let words = shlex::split(line)
        .unwrap_or_else(|| line.split_whitespace().map(str::to_string).collect());
    words.into_iter().filter(|w| !w.is_empty()).collect()
}

/// Images of one block in first-appearance order, with their captions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryBody {
    pub images: Vec<String>,
    captions: HashMap<String, String>,
}

impl GalleryBody {
    /// Caption text of `image`; empty when it has none.
    pub fn caption(&self, image: &str) -> &str {
        self.captions.get(image).map(String::as_str).unwrap_or("")
    }
}

/// Scan state threaded through the line fold.
#[derive(Default)]
struct BodyState {
    current: Option<String>,
    body: GalleryBody,
}

impl BodyState {
    fn feed(mut self, line: &str) -> Self {
        let line = line.trim();
        let images: Vec<String> = split_words(line)
            .into_iter()
            .filter(|w| is_image(w))
            .collect();
        if !images.is_empty() {
            for word in images {
                if !self.body.images.contains(&word) {
                    self.body.images.push(word.clone());
                }
                self.current = Some(word);
            }
        } else if let Some(image) = &self.current {
            // Lines before the first image have nothing to caption
            self.body
                .captions
                .entry(image.clone())
                .or_default()
                .push_str(line);
        }
        self
    }
}

/// Parse a block body into its images and captions.
///
/// Consecutive caption lines are concatenated without a separator.
pub fn parse_body(body: &str) -> GalleryBody {
    body.lines()
        .fold(BodyState::default(), BodyState::feed)
        .body
}
