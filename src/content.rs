//! Content file parsing.
//!
//! A content file is plain text divided into named sections. A header line
//! `[key]: value` opens section `key` with `value` as its first text; every
//! following line, up to the next header, is appended verbatim including its
//! line terminator:
//!
//! ```text
//! [title]: Summer in Lisbon
//! [intro]:
//! <p>Three weeks of trams,
//! tiles and sardines.</p>
//! ```
//!
//! yields `title = "Summer in Lisbon"` and
//! `intro = "<p>Three weeks of trams,\ntiles and sardines.</p>\n"`.
//!
//! Lines before the first header have no section to land in and are dropped.
//! A header for a key that already exists resets its text.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot read content file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Section name → accumulated text, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of `key`, or `default` when the section does not exist.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).map(String::as_str).unwrap_or(default)
    }

    /// Text of `key`; an undefined section reads as empty.
    pub fn get(&self, key: &str) -> &str {
        self.get_or(key, "")
    }

    /// Replace the text of `key`, keeping its original position if it exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !self.values.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.values.insert(key, value.into());
    }

    /// Append to an existing section; undefined keys are ignored.
    fn append(&mut self, key: &str, text: &str) {
        if let Some(value) = self.values.get_mut(key) {
            value.push_str(text);
        }
    }

    /// Sections in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|k| (k.as_str(), self.values[k].as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Split a header line into `(key, value)`.
///
/// The key runs up to the first `]:`; the value is the rest of the line with
/// leading whitespace removed.
pub fn parse_header(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let (key, value) = rest.split_once("]:")?;
    Some((key, value.trim_start()))
}

/// Scan state threaded through the line fold.
#[derive(Default)]
struct ParseState {
    current: Option<String>,
    sections: Sections,
}

impl ParseState {
    fn feed(mut self, line: &str) -> Self {
        let bare = line.trim_end_matches(['\n', '\r']);
        match parse_header(bare) {
            Some((key, value)) => {
                self.sections.set(key, value);
                self.current = Some(key.to_string());
            }
            None => {
                // Text before the first header has no destination
                if let Some(key) = &self.current {
                    self.sections.append(key, line);
                }
            }
        }
        self
    }
}

/// Parse content-file text into sections.
pub fn parse_content(text: &str) -> Sections {
    text.split_inclusive('\n')
        .fold(ParseState::default(), ParseState::feed)
        .sections
}

/// Read and parse a content file.
pub fn load_content(path: &Path) -> Result<Sections, ContentError> {
    let text = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_content(&text))
}
