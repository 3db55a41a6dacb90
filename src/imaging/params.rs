//! Parameter types for resize operations.
//!
//! These structs describe *what* to produce, not *how*. They are the interface
//! between [`operations`](super::operations) (which decides whether a file
//! needs producing at all) and the [`backend`](super::backend) (which does the
//! pixel work, in-process or through an external tool).
//!
//! ## Types
//!
//! - [`Geometry`] — ImageMagick-style size specification: `1200x800`, `x50`, `640`.
//! - [`Quality`] — Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`ResizeParams`] — Full specification for one resize: source, output, geometry, quality.

use std::fmt;
use std::path::PathBuf;

/// Target size of a resize, in ImageMagick geometry notation.
///
/// | Text | Meaning |
/// |---|---|
/// | `1200x800` | fit inside a 1200×800 box, aspect ratio preserved |
/// | `x50` | height 50, width follows the aspect ratio |
/// | `640` | width 640, height follows the aspect ratio |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Geometry {
    /// Bounding box: both edges constrained.
    pub fn bounded(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Fixed height, automatic width.
    pub fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.width, self.height) {
            (Some(w), Some(h)) => write!(f, "{}x{}", w, h),
            (None, Some(h)) => write!(f, "x{}", h),
            (Some(w), None) => write!(f, "{}", w),
            (None, None) => Ok(()),
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for a single resize operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub geometry: Geometry,
    pub quality: Quality,
}
