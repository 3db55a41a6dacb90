//! Resized-image cache for repeat builds.
//!
//! Resizing is the slow part of a build, so generated files are reused across
//! runs. The cache is the output directory itself: a destination file under
//! `images/` or `thumbs/` that already exists is assumed to be up to date and
//! is not regenerated.
//!
//! # Keys
//!
//! Entries are keyed by **destination path only**. Two source images that
//! share a basename map to the same destination, and a changed source image
//! is not noticed. Both are accepted trade-offs of the simple scheme; pass
//! `--no-cache` after editing a photo.
//!
//! # Concurrency
//!
//! There is no locking. Two builds writing into the same output directory at
//! once are unsupported.

use std::fmt;
use std::path::Path;

/// Whether a destination can be reused instead of regenerated.
///
/// `force` (the `--no-cache` flag) always answers no.
pub fn is_cached(output: &Path, force: bool) -> bool {
    !force && output.is_file()
}

/// Outcome of one resize request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    /// Destination already existed; the backend was not called.
    Cached,
    /// The backend produced the destination during this run.
    Resized,
}

/// Summary of cache performance for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    /// Count one resize outcome.
    pub fn record(&mut self, status: VariantStatus) {
        match status {
            VariantStatus::Cached => self.hit(),
            VariantStatus::Resized => self.miss(),
        }
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            write!(f, "no images")
        } else if self.hits > 0 {
            write!(
                f,
                "{} cached, {} resized ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} resized", self.misses)
        }
    }
}
