//! High-level image operations.
//!
//! These functions combine the cache policy with backend execution: they
//! decide whether a destination needs producing, and only then call the
//! backend.

use super::backend::{BackendError, ResizeBackend};
use super::params::ResizeParams;
use crate::cache::{self, VariantStatus};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Resize `params.source` into `params.output` unless a previous run already did.
///
/// An existing destination file counts as a cache hit and the backend is not
/// invoked; `force` bypasses that check. Any backend failure is returned
/// as-is for the caller to treat as fatal.
pub fn resize_cached(
    backend: &dyn ResizeBackend,
    params: &ResizeParams,
    force: bool,
) -> Result<VariantStatus> {
    if cache::is_cached(&params.output, force) {
        return Ok(VariantStatus::Cached);
    }
    backend.resize(params)?;
    Ok(VariantStatus::Resized)
}
