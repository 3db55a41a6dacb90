//! Resize backend trait and shared types.
//!
//! The [`ResizeBackend`] trait is the seam between the gallery compiler and
//! whatever does the pixel work. Two implementations ship:
//!
//! - [`ConvertBackend`](super::convert_backend::ConvertBackend) — shells out to
//!   ImageMagick's `convert`, the historical behavior.
//! - [`RustBackend`](super::rust_backend::RustBackend) — in-process resampling
//!   with the `image` crate, for machines without ImageMagick.
//!
//! Every failure is typed so callers can tell a missing tool from a tool that
//! ran and failed.

use super::params::ResizeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("resize tool not found: {0}")]
    ToolMissing(String),
    #[error("{command} exited with {}: {stderr}", exit_label(.status))]
    NonZeroExit {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Trait for resize backends.
///
/// A backend receives fully-resolved parameters and writes `params.output`.
/// Caching decisions are made before a backend is ever called.
pub trait ResizeBackend {
    /// Produce `params.output` from `params.source` at `params.geometry`.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
