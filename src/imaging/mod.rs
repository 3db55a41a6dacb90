//! Image resizing — the gateway between gallery compilation and pixel work.
//!
//! | Backend | How it resizes |
//! |---|---|
//! | [`ConvertBackend`] | runs ImageMagick `convert <src> -resize <geometry> <dst>` |
//! | [`RustBackend`] | `image` crate, Lanczos3, same geometry semantics |
//!
//! The module is split into:
//! - **Parameters**: [`Geometry`], [`Quality`], [`ResizeParams`]
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Backend**: [`ResizeBackend`] trait + the two implementations
//! - **Operations**: [`resize_cached`], which applies the on-disk cache policy

pub mod backend;
mod calculations;
pub mod convert_backend;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ResizeBackend};
pub use calculations::calculate_resize_dimensions;
pub use convert_backend::ConvertBackend;
pub use operations::resize_cached;
pub use params::{Geometry, Quality, ResizeParams};
pub use rust_backend::RustBackend;

use crate::config::{BackendKind, ResizeConfig};

/// Instantiate the backend selected in `[resize]`.
pub fn backend_for(config: &ResizeConfig) -> Box<dyn ResizeBackend> {
    match config.backend {
        BackendKind::Convert => Box::new(ConvertBackend::new(config.command.as_str())),
        BackendKind::Rust => Box::new(RustBackend::new()),
    }
}
