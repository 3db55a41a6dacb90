//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Geometry;

/// Calculate output dimensions for resizing `source` to `geometry`.
///
/// Follows ImageMagick's `-resize` semantics (without the `>`/`<` flags):
/// the image is scaled up or down so that it fits the constrained edges
/// while keeping its aspect ratio.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `geometry` - Target geometry
///
/// # Returns
/// * `(width, height)` - Output dimensions, never smaller than 1x1
///
/// # Examples
/// ```
/// # use blogit::imaging::{Geometry, calculate_resize_dimensions};
/// // 3000x2000 into a 1200x800 box → 1200x800
/// assert_eq!(calculate_resize_dimensions((3000, 2000), Geometry::bounded(1200, 800)), (1200, 800));
///
/// // Thumbnail at fixed height 50 → width follows the aspect ratio
/// assert_eq!(calculate_resize_dimensions((3000, 2000), Geometry::height(50)), (75, 50));
/// ```
pub fn calculate_resize_dimensions(source: (u32, u32), geometry: Geometry) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return (1, 1);
    }

    let scale = match (geometry.width, geometry.height) {
        (Some(w), Some(h)) => (w as f64 / src_w as f64).min(h as f64 / src_h as f64),
        (Some(w), None) => w as f64 / src_w as f64,
        (None, Some(h)) => h as f64 / src_h as f64,
        (None, None) => 1.0,
    };

    let scaled = |edge: u32| ((edge as f64 * scale).round() as u32).max(1);
    (scaled(src_w), scaled(src_h))
}
