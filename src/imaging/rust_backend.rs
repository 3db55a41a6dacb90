//! Pure Rust resize backend — no ImageMagick required.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image` crate (pure Rust decoders) |
//! | Geometry | [`calculate_resize_dimensions`](super::calculations::calculate_resize_dimensions) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//! | Encode → PNG, GIF | `image::DynamicImage::save_with_format` |

use super::backend::{BackendError, ResizeBackend};
use super::calculations::calculate_resize_dimensions;
use super::params::ResizeParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => save_jpeg(img, path, quality),
        "png" => save_lossless(img, path, ImageFormat::Png),
        "gif" => save_lossless(img, path, ImageFormat::Gif),
        other => Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            other
        ))),
    }
}

fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8);
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

fn save_lossless(img: &DynamicImage, path: &Path, format: ImageFormat) -> Result<(), BackendError> {
    img.save_with_format(path, format).map_err(|e| {
        BackendError::ProcessingFailed(format!("{:?} encode failed: {}", format, e))
    })
}

impl ResizeBackend for RustBackend {
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let (width, height) =
            calculate_resize_dimensions((img.width(), img.height()), params.geometry);
        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Geometry, Quality};
    use crate::test_helpers::create_test_jpeg;

    fn resize_to(source: &Path, output: &Path, geometry: Geometry) -> Result<(), BackendError> {
        RustBackend::new().resize(&ResizeParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            geometry,
            quality: Quality::new(85),
        })
    }

    #[test]
    fn resize_synthetic_into_bounding_box() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 200);

        let output = tmp.path().join("resized.jpg");
        resize_to(&source, &output, Geometry::bounded(120, 80)).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (120, 60));
    }

    #[test]
    fn resize_synthetic_thumbnail_height() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 300, 200);

        let output = tmp.path().join("thumb.jpg");
        resize_to(&source, &output, Geometry::height(50)).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (75, 50));
    }

    #[test]
    fn resize_to_png_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let output = tmp.path().join("resized.png");
        resize_to(&source, &output, Geometry::bounded(40, 40)).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (40, 40));
    }

    #[test]
    fn resize_unsupported_format_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let output = tmp.path().join("output.tiff");
        let result = resize_to(&source, &output, Geometry::height(50));
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn resize_nonexistent_source_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = resize_to(
            Path::new("/nonexistent/image.jpg"),
            &tmp.path().join("out.jpg"),
            Geometry::height(50),
        );
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn resize_garbage_source_fails_to_decode() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("garbage.jpg");
        std::fs::write(&source, b"not an image").unwrap();

        let result = resize_to(&source, &tmp.path().join("out.jpg"), Geometry::height(50));
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }
}
