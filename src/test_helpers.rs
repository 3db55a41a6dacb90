//! Shared test utilities for the blogit test suite.
//!
//! Provides synthetic image fixtures: plain JPEGs produced by the `image`
//! crate, and JPEGs carrying a hand-built EXIF segment so the metadata
//! extractor can be exercised without binary fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let photo = tmp.path().join("beach.jpg");
//! create_test_jpeg_with_exif(&photo, &ExifFixture::default());
//! ```

use image::{ImageEncoder, RgbImage};
use std::path::Path;

// =========================================================================
// Plain JPEGs
// =========================================================================

/// Encode a gradient RGB image as JPEG bytes.
pub fn test_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, test_jpeg_bytes(width, height)).unwrap();
}

// =========================================================================
// JPEGs with EXIF
// =========================================================================

/// Camera settings written into a synthetic EXIF segment.
///
/// Rationals are `(numerator, denominator)` and are stored unreduced.
#[derive(Debug, Clone)]
pub struct ExifFixture {
    pub exposure_time: (u32, u32),
    pub f_number: (u32, u32),
    pub iso: u16,
    pub focal_length: (u32, u32),
}

impl Default for ExifFixture {
    fn default() -> Self {
        Self {
            exposure_time: (1, 250),
            f_number: (28, 10),
            iso: 200,
            focal_length: (35, 1),
        }
    }
}

const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

/// Build a little-endian TIFF structure: IFD0 → Exif IFD with four entries.
fn exif_tiff(fixture: &ExifFixture) -> Vec<u8> {
    const IFD0_OFFSET: u32 = 8;
    const EXIF_IFD_OFFSET: u32 = IFD0_OFFSET + 2 + 12 + 4;
    const EXIF_ENTRIES: u32 = 4;
    const DATA_OFFSET: u32 = EXIF_IFD_OFFSET + 2 + 12 * EXIF_ENTRIES + 4;

    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&IFD0_OFFSET.to_le_bytes());

    let entry = |out: &mut Vec<u8>, tag: u16, kind: u16, value: u32| {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
    };

    // IFD0: only the Exif IFD pointer
    out.extend_from_slice(&1u16.to_le_bytes());
    entry(&mut out, 0x8769, TYPE_LONG, EXIF_IFD_OFFSET);
    out.extend_from_slice(&0u32.to_le_bytes());

    // Exif IFD, entries in ascending tag order
    out.extend_from_slice(&(EXIF_ENTRIES as u16).to_le_bytes());
    entry(&mut out, 0x829a, TYPE_RATIONAL, DATA_OFFSET);
    entry(&mut out, 0x829d, TYPE_RATIONAL, DATA_OFFSET + 8);
    entry(&mut out, 0x8827, TYPE_SHORT, fixture.iso as u32);
    entry(&mut out, 0x920a, TYPE_RATIONAL, DATA_OFFSET + 16);
    out.extend_from_slice(&0u32.to_le_bytes());

    for (num, den) in [
        fixture.exposure_time,
        fixture.f_number,
        fixture.focal_length,
    ] {
        out.extend_from_slice(&num.to_le_bytes());
        out.extend_from_slice(&den.to_le_bytes());
    }
    out
}

/// Create a 64x48 JPEG whose APP1 segment carries the fixture's EXIF fields.
pub fn create_test_jpeg_with_exif(path: &Path, fixture: &ExifFixture) {
    let jpeg = test_jpeg_bytes(64, 48);
    let tiff = exif_tiff(fixture);

    let mut app1 = Vec::new();
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&tiff);

    let mut out = Vec::with_capacity(jpeg.len() + app1.len() + 4);
    out.extend_from_slice(&jpeg[..2]); // SOI
    out.extend_from_slice(&[0xff, 0xe1]);
    out.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}
