//! Camera metadata extraction for gallery captions.
//!
//! Each gallery image gets a one-line summary of how it was shot, built from
//! four EXIF fields:
//!
//! | Field | Raw tag | Rendered |
//! |---|---|---|
//! | Shutter | `ExposureTime` | `1/250 s`, or `2.5 s` for exposures over a second |
//! | Aperture | `FNumber` | `f/2.8` |
//! | Focal length | `FocalLength` | `35mm` |
//! | Sensitivity | any tag containing `ISO` | `ISO 200` |
//!
//! Present fields are joined with ` | ` in the order above; absent fields
//! leave no gap. An image with none of them yields an empty string.
//!
//! ## Two layers
//!
//! - [`ExifReader`] turns a file into raw tag-name → value text
//!   ([`ExifTags`]). [`KamadakReader`] is the production implementation.
//! - [`format_exif`] is a pure function from tags to the summary line.
//!
//! Read failures (no EXIF segment, truncated file, unreadable path) are never
//! fatal: [`extract_exif`] treats them the same as "no tags".

use exif::{Field, In, Tag, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExifError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("EXIF parse error: {0}")]
    Parse(#[from] exif::Error),
}

/// Raw tag values keyed by tag name, sorted by name.
pub type ExifTags = BTreeMap<String, String>;

pub const EXPOSURE_TIME: &str = "ExposureTime";
pub const F_NUMBER: &str = "FNumber";
pub const FOCAL_LENGTH: &str = "FocalLength";

/// Source of raw EXIF tags for an image file.
pub trait ExifReader {
    fn read_tags(&self, path: &Path) -> Result<ExifTags, ExifError>;
}

/// EXIF reader backed by the `kamadak-exif` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct KamadakReader;

impl ExifReader for KamadakReader {
    fn read_tags(&self, path: &Path) -> Result<ExifTags, ExifError> {
        let file = File::open(path)?;
        let mut buf = BufReader::new(file);
        let exif = exif::Reader::new().read_from_container(&mut buf)?;

        Ok(exif
            .fields()
            .filter(|field| field.ifd_num == In::PRIMARY)
            .map(|field| (tag_name(field.tag), render_value(field)))
            .collect())
    }
}

/// Tag name as used for lookups.
///
/// EXIF 2.3 renamed `ISOSpeedRatings` to `PhotographicSensitivity`; the
/// legacy name is kept so the ISO lookup finds it.
fn tag_name(tag: Tag) -> String {
    if tag == Tag::PhotographicSensitivity {
        "ISOSpeedRatings".to_string()
    } else {
        tag.to_string()
    }
}

/// Render a field's first value as plain text: rationals as reduced `n/d`
/// (or `n` when the denominator is 1), integers in decimal.
fn render_value(field: &Field) -> String {
    match &field.value {
        Value::Rational(v) if !v.is_empty() => format_ratio(v[0].num as u64, v[0].denom as u64),
        Value::SRational(v) if !v.is_empty() => {
            let sign = if (v[0].num < 0) != (v[0].denom < 0) { "-" } else { "" };
            format!(
                "{}{}",
                sign,
                format_ratio(v[0].num.unsigned_abs() as u64, v[0].denom.unsigned_abs() as u64)
            )
        }
        Value::Short(v) if !v.is_empty() => v[0].to_string(),
        Value::Long(v) if !v.is_empty() => v[0].to_string(),
        _ => field.display_value().to_string(),
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn format_ratio(num: u64, denom: u64) -> String {
    if denom == 0 {
        return num.to_string();
    }
    let g = gcd(num, denom).max(1);
    let (n, d) = (num / g, denom / g);
    if d == 1 {
        n.to_string()
    } else {
        format!("{}/{}", n, d)
    }
}

/// Parse `n/d` text into its parts.
fn parse_fraction(text: &str) -> Option<(f64, f64)> {
    let (n, d) = text.trim().split_once('/')?;
    let n: f64 = n.trim().parse().ok()?;
    let d: f64 = d.trim().parse().ok()?;
    (d != 0.0).then_some((n, d))
}

/// Build the summary line from raw tags.
///
/// ```
/// # use blogit::metadata::{ExifTags, format_exif};
/// let mut tags = ExifTags::new();
/// tags.insert("ExposureTime".into(), "1/250".into());
/// tags.insert("FNumber".into(), "14/5".into());
/// tags.insert("ISOSpeedRatings".into(), "200".into());
/// assert_eq!(format_exif(&tags), "1/250 s | f/2.8 | ISO 200");
/// ```
pub fn format_exif(tags: &ExifTags) -> String {
    let mut parts = Vec::new();

    if let Some(shutter) = tags.get(EXPOSURE_TIME) {
        match parse_fraction(shutter) {
            Some((n, d)) if n > d => parts.push(format!("{} s", n / d)),
            _ => parts.push(format!("{} s", shutter)),
        }
    }

    if let Some(aperture) = tags.get(F_NUMBER) {
        match parse_fraction(aperture) {
            Some((n, d)) => parts.push(format!("f/{}", n / d)),
            None => parts.push(format!("f/{}", aperture)),
        }
    }

    if let Some(focal) = tags.get(FOCAL_LENGTH) {
        parts.push(format!("{}mm", focal));
    }

    if let Some((_, iso)) = tags.iter().find(|(name, _)| name.contains("ISO")) {
        parts.push(format!("ISO {}", iso));
    }

    parts.join(" | ")
}

/// Summary line for the image at `path`, or an empty string when it has no
/// usable metadata.
pub fn extract_exif(reader: &dyn ExifReader, path: &Path) -> String {
    match reader.read_tags(path) {
        Ok(tags) => format_exif(&tags),
        Err(_) => String::new(),
    }
}
