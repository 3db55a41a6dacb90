//! Build configuration.
//!
//! Loads and validates `blogit.toml`. The file is optional and sparse: any key
//! it sets overrides the stock default, everything else keeps its default.
//! Unknown keys are rejected so typos surface immediately.
//!
//! ## Config File Location
//!
//! `blogit.toml` is looked up next to the template, or passed explicitly with
//! `--config FILE`:
//!
//! ```text
//! site/
//! ├── blogit.toml
//! ├── template.html
//! └── content.txt
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [gallery]
//! stage_width = 1080        # Widget width
//! stage_height = 680        # Widget height
//! width = 1200              # Max width of resized images
//! height = 800              # Max height of resized images
//! thumbheight = 50          # Thumbnail height (width follows aspect ratio)
//! image_margin = 0
//! toggle_info = true
//! thumbnails = true
//! keyboard_nav = true
//! exif_class = "isobar"
//! theme_url = "http://nablizo.com/galleria/themes/classic/galleria.classic.js"
//!
//! [resize]
//! backend = "convert"       # "convert" or "rust"
//! command = "convert"
//! quality = 90
//! ```
//!
//! Per-gallery attributes (`<galleria width="600">`) override the `[gallery]`
//! values for that block only.

use crate::imaging::convert_backend::DEFAULT_COMMAND;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up next to the template.
pub const CONFIG_FILE_NAME: &str = "blogit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `blogit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogitConfig {
    /// Gallery widget and image size defaults.
    pub gallery: GalleryConfig,
    /// Which resize backend to use and how to drive it.
    pub resize: ResizeConfig,
}

/// Defaults for every gallery block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    pub stage_width: u32,
    pub stage_height: u32,
    /// Bounding box of the full-size image variant.
    pub width: u32,
    pub height: u32,
    /// Fixed height of the thumbnail variant.
    pub thumbheight: u32,
    pub image_margin: u32,
    pub toggle_info: bool,
    pub thumbnails: bool,
    pub keyboard_nav: bool,
    /// CSS class wrapped around the EXIF line of each description.
    pub exif_class: String,
    pub theme_url: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            stage_width: 1080,
            stage_height: 680,
            width: 1200,
            height: 800,
            thumbheight: 50,
            image_margin: 0,
            toggle_info: true,
            thumbnails: true,
            keyboard_nav: true,
            exif_class: "isobar".to_string(),
            theme_url: "http://nablizo.com/galleria/themes/classic/galleria.classic.js"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Run an ImageMagick-compatible `convert` executable.
    #[default]
    Convert,
    /// Resize in-process with the `image` crate.
    Rust,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub backend: BackendKind,
    /// Executable used by the convert backend.
    pub command: String,
    /// JPEG quality used by the rust backend.
    pub quality: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Convert,
            command: DEFAULT_COMMAND.to_string(),
            quality: 90,
        }
    }
}

impl BlogitConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gallery;
        for (name, value) in [
            ("stage_width", g.stage_width),
            ("stage_height", g.stage_height),
            ("width", g.width),
            ("height", g.height),
            ("thumbheight", g.thumbheight),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "gallery.{name} must be non-zero"
                )));
            }
        }
        if g.exif_class.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gallery.exif_class must not be empty".into(),
            ));
        }
        if !(1..=100).contains(&self.resize.quality) {
            return Err(ConfigError::Validation(
                "resize.quality must be 1-100".into(),
            ));
        }
        if self.resize.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "resize.command must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// The stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BlogitConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<BlogitConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BlogitConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load an explicit config file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<BlogitConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `blogit.toml` from `dir`, falling back to stock defaults when the
/// file does not exist.
pub fn load_config(dir: &Path) -> Result<BlogitConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return resolve_config(None);
    }
    load_config_file(&path)
}

/// A fully commented stock `blogit.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# blogit configuration
# ====================
# All settings are optional. Values shown below are the defaults.
# Place this file next to your template as blogit.toml, or pass
# --config FILE. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Gallery defaults
# ---------------------------------------------------------------------------
# Attributes on a <galleria> tag override these for that gallery only:
#   <galleria width="600" height="400" thumbheight="40">
[gallery]
# Size of the widget stage on the page.
stage_width = 1080
stage_height = 680

# Resized images fit inside width x height, keeping their aspect ratio.
width = 1200
height = 800

# Thumbnails get this height; their width follows the aspect ratio.
thumbheight = 50

# Space around the image inside the stage, in pixels.
image_margin = 0

# Show the caption/EXIF info panel with a toggle button.
toggle_info = true

# Show the thumbnail strip.
thumbnails = true

# Bind the left/right arrow keys to previous/next.
# A gallery can opt out with disable_keyboard_nav="1".
keyboard_nav = true

# CSS class of the <span> holding the EXIF line in each description.
exif_class = "isobar"

# Galleria theme script loaded before the gallery starts.
theme_url = "http://nablizo.com/galleria/themes/classic/galleria.classic.js"

# ---------------------------------------------------------------------------
# Image resizing
# ---------------------------------------------------------------------------
[resize]
# "convert" runs an ImageMagick-compatible executable for every variant.
# "rust" resizes in-process and needs no external tools.
backend = "convert"

# Executable used by the convert backend.
command = "convert"

# JPEG quality used by the rust backend (1-100).
quality = 90
"##
}
