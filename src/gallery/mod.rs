//! Gallery compilation.
//!
//! Turns one `<galleria ...>BODY</galleria>` block into a Galleria widget:
//!
//! 1. **Options**: opening-tag attributes split into known and passthrough
//!    options ([`attributes`]).
//! 2. **Images**: the body lists images and their captions ([`body`]).
//! 3. **Variants**: every image is resized twice into the output directory,
//!    `images/<name>` bounded by `width`x`height` and `thumbs/<name>` at a
//!    fixed `thumbheight`. Existing files are reused unless forced.
//! 4. **Markup**: an EXIF-annotated `dataSource` and the merged options are
//!    rendered into a container and init script ([`widget`]).
//!
//! The first failed resize aborts the compile.

pub mod attributes;
pub mod body;
pub mod widget;

use crate::cache::CacheStats;
use crate::config::GalleryConfig;
use crate::imaging::{BackendError, Geometry, Quality, ResizeBackend, ResizeParams, resize_cached};
use crate::metadata::{ExifReader, extract_exif};
use crate::output::{BuildEvent, VariantInfo};
use attributes::{GalleryOptions, parse_tag};
use body::parse_body;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use widget::{DataSourceEntry, build_widget_config, describe, gallery_id, render_widget};

/// Output subdirectory of full-size variants.
pub const IMAGES_DIR: &str = "images";
/// Output subdirectory of thumbnails.
pub const THUMBS_DIR: &str = "thumbs";

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("invalid gallery option {key}={value:?}: {reason}")]
    InvalidOption {
        key: String,
        value: String,
        reason: String,
    },
    #[error("malformed gallery tag: {0}")]
    MalformedTag(String),
    #[error("cannot create {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to resize {} into {}: {error}", .image.display(), .output.display())]
    Resize {
        image: PathBuf,
        output: PathBuf,
        #[source]
        error: BackendError,
    },
}

/// Result of compiling one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledGallery {
    /// DOM id of the widget container.
    pub id: String,
    /// Replacement markup for the block.
    pub html: String,
    /// Image paths in declaration order.
    pub images: Vec<String>,
}

/// Compiles gallery blocks against one output directory.
///
/// Keeps running totals across blocks: galleries seen so far (for progress
/// numbering) and cache statistics.
pub struct Compiler<'a> {
    backend: &'a dyn ResizeBackend,
    exif: &'a dyn ExifReader,
    settings: &'a GalleryConfig,
    quality: Quality,
    source_root: PathBuf,
    output_dir: PathBuf,
    force: bool,
    events: Option<Sender<BuildEvent>>,
    galleries: usize,
    stats: CacheStats,
}

impl<'a> Compiler<'a> {
    pub fn new(
        backend: &'a dyn ResizeBackend,
        exif: &'a dyn ExifReader,
        settings: &'a GalleryConfig,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            backend,
            exif,
            settings,
            quality: Quality::default(),
            source_root: PathBuf::new(),
            output_dir: output_dir.into(),
            force: false,
            events: None,
            galleries: 0,
            stats: CacheStats::default(),
        }
    }

    /// Regenerate every variant even when it already exists.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Directory relative image paths are resolved against.
    pub fn source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Report progress on this channel.
    pub fn events(mut self, sender: Sender<BuildEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn emit(&self, event: BuildEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only loses progress output
            let _ = tx.send(event);
        }
    }

    fn ensure_dir(&self, name: &str) -> Result<PathBuf, GalleryError> {
        let path = self.output_dir.join(name);
        fs::create_dir_all(&path).map_err(|source| GalleryError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Compile one `<galleria>` block into widget markup.
    pub fn compile(&mut self, block: &str) -> Result<CompiledGallery, GalleryError> {
        let tag = parse_tag(block)?;
        let options = GalleryOptions::from_attributes(&tag.attributes)?;
        let resolved = options.known.resolve(self.settings);
        let body = parse_body(tag.body);

        self.galleries += 1;
        self.emit(BuildEvent::GalleryStarted {
            index: self.galleries,
            image_count: body.images.len(),
        });

        let images_dir = self.ensure_dir(IMAGES_DIR)?;
        let thumbs_dir = self.ensure_dir(THUMBS_DIR)?;

        let mut data_source = Vec::with_capacity(body.images.len());
        for (position, image) in body.images.iter().enumerate() {
            let source = self.source_root.join(image);
            let name = file_name(image);
            let exif = extract_exif(self.exif, &source);

            let variants = [
                (
                    "image",
                    Geometry::bounded(resolved.width, resolved.height),
                    images_dir.join(&name),
                ),
                (
                    "thumb",
                    Geometry::height(resolved.thumbheight),
                    thumbs_dir.join(&name),
                ),
            ];
            let mut infos = Vec::with_capacity(variants.len());
            for (kind, geometry, output) in variants {
                let params = ResizeParams {
                    source: source.clone(),
                    output,
                    geometry,
                    quality: self.quality,
                };
                let status = resize_cached(self.backend, &params, self.force).map_err(|error| {
                    GalleryError::Resize {
                        image: params.source.clone(),
                        output: params.output.clone(),
                        error,
                    }
                })?;
                self.stats.record(status);
                infos.push(VariantInfo {
                    label: format!("{kind} {geometry}"),
                    status,
                });
            }

            data_source.push(DataSourceEntry {
                image: format!("{IMAGES_DIR}/{name}"),
                thumb: format!("{THUMBS_DIR}/{name}"),
                description: describe(body.caption(image), &exif, &self.settings.exif_class),
            });
            self.emit(BuildEvent::ImageProcessed {
                index: position + 1,
                source_path: source,
                exif,
                variants: infos,
            });
        }

        let config = build_widget_config(
            &resolved,
            self.settings,
            &data_source,
            &options.passthrough,
        );
        let id = gallery_id(block);
        let html = render_widget(
            &id,
            &Value::Object(config),
            &self.settings.theme_url,
            resolved.keyboard_nav,
        );
        Ok(CompiledGallery {
            id,
            html,
            images: body.images,
        })
    }
}

/// Last component of an image path; variants are stored flat under it.
fn file_name(image: &str) -> String {
    Path::new(image)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| image.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::VariantStatus;
    use crate::imaging::backend::tests::MockBackend;
    use crate::metadata::tests::FixedExif;
    use serde_json::json;
    use std::sync::mpsc;
    use tempfile::TempDir;

    /// Pull the JSON handed to `.galleria(...)` back out of rendered markup.
    fn widget_json(html: &str) -> Value {
        let start = html.find(".galleria(").unwrap() + ".galleria(".len();
        let end = html[start..].find(");\n").unwrap() + start;
        serde_json::from_str(&html[start..end].replace("<\\/", "</")).unwrap()
    }

    fn nikon() -> FixedExif {
        FixedExif::with(
            "photo2.jpg",
            &[
                ("ExposureTime", "1/250"),
                ("FNumber", "8"),
                ("FocalLength", "35"),
                ("ISOSpeedRatings", "200"),
            ],
        )
    }

    // =========================================================================
    // Options
    // =========================================================================

    #[test]
    fn known_options_drive_resize_and_passthrough_reaches_widget() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let compiled = compiler
            .compile("<galleria width=\"600\" height=\"400\" foo=\"bar\">\na.jpg\n</galleria>")
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops[0].geometry, "600x400");
        assert_eq!(ops[1].geometry, "x50");

        let config = widget_json(&compiled.html);
        assert_eq!(config["foo"], json!("bar"));
        assert!(config.get("thumbheight").is_none());
    }

    #[test]
    fn stage_options_size_the_widget() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let compiled = compiler
            .compile("<galleria stage_width=\"800\" stage_height=\"500\">a.jpg</galleria>")
            .unwrap();
        let config = widget_json(&compiled.html);
        assert_eq!(config["width"], json!(800));
        assert_eq!(config["height"], json!(500));
    }

    #[test]
    fn camel_case_passthrough_overrides_builtin() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let compiled = compiler
            .compile("<galleria transitionSpeed=\"900\" showImagenav=\"true\">a.jpg</galleria>")
            .unwrap();
        let config = widget_json(&compiled.html);
        assert_eq!(config["transitionSpeed"], json!("900"));
        assert_eq!(config["showImagenav"], json!("true"));
        assert!(config.get("transitionspeed").is_none());
        assert!(config.get("showimagenav").is_none());
    }

    #[test]
    fn invalid_known_option_fails_before_any_resize() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let err = compiler
            .compile("<galleria width=\"wide\">a.jpg</galleria>")
            .unwrap_err();
        assert!(matches!(err, GalleryError::InvalidOption { .. }));
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn keyboard_nav_disabled_by_attribute() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let on = compiler.compile("<galleria>a.jpg</galleria>").unwrap();
        let off = compiler
            .compile("<galleria disable_keyboard_nav=\"1\">a.jpg</galleria>")
            .unwrap();
        assert!(on.html.contains("attachKeyboard"));
        assert!(!off.html.contains("attachKeyboard"));
    }

    // =========================================================================
    // Images and descriptions
    // =========================================================================

    #[test]
    fn images_in_order_with_caption_on_latest() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = nikon();
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let compiled = compiler
            .compile("<galleria>\nphoto1.jpg photo2.jpg\n\"A scenic view\"\n</galleria>")
            .unwrap();
        assert_eq!(compiled.images, vec!["photo1.jpg", "photo2.jpg"]);

        let config = widget_json(&compiled.html);
        let data = config["dataSource"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["image"], json!("images/photo1.jpg"));
        assert_eq!(data[0]["thumb"], json!("thumbs/photo1.jpg"));
        assert!(data[0].get("description").is_none());
        assert_eq!(
            data[1]["description"],
            json!("\"A scenic view\"<br/><span class='isobar'>1/250 s | f/8 | 35mm | ISO 200</span>")
        );
    }

    #[test]
    fn no_exif_means_no_description_key() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = FixedExif::with("bare.jpg", &[("Make", "Canon")]);
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let compiled = compiler
            .compile("<galleria>\nbare.jpg\nA caption without EXIF\n</galleria>")
            .unwrap();
        let config = widget_json(&compiled.html);
        assert!(config["dataSource"][0].get("description").is_none());
    }

    #[test]
    fn exif_class_comes_from_settings() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = nikon();
        let settings = GalleryConfig {
            exif_class: "camera".into(),
            ..GalleryConfig::default()
        };
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let compiled = compiler.compile("<galleria>photo2.jpg</galleria>").unwrap();
        assert!(compiled.html.contains("<span class='camera'>"));
    }

    #[test]
    fn source_root_resolves_paths_but_variants_are_flat() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let mut compiler =
            Compiler::new(&backend, &exif, &settings, tmp.path()).source_root("/photos");

        compiler.compile("<galleria>trip/day1.jpg</galleria>").unwrap();
        let ops = backend.get_operations();
        assert_eq!(ops[0].source, "/photos/trip/day1.jpg");
        assert_eq!(
            ops[0].output,
            tmp.path().join("images/day1.jpg").to_string_lossy()
        );
        assert_eq!(
            ops[1].output,
            tmp.path().join("thumbs/day1.jpg").to_string_lossy()
        );
    }

    #[test]
    fn empty_gallery_still_renders() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let compiled = compiler.compile("<galleria>\n</galleria>").unwrap();
        assert_eq!(widget_json(&compiled.html)["dataSource"], json!([]));
        assert!(tmp.path().join(IMAGES_DIR).is_dir());
        assert!(tmp.path().join(THUMBS_DIR).is_dir());
    }

    // =========================================================================
    // Caching and failures
    // =========================================================================

    #[test]
    fn second_compile_hits_cache() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::writing();
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());
        let block = "<galleria>a.jpg b.jpg</galleria>";

        compiler.compile(block).unwrap();
        assert_eq!(backend.call_count(), 4);
        compiler.compile(block).unwrap();
        assert_eq!(backend.call_count(), 4);
        assert_eq!(compiler.stats().misses, 4);
        assert_eq!(compiler.stats().hits, 4);
    }

    #[test]
    fn force_regenerates_existing_variants() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::writing();
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let block = "<galleria>a.jpg</galleria>";

        Compiler::new(&backend, &exif, &settings, tmp.path())
            .compile(block)
            .unwrap();
        Compiler::new(&backend, &exif, &settings, tmp.path())
            .force(true)
            .compile(block)
            .unwrap();
        assert_eq!(backend.call_count(), 4);
    }

    #[test]
    fn first_resize_failure_aborts() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::failing_on("broken.jpg");
        let exif = FixedExif::default();
        let settings = GalleryConfig::default();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path());

        let err = compiler
            .compile("<galleria>\nbroken.jpg\nlater.jpg\n</galleria>")
            .unwrap_err();
        match err {
            GalleryError::Resize { image, error, .. } => {
                assert_eq!(image, PathBuf::from("broken.jpg"));
                assert!(matches!(error, BackendError::NonZeroExit { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(backend.call_count(), 1);
    }

    // =========================================================================
    // Progress events
    // =========================================================================

    #[test]
    fn events_report_galleries_and_variants() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let exif = nikon();
        let settings = GalleryConfig::default();
        let (tx, rx) = mpsc::channel();
        let mut compiler = Compiler::new(&backend, &exif, &settings, tmp.path()).events(tx);

        compiler.compile("<galleria>photo2.jpg</galleria>").unwrap();
        compiler.compile("<galleria></galleria>").unwrap();
        drop(compiler);

        let events: Vec<BuildEvent> = rx.iter().collect();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            BuildEvent::GalleryStarted {
                index: 1,
                image_count: 1
            }
        );
        match &events[1] {
            BuildEvent::ImageProcessed {
                index,
                exif,
                variants,
                ..
            } => {
                assert_eq!(*index, 1);
                assert_eq!(exif, "1/250 s | f/8 | 35mm | ISO 200");
                assert_eq!(variants[0].label, "image 1200x800");
                assert_eq!(variants[1].label, "thumb x50");
                assert_eq!(variants[0].status, VariantStatus::Resized);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(
            events[2],
            BuildEvent::GalleryStarted {
                index: 2,
                image_count: 0
            }
        );
    }
}
