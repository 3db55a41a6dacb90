//! Galleria widget configuration and markup.
//!
//! A compiled gallery is an empty container `<div>` plus a `<script>` that
//! loads the Galleria theme and initializes the widget on that container with
//! a JSON configuration. The configuration is layered, later layers winning:
//!
//! 1. built-in widget defaults
//! 2. stage size and display settings from config and known options
//! 3. `dataSource`, one entry per image
//! 4. passthrough attributes from the `<galleria>` tag

use super::attributes::ResolvedOptions;
use crate::config::GalleryConfig;
use maud::{PreEscaped, html};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// The JSON object handed to `.galleria(...)`.
pub type WidgetConfig = Map<String, Value>;

/// One `dataSource` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceEntry {
    /// Path of the full-size variant, relative to the page.
    pub image: String,
    pub thumb: String,
    pub description: Option<String>,
}

impl DataSourceEntry {
    fn to_json(&self) -> Value {
        let mut entry = json!({
            "image": self.image,
            "thumb": self.thumb,
        });
        if let Some(description) = &self.description {
            entry["description"] = Value::from(description.as_str());
        }
        entry
    }
}

/// Build the description shown in the info panel.
///
/// `None` when there is no EXIF line, even if the image has a caption.
pub fn describe(caption: &str, exif: &str, exif_class: &str) -> Option<String> {
    if exif.is_empty() {
        return None;
    }
    let mut description = String::new();
    if !caption.is_empty() {
        description.push_str(caption);
        description.push_str("<br/>");
    }
    description.push_str(&format!("<span class='{exif_class}'>{exif}</span>"));
    Some(description)
}

/// Merge every configuration layer for one gallery.
pub fn build_widget_config(
    resolved: &ResolvedOptions,
    settings: &GalleryConfig,
    data_source: &[DataSourceEntry],
    passthrough: &BTreeMap<String, Value>,
) -> WidgetConfig {
    let mut config = WidgetConfig::new();
    config.insert("lightbox".into(), json!(false));
    config.insert("showImagenav".into(), json!(false));
    config.insert("transitionSpeed".into(), json!(450));
    config.insert("preload".into(), json!("all"));

    config.insert("width".into(), json!(resolved.stage_width));
    config.insert("height".into(), json!(resolved.stage_height));
    config.insert("imageMargin".into(), json!(settings.image_margin));
    config.insert("thumbnails".into(), json!(settings.thumbnails));
    config.insert("_toggleInfo".into(), json!(settings.toggle_info));
    config.insert("showInfo".into(), json!(settings.toggle_info));

    config.insert(
        "dataSource".into(),
        Value::Array(data_source.iter().map(DataSourceEntry::to_json).collect()),
    );

    for (key, value) in passthrough {
        config.insert(key.clone(), value.clone());
    }
    config
}

static GALLERY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A DOM id unique to this gallery instance: `galleria-` plus 12 hex digits.
pub fn gallery_id(block: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(GALLERY_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    hasher.update(block.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("galleria-{}", &digest[..12])
}

/// JSON safe to embed in a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn init_script(id: &str, config: &Value, theme_url: &str, keyboard_nav: bool) -> String {
    let mut lines = vec![
        format!("Galleria.loadTheme({});", script_json(&Value::from(theme_url))),
        format!("$('#{id}').galleria({});", script_json(config)),
    ];
    if keyboard_nav {
        lines.push(
            "Galleria.ready(function() { this.attachKeyboard({ right: this.next, left: this.prev }); });"
                .to_string(),
        );
    }
    format!("\n{}\n", lines.join("\n"))
}

/// Render the container and init script for one gallery.
pub fn render_widget(id: &str, config: &Value, theme_url: &str, keyboard_nav: bool) -> String {
    let script = init_script(id, config, theme_url, keyboard_nav);
    html! {
        div align="center" id=(id) { " " }
        "\n"
        script { (PreEscaped(script)) }
    }
    .into_string()
}
