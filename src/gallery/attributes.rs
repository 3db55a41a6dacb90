//! Opening-tag attribute parsing.
//!
//! `<galleria width="600" height='400' lightbox foo=bar>` becomes a list of
//! `(name, value)` pairs, which [`GalleryOptions::from_attributes`] splits
//! into integer [`KnownOptions`] and opaque passthrough values for the widget.
//! Names keep their written case so passthrough keys such as
//! `transitionSpeed` reach the widget verbatim; known names match in any case.

use super::GalleryError;
use crate::config::GalleryConfig;
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute names with a meaning of their own. Everything else is passthrough.
pub const KNOWN_OPTIONS: [&str; 6] = [
    "stage_width",
    "stage_height",
    "width",
    "height",
    "thumbheight",
    "disable_keyboard_nav",
];

/// One attribute; `None` when written without `=value`.
pub type Attribute = (String, Option<String>);

/// A gallery block split into its opening-tag attributes and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryTag<'a> {
    pub attributes: Vec<Attribute>,
    pub body: &'a str,
}

const OPEN: &str = "<galleria";
const CLOSE: &str = "</galleria>";

/// Split a `<galleria ...>BODY</galleria>` block into attributes and body.
pub fn parse_tag(block: &str) -> Result<GalleryTag<'_>, GalleryError> {
    let malformed = || GalleryError::MalformedTag(snippet(block));
    let inner = block
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
        .ok_or_else(malformed)?;

    let (attributes, consumed) = parse_attributes(inner).ok_or_else(malformed)?;
    Ok(GalleryTag {
        attributes,
        body: &inner[consumed..],
    })
}

/// Parse attributes up to and including the closing `>` of the opening tag.
///
/// Returns the attributes and the byte offset just past the `>`, or `None`
/// when the tag never closes or a quoted value is unterminated.
fn parse_attributes(input: &str) -> Option<(Vec<Attribute>, usize)> {
    let bytes = input.as_bytes();
    let mut attributes = Vec::new();
    let mut i = 0;

    loop {
        i = skip_whitespace(input, i);
        match *bytes.get(i)? {
            b'>' => return Some((attributes, i + 1)),
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let name_start = i;
        while let Some(&b) = bytes.get(i) {
            if b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/') {
                break;
            }
            i += 1;
        }
        let name = input[name_start..i].to_string();

        let after_name = skip_whitespace(input, i);
        if bytes.get(after_name) != Some(&b'=') {
            attributes.push((name, None));
            continue;
        }

        i = skip_whitespace(input, after_name + 1);
        let value = match *bytes.get(i)? {
            quote @ (b'"' | b'\'') => {
                let start = i + 1;
                let len = input[start..].find(quote as char)?;
                i = start + len + 1;
                &input[start..start + len]
            }
            _ => {
                let start = i;
                while let Some(&b) = bytes.get(i) {
                    if b.is_ascii_whitespace() || b == b'>' {
                        break;
                    }
                    i += 1;
                }
                &input[start..i]
            }
        };
        attributes.push((name, Some(decode_entities(value))));
    }
}

fn skip_whitespace(input: &str, from: usize) -> usize {
    input[from..]
        .find(|c: char| !c.is_ascii_whitespace())
        .map_or(input.len(), |n| from + n)
}

/// Decode the basic HTML entities allowed in attribute values.
pub fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    const ENTITIES: [(&str, char); 6] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&apos;", '\''),
    ];

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// First line of a block, for error messages.
fn snippet(block: &str) -> String {
    block.lines().next().unwrap_or_default().chars().take(60).collect()
}

/// Integer-valued attributes that steer compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnownOptions {
    pub stage_width: Option<u32>,
    pub stage_height: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub thumbheight: Option<u32>,
    pub disable_keyboard_nav: Option<i64>,
}

/// Parsed opening-tag attributes of one gallery block.
///
/// `known` and `passthrough` never share a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryOptions {
    pub known: KnownOptions,
    pub passthrough: BTreeMap<String, Value>,
}

impl GalleryOptions {
    /// Partition attributes into known and passthrough options.
    ///
    /// A repeated attribute takes its last value.
    pub fn from_attributes(attributes: &[Attribute]) -> Result<Self, GalleryError> {
        let mut options = Self::default();
        for (key, value) in attributes {
            let known = &mut options.known;
            let slot = match key.to_ascii_lowercase().as_str() {
                "stage_width" => &mut known.stage_width,
                "stage_height" => &mut known.stage_height,
                "width" => &mut known.width,
                "height" => &mut known.height,
                "thumbheight" => &mut known.thumbheight,
                "disable_keyboard_nav" => {
                    let raw = required(key, value)?;
                    known.disable_keyboard_nav = Some(parse_integer(key, raw)?);
                    continue;
                }
                _ => {
                    let value = match value {
                        Some(v) => Value::String(v.clone()),
                        None => Value::Bool(true),
                    };
                    options.passthrough.insert(key.clone(), value);
                    continue;
                }
            };
            *slot = Some(parse_dimension(key, required(key, value)?)?);
        }
        Ok(options)
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> GalleryError {
    GalleryError::InvalidOption {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn required<'a>(key: &str, value: &'a Option<String>) -> Result<&'a str, GalleryError> {
    value
        .as_deref()
        .ok_or_else(|| invalid(key, "", "a value is required"))
}

fn parse_integer(key: &str, raw: &str) -> Result<i64, GalleryError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(key, raw, "not an integer"))
}

fn parse_dimension(key: &str, raw: &str) -> Result<u32, GalleryError> {
    let n = parse_integer(key, raw)?;
    u32::try_from(n)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| invalid(key, raw, "must be a positive integer"))
}

/// Effective settings for one block: config defaults overridden by its
/// known options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub stage_width: u32,
    pub stage_height: u32,
    pub width: u32,
    pub height: u32,
    pub thumbheight: u32,
    pub keyboard_nav: bool,
}

impl KnownOptions {
    pub fn resolve(&self, defaults: &GalleryConfig) -> ResolvedOptions {
        ResolvedOptions {
            stage_width: self.stage_width.unwrap_or(defaults.stage_width),
            stage_height: self.stage_height.unwrap_or(defaults.stage_height),
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            thumbheight: self.thumbheight.unwrap_or(defaults.thumbheight),
            keyboard_nav: match self.disable_keyboard_nav {
                Some(flag) => flag == 0,
                None => defaults.keyboard_nav,
            },
        }
    }
}
