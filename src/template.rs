//! Template tokenizing.
//!
//! Templates are never rewritten with find/replace. Each pass tokenizes its
//! input once into segments and renders every segment exactly once, so text
//! produced by a substitution is never scanned again by the same pass.
//!
//! Two passes exist, each with its own segment type:
//!
//! | Pass | Segments | Recognized syntax |
//! |---|---|---|
//! | [`parse_placeholders`] | [`Segment`] | `%{name}` |
//! | [`split_galleries`] | [`Block`] | `<galleria ...>...</galleria>` |

use crate::content::Sections;

/// A piece of template text for the placeholder pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    /// `%{name}`, holding `name`.
    Placeholder(&'a str),
}

/// A piece of text for the gallery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Text(&'a str),
    /// A complete `<galleria ...>...</galleria>` span, tags included.
    Gallery(&'a str),
}

const PLACEHOLDER_OPEN: &str = "%{";
const GALLERY_OPEN: &str = "<galleria";
const GALLERY_CLOSE: &str = "</galleria>";

/// Tokenize `%{name}` placeholders.
///
/// A name is everything up to the first `}`; it may not span lines. A `%{`
/// with no `}` before the end of its line stays literal text.
pub fn parse_placeholders(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(rel) = input[cursor..].find(PLACEHOLDER_OPEN) {
        let open = cursor + rel;
        let name_start = open + PLACEHOLDER_OPEN.len();
        let rest = &input[name_start..];

        match rest.find(['}', '\n']) {
            Some(end) if rest.as_bytes()[end] == b'}' => {
                if literal_start < open {
                    segments.push(Segment::Literal(&input[literal_start..open]));
                }
                segments.push(Segment::Placeholder(&rest[..end]));
                cursor = name_start + end + 1;
                literal_start = cursor;
            }
            _ => cursor = name_start,
        }
    }

    if literal_start < input.len() {
        segments.push(Segment::Literal(&input[literal_start..]));
    }
    segments
}

/// Replace every placeholder with its section text; undefined sections
/// expand to nothing.
pub fn substitute_placeholders(input: &str, sections: &Sections) -> String {
    let mut out = String::with_capacity(input.len());
    for segment in parse_placeholders(input) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(name) => out.push_str(sections.get(name)),
        }
    }
    out
}

/// Whether `input[at..]` opens a gallery tag: `<galleria` followed by
/// whitespace or `>`.
fn is_gallery_open(input: &str, at: usize) -> bool {
    input[at + GALLERY_OPEN.len()..]
        .chars()
        .next()
        .is_some_and(|c| c == '>' || c.is_whitespace())
}

/// Split text into gallery blocks and the text between them.
///
/// Blocks are matched left to right, each ending at the first `</galleria>`
/// after its opening tag, so they never overlap or nest. An opening tag with
/// no closing tag is left as text.
pub fn split_galleries(input: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(rel) = input[cursor..].find(GALLERY_OPEN) {
        let open = cursor + rel;
        if !is_gallery_open(input, open) {
            cursor = open + GALLERY_OPEN.len();
            continue;
        }
        let Some(close_rel) = input[open..].find(GALLERY_CLOSE) else {
            break;
        };
        let end = open + close_rel + GALLERY_CLOSE.len();

        if text_start < open {
            blocks.push(Block::Text(&input[text_start..open]));
        }
        blocks.push(Block::Gallery(&input[open..end]));
        cursor = end;
        text_start = end;
    }

    if text_start < input.len() {
        blocks.push(Block::Text(&input[text_start..]));
    }
    blocks
}
