//! # blogit
//!
//! Expands an HTML template with content from a plain-text file and compiles
//! `<galleria>` blocks into [Galleria](https://galleria.io) photo widgets,
//! resizing every referenced photo into a full-size variant and a thumbnail.
//!
//! # Inputs
//!
//! A **template** is any HTML containing `%{name}` placeholders and
//! `<galleria>` blocks:
//!
//! ```text
//! <h1>%{title}</h1>
//! %{intro}
//! <galleria width="1000" height="700">
//! beach.jpg dunes.jpg
//! Low tide at the end of August.
//! </galleria>
//! ```
//!
//! A **content file** holds the sections the placeholders refer to:
//!
//! ```text
//! [title]: Summer in Lisbon
//! [intro]:
//! <p>Three weeks of trams and sardines.</p>
//! ```
//!
//! # Pipeline
//!
//! ```text
//! content.txt ──parse──▶ Sections ─┐
//!                                  ├─▶ substitute placeholders ─▶ compile galleries ─▶ index.html
//! template.html ───────────────────┘                                    │
//!                                                      images/<name>, thumbs/<name>
//! ```
//!
//! Each pass tokenizes its input once, so substituted text is never scanned
//! for placeholders again. Gallery blocks are found after substitution, so a
//! content section may itself hold a gallery.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Content file parser: `[key]: value` sections with default-to-empty lookups |
//! | [`template`] | Tokenizers for `%{name}` placeholders and `<galleria>` blocks |
//! | [`expand`] | Template expansion, output writing, and the [`expand::run`] entry point |
//! | [`gallery`] | Gallery compiler: attributes, body, resizing, widget markup (Maud) |
//! | [`metadata`] | EXIF extraction (`kamadak-exif`) and the one-line camera summary |
//! | [`imaging`] | Resize geometry and the ImageMagick / pure-Rust backends |
//! | [`cache`] | Destination-exists cache policy and hit/miss statistics |
//! | [`config`] | `blogit.toml` loading, merging over stock defaults, and validation |
//! | [`output`] | Progress events and their CLI formatting |
//!
//! # Design Decisions
//!
//! ## The Output Directory Is the Cache
//!
//! Resizing dominates build time, so a variant whose destination file exists
//! is not regenerated. There is no manifest: deleting a file, or passing
//! `--no-cache`, is how a variant gets rebuilt. See [`cache`].
//!
//! ## Two Resize Backends
//!
//! The default backend runs ImageMagick's `convert`, which most photo
//! workflows already have. The `rust` backend does the same geometry with the
//! `image` crate for machines without ImageMagick. Both sit behind
//! [`imaging::ResizeBackend`], which is also the seam tests mock.
//!
//! ## Fail Fast
//!
//! The first failed resize aborts the build and no page is written.

pub mod cache;
pub mod config;
pub mod content;
pub mod expand;
pub mod gallery;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
