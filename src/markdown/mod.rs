//! FB2 document tree → Markdown.
//!
//! Rendering is split by concern, with all renderers implemented as methods
//! on one [`RenderContext`]:
//!
//! - [`render`]: the context and the whole-book entry point
//! - [`block`]: bodies, sections, poems, quotes and images
//! - [`inline`]: character-level markup and links
//! - [`table`]: pipe tables
//! - [`footnotes`]: the two-pass footnote table and its appendix
//! - [`metadata`]: the `title-info` header
//!
//! ## Design Notes
//!
//! - **No escaping**: text is emitted as found. The output is meant for
//!   text-processing tools, and escaping would alter the words they read.
//! - **Footnotes**: notes are collected before the body renders, so
//!   references resolve regardless of where the note body sits. Only cited
//!   notes reach the appendix, in first-citation order.
//! - **Headings**: a section at depth `d` gets level `min(d + 1, 6)`.

mod block;
mod footnotes;
mod inline;
mod metadata;
mod render;
mod table;
mod text;

pub use block::{MAX_HEADING_LEVEL, heading_level};
pub use footnotes::{FootnoteTable, footnote_marker};
pub use metadata::{Metadata, Series, author_name};
pub use render::{RenderContext, RenderResult, render_book};
pub use text::{extract_text, heading_text};
