//! Reading FB2 files into a document tree.
//!
//! Import runs in two stages:
//! - [`encoding`]: detect the declared encoding and re-express the input as UTF-8
//! - [`fb2`]: parse the XML and locate the `FictionBook` root and its parts

mod encoding;
mod fb2;

pub use encoding::{lookup_encoding, normalize_encoding};
pub use fb2::{FictionBook, NOTE_BODY_NAMES, is_note_body};
