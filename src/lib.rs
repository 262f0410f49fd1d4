//! # fb2md
//!
//! Convert FictionBook 2 (FB2) ebooks to Markdown.
//!
//! ## Features
//!
//! - Sections, poems, epigraphs, citations and tables rendered as Markdown
//! - Footnotes resolved into `[^id]` references with an appendix
//! - Embedded images extracted under collision-free filenames
//! - Legacy encodings (windows-1251, KOI8-R/U, ISO-8859-1) decoded to UTF-8
//!
//! ## Quick Start
//!
//! ```no_run
//! use fb2md::{ConvertOptions, convert_file};
//!
//! // Convert to Markdown, extracting images next to the output
//! let options = ConvertOptions::new().with_images("book_images");
//! convert_file("book.fb2", "book.md", &options)?;
//! # Ok::<(), fb2md::Error>(())
//! ```
//!
//! ## In Memory
//!
//! ```
//! use fb2md::{ConvertOptions, convert_bytes};
//!
//! let fb2 = br#"<FictionBook><body><p>Hello <emphasis>world</emphasis>!</p></body></FictionBook>"#;
//! let conversion = convert_bytes(fb2, &ConvertOptions::new()).unwrap();
//! assert_eq!(conversion.markdown, "Hello *world*!\n\n");
//! ```

pub mod dom;
pub mod error;
pub mod export;
pub mod import;
pub mod markdown;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use export::{Conversion, ConversionReport, ConvertOptions, convert_bytes, convert_file};
pub use import::FictionBook;
pub use markdown::Metadata;
