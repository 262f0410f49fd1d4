//! Conversion pipeline and output.
//!
//! [`convert_bytes`] runs the whole pipeline in memory; [`convert_file`]
//! adds the filesystem side: input validation, the asset directory, asset
//! files and the Markdown file itself.
//!
//! # Example
//!
//! ```no_run
//! use fb2md::{ConvertOptions, convert_file};
//!
//! let options = ConvertOptions::new().with_images("book_images");
//! let report = convert_file("book.fb2", "book.md", &options)?;
//! println!("{} footnotes, {} images", report.footnotes, report.assets.written.len());
//! # Ok::<(), fb2md::Error>(())
//! ```

mod assets;

use std::fs;
use std::path::{Path, PathBuf};

pub use assets::{
    Asset, AssetReport, AssetTable, SkippedAsset, asset_path, decode_asset, decode_assets,
    write_assets,
};

use crate::error::{Error, Result};
use crate::import::FictionBook;
use crate::markdown::render_book;

/// Suffix of the default asset directory name.
const IMAGES_DIR_SUFFIX: &str = "_images";

/// Options for one conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Decode embedded images and link to them; otherwise images render as
    /// placeholders.
    pub extract_images: bool,
    /// Directory images are written to. Also the path prefix of image links,
    /// so a relative directory should be relative to the Markdown file.
    pub images_dir: PathBuf,
}

impl ConvertOptions {
    /// Options with image extraction disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable image extraction into `dir`.
    pub fn with_images(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extract_images = true;
        self.images_dir = dir.into();
        self
    }

    fn link_dir(&self) -> Option<String> {
        self.extract_images
            .then(|| self.images_dir.to_string_lossy().into_owned())
    }
}

/// Result of an in-memory conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub markdown: String,
    /// Decoded assets, empty unless image extraction is enabled.
    pub assets: Vec<Asset>,
    /// Assets that failed to decode.
    pub report: AssetReport,
    /// Number of footnotes emitted in the appendix.
    pub footnotes: usize,
}

/// Summary of a file conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub output: PathBuf,
    pub footnotes: usize,
    pub assets: AssetReport,
}

/// Convert an already-parsed book.
pub fn convert_book(book: &FictionBook, options: &ConvertOptions) -> Conversion {
    let table = AssetTable::assign(book.binaries());
    let link_dir = options.link_dir();
    let rendered = render_book(book, &table, link_dir.as_deref());

    let mut report = AssetReport::default();
    let assets = if options.extract_images {
        decode_assets(book.binaries(), &table, &mut report)
    } else {
        Vec::new()
    };

    Conversion {
        markdown: rendered.content,
        assets,
        report,
        footnotes: rendered.footnotes,
    }
}

/// Convert raw FB2 bytes to Markdown in memory.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<Conversion> {
    let book = FictionBook::from_bytes(bytes)?;
    Ok(convert_book(&book, options))
}

/// Convert an FB2 file and write the Markdown (and images) to disk.
///
/// The Markdown file is written last, so a fatal error leaves no output.
/// Individual image failures are reported in the returned
/// [`ConversionReport`] and do not fail the conversion.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !is_fb2(input) {
        let ext = input
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        return Err(Error::UnsupportedFormat(ext));
    }

    let bytes = fs::read(input)?;
    let mut conversion = convert_bytes(&bytes, options)?;

    if options.extract_images {
        fs::create_dir_all(&options.images_dir).map_err(|source| Error::CreateDir {
            path: options.images_dir.clone(),
            source,
        })?;
        write_assets(&conversion.assets, &options.images_dir, &mut conversion.report);
    }

    fs::write(output, conversion.markdown.as_bytes()).map_err(|source| Error::WriteOutput {
        path: output.to_path_buf(),
        source,
    })?;

    log::debug!(
        "{} -> {}: {} footnotes, {} images",
        input.display(),
        output.display(),
        conversion.footnotes,
        conversion.report.written.len()
    );

    Ok(ConversionReport {
        output: output.to_path_buf(),
        footnotes: conversion.footnotes,
        assets: conversion.report,
    })
}

/// Whether a path has the `.fb2` extension (any case).
pub fn is_fb2(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("fb2"))
}

/// Default asset directory for an output file: `book.md` → `book_images`,
/// next to the output.
pub fn default_images_dir(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}{IMAGES_DIR_SUFFIX}"))
}

/// Output path for `file` found under `root` in a batch run.
///
/// The path relative to `root`, minus its extension, with separators
/// replaced by `_`: `root/a/b.fb2` → `out_dir/a_b.md`.
pub fn batch_output_path(root: &Path, file: &Path, out_dir: &Path) -> PathBuf {
    let rel = file.strip_prefix(root).unwrap_or(file);
    let rel = rel.with_extension("");
    let name = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("_");
    out_dir.join(format!("{name}.md"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<FictionBook xmlns:l="http://www.w3.org/1999/xlink">
<body><section><p>See<a l:href="#n1" type="note">1</a>.</p><image l:href="#cover"/></section></body>
<body name="notes"><section id="n1"><p>Note.</p></section></body>
<binary id="cover" content-type="image/png">aGVsbG8=</binary>
</FictionBook>"##;

    #[test]
    fn test_options_builder() {
        let options = ConvertOptions::new();
        assert!(!options.extract_images);

        let options = ConvertOptions::new().with_images("imgs");
        assert!(options.extract_images);
        assert_eq!(options.images_dir, PathBuf::from("imgs"));
    }

    #[test]
    fn test_convert_bytes_without_images() {
        let conversion = convert_bytes(BOOK.as_bytes(), &ConvertOptions::new()).unwrap();
        assert_eq!(
            conversion.markdown,
            "See[^n1].\n\n![Image: cover]\n\n\n---\n\n[^n1]: Note.\n\n"
        );
        assert!(conversion.assets.is_empty());
        assert_eq!(conversion.footnotes, 1);
    }

    #[test]
    fn test_convert_bytes_with_images() {
        let options = ConvertOptions::new().with_images("book_images");
        let conversion = convert_bytes(BOOK.as_bytes(), &options).unwrap();
        assert!(conversion.markdown.contains("![cover](book_images/cover.png)"));
        assert_eq!(conversion.assets.len(), 1);
        assert_eq!(conversion.assets[0].data, b"hello");
    }

    #[test]
    fn test_missing_root() {
        let err = convert_bytes(b"<html/>", &ConvertOptions::new()).unwrap_err();
        assert!(matches!(err, Error::MissingElement(_)));
    }

    #[test]
    fn test_rejects_other_extensions() {
        let err = convert_file("book.epub", "book.md", &ConvertOptions::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == ".epub"));
    }

    #[test]
    fn test_is_fb2() {
        assert!(is_fb2(Path::new("a/book.fb2")));
        assert!(is_fb2(Path::new("BOOK.FB2")));
        assert!(!is_fb2(Path::new("book.fb2.zip")));
        assert!(!is_fb2(Path::new("fb2")));
    }

    #[test]
    fn test_default_images_dir() {
        assert_eq!(
            default_images_dir(Path::new("out/book.md")),
            PathBuf::from("out/book_images")
        );
        assert_eq!(default_images_dir(Path::new("book.md")), PathBuf::from("book_images"));
    }

    #[test]
    fn test_batch_output_path() {
        let out = batch_output_path(
            Path::new("library"),
            Path::new("library/author/book.fb2"),
            Path::new("out"),
        );
        assert_eq!(out, PathBuf::from("out/author_book.md"));

        let out = batch_output_path(Path::new("library"), Path::new("library/top.fb2"), Path::new("."));
        assert_eq!(out, PathBuf::from("./top.md"));
    }
}
