//! Error types for fb2md operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a single conversion.
///
/// Per-asset decode and write failures are not represented here; they are
/// collected in [`crate::export::AssetReport`] and logged as warnings.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed XML: {0}")]
    MalformedXml(String),

    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("invalid FB2 file: {0} element not found")]
    MissingElement(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to create images directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
