//! Character-encoding normalization for FB2 input.
//!
//! Russian-language FB2 files are frequently stored in Windows-1251 or
//! KOI8-R and say so in their XML declaration. Everything is re-expressed
//! as UTF-8 before parsing, and the declaration is rewritten to name UTF-8
//! so nothing downstream tries to decode it a second time.

use std::borrow::Cow;

use encoding_rs::Encoding;

use crate::error::{Error, Result};
use crate::util::find_xml_encoding;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Map a declared encoding label to a decoder.
///
/// `Ok(None)` means the input is already UTF-8. Labels are matched
/// case-insensitively; ISO-8859-1 is decoded through its Windows-1252
/// superset.
pub fn lookup_encoding(label: &str) -> Result<Option<&'static Encoding>> {
    match label.trim().to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => Ok(None),
        "windows-1251" | "win-1251" | "cp1251" => Ok(Some(encoding_rs::WINDOWS_1251)),
        "koi8-r" | "koi8r" => Ok(Some(encoding_rs::KOI8_R)),
        "koi8-u" | "koi8u" => Ok(Some(encoding_rs::KOI8_U)),
        "iso-8859-1" | "latin1" => Ok(Some(encoding_rs::WINDOWS_1252)),
        other => Err(Error::UnsupportedEncoding(other.to_string())),
    }
}

/// Decode raw FB2 bytes to UTF-8 text.
///
/// Fails with [`Error::UnsupportedEncoding`] when the declaration names an
/// encoding outside the supported set; this happens before any parsing.
/// Malformed byte sequences are replaced with U+FFFD and logged.
pub fn normalize_encoding(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let declared = find_xml_encoding(bytes).map(|range| String::from_utf8_lossy(&bytes[range]));

    let encoding = match declared.as_deref() {
        Some(label) => lookup_encoding(label)?,
        None => None,
    };

    let Some(encoding) = encoding else {
        let (text, malformed) = encoding_rs::UTF_8.decode_without_bom_handling(bytes);
        if malformed {
            log::warn!("input is not valid UTF-8; invalid sequences were replaced");
        }
        return Ok(text);
    };

    log::debug!("decoding input from {}", encoding.name());
    let (text, malformed) = encoding.decode_without_bom_handling(bytes);
    if malformed {
        log::warn!("input contains bytes invalid in {}", encoding.name());
    }

    Ok(Cow::Owned(rewrite_declaration(text.into_owned())))
}

/// Replace the declared encoding name with `utf-8`.
fn rewrite_declaration(mut text: String) -> String {
    if let Some(range) = find_xml_encoding(text.as_bytes()) {
        text.replace_range(range, "utf-8");
    }
    text
}
