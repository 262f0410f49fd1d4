//! Small byte and string helpers shared by the import and export layers.

use std::ops::Range;

use memchr::memmem;

/// Number of leading bytes searched for the XML declaration.
const DECLARATION_WINDOW: usize = 1024;

// ============================================================================
// Encoding Detection
// ============================================================================

/// Locate the encoding name in an XML declaration.
///
/// Parses `<?xml ... encoding="..." ?>` and returns the byte range of the
/// encoding name (without quotes), so callers can both read and rewrite it.
/// The attribute name is matched case-insensitively; either quote style is
/// accepted.
///
/// # Examples
///
/// ```ignore
/// let xml = br#"<?xml version="1.0" encoding="windows-1251"?><a/>"#;
/// let range = find_xml_encoding(xml).unwrap();
/// assert_eq!(&xml[range], b"windows-1251");
/// ```
pub fn find_xml_encoding(bytes: &[u8]) -> Option<Range<usize>> {
    let window = &bytes[..bytes.len().min(DECLARATION_WINDOW)];

    let decl_start = memmem::find(window, b"<?xml")?;
    let decl_len = memmem::find(&window[decl_start..], b"?>")?;
    let decl = &window[decl_start..decl_start + decl_len];

    let enc_pos = decl
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let value_start = decl_start + enc_pos + 9;

    let quote = *bytes.get(value_start)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let rest = &window[value_start + 1..decl_start + decl_len];
    let value_len = memchr::memchr(quote, rest)?;

    Some(value_start + 1..value_start + 1 + value_len)
}

// ============================================================================
// Embedded Binaries
// ============================================================================

/// Image formats an FB2 `<binary>` can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Classify a declared `content-type`; anything unrecognized is JPEG.
    pub fn from_content_type(content_type: &str) -> Self {
        let lower = content_type.to_ascii_lowercase();
        if lower.contains("png") {
            ImageFormat::Png
        } else if lower.contains("gif") {
            ImageFormat::Gif
        } else {
            ImageFormat::Jpeg
        }
    }

    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => ".jpg",
            ImageFormat::Png => ".png",
            ImageFormat::Gif => ".gif",
        }
    }
}

/// Remove every whitespace character from a base64 payload.
///
/// FB2 writers wrap base64 bodies at arbitrary columns and indent them.
pub fn strip_base64_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Reduce an identifier to a filesystem-safe base name.
///
/// Strips path components (either separator), keeps ASCII letters, digits,
/// `.`, `_` and `-`, replaces every other character with `_`, and trims
/// separators from both ends. Returns `None` when nothing usable remains.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let normalized = name.replace('\\', "/");
    let base = normalized
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let mapped: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = mapped.trim_matches(|c| matches!(c, '.' | '_' | '-'));
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Collapse runs of whitespace into single spaces and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Tests
// ============================================================================
