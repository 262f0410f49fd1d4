//! Embedded `<binary>` assets: filename assignment, decoding and writing.
//!
//! Filenames are assigned once, before rendering, so every `<image>` that
//! points at an asset renders the same path the asset is later written to.
//! Decoding and writing happen after rendering and never abort the run: a
//! failing asset is recorded in the [`AssetReport`] and skipped.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::dom::Element;
use crate::util::{ImageFormat, sanitize_filename, strip_base64_whitespace};

/// Base name used when an id sanitizes to nothing.
const FALLBACK_BASE_NAME: &str = "image";

/// Content type assumed when a binary declares none.
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Asset id → output filename. Filenames are unique within one table.
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    filenames: HashMap<String, String>,
}

impl AssetTable {
    /// Assign a unique filename to every binary with a non-empty id.
    ///
    /// Assignment follows document order; a later name that collides with an
    /// earlier one gets a `_2`, `_3`, ... suffix before its extension. A
    /// repeated id keeps its first filename.
    pub fn assign<'a>(binaries: impl IntoIterator<Item = &'a Element>) -> Self {
        let mut filenames: HashMap<String, String> = HashMap::new();
        let mut used: HashSet<String> = HashSet::new();

        for binary in binaries {
            let id = binary.id();
            if id.is_empty() || filenames.contains_key(id) {
                continue;
            }

            let content_type = binary.attr("content-type").unwrap_or(DEFAULT_CONTENT_TYPE);
            let ext = ImageFormat::from_content_type(content_type).extension();
            let base = sanitize_filename(id).unwrap_or_else(|| FALLBACK_BASE_NAME.to_string());

            let (stem, ext) = if ends_with_ignore_case(&base, ext) {
                let split = base.len() - ext.len();
                (base[..split].to_string(), base[split..].to_string())
            } else {
                (base, ext.to_string())
            };

            let mut filename = format!("{stem}{ext}");
            let mut n = 2;
            while used.contains(&filename) {
                filename = format!("{stem}_{n}{ext}");
                n += 1;
            }

            used.insert(filename.clone());
            filenames.insert(id.to_string(), filename);
        }

        log::debug!("assigned {} asset filenames", filenames.len());
        Self { filenames }
    }

    /// Filename assigned to `id`.
    pub fn filename(&self, id: &str) -> Option<&str> {
        self.filenames.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Join an asset directory and filename for use in a Markdown link.
///
/// Always uses `/`, whatever the platform separator.
pub fn asset_path(dir: &str, filename: &str) -> String {
    let dir = dir.replace('\\', "/");
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        filename.to_string()
    } else {
        format!("{dir}/{filename}")
    }
}

/// A decoded asset ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    pub filename: String,
    pub data: Vec<u8>,
}

/// An asset that was not written, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAsset {
    pub id: String,
    pub reason: String,
}

/// Outcome of asset decoding and writing.
#[derive(Debug, Clone, Default)]
pub struct AssetReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedAsset>,
}

impl AssetReport {
    fn skip(&mut self, id: &str, reason: String) {
        log::warn!("skipping asset {id}: {reason}");
        self.skipped.push(SkippedAsset {
            id: id.to_string(),
            reason,
        });
    }
}

/// Decode one binary's base64 body.
pub fn decode_asset(binary: &Element) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(strip_base64_whitespace(&binary.text))
}

/// Decode every binary that has an assigned filename.
///
/// Failures are recorded in `report` and the asset is left out.
pub fn decode_assets<'a>(
    binaries: impl IntoIterator<Item = &'a Element>,
    table: &AssetTable,
    report: &mut AssetReport,
) -> Vec<Asset> {
    let mut assets = Vec::new();
    let mut decoded = HashSet::new();

    for binary in binaries {
        let id = binary.id();
        let Some(filename) = table.filename(id) else {
            continue;
        };
        // Duplicate ids share one filename; the first binary wins
        if !decoded.insert(id) {
            continue;
        }

        match decode_asset(binary) {
            Ok(data) => assets.push(Asset {
                id: id.to_string(),
                filename: filename.to_string(),
                data,
            }),
            Err(e) => report.skip(id, format!("invalid base64: {e}")),
        }
    }

    assets
}

/// Write decoded assets into `dir`, which must already exist.
pub fn write_assets(assets: &[Asset], dir: &Path, report: &mut AssetReport) {
    for asset in assets {
        let path = dir.join(&asset.filename);
        match fs::write(&path, &asset.data) {
            Ok(()) => report.written.push(path),
            Err(e) => report.skip(&asset.id, format!("failed to write {}: {e}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn binary(id: &str, content_type: &str, data: &str) -> Element {
        Element::new("binary")
            .with_attr("id", id)
            .with_attr("content-type", content_type)
            .with_text(data)
    }

    #[test]
    fn test_extension_from_content_type() {
        let bins = [
            binary("a", "image/png", ""),
            binary("b", "image/gif", ""),
            binary("c", "image/jpeg", ""),
            binary("d", "application/octet-stream", ""),
            Element::new("binary").with_attr("id", "e"),
        ];
        let table = AssetTable::assign(&bins);
        assert_eq!(table.filename("a"), Some("a.png"));
        assert_eq!(table.filename("b"), Some("b.gif"));
        assert_eq!(table.filename("c"), Some("c.jpg"));
        assert_eq!(table.filename("d"), Some("d.jpg"));
        assert_eq!(table.filename("e"), Some("e.jpg"));
    }

    #[test]
    fn test_existing_extension_not_doubled() {
        let bins = [
            binary("cover.png", "image/png", ""),
            binary("PHOTO.JPG", "image/jpeg", ""),
        ];
        let table = AssetTable::assign(&bins);
        assert_eq!(table.filename("cover.png"), Some("cover.png"));
        assert_eq!(table.filename("PHOTO.JPG"), Some("PHOTO.JPG"));
    }

    #[test]
    fn test_collisions_get_numeric_suffix() {
        let bins = [
            binary("cover.png", "image/png", ""),
            binary("cover", "image/png", ""),
            binary("cover?", "image/png", ""),
        ];
        let table = AssetTable::assign(&bins);
        assert_eq!(table.filename("cover.png"), Some("cover.png"));
        assert_eq!(table.filename("cover"), Some("cover_2.png"));
        assert_eq!(table.filename("cover?"), Some("cover_3.png"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_unusable_ids() {
        let bins = [
            binary("", "image/png", ""),
            binary("???", "image/png", ""),
            binary("../../", "image/png", ""),
        ];
        let table = AssetTable::assign(&bins);
        assert_eq!(table.len(), 2);
        assert_eq!(table.filename("???"), Some("image.png"));
        assert_eq!(table.filename("../../"), Some("image_2.png"));
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let bins = [binary("x", "image/png", ""), binary("x", "image/gif", "")];
        let table = AssetTable::assign(&bins);
        assert_eq!(table.len(), 1);
        assert_eq!(table.filename("x"), Some("x.png"));
    }

    #[test]
    fn test_asset_path() {
        assert_eq!(asset_path("book_images", "a.png"), "book_images/a.png");
        assert_eq!(asset_path("out\\imgs\\", "a.png"), "out/imgs/a.png");
        assert_eq!(asset_path("", "a.png"), "a.png");
    }

    #[test]
    fn test_decode_strips_whitespace() {
        let bin = binary("a", "image/png", "\n  aGVs\n  bG8=\n");
        assert_eq!(decode_asset(&bin).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_failure_is_reported() {
        let bins = [
            binary("good", "image/png", "aGVsbG8="),
            binary("bad", "image/png", "!!!not base64!!!"),
        ];
        let table = AssetTable::assign(&bins);
        let mut report = AssetReport::default();
        let assets = decode_assets(&bins, &table, &mut report);

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].filename, "good.png");
        assert_eq!(assets[0].data, b"hello");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id, "bad");
    }

    #[test]
    fn test_write_assets() {
        let dir = tempfile::tempdir().unwrap();
        let assets = vec![Asset {
            id: "a".to_string(),
            filename: "a.png".to_string(),
            data: vec![1, 2, 3],
        }];
        let mut report = AssetReport::default();
        write_assets(&assets, dir.path(), &mut report);

        assert_eq!(report.written, vec![dir.path().join("a.png")]);
        assert_eq!(fs::read(dir.path().join("a.png")).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let assets = vec![
            Asset {
                id: "a".to_string(),
                filename: "a.png".to_string(),
                data: vec![1],
            },
            Asset {
                id: "b".to_string(),
                filename: "b.png".to_string(),
                data: vec![2],
            },
        ];
        let mut report = AssetReport::default();
        write_assets(&assets, &missing, &mut report);

        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_assigned_names_are_safe_and_unique(ids in proptest::collection::vec(".{0,12}", 0..12)) {
            let bins: Vec<Element> = ids.iter().map(|id| binary(id, "image/png", "")).collect();
            let table = AssetTable::assign(&bins);

            let mut seen = HashSet::new();
            for id in &ids {
                if let Some(name) = table.filename(id) {
                    prop_assert!(!name.contains('/') && !name.contains('\\'));
                    prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
                    prop_assert!(!name.starts_with('.'));
                    seen.insert((id.clone(), name.to_string()));
                }
            }
            let names: HashSet<&String> = seen.iter().map(|(_, n)| n).collect();
            prop_assert_eq!(names.len(), seen.len());
        }
    }
}
