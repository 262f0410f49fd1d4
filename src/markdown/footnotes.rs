//! Footnote resolution.
//!
//! Resolution takes two passes over the tree. Before the body is rendered,
//! [`FootnoteTable::collect`] walks the note bodies and records the text of
//! every labeled note. While the body renders, each note link that hits the
//! table is replaced with a `[^id]` marker and the id is recorded in
//! first-reference order. The appendix then lists exactly the notes the body
//! cited, in that order.

use std::collections::{HashMap, HashSet};

use crate::dom::{Element, Tag};
use crate::export::AssetTable;
use crate::util::collapse_whitespace;

use super::render::RenderContext;
use super::text::extract_text;

/// Note bodies keyed by id, plus the order in which the body cites them.
#[derive(Debug, Clone, Default)]
pub struct FootnoteTable {
    notes: HashMap<String, String>,
    order: Vec<String>,
    seen: HashSet<String>,
}

impl FootnoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect notes from note-container bodies.
    ///
    /// Unlabeled sections are treated as grouping containers and searched
    /// recursively; each section with a non-empty `id` becomes one note.
    /// Note paragraphs keep their inline formatting; links inside note text
    /// render as ordinary links.
    pub fn collect<'a>(
        containers: impl IntoIterator<Item = &'a Element>,
        assets: &AssetTable,
        images_dir: Option<&str>,
    ) -> Self {
        let mut scratch = RenderContext::new(FootnoteTable::new(), assets, images_dir);
        let mut table = FootnoteTable::new();

        for container in containers {
            for section in container.children_with(Tag::Section) {
                table.collect_section(&mut scratch, section);
            }
        }

        log::debug!("collected {} footnotes", table.len());
        table
    }

    fn collect_section(&mut self, ctx: &mut RenderContext<'_>, section: &Element) {
        let id = section.id();
        if id.is_empty() {
            for nested in section.children_with(Tag::Section) {
                self.collect_section(ctx, nested);
            }
            return;
        }

        let mut body = String::new();
        for child in &section.children {
            let text = match child.tag() {
                // Note titles are just the note number
                Tag::Title => continue,
                Tag::Section => {
                    self.collect_section(ctx, child);
                    continue;
                }
                Tag::Paragraph | Tag::Subtitle | Tag::TextAuthor => ctx.inline_markdown(child),
                _ => extract_text(child),
            };

            let text = collapse_whitespace(&text);
            if text.is_empty() {
                continue;
            }
            if !body.is_empty() {
                body.push(' ');
            }
            body.push_str(&text);
        }

        if !body.is_empty() {
            self.insert(id, body);
        }
    }

    /// Add or replace a note body.
    pub fn insert(&mut self, id: impl Into<String>, body: impl Into<String>) {
        self.notes.insert(id.into(), body.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.notes.get(id).map(String::as_str)
    }

    /// Number of collected notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Record a reference to `id`.
    ///
    /// Returns `false` for unknown ids, which callers render as plain links.
    /// Repeated references keep the position of the first one.
    pub fn reference(&mut self, id: &str) -> bool {
        if !self.notes.contains_key(id) {
            return false;
        }
        if self.seen.insert(id.to_string()) {
            self.order.push(id.to_string());
        }
        true
    }

    /// Cited notes as `(id, body)` pairs in first-reference order.
    pub fn referenced(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|id| self.notes.get(id).map(|body| (id.as_str(), body.as_str())))
    }

    /// Number of distinct notes the body cited.
    pub fn referenced_count(&self) -> usize {
        self.order.len()
    }

    /// Append the footnote definitions after a horizontal rule.
    ///
    /// Nothing is written when the body cited no notes.
    pub fn write_appendix(&self, out: &mut String) {
        if self.order.is_empty() {
            return;
        }
        out.push_str("\n---\n\n");
        for (id, body) in self.referenced() {
            out.push_str(&format!("[^{id}]: {body}\n\n"));
        }
    }
}

/// Markdown footnote reference marker.
pub fn footnote_marker(id: &str) -> String {
    format!("[^{id}]")
}
