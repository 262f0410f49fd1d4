//! Block structure → Markdown.
//!
//! Bodies, sections and generic containers share one dispatch
//! ([`RenderContext::render_block`]). Section depth is threaded through as a
//! plain value: a section renders its children at `depth + 1` and the caller's
//! depth is untouched when it returns.

use crate::dom::{Element, Tag};
use crate::export::asset_path;
use crate::util::sanitize_filename;

use super::render::RenderContext;
use super::text::{extract_text, heading_text};

/// Deepest ATX heading level Markdown supports.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Heading level for a section at `depth` (top-level sections are depth 1).
pub fn heading_level(depth: usize) -> usize {
    (depth + 1).min(MAX_HEADING_LEVEL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteKind {
    Epigraph,
    Cite,
}

impl RenderContext<'_> {
    /// Render a `<body>`; its children sit at depth 0.
    pub fn render_body(&mut self, out: &mut String, body: &Element) {
        for child in &body.children {
            self.render_block(out, child, 0);
        }
    }

    /// Shared block dispatch.
    pub fn render_block(&mut self, out: &mut String, element: &Element, depth: usize) {
        match element.tag() {
            Tag::Title => {
                out.push('\n');
                self.write_heading(out, heading_level(depth + 1), element);
            }
            Tag::Section => self.render_section(out, element, depth),
            Tag::Paragraph => self.render_paragraph(out, element),
            Tag::Subtitle => self.render_subtitle(out, element),
            Tag::EmptyLine => out.push('\n'),
            Tag::Image => self.render_image(out, element),
            Tag::Poem => self.render_poem(out, element, depth),
            Tag::Stanza => {
                self.render_stanza(out, element);
                out.push('\n');
            }
            Tag::Epigraph => self.render_quote(out, element, QuoteKind::Epigraph, depth),
            Tag::Cite => self.render_quote(out, element, QuoteKind::Cite, depth),
            Tag::Table => self.render_table(out, element),
            _ => self.render_block_content(out, element, depth),
        }
    }

    /// Render a container whose children are blocks.
    ///
    /// A container with no block children at all (an unknown wrapper around
    /// plain text, a stray `text-author`) renders as one paragraph instead.
    pub fn render_block_content(&mut self, out: &mut String, element: &Element, depth: usize) {
        if element.children.iter().any(|c| c.tag().is_block()) {
            for child in &element.children {
                self.render_block(out, child, depth);
            }
            return;
        }

        let text = self.inline_markdown(element);
        let text = text.trim();
        if !text.is_empty() {
            out.push_str(text);
            out.push_str("\n\n");
        }
    }

    fn render_section(&mut self, out: &mut String, section: &Element, depth: usize) {
        let depth = depth + 1;

        if let Some(title) = section.child(Tag::Title) {
            self.write_heading(out, heading_level(depth), title);
        }

        for epigraph in section.children_with(Tag::Epigraph) {
            self.render_quote(out, epigraph, QuoteKind::Epigraph, depth);
        }

        if let Some(annotation) = section.child(Tag::Annotation) {
            self.render_block_content(out, annotation, depth);
        }

        for child in &section.children {
            match child.tag() {
                Tag::Title | Tag::Epigraph | Tag::Annotation => {}
                _ => self.render_block(out, child, depth),
            }
        }
    }

    fn write_heading(&mut self, out: &mut String, level: usize, title: &Element) {
        let text = heading_text(title);
        if text.is_empty() {
            return;
        }
        out.push_str(&"#".repeat(level));
        out.push(' ');
        out.push_str(&text);
        out.push_str("\n\n");
    }

    fn render_paragraph(&mut self, out: &mut String, p: &Element) {
        self.render_inline(out, p);
        out.push_str("\n\n");
    }

    fn render_subtitle(&mut self, out: &mut String, subtitle: &Element) {
        out.push_str("**");
        self.render_inline(out, subtitle);
        out.push_str("**\n\n");
    }

    fn render_poem(&mut self, out: &mut String, poem: &Element, depth: usize) {
        if let Some(title) = poem.child(Tag::Title) {
            let text = heading_text(title);
            if !text.is_empty() {
                out.push_str(&format!("**{text}**\n\n"));
            }
        }

        for epigraph in poem.children_with(Tag::Epigraph) {
            self.render_quote(out, epigraph, QuoteKind::Epigraph, depth);
        }

        for child in &poem.children {
            match child.tag() {
                Tag::Stanza => {
                    self.render_stanza(out, child);
                    out.push('\n');
                }
                Tag::Subtitle => self.render_subtitle(out, child),
                _ => {}
            }
        }

        for author in poem.children_with(Tag::TextAuthor) {
            out.push_str("*— ");
            self.render_inline(out, author);
            out.push_str("*\n\n");
        }

        if let Some(date) = poem.child(Tag::Date) {
            let text = extract_text(date);
            if !text.is_empty() {
                out.push_str(&format!("*{text}*\n\n"));
            }
        }
    }

    /// Verses are separated by hard breaks; the last one ends the line.
    fn render_stanza(&mut self, out: &mut String, stanza: &Element) {
        if let Some(title) = stanza.child(Tag::Title) {
            let text = heading_text(title);
            if !text.is_empty() {
                out.push_str(&format!("**{text}**\n"));
            }
        }

        if let Some(subtitle) = stanza.child(Tag::Subtitle) {
            out.push_str("**");
            self.render_inline(out, subtitle);
            out.push_str("**\n");
        }

        let verses: Vec<&Element> = stanza.children_with(Tag::Verse).collect();
        for (i, verse) in verses.iter().enumerate() {
            self.render_inline(out, verse);
            if i + 1 < verses.len() {
                out.push_str("  \n");
            } else {
                out.push('\n');
            }
        }
    }

    /// Render an epigraph or citation as a blockquote.
    ///
    /// Nested blocks (poems, citations, tables) are rendered into their own
    /// buffer and every line is quoted again, so the quote stays continuous
    /// at any nesting level.
    fn render_quote(&mut self, out: &mut String, quote: &Element, kind: QuoteKind, depth: usize) {
        let mut pending_break = false;

        for child in &quote.children {
            let tag = child.tag();
            if pending_break && !matches!(tag, Tag::TextAuthor | Tag::EmptyLine) {
                out.push_str(">\n");
            }
            pending_break = false;

            match tag {
                Tag::Paragraph => {
                    out.push_str("> ");
                    self.render_inline(out, child);
                    out.push('\n');
                    if kind == QuoteKind::Cite {
                        out.push_str(">\n");
                    }
                }
                Tag::Subtitle => {
                    out.push_str("> **");
                    self.render_inline(out, child);
                    out.push_str("**\n");
                    if kind == QuoteKind::Cite {
                        out.push_str(">\n");
                    }
                }
                Tag::EmptyLine => out.push_str(">\n"),
                Tag::TextAuthor => {
                    out.push_str(">\n> — ");
                    self.render_inline(out, child);
                    out.push('\n');
                }
                _ => {
                    let mut inner = String::new();
                    self.render_block(&mut inner, child, depth);
                    if inner.trim().is_empty() {
                        continue;
                    }
                    write_quoted(out, &inner);
                    pending_break = true;
                }
            }
        }

        out.push('\n');
    }

    /// Render a block-level `<image>` as its own paragraph.
    pub(crate) fn render_image(&self, out: &mut String, image: &Element) {
        self.write_image(out, image);
        out.push_str("\n\n");
    }

    /// Write `<image>` as a Markdown image reference.
    ///
    /// Internal references (`#id`) point at the pre-assigned asset filename
    /// when images are extracted, or become a placeholder otherwise.
    /// External references are used verbatim. Inline images use this
    /// directly so the surrounding paragraph stays on one line.
    pub(crate) fn write_image(&self, out: &mut String, image: &Element) {
        let href = image.href();

        match href.strip_prefix('#') {
            Some(id) => match self.images_dir {
                Some(dir) => {
                    let filename = self
                        .assets
                        .filename(id)
                        .map(str::to_string)
                        .or_else(|| sanitize_filename(id))
                        .unwrap_or_else(|| id.to_string());
                    out.push_str(&format!("![{id}]({})", asset_path(dir, &filename)));
                }
                None => out.push_str(&format!("![Image: {id}]")),
            },
            None => out.push_str(&format!("![Image]({href})")),
        }
    }
}

/// Prefix every line of `inner` with `>`; blank lines become a bare `>`.
fn write_quoted(out: &mut String, inner: &str) {
    for line in inner.trim_matches('\n').lines() {
        if line.trim().is_empty() {
            out.push_str(">\n");
        } else {
            out.push_str("> ");
            out.push_str(line);
            out.push('\n');
        }
    }
}
