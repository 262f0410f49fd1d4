//! Inline markup → Markdown spans.

use crate::dom::{Element, Tag};

use super::footnotes::footnote_marker;
use super::render::RenderContext;
use super::text::extract_text;

/// Label used when a link has no text of its own.
const FALLBACK_LINK_LABEL: &str = "Link";

impl RenderContext<'_> {
    /// Render an element's inline content into `out`.
    ///
    /// Emits the element's own text, then each child followed by that
    /// child's tail. Unknown tags render their content without markup so
    /// no text is lost.
    pub fn render_inline(&mut self, out: &mut String, element: &Element) {
        out.push_str(&element.text);

        for child in &element.children {
            match child.tag() {
                Tag::Emphasis => self.render_wrapped(out, "*", child),
                Tag::Strong => self.render_wrapped(out, "**", child),
                Tag::Strikethrough => self.render_wrapped(out, "~~", child),
                Tag::Code => self.render_wrapped(out, "`", child),
                Tag::Link => self.render_link(out, child),
                Tag::Image => self.write_image(out, child),
                Tag::EmptyLine => out.push('\n'),
                // sub/sup, named styles and unknown tags keep only their text
                _ => self.render_inline(out, child),
            }
            out.push_str(&child.tail);
        }
    }

    /// Render an element's inline content into a fresh string.
    ///
    /// Used where formatted text is needed as a value (table cells, note
    /// bodies); captures nest freely since each one owns its buffer.
    pub fn inline_markdown(&mut self, element: &Element) -> String {
        let mut buf = String::new();
        self.render_inline(&mut buf, element);
        buf
    }

    fn render_wrapped(&mut self, out: &mut String, marker: &str, element: &Element) {
        out.push_str(marker);
        self.render_inline(out, element);
        out.push_str(marker);
    }

    /// Render `<a>`: a footnote marker for known note links, a Markdown link
    /// otherwise.
    fn render_link(&mut self, out: &mut String, link: &Element) {
        let href = link.href();

        if link.attr("type") == Some("note") {
            let id = href.strip_prefix('#').unwrap_or(href);
            if self.footnotes.reference(id) {
                out.push_str(&footnote_marker(id));
                return;
            }
        }

        let label = extract_text(link);
        let label = if label.is_empty() {
            FALLBACK_LINK_LABEL
        } else {
            label.as_str()
        };
        out.push_str(&format!("[{label}]({href})"));
    }
}
