//! Render context and the whole-book rendering entry point.
//!
//! The renderers never write into shared state. Every render call takes the
//! sink (`out: &mut String`) it should write into, and section depth is
//! passed down by value, so capturing a subtree in isolation is just a call
//! with a fresh buffer.

use crate::export::AssetTable;
use crate::import::FictionBook;

use super::footnotes::FootnoteTable;

/// Result of rendering a book to markdown.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// The rendered markdown, footnote appendix included.
    pub content: String,
    /// Number of distinct footnotes the body cited.
    pub footnotes: usize,
}

/// State shared by the renderers during one conversion.
pub struct RenderContext<'a> {
    pub(crate) footnotes: FootnoteTable,
    pub(crate) assets: &'a AssetTable,
    /// Asset directory as written into image links; `None` renders
    /// placeholders instead of links.
    pub(crate) images_dir: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    /// Create a context over a collected footnote table and a pre-assigned
    /// asset table.
    pub fn new(
        footnotes: FootnoteTable,
        assets: &'a AssetTable,
        images_dir: Option<&'a str>,
    ) -> Self {
        Self {
            footnotes,
            assets,
            images_dir,
        }
    }

    pub fn footnotes(&self) -> &FootnoteTable {
        &self.footnotes
    }
}

/// Render a book to markdown.
///
/// `assets` must already hold the filenames every `<binary>` will be written
/// under. Footnotes are collected from the note bodies first, then the
/// description and every main body are rendered, then the appendix of cited
/// notes is appended.
pub fn render_book(
    book: &FictionBook,
    assets: &AssetTable,
    images_dir: Option<&str>,
) -> RenderResult {
    let footnotes = FootnoteTable::collect(book.note_bodies(), assets, images_dir);
    let mut ctx = RenderContext::new(footnotes, assets, images_dir);
    let mut out = String::new();

    if let Some(description) = book.description() {
        ctx.render_description(&mut out, description);
    }

    for body in book.main_bodies() {
        ctx.render_body(&mut out, body);
    }

    ctx.footnotes.write_appendix(&mut out);

    RenderResult {
        content: out,
        footnotes: ctx.footnotes.referenced_count(),
    }
}

/// Parse a single-element XML snippet for renderer tests.
#[cfg(test)]
pub(crate) fn parse_fragment(xml: &str) -> crate::dom::Element {
    let mut doc = crate::dom::parse_document(xml).expect("fragment should parse");
    doc.children.remove(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(xml: &str) -> RenderResult {
        let book = FictionBook::parse(xml).unwrap();
        render_book(&book, &AssetTable::default(), None)
    }

    #[test]
    fn test_simple_paragraph() {
        let result = render("<FictionBook><body><p>Hello <emphasis>world</emphasis>!</p></body></FictionBook>");
        assert_eq!(result.content, "Hello *world*!\n\n");
        assert_eq!(result.footnotes, 0);
    }

    #[test]
    fn test_forward_footnote_reference() {
        let result = render(
            r##"<FictionBook xmlns:l="http://www.w3.org/1999/xlink">
<body><section><p>Text<a l:href="#n1" type="note">[1]</a>.</p></section></body>
<body name="notes"><section id="n1"><title><p>1</p></title><p>The note.</p></section></body>
</FictionBook>"##,
        );
        assert_eq!(result.content, "Text[^n1].\n\n\n---\n\n[^n1]: The note.\n\n");
        assert_eq!(result.footnotes, 1);
    }

    #[test]
    fn test_note_bodies_not_rendered_inline() {
        let result = render(
            r#"<FictionBook><body><p>Main</p></body><body name="comments"><section id="c1"><p>Comment</p></section></body></FictionBook>"#,
        );
        assert_eq!(result.content, "Main\n\n");
    }
}
