//! Maps FB2 element names to semantic tags.

/// Semantic tag of an FB2 element.
///
/// Renderers match on this instead of comparing strings, so every element
/// a renderer understands is one arm, and everything else lands in
/// [`Tag::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    // Document structure
    FictionBook,
    Description,
    Body,
    Binary,
    Section,
    Title,
    Epigraph,
    Annotation,

    // Block content
    Paragraph,
    Subtitle,
    EmptyLine,
    Image,
    Poem,
    Stanza,
    Verse,
    TextAuthor,
    Date,
    Cite,
    Table,
    TableRow,
    HeaderCell,
    DataCell,

    // Inline markup
    Emphasis,
    Strong,
    Strikethrough,
    Code,
    Sub,
    Sup,
    Link,
    Style,

    /// Anything else: metadata fields, vendor extensions, typos.
    Other,
}

impl Tag {
    /// Map a local element name to its tag.
    pub fn from_name(local_name: &str) -> Tag {
        match local_name {
            "FictionBook" => Tag::FictionBook,
            "description" => Tag::Description,
            "body" => Tag::Body,
            "binary" => Tag::Binary,
            "section" => Tag::Section,
            "title" => Tag::Title,
            "epigraph" => Tag::Epigraph,
            "annotation" => Tag::Annotation,

            "p" => Tag::Paragraph,
            "subtitle" => Tag::Subtitle,
            "empty-line" => Tag::EmptyLine,
            "image" => Tag::Image,
            "poem" => Tag::Poem,
            "stanza" => Tag::Stanza,
            "v" => Tag::Verse,
            "text-author" => Tag::TextAuthor,
            "date" => Tag::Date,
            "cite" => Tag::Cite,
            "table" => Tag::Table,
            "tr" => Tag::TableRow,
            "th" => Tag::HeaderCell,
            "td" => Tag::DataCell,

            "emphasis" => Tag::Emphasis,
            "strong" => Tag::Strong,
            "strikethrough" => Tag::Strikethrough,
            "code" => Tag::Code,
            "sub" => Tag::Sub,
            "sup" => Tag::Sup,
            "a" => Tag::Link,
            "style" => Tag::Style,

            _ => Tag::Other,
        }
    }

    /// Whether this tag starts a new block in the rendering.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Tag::Section
                | Tag::Title
                | Tag::Epigraph
                | Tag::Annotation
                | Tag::Paragraph
                | Tag::Subtitle
                | Tag::EmptyLine
                | Tag::Image
                | Tag::Poem
                | Tag::Stanza
                | Tag::Cite
                | Tag::Table
        )
    }

    /// Whether this is a table cell (`th` or `td`).
    pub fn is_cell(self) -> bool {
        matches!(self, Tag::HeaderCell | Tag::DataCell)
    }
}
