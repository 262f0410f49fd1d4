//! FictionBook document root and its top-level parts.

use crate::dom::{Element, Tag, parse_document};
use crate::error::{Error, Result};

use super::encoding::normalize_encoding;

/// `name` attribute values that mark a body as a note container.
pub const NOTE_BODY_NAMES: [&str; 3] = ["notes", "footnotes", "comments"];

/// A parsed FB2 book: the `FictionBook` root element.
#[derive(Debug, Clone)]
pub struct FictionBook {
    root: Element,
}

impl FictionBook {
    /// Decode, parse and validate raw FB2 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = normalize_encoding(bytes)?;
        Self::parse(&text)
    }

    /// Parse an already-decoded FB2 document.
    pub fn parse(xml: &str) -> Result<Self> {
        let document = parse_document(xml)?;
        let root = document
            .children
            .into_iter()
            .find(|e| e.tag() == Tag::FictionBook)
            .ok_or_else(|| Error::MissingElement("FictionBook".to_string()))?;
        Ok(Self { root })
    }

    /// The `<description>` block holding the book metadata.
    pub fn description(&self) -> Option<&Element> {
        self.root.child(Tag::Description)
    }

    /// All `<body>` elements in document order.
    pub fn bodies(&self) -> impl Iterator<Item = &Element> {
        self.root.children_with(Tag::Body)
    }

    /// Bodies with primary content.
    pub fn main_bodies(&self) -> impl Iterator<Item = &Element> {
        self.bodies().filter(|b| !is_note_body(b))
    }

    /// Bodies holding footnote definitions.
    pub fn note_bodies(&self) -> impl Iterator<Item = &Element> {
        self.bodies().filter(|b| is_note_body(b))
    }

    /// Embedded `<binary>` assets.
    pub fn binaries(&self) -> impl Iterator<Item = &Element> {
        self.root.children_with(Tag::Binary)
    }
}

/// Whether a body is a note container (`name="notes"` and friends).
pub fn is_note_body(body: &Element) -> bool {
    body.attr("name")
        .is_some_and(|name| NOTE_BODY_NAMES.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0" xmlns:l="http://www.w3.org/1999/xlink">
  <description><title-info><book-title>T</book-title></title-info></description>
  <body><section><p>main</p></section></body>
  <body name="notes"><section id="n1"><p>note</p></section></body>
  <body name="comments"/>
  <binary id="a.png" content-type="image/png">AAAA</binary>
</FictionBook>"#;

    #[test]
    fn test_parts() {
        let book = FictionBook::parse(BOOK).unwrap();
        assert!(book.description().is_some());
        assert_eq!(book.bodies().count(), 3);
        assert_eq!(book.main_bodies().count(), 1);
        assert_eq!(book.note_bodies().count(), 2);
        assert_eq!(book.binaries().count(), 1);
    }

    #[test]
    fn test_missing_root() {
        match FictionBook::parse("<html><body/></html>") {
            Err(Error::MissingElement(name)) => assert_eq!(name, "FictionBook"),
            other => panic!("expected MissingElement, got {other:?}"),
        }
    }

    #[test]
    fn test_prefixed_root() {
        let book = FictionBook::parse("<fb:FictionBook><fb:body/></fb:FictionBook>").unwrap();
        assert_eq!(book.bodies().count(), 1);
    }

    #[test]
    fn test_unparsable_document() {
        assert!(FictionBook::parse("<FictionBook><body></FictionBook>").is_err());
    }
}
