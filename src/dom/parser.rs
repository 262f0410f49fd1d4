//! quick-xml event stream → [`Element`] tree.

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};

use super::node::Element;
use crate::error::{Error, Result};

/// Name of the synthetic node that holds the top-level elements.
pub const DOCUMENT_NODE: &str = "#document";

/// Deepest element nesting accepted. Rendering and dropping the tree both
/// recurse once per level.
pub const MAX_DEPTH: usize = 512;

/// Parse an XML document into a tree.
///
/// Returns a synthetic [`DOCUMENT_NODE`] element whose children are the
/// top-level elements. Whitespace is preserved: inline markup depends on
/// the spaces around it. Comments, processing instructions and doctypes
/// are dropped. Documents nested deeper than [`MAX_DEPTH`] are rejected.
pub fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = vec![Element::new(DOCUMENT_NODE)];

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                // the document node does not count
                if stack.len() > MAX_DEPTH {
                    return Err(Error::MalformedXml(format!(
                        "elements nested deeper than {MAX_DEPTH} levels"
                    )));
                }
                stack.push(element_from_start(&e));
            }
            Ok(Event::Empty(e)) => {
                let element = element_from_start(&e);
                attach(&mut stack, element);
            }
            Ok(Event::End(_)) => {
                if stack.len() < 2 {
                    return Err(Error::MalformedXml("unexpected closing tag".to_string()));
                }
                if let Some(element) = stack.pop() {
                    attach(&mut stack, element);
                }
            }
            Ok(Event::Text(e)) => {
                push_text(&mut stack, &String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(e)) => {
                push_text(&mut stack, &String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(e)) => match resolve_entity(&e) {
                Some(resolved) => push_text(&mut stack, &resolved),
                None => {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    push_text(&mut stack, &format!("&{entity};"));
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml {
                    position: reader.error_position() as u64,
                    source: e,
                });
            }
            _ => {}
        }
    }

    if stack.len() != 1 {
        let open = stack.last().map(|e| e.name.clone()).unwrap_or_default();
        return Err(Error::MalformedXml(format!("unclosed element <{open}>")));
    }

    Ok(stack.pop().unwrap_or_else(|| Element::new(DOCUMENT_NODE)))
}

fn element_from_start(e: &BytesStart<'_>) -> Element {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());

    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value).into_owned();
        let value = match unescape(&raw) {
            Ok(unescaped) => unescaped.into_owned(),
            Err(_) => raw,
        };
        element.attrs.push((key, value));
    }

    element
}

fn attach(stack: &mut [Element], element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    }
}

/// Append character data to the open element: before its first child this
/// is the element's own text, afterwards it is the last child's tail.
fn push_text(stack: &mut [Element], text: &str) {
    let Some(current) = stack.last_mut() else {
        return;
    };
    match current.children.last_mut() {
        Some(last) => last.tail.push_str(text),
        None => current.text.push_str(text),
    }
}

/// Resolve a character reference or a predefined entity. `&nbsp;` is
/// accepted too since FB2 writers emit it despite the XML rules.
fn resolve_entity(entity: &BytesRef<'_>) -> Option<String> {
    if let Ok(Some(c)) = entity.resolve_char_ref() {
        return Some(c.to_string());
    }

    match String::from_utf8_lossy(entity.as_ref()).as_ref() {
        "nbsp" => Some("\u{a0}".to_string()),
        name => resolve_predefined_entity(name).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Tag;

    fn root(xml: &str) -> Element {
        let mut doc = parse_document(xml).unwrap();
        assert_eq!(doc.name, DOCUMENT_NODE);
        doc.children.remove(0)
    }

    #[test]
    fn test_text_and_tail() {
        let p = root("<p>Hello <emphasis>world</emphasis>!</p>");
        assert_eq!(p.text, "Hello ");
        assert_eq!(p.children.len(), 1);
        assert_eq!(p.children[0].tag(), Tag::Emphasis);
        assert_eq!(p.children[0].text, "world");
        assert_eq!(p.children[0].tail, "!");
    }

    #[test]
    fn test_attributes_keep_prefix() {
        let a = root(r##"<a l:href="#n1" type="note">1</a>"##);
        assert_eq!(a.attr("l:href"), Some("#n1"));
        assert_eq!(a.href(), "#n1");
        assert_eq!(a.attr("type"), Some("note"));
    }

    #[test]
    fn test_attribute_values_unescaped() {
        let a = root(r#"<a href="?a=1&amp;b=2"/>"#);
        assert_eq!(a.href(), "?a=1&b=2");
    }

    #[test]
    fn test_entities_resolved() {
        let p = root("<p>Tom &amp; Jerry &#8212; &#x41;&lt;</p>");
        assert_eq!(p.text, "Tom & Jerry \u{2014} A<");
    }

    #[test]
    fn test_empty_element_and_whitespace() {
        let section = root("<section>\n  <empty-line/>\n  <p>x</p>\n</section>");
        assert_eq!(section.text, "\n  ");
        assert_eq!(section.children.len(), 2);
        assert_eq!(section.children[0].tag(), Tag::EmptyLine);
        assert_eq!(section.children[0].tail, "\n  ");
        assert_eq!(section.children[1].tail, "\n");
    }

    #[test]
    fn test_declaration_and_comments_skipped() {
        let doc = parse_document(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!-- c --><FictionBook><body/></FictionBook>",
        )
        .unwrap();
        let root = doc.child(Tag::FictionBook).unwrap();
        assert!(root.child(Tag::Body).is_some());
    }

    #[test]
    fn test_mismatched_tags_error() {
        assert!(parse_document("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_unknown_entity_kept_verbatim() {
        let p = root("<p>a&nbsp;b &mdash; &#xZZ;</p>");
        assert_eq!(p.text, "a\u{a0}b &mdash; &#xZZ;");
    }

    #[test]
    fn test_depth_limit() {
        let nested = |depth: usize| {
            format!("{}x{}", "<emphasis>".repeat(depth), "</emphasis>".repeat(depth))
        };
        assert!(parse_document(&nested(MAX_DEPTH)).is_ok());

        let err = parse_document(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, Error::MalformedXml(_)));

        // far past the limit fails cleanly instead of exhausting the stack
        assert!(parse_document(&nested(20_000)).is_err());
    }

    #[test]
    fn test_unclosed_element_error() {
        assert!(parse_document("<a><b>text</b>").is_err());
    }
}
