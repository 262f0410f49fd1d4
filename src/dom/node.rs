//! Document tree nodes.

use super::tag::Tag;

/// An element of a parsed FB2 document.
///
/// Text is stored the way ElementTree-style trees store it: `text` is the
/// character data before the first child, and each child's `tail` is the
/// character data that follows it inside this element. Names keep their
/// namespace prefix (`l:href`); lookups by local name strip it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub tail: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element with the given (possibly prefixed) name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Builder: set the leading text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: set the trailing text.
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Semantic tag of this element.
    pub fn tag(&self) -> Tag {
        Tag::from_name(self.local_name())
    }

    /// Attribute value by exact (qualified) name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value by local name, ignoring any namespace prefix.
    ///
    /// An unprefixed attribute wins over prefixed ones.
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attr(local).or_else(|| {
            self.attrs
                .iter()
                .find(|(k, _)| local_name(k) == local)
                .map(|(_, v)| v.as_str())
        })
    }

    /// Link target from `l:href`, `xlink:href` or plain `href`.
    pub fn href(&self) -> &str {
        self.attr_local("href").unwrap_or_default()
    }

    /// The `id` attribute, or an empty string.
    pub fn id(&self) -> &str {
        self.attr("id").unwrap_or_default()
    }

    /// First child with the given tag.
    pub fn child(&self, tag: Tag) -> Option<&Element> {
        self.children.iter().find(|c| c.tag() == tag)
    }

    /// First child whose local name matches.
    pub fn child_named(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == local)
    }

    /// All children with the given tag, in document order.
    pub fn children_with(&self, tag: Tag) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(move |c| c.tag() == tag)
    }

    /// All children whose local name matches, in document order.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.local_name() == local)
    }
}

/// Strip a namespace prefix (`l:href` → `href`).
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}
