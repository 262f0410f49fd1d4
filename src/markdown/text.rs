//! Plain-text flattening of subtrees.

use crate::dom::{Element, Tag};
use crate::util::collapse_whitespace;

/// Flatten a subtree to plain text, dropping all markup.
///
/// Each element's text is trimmed after its children have been joined, so
/// indentation around nested blocks never leaks into the result.
pub fn extract_text(element: &Element) -> String {
    let mut text = String::new();
    text.push_str(&element.text);
    for child in &element.children {
        text.push_str(&extract_text(child));
        text.push_str(&child.tail);
    }
    text.trim().to_string()
}

/// Single-line text of a `<title>`.
///
/// Title paragraphs are joined with a space ("Chapter 1" + "The Storm" →
/// "Chapter 1 The Storm") and whitespace runs collapse, so the result is
/// safe to put on an ATX heading line.
pub fn heading_text(title: &Element) -> String {
    let paragraphs: Vec<String> = title
        .children_with(Tag::Paragraph)
        .map(extract_text)
        .filter(|t| !t.is_empty())
        .collect();

    if paragraphs.is_empty() {
        collapse_whitespace(&extract_text(title))
    } else {
        collapse_whitespace(&paragraphs.join(" "))
    }
}
