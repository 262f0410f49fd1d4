//! Book metadata from `<description>/<title-info>`.

use crate::dom::{Element, Tag};
use crate::import::FictionBook;

use super::render::RenderContext;
use super::text::extract_text;

/// Book-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Metadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub genres: Vec<String>,
    pub series: Vec<Series>,
    pub date: Option<String>,
    /// Annotation flattened to plain text.
    pub annotation: Option<String>,
}

/// A `<sequence>` the book belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Series {
    pub name: String,
    pub number: Option<String>,
}

impl Metadata {
    /// Read metadata from a `<title-info>` element.
    pub fn from_title_info(title_info: &Element) -> Self {
        let title = title_info
            .child_named("book-title")
            .map(extract_text)
            .filter(|t| !t.is_empty());

        let authors = title_info
            .children_named("author")
            .map(author_name)
            .filter(|n| !n.is_empty())
            .collect();

        let genres = title_info
            .children_named("genre")
            .map(extract_text)
            .filter(|g| !g.is_empty())
            .collect();

        let series = title_info
            .children_named("sequence")
            .filter_map(|seq| {
                let name = seq.attr("name").map(str::trim).unwrap_or_default();
                if name.is_empty() {
                    return None;
                }
                Some(Series {
                    name: name.to_string(),
                    number: seq
                        .attr("number")
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .map(str::to_string),
                })
            })
            .collect();

        let date = title_info.child(Tag::Date).and_then(|date| {
            let text = extract_text(date);
            if !text.is_empty() {
                Some(text)
            } else {
                date.attr("value")
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            }
        });

        let annotation = title_info
            .child(Tag::Annotation)
            .map(extract_text)
            .filter(|a| !a.is_empty());

        Self {
            title,
            authors,
            genres,
            series,
            date,
            annotation,
        }
    }

    /// Read metadata from a book; `None` when it has no `<title-info>`.
    pub fn from_book(book: &FictionBook) -> Option<Self> {
        book.description()
            .and_then(|d| d.child_named("title-info"))
            .map(Self::from_title_info)
    }
}

/// Full name of an `<author>`: first, middle and last name joined by spaces,
/// or the nickname when no name parts are given.
pub fn author_name(author: &Element) -> String {
    let parts: Vec<String> = ["first-name", "middle-name", "last-name"]
        .iter()
        .filter_map(|field| author.child_named(field))
        .map(extract_text)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        return author
            .child_named("nickname")
            .map(extract_text)
            .unwrap_or_default();
    }
    parts.join(" ")
}

impl RenderContext<'_> {
    /// Render the description header: title, authors, genres, series,
    /// annotation and date, closed by a horizontal rule.
    pub fn render_description(&mut self, out: &mut String, description: &Element) {
        let Some(title_info) = description.child_named("title-info") else {
            return;
        };
        let meta = Metadata::from_title_info(title_info);

        if let Some(title) = &meta.title {
            out.push_str(&format!("# {title}\n\n"));
        }

        if !meta.authors.is_empty() {
            out.push_str(&format!("**Authors:** {}\n\n", meta.authors.join(", ")));
        }

        if !meta.genres.is_empty() {
            out.push_str(&format!("**Genres:** {}\n\n", meta.genres.join(", ")));
        }

        for series in &meta.series {
            out.push_str("**Series:** ");
            out.push_str(&series.name);
            if let Some(number) = &series.number {
                out.push_str(", #");
                out.push_str(number);
            }
            out.push_str("\n\n");
        }

        if let Some(annotation) = title_info.child(Tag::Annotation) {
            out.push_str("## Annotation\n\n");
            self.render_block_content(out, annotation, 0);
            out.push('\n');
        }

        if let Some(date) = &meta.date {
            out.push_str(&format!("**Date:** {date}\n\n"));
        }

        out.push_str("---\n\n");
    }
}
