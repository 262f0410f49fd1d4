//! `<table>` → pipe table.

use crate::dom::{Element, Tag};

use super::render::RenderContext;

impl RenderContext<'_> {
    /// Render a table as a Markdown pipe table.
    ///
    /// The column count comes from the first row (its `th` cells, else its
    /// `td` cells, else all of its children). A first row with header cells
    /// becomes the header; otherwise an empty header is synthesized so the
    /// table is still valid Markdown. Rows are not padded or truncated to
    /// the column count.
    pub fn render_table(&mut self, out: &mut String, table: &Element) {
        let rows: Vec<&Element> = table.children_with(Tag::TableRow).collect();
        let Some(first) = rows.first() else {
            return;
        };

        let header_cells = first.children_with(Tag::HeaderCell).count();
        let data_cells = first.children_with(Tag::DataCell).count();
        let columns = if header_cells > 0 {
            header_cells
        } else if data_cells > 0 {
            data_cells
        } else {
            first.children.len()
        };
        if columns == 0 {
            return;
        }

        let body_rows = if header_cells > 0 {
            self.render_row(out, first);
            write_separator(out, columns);
            &rows[1..]
        } else {
            out.push('|');
            for _ in 0..columns {
                out.push_str("  |");
            }
            out.push('\n');
            write_separator(out, columns);
            &rows[..]
        };

        for row in body_rows {
            self.render_row(out, row);
        }

        out.push('\n');
    }

    fn render_row(&mut self, out: &mut String, row: &Element) {
        out.push_str("| ");
        for cell in row.children.iter().filter(|c| c.tag().is_cell()) {
            let text = self.inline_markdown(cell);
            out.push_str(&text);
            out.push_str(" | ");
        }
        out.push('\n');
    }
}

fn write_separator(out: &mut String, columns: usize) {
    out.push('|');
    for _ in 0..columns {
        out.push_str(" --- |");
    }
    out.push('\n');
}
