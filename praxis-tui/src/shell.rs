//! Table shell rendering
//!
//! Pure functions from engine state to display lines; the app layer puts
//! them on screen. Cell content comes from the column descriptors, never
//! from the shell itself.

use praxis_lib::model::Record;
use praxis_lib::table::TableEngine;
use unicode_width::UnicodeWidthChar;

/// Marker width for the selection/cursor gutter.
const GUTTER: &str = "      ";

/// Renders the full table view: header, body, footer.
pub fn render_lines(engine: &TableEngine<Record>, cursor: usize, status: &str) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(header_line(engine));
    lines.push(separator_line(engine));

    let rows = engine.visible_rows();
    if rows.is_empty() {
        lines.push(format!("{GUTTER}No records match the current view."));
    } else {
        for (index, row) in rows.iter().enumerate() {
            let selected = engine.is_selected(praxis_lib::table::TableRow::row_id(*row));
            let marker = format!(
                "{}{} ",
                if index == cursor { '>' } else { ' ' },
                if selected { "[x]" } else { "[ ]" },
            );
            let cells: Vec<String> = engine
                .visible_columns()
                .iter()
                .map(|column| pad(&column.cell(row), column.display_width()))
                .collect();
            lines.push(format!(" {marker}{}", cells.join("  ")));
        }
    }

    lines.push(String::new());
    lines.push(footer_line(engine));
    if !status.is_empty() {
        lines.push(status.to_string());
    }

    lines
}

fn header_line(engine: &TableEngine<Record>) -> String {
    let cells: Vec<String> = engine
        .visible_columns()
        .iter()
        .map(|column| {
            let mut label = column.label().to_string();
            if let Some(sort) = engine.sort() {
                if sort.column == column.key() {
                    label.push(match sort.direction {
                        praxis_lib::api::Direction::Asc => '^',
                        praxis_lib::api::Direction::Desc => 'v',
                    });
                }
            }
            pad(&label, column.display_width())
        })
        .collect();
    format!("{GUTTER}{}", cells.join("  "))
}

fn separator_line(engine: &TableEngine<Record>) -> String {
    let total: usize = engine
        .visible_columns()
        .iter()
        .map(|c| c.display_width() as usize + 2)
        .sum();
    format!("{GUTTER}{}", "-".repeat(total.saturating_sub(2)))
}

fn footer_line(engine: &TableEngine<Record>) -> String {
    let mut footer = format!(
        "Page {}/{} · {} record(s) · {} selected",
        engine.page_index() + 1,
        engine.page_count(),
        engine.total_filtered(),
        engine.selection_len(),
    );
    if !engine.search_text().trim().is_empty() {
        footer.push_str(&format!(" · search: \"{}\"", engine.search_text().trim()));
    }
    if engine.filters().len() > 0 {
        footer.push_str(&format!(" · {} filter(s)", engine.filters().len()));
    }
    footer
}

/// Pads or clips a cell to the column width (display cells, not bytes).
fn pad(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut out = String::new();
    let mut used = 0;

    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    while used < width {
        out.push(' ');
        used += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use praxis_lib::model::Record;
    use praxis_lib::table::ColumnDescriptor;
    use praxis_lib::table::TableEngine;
    use uuid::Uuid;

    use super::*;

    fn engine() -> TableEngine<Record> {
        let columns = vec![
            ColumnDescriptor::new("name", "Name").sortable().width(12),
            ColumnDescriptor::new("gender", "Gender").width(8),
        ];
        TableEngine::new(columns).with_search_columns(["name"])
    }

    fn row(id: u128, name: &str) -> Record {
        Record::with_id("patient", Uuid::from_u128(id))
            .set("name", name)
            .set("gender", "female")
    }

    #[test]
    fn renders_header_rows_and_footer() {
        let mut engine = engine();
        engine.set_rows(vec![row(1, "Amira"), row(2, "Layla")]);
        engine.toggle_row_selection(Uuid::from_u128(1));

        let lines = render_lines(&engine, 0, "");

        assert!(lines[0].contains("Name"));
        assert!(lines[0].contains("Gender"));
        assert!(lines.iter().any(|l| l.contains("[x]") && l.contains("Amira")));
        assert!(lines.iter().any(|l| l.contains("[ ]") && l.contains("Layla")));
        assert!(lines.last().is_some());
        assert!(lines.iter().any(|l| l.contains("Page 1/1 · 2 record(s) · 1 selected")));
    }

    #[test]
    fn empty_engine_shows_empty_state() {
        let engine = engine();
        let lines = render_lines(&engine, 0, "");
        assert!(lines.iter().any(|l| l.contains("No records match the current view.")));
    }

    #[test]
    fn sort_direction_is_marked_in_the_header() {
        let mut engine = engine();
        engine.set_rows(vec![row(1, "Amira")]);
        engine.sort_by("name");

        let lines = render_lines(&engine, 0, "");
        assert!(lines[0].contains("Name^"));
    }

    #[test]
    fn wide_cells_are_clipped_to_column_width() {
        assert_eq!(pad("a very long clinic name", 6), "a very");
        assert_eq!(pad("ab", 4), "ab  ");
    }
}
