//! Terminal rendering of result tables.

use sqlexec::results::TableModel;

/// Renders the table as an aligned text grid with a header rule.
pub fn render_grid(model: &TableModel) -> String {
    let mut widths: Vec<usize> = model.headers.iter().map(|h| h.chars().count()).collect();
    for row in &model.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.text.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(model.rows.len() + 2);
    lines.push(format_row(model.headers.iter().map(String::as_str), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &model.rows {
        lines.push(format_row(row.iter().map(|c| c.text.as_str()), &widths));
    }

    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(text, width)| format!("{text:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
