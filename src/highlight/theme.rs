//! Display colours for highlight categories and result cells.
//!
//! Hosts that render spans or the result grid look colours up here.

use super::{Category, HighlightSpan};

/// Background for cells holding a NULL value (light yellow).
pub const NULL_CELL_BACKGROUND: &str = "#FFFFCC";

/// Foreground colour for a category, as `#RRGGBB`.
pub fn color(category: Category) -> &'static str {
    match category {
        Category::AlterFunction => "#FF007F",
        Category::Keyword => "#0000FF",
        Category::JoinWord => "#A0A0A4",
        Category::StringLiteral => "#FF0000",
        Category::Comment => "#008000",
    }
}

/// ANSI escape for a category when printing to a terminal.
pub fn ansi(category: Category) -> &'static str {
    match category {
        Category::AlterFunction => "\x1b[95m",
        Category::Keyword => "\x1b[34m",
        Category::JoinWord => "\x1b[90m",
        Category::StringLiteral => "\x1b[31m",
        Category::Comment => "\x1b[32m",
    }
}

/// ANSI reset sequence.
pub const ANSI_RESET: &str = "\x1b[0m";

/// Wraps each span of `line` in its ANSI colour.
///
/// Spans must be sorted and non-overlapping, as produced by
/// `Highlighter::effective_spans`.
pub fn paint_line(line: &str, spans: &[HighlightSpan]) -> String {
    let mut out = String::with_capacity(line.len() + spans.len() * 10);
    let mut cursor = 0;

    for span in spans {
        let Some(range) = span.byte_range(line) else {
            continue;
        };
        let (Some(before), Some(token)) = (line.get(cursor..range.start), line.get(range.clone()))
        else {
            continue;
        };
        out.push_str(before);
        out.push_str(ansi(span.category));
        out.push_str(token);
        out.push_str(ANSI_RESET);
        cursor = range.end;
    }

    out.push_str(line.get(cursor..).unwrap_or_default());
    out
}
