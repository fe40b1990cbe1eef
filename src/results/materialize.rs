//! Result materialization.
//!
//! Turns a [`QueryOutcome`] into what the host displays: a status line, an
//! error, or a [`TableModel`] with a row-count summary.

use super::types::{
    DatePolicy, DisplayCell, Displayable, QueryOutcome, Record, TableModel, Value, DEFAULT_STATUS,
};
use crate::error::{Result, SqlExecError};
use chrono::{NaiveDateTime, Weekday};
use tracing::{debug, warn};

/// Column name the service uses for command acknowledgments.
pub const STATUS_KEY: &str = "status";

/// Marker that flags a string value as a service-formatted date.
const DATE_MARKER: &str = "GMT";

/// Layout after the weekday, e.g. `05 Jun 2024 00:00:00 GMT`.
const DATE_LAYOUT: &str = "%d %b %Y %H:%M:%S GMT";

/// Materializes an outcome.
///
/// Fails only when `policy` is [`DatePolicy::Strict`] and a "GMT" value
/// does not parse.
pub fn materialize(outcome: &QueryOutcome, policy: DatePolicy) -> Result<Displayable> {
    match outcome {
        QueryOutcome::Failure(msg) => Ok(Displayable::Error(msg.clone())),
        QueryOutcome::Status(msg) => Ok(Displayable::Status(msg.clone())),
        QueryOutcome::Records(records) => materialize_records(records, policy),
    }
}

fn materialize_records(records: &[Record], policy: DatePolicy) -> Result<Displayable> {
    let Some(first) = records.first() else {
        return Ok(Displayable::Status(DEFAULT_STATUS.to_string()));
    };

    // A result whose first record carries "status" is an acknowledgment,
    // even if it is a genuine column of that name.
    if let Some(status) = first.get(STATUS_KEY) {
        return Ok(Displayable::Status(status.to_display_string()));
    }

    let headers: Vec<String> = first.keys().map(String::from).collect();
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        let row = headers
            .iter()
            .map(|header| render_cell(record.get(header), policy))
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }

    debug!(
        "Materialized {} rows x {} columns",
        rows.len(),
        headers.len()
    );

    Ok(Displayable::Table {
        model: TableModel { headers, rows },
        summary: row_summary(records.len()),
    })
}

fn render_cell(value: Option<&Value>, policy: DatePolicy) -> Result<DisplayCell> {
    match value {
        None | Some(Value::Null) => Ok(DisplayCell::null()),
        Some(Value::String(s)) if s.contains(DATE_MARKER) => match format_date(s) {
            Ok(date) => Ok(DisplayCell::text(date)),
            Err(e) => match policy {
                DatePolicy::Strict => Err(e),
                DatePolicy::Lenient => {
                    warn!("Keeping unparsed date value {s:?}: {e}");
                    Ok(DisplayCell::text(s.clone()))
                }
            },
        },
        Some(other) if other.is_number() => Ok(DisplayCell::number(other.to_display_string())),
        Some(other) => Ok(DisplayCell::text(other.to_display_string())),
    }
}

/// Reformats `Wed, 05 Jun 2024 00:00:00 GMT` as `2024-06-05`.
///
/// The weekday name must be valid but is not checked against the date.
pub fn format_date(value: &str) -> Result<String> {
    let (weekday, rest) = value
        .split_once(", ")
        .ok_or_else(|| SqlExecError::date_parse(value, "missing weekday"))?;

    weekday
        .parse::<Weekday>()
        .map_err(|_| SqlExecError::date_parse(value, format!("unknown weekday '{weekday}'")))?;

    let parsed = NaiveDateTime::parse_from_str(rest, DATE_LAYOUT)
        .map_err(|e| SqlExecError::date_parse(value, e.to_string()))?;

    Ok(parsed.format("%Y-%m-%d").to_string())
}

/// Row-count summary: "1 row" or "N rows".
pub fn row_summary(count: usize) -> String {
    if count == 1 {
        "1 row".to_string()
    } else {
        format!("{count} rows")
    }
}
