//! Result types and materialization.
//!
//! Converts loosely-typed record payloads into a table model with a fixed
//! column order, normalized NULLs and reformatted dates.

mod materialize;
mod types;

pub use materialize::{format_date, materialize, row_summary, STATUS_KEY};
pub use types::{
    DatePolicy, DisplayCell, Displayable, QueryOutcome, Record, TableModel, Value,
    DEFAULT_STATUS, NULL_TEXT,
};
