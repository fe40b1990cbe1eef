//! Result types for sqlexec.
//!
//! Defines the loosely-typed records decoded from the query service and the
//! normalized table model built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message shown when a command succeeds without returning rows.
pub const DEFAULT_STATUS: &str = "Comando executado com sucesso.";

/// Text rendered for NULL or missing values.
pub const NULL_TEXT: &str = "NULL";

/// Represents a single scalar value from a result record.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Unsigned integer above `i64::MAX`.
    UInt(u64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for integer and float values.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Float(_))
    }

    /// Converts the value to its display text.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => NULL_TEXT.to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 => {
                format!("{f:.1}")
            }
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(u)) => Value::UInt(u),
                _ => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            // Nested structures are shown as compact JSON.
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::String(other.to_string())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Value::UInt(v), Value::Int)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// One row of a result payload: column name to value, in payload order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field, replacing an existing value with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Looks up a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns true if the record has the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the keys in payload order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a record from a decoded JSON object, keeping key order.
    pub fn from_json_object(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }

    /// Converts a decoded JSON document into records.
    ///
    /// Returns `None` unless the document is an array of objects.
    pub fn list_from_json(doc: serde_json::Value) -> Option<Vec<Record>> {
        let serde_json::Value::Array(items) = doc else {
            return None;
        };
        items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(map) => Some(Self::from_json_object(map)),
                _ => None,
            })
            .collect()
    }
}

/// Outcome of running one query against the service.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The service returned a list of records (possibly empty).
    Records(Vec<Record>),
    /// The command succeeded without a row payload.
    Status(String),
    /// The query failed; the message is user-facing.
    Failure(String),
}

impl QueryOutcome {
    /// Returns true for a failure outcome.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// A rendered result cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCell {
    /// Display text (`NULL` for null cells).
    pub text: String,
    /// Whether the source value was null or missing.
    pub is_null: bool,
    /// Whether the source value was a number.
    #[serde(default)]
    pub is_number: bool,
}

impl DisplayCell {
    /// Creates a non-null cell.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_null: false,
            is_number: false,
        }
    }

    /// Creates a numeric cell.
    pub fn number(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_null: false,
            is_number: true,
        }
    }

    /// Creates a null cell.
    pub fn null() -> Self {
        Self {
            text: NULL_TEXT.to_string(),
            is_null: true,
            is_number: false,
        }
    }
}

/// Read-only snapshot of a successful result set.
///
/// Every row has exactly `headers.len()` cells, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableModel {
    /// Column names, from the first record.
    pub headers: Vec<String>,
    /// Rendered rows.
    pub rows: Vec<Vec<DisplayCell>>,
}

impl TableModel {
    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if the model has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What the host should show after a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Displayable {
    /// A status line with no table.
    Status(String),
    /// A result table plus its row-count summary ("1 row", "N rows").
    Table { model: TableModel, summary: String },
    /// A failure message.
    Error(String),
}

impl Displayable {
    /// Text for the host's message surface.
    pub fn message(&self) -> String {
        match self {
            Self::Status(msg) => msg.clone(),
            Self::Table { summary, .. } => format!("Query executed successfully.\n{summary}"),
            Self::Error(msg) => format!("Error: {msg}"),
        }
    }

    /// Returns the table model, if any.
    pub fn table(&self) -> Option<&TableModel> {
        match self {
            Self::Table { model, .. } => Some(model),
            _ => None,
        }
    }

    /// Returns true for an error display.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// How to treat a "GMT" value that does not parse as a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Fail the whole materialization.
    #[default]
    Strict,
    /// Keep the original text in that cell.
    Lenient,
}
