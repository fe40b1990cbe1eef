//! Error types for sqlexec.
//!
//! Defines the main error enum used throughout the application. Every
//! variant renders as a user-visible message; none of them is fatal to
//! the process.

use thiserror::Error;

/// Main error type for sqlexec operations.
#[derive(Error, Debug)]
pub enum SqlExecError {
    /// Network failure before a response was obtained (connect, timeout, bad URL).
    #[error("{0}")]
    Transport(String),

    /// The query service answered with a non-200 status.
    #[error("Erro {status}: {body}")]
    Remote { status: u16, body: String },

    /// A value containing "GMT" did not match the expected date layout.
    #[error("Invalid date value '{value}': {reason}")]
    DateParse { value: String, reason: String },

    /// Writing or reading the spreadsheet file failed.
    #[error("Export failed: {0}")]
    ExportIo(String),

    /// Copy or export was requested before any successful query.
    #[error("{0}")]
    NoData(String),

    /// Clipboard backend failure.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Configuration errors (invalid config file, bad endpoint URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SqlExecError {
    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a remote error from a status code and raw response body.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Creates a date parse error for the offending value.
    pub fn date_parse(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DateParse {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an export I/O error with the given message.
    pub fn export_io(msg: impl Into<String>) -> Self {
        Self::ExportIo(msg.into())
    }

    /// Creates a "nothing to copy/export" error with the given message.
    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData(msg.into())
    }

    /// Creates a clipboard error with the given message.
    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self::Clipboard(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(_) => "Transport Error",
            Self::Remote { .. } => "Remote Error",
            Self::DateParse { .. } => "Date Parse Error",
            Self::ExportIo(_) => "Export Error",
            Self::NoData(_) => "No Data",
            Self::Clipboard(_) => "Clipboard Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using SqlExecError.
pub type Result<T> = std::result::Result<T, SqlExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_remote() {
        let err = SqlExecError::remote(404, "table not found");
        assert_eq!(err.to_string(), "Erro 404: table not found");
        assert_eq!(err.category(), "Remote Error");
    }

    #[test]
    fn test_error_display_transport() {
        let err = SqlExecError::transport("error sending request for url");
        assert_eq!(err.to_string(), "error sending request for url");
        assert_eq!(err.category(), "Transport Error");
    }

    #[test]
    fn test_error_display_date_parse() {
        let err = SqlExecError::date_parse("Xyz, 99 Foo 2024 GMT", "input contains invalid characters");
        assert!(err.to_string().contains("Xyz, 99 Foo 2024 GMT"));
        assert_eq!(err.category(), "Date Parse Error");
    }

    #[test]
    fn test_error_display_export() {
        let err = SqlExecError::export_io("Permission denied (os error 13)");
        assert_eq!(
            err.to_string(),
            "Export failed: Permission denied (os error 13)"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = SqlExecError::config("missing field 'base_url' in endpoint");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing field 'base_url' in endpoint"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_display_no_data() {
        let err = SqlExecError::no_data("Nothing to copy.");
        assert_eq!(err.to_string(), "Nothing to copy.");
        assert_eq!(err.category(), "No Data");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqlExecError>();
    }
}
