//! Query requests and verb selection.

use serde::Serialize;
use std::fmt;

/// Statement prefixes sent to the execute endpoint instead of the query one.
const POST_PREFIXES: &[&str] = &["CREATE VIEW", "CREATE PROCEDURE"];

/// HTTP verb used for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Row-returning queries, sent to `/consulta`.
    Get,
    /// View and procedure definitions, sent to `/executar`.
    Post,
}

impl Verb {
    /// Chooses the verb for a query text.
    ///
    /// This is a prefix check on the trimmed, uppercased text, not a parse.
    pub fn for_query(text: &str) -> Self {
        let normalized = text.trim().to_uppercase();
        if POST_PREFIXES
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
        {
            Self::Post
        } else {
            Self::Get
        }
    }

    /// Endpoint path appended to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Get => "/consulta",
            Self::Post => "/executar",
        }
    }

    /// Method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A query ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Verb chosen for the text.
    pub verb: Verb,
    /// Raw query text, sent unmodified.
    pub text: String,
}

impl QueryRequest {
    /// Creates a request, selecting the verb from the text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            verb: Verb::for_query(&text),
            text,
        }
    }

    /// JSON body sent with the request.
    pub fn payload(&self) -> QueryPayload<'_> {
        QueryPayload { query: &self.text }
    }
}

/// Wire body: `{"query": "<text>"}`.
#[derive(Debug, Serialize)]
pub struct QueryPayload<'a> {
    pub query: &'a str,
}
