//! Console controller.
//!
//! Holds what a host window would show: the current result table and the
//! message line. Queries go through a [`QuerySession`]; completed events
//! are materialized and applied here.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::credentials;
use crate::error::{Result, SqlExecError};
use crate::export::{self, NOTHING_TO_EXPORT};
use crate::query::{QueryClient, QuerySession, RequestId, SessionEvent};
use crate::results::{materialize, DatePolicy, Displayable, TableModel};

/// Message shown after a successful clipboard copy.
pub const COPIED: &str = "Data copied to clipboard.";

/// Query console state.
pub struct Console {
    session: QuerySession,
    date_policy: DatePolicy,
    model: Option<TableModel>,
    message: String,
    failed: bool,
}

impl Console {
    /// Creates a console around a query client.
    pub fn new(client: QueryClient, date_policy: DatePolicy) -> Self {
        Self {
            session: QuerySession::new(client),
            date_policy,
            model: None,
            message: String::new(),
            failed: false,
        }
    }

    /// Creates a console talking HTTP to the configured endpoint.
    pub fn from_config(config: &Config) -> Result<Self> {
        let password = credentials::resolve_password(&config.endpoint);
        let client = QueryClient::http(&config.endpoint, password)?;
        info!("Endpoint: {}", config.endpoint.display_string());
        Ok(Self::new(client, config.results.date_policy))
    }

    /// Submits a query without waiting for it.
    pub fn submit(&mut self, text: &str) -> RequestId {
        self.session.submit(text)
    }

    /// Runs a query to completion and applies its result.
    pub async fn run(&mut self, text: &str) -> &str {
        self.submit(text);
        if let Some(event) = self.session.next_event().await {
            self.apply(event);
        }
        &self.message
    }

    /// Waits for the submitted query and applies its result.
    ///
    /// Returns false if nothing was running.
    pub async fn wait(&mut self) -> bool {
        match self.session.next_event().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Applies a completed query to the console.
    ///
    /// A table replaces the model, a status clears it, and an error keeps
    /// the previous model on screen.
    pub fn apply(&mut self, event: SessionEvent) {
        debug!(
            "Query {} finished in {:?} ({})",
            event.id,
            event.elapsed,
            event.request.verb
        );

        let display = materialize(&event.outcome, self.date_policy)
            .unwrap_or_else(|e| Displayable::Error(e.to_string()));

        self.message = display.message();
        self.failed = display.is_error();
        match display {
            Displayable::Table { model, .. } => self.model = Some(model),
            Displayable::Status(_) => self.model = None,
            Displayable::Error(msg) => warn!("Query {} failed: {}", event.id, msg),
        }
    }

    /// Cancels the running query, if any.
    pub fn cancel(&mut self) -> bool {
        self.session.cancel()
    }

    /// Returns true while a query is in flight.
    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// Current message line.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the last completed query failed.
    pub fn last_failed(&self) -> bool {
        self.failed
    }

    /// Current result table.
    pub fn model(&self) -> Option<&TableModel> {
        self.model.as_ref()
    }

    /// Tab-separated text of the current table.
    pub fn clipboard_text(&self) -> Result<String> {
        export::to_clipboard_text(self.model())
    }

    /// Copies the current table to the system clipboard.
    pub fn copy_to_clipboard(&mut self) -> Result<()> {
        let result = self
            .clipboard_text()
            .and_then(|text| export::copy_to_clipboard(&text));

        self.message = match &result {
            Ok(()) => COPIED.to_string(),
            Err(e) => e.to_string(),
        };
        result
    }

    /// Exports the current table to an xlsx file.
    ///
    /// `None` means the user dismissed the save dialog and is a no-op.
    pub fn export(&mut self, path: Option<&Path>) -> Result<Option<PathBuf>> {
        let Some(path) = path else {
            debug!("Export cancelled");
            return Ok(None);
        };

        let Some(model) = &self.model else {
            self.message = NOTHING_TO_EXPORT.to_string();
            return Err(SqlExecError::no_data(NOTHING_TO_EXPORT));
        };

        match export::to_spreadsheet_file(model, path) {
            Ok(()) => {
                self.message = format!("Data exported to {}.", path.display());
                Ok(Some(path.to_path_buf()))
            }
            Err(e) => {
                self.message = e.to_string();
                Err(e)
            }
        }
    }
}
