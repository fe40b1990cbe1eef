//! One-query-at-a-time session.
//!
//! The session is owned by the host's context. Each submitted query runs on
//! its own tokio task and reports back over a channel; the task never
//! touches session state. Submitting while a query is running cancels the
//! running one and replaces it, and late results from replaced queries are
//! dropped by request id.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::client::QueryClient;
use super::request::QueryRequest;
use crate::results::QueryOutcome;

/// Unique identifier for a submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Generates a new unique request ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the inner u64 value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of the session's current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing submitted yet.
    Idle,
    /// A query is in flight.
    Running(RequestId),
    /// The last query finished (successfully or not).
    Completed(RequestId),
}

/// Completion notice sent by a query worker.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// Which submission this belongs to.
    pub id: RequestId,
    /// The request as sent.
    pub request: QueryRequest,
    /// What came back.
    pub outcome: QueryOutcome,
    /// Wall time from dispatch to outcome.
    pub elapsed: Duration,
}

struct InFlight {
    id: RequestId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Query session with cancel-and-replace semantics.
pub struct QuerySession {
    client: QueryClient,
    state: SessionState,
    in_flight: Option<InFlight>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl QuerySession {
    /// Creates an idle session.
    pub fn new(client: QueryClient) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            client,
            state: SessionState::Idle,
            in_flight: None,
            events_tx,
            events_rx,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true while a query is in flight.
    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running(_))
    }

    /// Starts a query. Must be called inside a tokio runtime.
    ///
    /// A query already in flight is cancelled; its result will be discarded.
    pub fn submit(&mut self, text: impl Into<String>) -> RequestId {
        if let Some(previous) = self.in_flight.take() {
            info!("Replacing query {} with a new submission", previous.id);
            previous.cancel.cancel();
        }

        let id = RequestId::new();
        let request = QueryRequest::new(text);
        let cancel = CancellationToken::new();

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let worker_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            let started = Instant::now();
            let outcome = client.execute_cancellable(&request, worker_cancel).await;
            // The receiver is gone only if the session was dropped.
            let _ = tx.send(SessionEvent {
                id,
                request,
                outcome,
                elapsed: started.elapsed(),
            });
        });

        debug!("Submitted query {}", id);
        self.in_flight = Some(InFlight { id, cancel, task });
        self.state = SessionState::Running(id);
        id
    }

    /// Requests cancellation of the running query.
    ///
    /// The worker still reports, with `Failure("cancelled")`. Returns false
    /// if nothing was running.
    pub fn cancel(&mut self) -> bool {
        match &self.in_flight {
            Some(in_flight) => {
                info!("Cancelling query {}", in_flight.id);
                in_flight.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Filters a worker event: returns it if it belongs to the current
    /// query (and marks the session completed), or `None` if stale.
    pub fn accept(&mut self, event: SessionEvent) -> Option<SessionEvent> {
        let current = self.in_flight.as_ref().map(|f| f.id);
        if current != Some(event.id) {
            debug!("Dropping stale result for query {}", event.id);
            return None;
        }
        self.in_flight = None;
        self.state = SessionState::Completed(event.id);
        Some(event)
    }

    /// Waits for the current query's result, skipping stale ones.
    ///
    /// Returns `None` if nothing is running.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        while self.in_flight.is_some() {
            let event = self.events_rx.recv().await?;
            if let Some(event) = self.accept(event) {
                return Some(event);
            }
        }
        None
    }

    /// Non-blocking poll for hosts that run their own event loop.
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(event) = self.accept(event) {
                return Some(event);
            }
        }
        None
    }
}

impl Drop for QuerySession {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
            in_flight.task.abort();
        }
    }
}
