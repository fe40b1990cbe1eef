//! Mock transport for testing.
//!
//! Serves scripted replies in order without touching the network; used by
//! tests and by the CLI's `--mock-response` mode.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::client::{QueryTransport, RawResponse};
use super::request::QueryRequest;
use crate::error::{Result, SqlExecError};

#[derive(Debug, Clone)]
enum Reply {
    Response(RawResponse, Option<Duration>),
    TransportError(String),
}

/// A transport that returns scripted replies.
///
/// Replies are consumed in order; once the script is exhausted the last
/// reply repeats, and an empty script answers `200 []`.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    delay: Option<Duration>,
    sent: Mutex<Vec<QueryRequest>>,
}

impl MockTransport {
    /// Creates a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Reply::Response(RawResponse::new(status, body), None))
    }

    /// Queues a response that arrives after `delay`.
    pub fn with_slow_response(self, status: u16, body: impl Into<String>, delay: Duration) -> Self {
        self.push(Reply::Response(RawResponse::new(status, body), Some(delay)))
    }

    /// Queues a transport failure.
    pub fn with_transport_error(self, msg: impl Into<String>) -> Self {
        self.push(Reply::TransportError(msg.into()))
    }

    /// Delays every response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the requests received so far.
    pub fn sent(&self) -> Vec<QueryRequest> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn push(self, reply: Reply) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
        self
    }

    fn next_reply(&self) -> Result<Reply> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| SqlExecError::internal("mock script lock poisoned"))?;
        let mut last = self
            .last
            .lock()
            .map_err(|_| SqlExecError::internal("mock script lock poisoned"))?;

        if let Some(reply) = script.pop_front() {
            *last = Some(reply.clone());
            return Ok(reply);
        }
        Ok(last
            .clone()
            .unwrap_or_else(|| Reply::Response(RawResponse::new(200, "[]"), None)))
    }
}

#[async_trait]
impl QueryTransport for MockTransport {
    async fn send(&self, request: &QueryRequest) -> Result<RawResponse> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request.clone());
        }

        let reply = self.next_reply()?;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Response(response, delay) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            Reply::TransportError(msg) => Err(SqlExecError::transport(msg)),
        }
    }
}
