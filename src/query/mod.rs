//! Query execution against the remote query service.
//!
//! This module isolates request construction, transport, response
//! interpretation and the per-session concurrency policy.

mod client;
mod mock;
mod request;
mod session;

pub use client::{
    interpret, HttpTransport, QueryClient, QueryTransport, RawResponse, CANCELLED,
};
pub use mock::MockTransport;
pub use request::{QueryPayload, QueryRequest, Verb};
pub use session::{QuerySession, RequestId, SessionEvent, SessionState};
