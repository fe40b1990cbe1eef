//! Query client for the remote query service.
//!
//! The transport is a trait so the client logic (response interpretation,
//! cancellation) can be tested without a live endpoint.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::request::{QueryRequest, Verb};
use crate::config::EndpointConfig;
use crate::error::{Result, SqlExecError};
use crate::results::{QueryOutcome, Record, DEFAULT_STATUS};

/// Message delivered when a running query is cancelled.
pub const CANCELLED: &str = "cancelled";

/// Status code and body of a service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
}

impl RawResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a request and returns the raw response.
///
/// Errors are transport failures only; any HTTP status is a response.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn send(&self, request: &QueryRequest) -> Result<RawResponse>;
}

/// HTTP transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    user: Option<String>,
    password: Option<String>,
}

impl HttpTransport {
    /// Creates a transport from endpoint settings and a resolved password.
    pub fn new(endpoint: &EndpointConfig, password: Option<String>) -> Result<Self> {
        let base_url = endpoint.validated_base_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()
            .map_err(|e| SqlExecError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            user: endpoint.user.clone(),
            password,
        })
    }

    /// Returns the full URL for a verb.
    pub fn url_for(&self, verb: Verb) -> String {
        format!("{}{}", self.base_url, verb.path())
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    async fn send(&self, request: &QueryRequest) -> Result<RawResponse> {
        let method = match request.verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
        };
        let body = serde_json::to_string(&request.payload())
            .map_err(|e| SqlExecError::internal(format!("Failed to encode query: {}", e)))?;

        let mut builder = self
            .client
            .request(method, self.url_for(request.verb))
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(user) = &self.user {
            builder = builder.basic_auth(user, self.password.as_ref());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SqlExecError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SqlExecError::transport(format!("Failed to read response: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}

/// Executes queries and turns responses into outcomes.
#[derive(Clone)]
pub struct QueryClient {
    transport: Arc<dyn QueryTransport>,
}

impl QueryClient {
    /// Creates a client over any transport.
    pub fn new(transport: Arc<dyn QueryTransport>) -> Self {
        Self { transport }
    }

    /// Creates an HTTP client from endpoint settings.
    pub fn http(endpoint: &EndpointConfig, password: Option<String>) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(endpoint, password)?)))
    }

    /// Runs a query. Never fails: every problem becomes a `Failure`.
    pub async fn execute(&self, request: &QueryRequest) -> QueryOutcome {
        info!("Sending {} query ({} chars)", request.verb, request.text.len());
        debug!("Query text: {}", request.text);

        match self.transport.send(request).await {
            Ok(response) => interpret(response),
            Err(e) => {
                warn!("Query transport failed: {}", e);
                QueryOutcome::Failure(e.to_string())
            }
        }
    }

    /// Runs a query until it finishes or `cancel` fires.
    ///
    /// Cancellation drops the in-flight request and yields
    /// `Failure("cancelled")`.
    pub async fn execute_cancellable(
        &self,
        request: &QueryRequest,
        cancel: CancellationToken,
    ) -> QueryOutcome {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Query cancelled");
                QueryOutcome::Failure(CANCELLED.to_string())
            }
            outcome = self.execute(request) => outcome,
        }
    }
}

/// Interprets a service response.
///
/// A 200 whose body is not a JSON list of objects is a successful command
/// without rows (view/procedure creation acknowledgments are plain text).
pub fn interpret(response: RawResponse) -> QueryOutcome {
    if response.status != 200 {
        return QueryOutcome::Failure(SqlExecError::remote(response.status, response.body).to_string());
    }

    match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(doc) => match Record::list_from_json(doc) {
            Some(records) => {
                debug!("Decoded {} records", records.len());
                QueryOutcome::Records(records)
            }
            None => QueryOutcome::Status(DEFAULT_STATUS.to_string()),
        },
        Err(_) => QueryOutcome::Status(DEFAULT_STATUS.to_string()),
    }
}
