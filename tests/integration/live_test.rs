//! Live service tests.
//!
//! Set SQLEXEC_TEST_URL (and optionally SQLEXEC_TEST_USER and
//! SQLEXEC_TEST_PASSWORD) to run them against a real query service.

use sqlexec::config::EndpointConfig;
use sqlexec::query::{QueryClient, QueryRequest};
use sqlexec::results::{materialize, DatePolicy};

fn get_test_client() -> Option<QueryClient> {
    let base_url = std::env::var("SQLEXEC_TEST_URL").ok()?;
    let endpoint = EndpointConfig {
        base_url,
        user: std::env::var("SQLEXEC_TEST_USER").ok(),
        ..Default::default()
    };
    QueryClient::http(&endpoint, std::env::var("SQLEXEC_TEST_PASSWORD").ok()).ok()
}

#[tokio::test]
async fn test_live_select() {
    let Some(client) = get_test_client() else {
        eprintln!("Skipping test: SQLEXEC_TEST_URL not set");
        return;
    };

    let outcome = client
        .execute(&QueryRequest::new("SELECT 1 AS one"))
        .await;
    let display = materialize(&outcome, DatePolicy::Lenient).unwrap();

    assert!(!display.is_error(), "{}", display.message());
}
