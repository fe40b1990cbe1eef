//! Console tests: what the host shows across a sequence of queries.

use pretty_assertions::assert_eq;
use sqlexec::app::Console;
use sqlexec::query::{MockTransport, QueryClient};
use sqlexec::results::DatePolicy;
use std::sync::Arc;

fn console(mock: MockTransport) -> Console {
    Console::new(QueryClient::new(Arc::new(mock)), DatePolicy::Strict)
}

#[tokio::test]
async fn test_requery_after_failure() {
    let mut console = console(
        MockTransport::new()
            .with_transport_error("connection reset")
            .with_response(200, r#"[{"x": "y"}]"#),
    );

    assert_eq!(console.run("SELECT x FROM t").await, "Error: connection reset");
    assert!(console.last_failed());
    assert!(console.model().is_none());

    assert_eq!(
        console.run("SELECT x FROM t").await,
        "Query executed successfully.\n1 row"
    );
    assert!(!console.last_failed());
    assert_eq!(console.clipboard_text().unwrap(), "x\ny");
}

#[tokio::test]
async fn test_create_view_acknowledgment() {
    let mut console = console(MockTransport::new().with_response(200, "View created"));
    let message = console.run("CREATE VIEW v AS SELECT 1").await.to_string();
    assert_eq!(message, "Comando executado com sucesso.");
    assert!(console.model().is_none());
}

#[tokio::test]
async fn test_cancel_keeps_previous_table() {
    let mut console = console(
        MockTransport::new()
            .with_response(200, r#"[{"id": 1}]"#)
            .with_slow_response(200, "[]", std::time::Duration::from_secs(30)),
    );

    console.run("SELECT 1 AS id").await;

    console.submit("SELECT slow()");
    assert!(console.is_running());
    assert!(console.cancel());
    assert!(console.wait().await);

    assert_eq!(console.message(), "Error: cancelled");
    assert_eq!(console.model().unwrap().row_count(), 1);
    assert!(!console.is_running());
}

#[tokio::test]
async fn test_wait_without_query() {
    let mut console = console(MockTransport::new());
    assert!(!console.wait().await);
}
