//! Query pipeline tests: request routing, response interpretation and
//! materialization over a scripted transport.

use pretty_assertions::assert_eq;
use sqlexec::query::{MockTransport, QueryClient, QueryRequest, QuerySession, SessionState, Verb};
use sqlexec::results::{materialize, DatePolicy, Displayable, QueryOutcome, DEFAULT_STATUS};
use std::sync::Arc;
use std::time::Duration;

async fn run_once(body: &str, query: &str) -> Displayable {
    let client = QueryClient::new(Arc::new(MockTransport::new().with_response(200, body)));
    let outcome = client.execute(&QueryRequest::new(query)).await;
    materialize(&outcome, DatePolicy::Strict).unwrap()
}

#[tokio::test]
async fn test_select_with_dates_and_nulls() {
    let body = r#"[
        {"id": 1, "created": "Wed, 05 Jun 2024 00:00:00 GMT", "note": null},
        {"id": 2, "created": "Fri, 01 Mar 2024 13:45:10 GMT", "note": "ok"}
    ]"#;

    let display = run_once(body, "SELECT id, created, note FROM t").await;
    let Displayable::Table { model, summary } = display else {
        panic!("Expected a table");
    };

    assert_eq!(summary, "2 rows");
    assert_eq!(model.headers, vec!["id", "created", "note"]);
    assert_eq!(model.rows[0][1].text, "2024-06-05");
    assert_eq!(model.rows[1][1].text, "2024-03-01");
    assert!(model.rows[0][2].is_null);
    assert_eq!(model.rows[0][2].text, "NULL");
    assert_eq!(model.rows[1][2].text, "ok");
}

#[tokio::test]
async fn test_single_row_summary() {
    let display = run_once(r#"[{"n": 7}]"#, "SELECT 7 AS n").await;
    assert_eq!(display.message(), "Query executed successfully.\n1 row");
}

#[tokio::test]
async fn test_empty_result_is_status() {
    let display = run_once("[]", "DELETE FROM t").await;
    assert_eq!(display, Displayable::Status(DEFAULT_STATUS.to_string()));
}

#[tokio::test]
async fn test_status_record_is_acknowledgment() {
    let display = run_once(r#"[{"status": "3 rows updated"}]"#, "UPDATE t SET x = 1").await;
    assert_eq!(display, Displayable::Status("3 rows updated".to_string()));
}

#[tokio::test]
async fn test_missing_keys_render_null() {
    let display = run_once(r#"[{"a": 1, "b": 2}, {"a": 3}]"#, "SELECT a, b FROM t").await;
    let model = display.table().unwrap();
    assert!(model.rows[1][1].is_null);
}

#[tokio::test]
async fn test_verb_routing() {
    let mock = Arc::new(MockTransport::new());
    let client = QueryClient::new(mock.clone());

    client.execute(&QueryRequest::new("select * from t")).await;
    client
        .execute(&QueryRequest::new("  create view v as select 1"))
        .await;
    client
        .execute(&QueryRequest::new("CREATE PROCEDURE p AS SELECT 1"))
        .await;
    client.execute(&QueryRequest::new("CREATE TABLE x (a int)")).await;

    let verbs: Vec<Verb> = mock.sent().iter().map(|r| r.verb).collect();
    assert_eq!(verbs, vec![Verb::Get, Verb::Post, Verb::Post, Verb::Get]);
}

#[tokio::test]
async fn test_remote_error() {
    let client = QueryClient::new(Arc::new(
        MockTransport::new().with_response(400, "syntax error near FROM"),
    ));
    let outcome = client.execute(&QueryRequest::new("SELECT FROM")).await;
    assert_eq!(
        outcome,
        QueryOutcome::Failure("Erro 400: syntax error near FROM".to_string())
    );

    let display = materialize(&outcome, DatePolicy::Strict).unwrap();
    assert_eq!(display.message(), "Error: Erro 400: syntax error near FROM");
}

#[tokio::test]
async fn test_transport_error() {
    let client = QueryClient::new(Arc::new(
        MockTransport::new().with_transport_error("connection refused"),
    ));
    let outcome = client.execute(&QueryRequest::new("SELECT 1")).await;
    assert_eq!(outcome, QueryOutcome::Failure("connection refused".to_string()));
}

#[tokio::test]
async fn test_invalid_date_strict_and_lenient() {
    let client = QueryClient::new(Arc::new(
        MockTransport::new().with_response(200, r#"[{"d": "not a date GMT"}]"#),
    ));
    let outcome = client.execute(&QueryRequest::new("SELECT d FROM t")).await;

    assert!(materialize(&outcome, DatePolicy::Strict).is_err());

    let lenient = materialize(&outcome, DatePolicy::Lenient).unwrap();
    assert_eq!(lenient.table().unwrap().rows[0][0].text, "not a date GMT");
}

#[tokio::test]
async fn test_session_replaces_running_query() {
    let mock = MockTransport::new()
        .with_delay(Duration::from_millis(50))
        .with_response(200, r#"[{"n": 2}]"#);
    let mut session = QuerySession::new(QueryClient::new(Arc::new(mock)));

    let first = session.submit("SELECT 1 AS n");
    let second = session.submit("SELECT 2 AS n");
    assert_ne!(first, second);
    assert_eq!(session.state(), SessionState::Running(second));

    let event = session.next_event().await.unwrap();
    assert_eq!(event.id, second);
    assert_eq!(event.request.text, "SELECT 2 AS n");
    assert_eq!(session.state(), SessionState::Completed(second));
    assert!(session.next_event().await.is_none());
}

#[tokio::test]
async fn test_session_cancel_reports_cancelled() {
    let mock = MockTransport::new().with_slow_response(200, "[]", Duration::from_secs(30));
    let mut session = QuerySession::new(QueryClient::new(Arc::new(mock)));

    session.submit("SELECT pg_sleep(30)");
    assert!(session.cancel());

    let event = session.next_event().await.unwrap();
    assert_eq!(event.outcome, QueryOutcome::Failure("cancelled".to_string()));
    assert!(!session.is_running());
}

#[tokio::test]
async fn test_unsigned_bigint_rendered_exactly() {
    let display = run_once(
        r#"[{"id": 18446744073709551615, "flag": false}]"#,
        "SELECT id, flag FROM big",
    )
    .await;
    let model = display.table().unwrap();
    assert_eq!(model.rows[0][0].text, "18446744073709551615");
    assert!(model.rows[0][0].is_number);
    assert_eq!(model.rows[0][1].text, "False");
}
