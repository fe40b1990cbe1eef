//! Export tests: clipboard text and xlsx files from query results.

use pretty_assertions::assert_eq;
use sqlexec::app::Console;
use sqlexec::error::SqlExecError;
use sqlexec::export::{read_spreadsheet_file, to_clipboard_text, to_spreadsheet_file};
use sqlexec::query::{MockTransport, QueryClient};
use sqlexec::results::{DatePolicy, DisplayCell, TableModel};
use std::sync::Arc;

const BODY: &str = r#"[
    {"id": 1, "name": "Ana", "joined": "Mon, 01 Jan 2024 00:00:00 GMT"},
    {"id": 2, "name": null, "joined": "Tue, 02 Jan 2024 00:00:00 GMT"}
]"#;

#[tokio::test]
async fn test_exported_file_matches_screen() {
    let mut console = Console::new(
        QueryClient::new(Arc::new(MockTransport::new().with_response(200, BODY))),
        DatePolicy::Strict,
    );
    console.run("SELECT id, name, joined FROM people").await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.xlsx");
    console.export(Some(&path)).unwrap();

    let sheet = read_spreadsheet_file(&path).unwrap();
    assert_eq!(sheet.headers, vec!["id", "name", "joined"]);
    assert_eq!(
        sheet.rows,
        vec![
            vec!["1", "Ana", "2024-01-01"],
            vec!["2", "NULL", "2024-01-02"],
        ]
    );

    assert_eq!(
        console.clipboard_text().unwrap(),
        "id\tname\tjoined\n1\tAna\t2024-01-01\n2\tNULL\t2024-01-02"
    );
}

#[test]
fn test_headers_only_table() {
    let model = TableModel {
        headers: vec!["a".to_string(), "b".to_string()],
        rows: vec![],
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");

    to_spreadsheet_file(&model, &path).unwrap();
    let sheet = read_spreadsheet_file(&path).unwrap();

    assert_eq!(sheet.headers, vec!["a", "b"]);
    assert!(sheet.rows.is_empty());
}

#[test]
fn test_tabs_inside_cells_are_not_escaped() {
    let model = TableModel {
        headers: vec!["c".to_string()],
        rows: vec![vec![DisplayCell::text("x\ty")]],
    };
    assert_eq!(to_clipboard_text(Some(&model)).unwrap(), "c\nx\ty");
}

#[test]
fn test_export_io_error() {
    let model = TableModel {
        headers: vec!["a".to_string()],
        rows: vec![vec![DisplayCell::text("1")]],
    };
    let dir = tempfile::tempdir().unwrap();
    let err = to_spreadsheet_file(&model, dir.path()).unwrap_err();
    assert!(matches!(err, SqlExecError::ExportIo(_)));
    assert!(err.to_string().starts_with("Export failed: "));
}
