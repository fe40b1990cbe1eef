//! Highlighter tests over realistic editor content.

use pretty_assertions::assert_eq;
use sqlexec::highlight::{highlight, BlockHighlighter, Category, HighlightSpan, Highlighter};

fn effective(line: &str) -> Vec<(String, Category)> {
    Highlighter::standard()
        .effective_spans(line)
        .into_iter()
        .filter_map(|s| Some((line[s.byte_range(line)?].to_string(), s.category)))
        .collect()
}

#[test]
fn test_query_line() {
    assert_eq!(
        effective("select sum(x) from t left join u on t.id = u.id"),
        vec![
            ("select".to_string(), Category::Keyword),
            ("sum".to_string(), Category::AlterFunction),
            ("from".to_string(), Category::Keyword),
            ("left".to_string(), Category::JoinWord),
            ("join".to_string(), Category::JoinWord),
        ]
    );
}

#[test]
fn test_string_and_comment_override_keywords() {
    assert_eq!(
        effective("WHERE name = 'SELECT' -- FROM here"),
        vec![
            ("WHERE".to_string(), Category::Keyword),
            ("'SELECT'".to_string(), Category::StringLiteral),
            ("-- FROM here".to_string(), Category::Comment),
        ]
    );
}

#[test]
fn test_raw_spans_are_in_rule_order() {
    let spans = highlight("SELECT 'a'");
    let categories: Vec<Category> = spans.iter().map(|s| s.category).collect();
    let mut sorted = categories.clone();
    sorted.sort();
    assert_eq!(categories, sorted);
    assert!(spans.contains(&HighlightSpan::new(0, 6, Category::Keyword)));
    assert!(spans.contains(&HighlightSpan::new(7, 3, Category::StringLiteral)));
}

#[test]
fn test_document_highlighting() {
    let mut highlighter = BlockHighlighter::new();
    let doc = "SELECT *\nFROM t\n\n-- done";
    let lines = highlighter.highlight_document(doc);

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], vec![HighlightSpan::new(0, 6, Category::Keyword)]);
    assert_eq!(lines[1], vec![HighlightSpan::new(0, 4, Category::Keyword)]);
    assert!(lines[2].is_empty());
    assert_eq!(lines[3], vec![HighlightSpan::new(0, 7, Category::Comment)]);
}

#[test]
fn test_accented_text_uses_character_positions() {
    let doc = "-- relatório\nSELECT nome FROM clientes WHERE cidade = 'São Paulo'";
    let mut highlighter = BlockHighlighter::new();
    let lines = highlighter.highlight_document(doc);

    assert_eq!(lines[0], vec![HighlightSpan::new(0, 12, Category::Comment)]);
    assert_eq!(
        effective("cidade = 'São Paulo' AND ativo"),
        vec![
            ("'São Paulo'".to_string(), Category::StringLiteral),
            ("AND".to_string(), Category::JoinWord),
        ]
    );
    assert_eq!(
        highlight("é SELECT"),
        vec![HighlightSpan::new(2, 6, Category::Keyword)]
    );
}
