//! Spreadsheet (xlsx) export.
//!
//! Writes a minimal single-sheet Office Open XML workbook: header row first,
//! no index column. Numeric values become number cells; everything else is
//! an inline string. NULL cells carry the text `NULL` so the file matches
//! what was on screen.

use regex::Regex;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Result, SqlExecError};
use crate::results::TableModel;

/// Message reported when there is nothing to export.
pub const NOTHING_TO_EXPORT: &str = "Nothing to export.";

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Sheet1";

const SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Headers and rows read back from a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Writes the table to an xlsx file at `path`.
pub fn to_spreadsheet_file(model: &TableModel, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| SqlExecError::export_io(e.to_string()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let workbook = workbook_xml();
    let sheet = sheet_xml(model);
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", workbook.as_str()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        (SHEET_PATH, sheet.as_str()),
    ];

    for (name, content) in parts {
        zip.start_file(name, options)
            .map_err(|e| SqlExecError::export_io(format!("Failed to add '{}': {}", name, e)))?;
        zip.write_all(content.as_bytes())
            .map_err(|e| SqlExecError::export_io(format!("Failed to write '{}': {}", name, e)))?;
    }

    zip.finish()
        .map_err(|e| SqlExecError::export_io(format!("Failed to finalize workbook: {}", e)))?;

    info!(
        "Exported {} rows to {}",
        model.row_count(),
        path.display()
    );
    Ok(())
}

/// Reads a sheet written by [`to_spreadsheet_file`].
///
/// Only inline-string and number cells are understood; the first row is
/// the header.
pub fn read_spreadsheet_file(path: &Path) -> Result<SheetData> {
    let file = File::open(path).map_err(|e| SqlExecError::export_io(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| SqlExecError::export_io(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(SHEET_PATH)
        .map_err(|e| SqlExecError::export_io(format!("Missing worksheet: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| SqlExecError::export_io(e.to_string()))?;

    let mut rows = parse_sheet_rows(&xml).into_iter();
    Ok(SheetData {
        headers: rows.next().unwrap_or_default(),
        rows: rows.collect(),
    })
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SHEET_NAME
    )
}

fn sheet_xml(model: &TableModel) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    let header = model.headers.iter().map(|h| (h.as_str(), false));
    push_row(&mut xml, 1, header);
    for (i, row) in model.rows.iter().enumerate() {
        let cells = row.iter().map(|cell| (cell.text.as_str(), cell.is_number));
        push_row(&mut xml, i + 2, cells);
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row<'a>(
    xml: &mut String,
    row_number: usize,
    cells: impl Iterator<Item = (&'a str, bool)>,
) {
    xml.push_str(&format!(r#"<row r="{row_number}">"#));
    for (col, (text, numeric)) in cells.enumerate() {
        let reference = format!("{}{}", column_name(col), row_number);
        if numeric && is_finite_number(text) {
            xml.push_str(&format!(r#"<c r="{reference}" t="n"><v>{text}</v></c>"#));
        } else {
            xml.push_str(&format!(
                r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                escape_xml(text)
            ));
        }
    }
    xml.push_str("</row>");
}

/// Numbers outside f64 precision stay text so no digits are lost.
fn is_finite_number(text: &str) -> bool {
    text.parse::<f64>()
        .is_ok_and(|n| n.is_finite() && (text.contains('.') || n.abs() < 9.007_199_254_740_992e15))
}

/// Spreadsheet column letters for a zero-based index (0 → A, 26 → AA).
pub fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut name = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn column_index(name: &str) -> usize {
    name.bytes()
        .fold(0, |acc, b| acc * 26 + (b - b'A') as usize + 1)
        .saturating_sub(1)
}

/// Escapes text for XML, dropping characters XML 1.0 cannot carry.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn parse_sheet_rows(xml: &str) -> Vec<Vec<String>> {
    static ROW: OnceLock<Option<Regex>> = OnceLock::new();
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();

    let (Some(row_re), Some(cell_re)) = (
        ROW.get_or_init(|| Regex::new(r"(?s)<row[^>]*>(.*?)</row>").ok()),
        CELL.get_or_init(|| {
            Regex::new(
                r#"(?s)<c r="([A-Z]+)\d+"[^>]*>(?:<is><t[^>]*>(.*?)</t></is>|<v>(.*?)</v>)?</c>"#,
            )
            .ok()
        }),
    ) else {
        return Vec::new();
    };

    row_re
        .captures_iter(xml)
        .map(|row| {
            let mut cells: Vec<String> = Vec::new();
            for cell in cell_re.captures_iter(&row[1]) {
                let index = column_index(&cell[1]);
                if cells.len() <= index {
                    cells.resize(index + 1, String::new());
                }
                cells[index] = cell
                    .get(2)
                    .or_else(|| cell.get(3))
                    .map(|t| unescape_xml(t.as_str()))
                    .unwrap_or_default();
            }
            cells
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::DisplayCell;
    use pretty_assertions::assert_eq;

    fn sample_model() -> TableModel {
        TableModel {
            headers: vec!["id".to_string(), "name".to_string(), "note".to_string()],
            rows: vec![
                vec![
                    DisplayCell::number("1"),
                    DisplayCell::text("a & b"),
                    DisplayCell::text("<x>"),
                ],
                vec![
                    DisplayCell::number("2"),
                    DisplayCell::null(),
                    DisplayCell::text("it's \"quoted\""),
                ],
            ],
        }
    }

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
        assert_eq!(column_index("AA"), 26);
        assert_eq!(column_index("A"), 0);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
        assert_eq!(escape_xml("bell\u{7}"), "bell");
        assert_eq!(unescape_xml("a&lt;b&gt;&amp;amp;"), "a<b>&amp;");
    }

    #[test]
    fn test_sheet_xml_has_header_first() {
        let xml = sheet_xml(&sample_model());
        let header = xml.find(r#"<row r="1">"#).unwrap();
        let first = xml.find(r#"<row r="2">"#).unwrap();
        assert!(header < first);
        assert!(xml.contains(r#"<c r="B3" t="inlineStr"><is><t xml:space="preserve">NULL</t></is></c>"#));
    }

    #[test]
    fn test_numeric_cells_are_numbers() {
        let xml = sheet_xml(&sample_model());
        assert!(xml.contains(r#"<c r="A2" t="n"><v>1</v></c>"#));
        assert!(xml.contains(r#"<c r="A1" t="inlineStr">"#));
    }

    #[test]
    fn test_unrepresentable_numbers_stay_text() {
        assert!(is_finite_number("42"));
        assert!(is_finite_number("3.0"));
        assert!(!is_finite_number("NaN"));
        assert!(!is_finite_number("inf"));
        assert!(!is_finite_number("18446744073709551615"));

        let model = TableModel {
            headers: vec!["id".to_string()],
            rows: vec![vec![DisplayCell::number("18446744073709551615")]],
        };
        let xml = sheet_xml(&model);
        assert!(xml.contains(r#"<t xml:space="preserve">18446744073709551615</t>"#));
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let model = sample_model();

        to_spreadsheet_file(&model, &path).unwrap();
        let sheet = read_spreadsheet_file(&path).unwrap();

        assert_eq!(sheet.headers, model.headers);
        assert_eq!(sheet.rows.len(), model.row_count());
        assert_eq!(sheet.rows[0], vec!["1", "a & b", "<x>"]);
        assert_eq!(sheet.rows[1], vec!["2", "NULL", "it's \"quoted\""]);
    }

    #[test]
    fn test_workbook_parts_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parts.xlsx");
        to_spreadsheet_file(&sample_model(), &path).unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            SHEET_PATH,
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("out.xlsx");
        let err = to_spreadsheet_file(&sample_model(), &path).unwrap_err();
        assert!(matches!(err, SqlExecError::ExportIo(_)));
    }
}
