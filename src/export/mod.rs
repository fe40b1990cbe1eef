//! Result export: clipboard text and spreadsheet files.

mod clipboard;
mod spreadsheet;

pub use clipboard::{backend, copy_to_clipboard, to_clipboard_text, ClipboardBackend, NOTHING_TO_COPY};
pub use spreadsheet::{
    column_name, read_spreadsheet_file, to_spreadsheet_file, SheetData, NOTHING_TO_EXPORT,
    SHEET_NAME,
};
