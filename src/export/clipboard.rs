//! Clipboard export.
//!
//! Serializes a table as tab-separated text and places text on the system
//! clipboard.
//!
//! Backends, in order of preference:
//! - arboard (native clipboard API)
//! - Linux: `xclip` or `xsel`
//! - macOS: `pbcopy`
//! - OSC 52 terminal escape as a last resort

use arboard::Clipboard;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use tracing::debug;

use crate::error::{Result, SqlExecError};
use crate::results::TableModel;

/// Message reported when there is nothing to copy.
pub const NOTHING_TO_COPY: &str = "Nothing to copy.";

/// Serializes a table as tab-separated lines, header first.
///
/// No trailing newline. `None` means no query has produced a table yet.
pub fn to_clipboard_text(model: Option<&TableModel>) -> Result<String> {
    let model = model.ok_or_else(|| SqlExecError::no_data(NOTHING_TO_COPY))?;

    let mut lines = Vec::with_capacity(model.rows.len() + 1);
    lines.push(model.headers.join("\t"));
    for row in &model.rows {
        let cells: Vec<&str> = row.iter().map(|cell| cell.text.as_str()).collect();
        lines.push(cells.join("\t"));
    }

    Ok(lines.join("\n"))
}

/// Lazily created native clipboard handle.
static CLIPBOARD: Mutex<Option<Clipboard>> = Mutex::new(None);

/// Clipboard backend for the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    /// Native clipboard via arboard.
    Arboard,
    /// Linux: xclip command.
    Xclip,
    /// Linux: xsel command.
    Xsel,
    /// macOS: pbcopy command.
    Pbcopy,
    /// Terminal OSC 52 escape sequence.
    Osc52,
}

/// Detected backend, cached after first use.
static BACKEND: Mutex<Option<ClipboardBackend>> = Mutex::new(None);

/// Detects the best available clipboard backend.
fn detect_backend() -> ClipboardBackend {
    if let Ok(clipboard) = Clipboard::new() {
        if let Ok(mut guard) = CLIPBOARD.lock() {
            *guard = Some(clipboard);
        }
        return ClipboardBackend::Arboard;
    }

    #[cfg(target_os = "macos")]
    {
        if command_available("pbcopy", None) {
            return ClipboardBackend::Pbcopy;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if command_available("xclip", Some("-version")) {
            return ClipboardBackend::Xclip;
        }
        if command_available("xsel", Some("--version")) {
            return ClipboardBackend::Xsel;
        }
    }

    ClipboardBackend::Osc52
}

#[allow(dead_code)] // Unused on platforms without command backends
fn command_available(program: &str, probe_arg: Option<&str>) -> bool {
    let mut command = Command::new(program);
    if let Some(arg) = probe_arg {
        command.arg(arg);
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Returns the clipboard backend, detecting it on first call.
pub fn backend() -> ClipboardBackend {
    if let Ok(mut guard) = BACKEND.lock() {
        if let Some(backend) = *guard {
            return backend;
        }
        let backend = detect_backend();
        *guard = Some(backend);
        return backend;
    }
    detect_backend()
}

/// Copies text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let backend = backend();
    debug!("Copying {} bytes via {:?}", text.len(), backend);

    match backend {
        ClipboardBackend::Arboard => copy_arboard(text),
        ClipboardBackend::Xclip => copy_command("xclip", &["-selection", "clipboard"], text),
        ClipboardBackend::Xsel => copy_command("xsel", &["--clipboard", "--input"], text),
        ClipboardBackend::Pbcopy => copy_command("pbcopy", &[], text),
        ClipboardBackend::Osc52 => copy_osc52(text),
    }
}

fn copy_arboard(text: &str) -> Result<()> {
    let mut guard = CLIPBOARD
        .lock()
        .map_err(|_| SqlExecError::clipboard("Failed to acquire clipboard lock"))?;
    if guard.is_none() {
        *guard = Some(Clipboard::new().map_err(|e| SqlExecError::clipboard(e.to_string()))?);
    }
    let clipboard = guard
        .as_mut()
        .ok_or_else(|| SqlExecError::clipboard("Clipboard not initialized"))?;
    clipboard
        .set_text(text)
        .map_err(|e| SqlExecError::clipboard(e.to_string()))
}

fn copy_command(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| SqlExecError::clipboard(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).map_err(|e| {
            SqlExecError::clipboard(format!("Failed to write to {}: {}", program, e))
        })?;
    }

    child
        .wait()
        .map_err(|e| SqlExecError::clipboard(format!("{} failed: {}", program, e)))?;

    Ok(())
}

/// Builds the OSC 52 sequence: `ESC ] 52 ; c ; <base64> ESC \`.
fn osc52_sequence(text: &str) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    format!("\x1b]52;c;{}\x1b\\", STANDARD.encode(text))
}

fn copy_osc52(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(osc52_sequence(text).as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| SqlExecError::clipboard(format!("Failed to write OSC 52: {}", e)))
}
