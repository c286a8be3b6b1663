//! Clipboard helper for copying text to the system clipboard
//!
//! Uses `arboard` crate for cross-platform support (Windows, macOS, Linux).
//! The clipboard is created fresh each time to avoid holding resources.

use anyhow::{Context, Result};
use arboard::Clipboard;
use serde_json::Value;

/// Where copied text goes
///
/// The controller only sees this trait so tests can capture copies without a
/// display server.
pub trait ClipboardSink: Send {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// The real system clipboard
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    /// Common failure cases: no display server (headless Linux), permission denied.
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to set clipboard text")?;
        Ok(())
    }
}

/// Text placed on the clipboard for a value
///
/// Arrays become one line per element (strings unquoted), so a list of IPs
/// pastes straight into a blocklist. Everything else is pretty-printed JSON.
pub fn copy_payload(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
