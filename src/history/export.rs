//! History export formats.

use super::models::{HistoryEntry, HistoryError};
use std::fmt;

/// CSV column header.
pub const CSV_HEADER: &str = "timestamp,method,url,status";

/// Output format for [`HistoryManager::export_history`](super::HistoryManager::export_history).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON array of full entries.
    Json,
    /// One `timestamp,method,url,status` line per entry.
    Csv,
}

impl ExportFormat {
    /// Parses a format name (`json` or `csv`, case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Renders entries in this format.
    pub fn render(&self, entries: &[HistoryEntry]) -> Result<String, HistoryError> {
        match self {
            ExportFormat::Json => to_json(entries),
            ExportFormat::Csv => Ok(to_csv(entries)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn to_json(entries: &[HistoryEntry]) -> Result<String, HistoryError> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Flattens entries to CSV. Fields containing commas, quotes or line breaks
/// are quoted.
pub fn to_csv(entries: &[HistoryEntry]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        let fields = [
            entry.timestamp.to_rfc3339(),
            entry.request.method.as_str().to_string(),
            entry.request.url.clone(),
            entry.status_label(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
