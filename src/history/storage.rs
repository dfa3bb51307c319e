//! Persistent storage for request history.
//!
//! The history manager persists through the [`HistoryStore`] trait. The file
//! store writes JSONL (JSON Lines) so a corrupted line only loses one entry;
//! every save rewrites the file atomically through a temporary file.

use super::models::{HistoryEntry, HistoryError};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Name of the history file inside the data directory.
pub const HISTORY_FILE_NAME: &str = "history.jsonl";

/// Load/store access to the persisted history sequence.
pub trait HistoryStore: Send + Sync {
    /// Loads the persisted entries, oldest first.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Replaces the persisted entries.
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError>;
}

/// Gets the default history file path.
///
/// Returns `~/.config/rest-client/history.jsonl` on Unix-like systems,
/// or the equivalent on Windows.
///
/// # Errors
///
/// Returns `HistoryError::StorageError` if no home directory is known.
pub fn default_history_path() -> Result<PathBuf, HistoryError> {
    let config_dir = if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config")
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        PathBuf::from(user_profile).join("AppData").join("Roaming")
    } else {
        return Err(HistoryError::StorageError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        )));
    };

    Ok(config_dir.join("rest-client").join(HISTORY_FILE_NAME))
}

/// JSONL file-backed history store.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at [`default_history_path`].
    pub fn at_default_path() -> Result<Self, HistoryError> {
        default_history_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    /// Reads the JSONL file. Corrupted lines are skipped with a warning; a
    /// missing file is an empty history.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entries = Vec::new();
        let mut corrupted_lines = 0;

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = match line_result {
                Ok(line) => line,
                Err(e) => {
                    corrupted_lines += 1;
                    log::warn!("Error reading history line {}: {}", line_num + 1, e);
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<HistoryEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    corrupted_lines += 1;
                    log::warn!(
                        "Skipping corrupted history entry at line {}: {}",
                        line_num + 1,
                        e
                    );
                }
            }
        }

        if corrupted_lines > 0 && corrupted_lines > entries.len() {
            log::warn!(
                "History file has significant corruption ({} corrupted lines, {} valid entries)",
                corrupted_lines,
                entries.len()
            );
        }

        Ok(entries)
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("jsonl.tmp");
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            for entry in entries {
                serde_json::to_writer(&mut writer, entry)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// In-memory history store.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `entries`.
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .map_err(|e| HistoryError::Unavailable(e.to_string()))
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let mut stored = self
            .entries
            .lock()
            .map_err(|e| HistoryError::Unavailable(e.to_string()))?;
        *stored = entries.to_vec();
        Ok(())
    }
}
