//! The history manager.
//!
//! Holds the ordered history in memory, trims it to `maxHistoryItems` and
//! persists it through a [`HistoryStore`] after every change. Persistence
//! failures are logged and never fail the request path.
//!
//! The store is written from a snapshot after the in-memory lock is
//! released. Every change gets a revision number and a snapshot older than
//! the last one written is dropped, so the store never goes backwards.

use super::export::ExportFormat;
use super::models::{HistoryEntry, HistoryError};
use super::search::HistoryQuery;
use super::storage::HistoryStore;
use crate::config::SettingsHandle;
use crate::executor::RequestError;
use crate::models::{RequestConfig, RequestResponse};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub struct HistoryManager {
    settings: SettingsHandle,
    store: Box<dyn HistoryStore>,
    entries: Mutex<Vec<HistoryEntry>>,
    /// Bumped under the `entries` lock on every change.
    revision: AtomicU64,
    /// Revision of the last snapshot saved; held while saving.
    written: Mutex<u64>,
}

impl HistoryManager {
    /// Creates a manager and loads the persisted history.
    ///
    /// A load failure is logged and leaves the history empty.
    ///
    /// # Arguments
    ///
    /// * `settings` - Shared settings (`saveHistory`, `maxHistoryItems`)
    /// * `store` - Where the history is persisted
    pub fn new(settings: SettingsHandle, store: Box<dyn HistoryStore>) -> Self {
        let entries = match store.load() {
            Ok(entries) => {
                log::debug!("Loaded {} history entries", entries.len());
                entries
            }
            Err(e) => {
                log::error!("Failed to load request history: {}", e);
                Vec::new()
            }
        };

        Self {
            settings,
            store,
            entries: Mutex::new(entries),
            revision: AtomicU64::new(0),
            written: Mutex::new(0),
        }
    }

    /// Records a request that produced a response.
    ///
    /// # Returns
    ///
    /// The recorded entry, or `None` when history saving is disabled.
    pub fn add_successful_request(
        &self,
        config: &RequestConfig,
        response: &RequestResponse,
    ) -> Option<HistoryEntry> {
        if !self.settings.get().save_history {
            return None;
        }
        self.append(HistoryEntry::success(config.clone(), response.clone()))
    }

    /// Records a request that failed.
    ///
    /// # Returns
    ///
    /// The recorded entry, or `None` when history saving is disabled.
    pub fn add_failed_request(
        &self,
        config: &RequestConfig,
        error: &RequestError,
    ) -> Option<HistoryEntry> {
        if !self.settings.get().save_history {
            return None;
        }
        self.append(HistoryEntry::failure(config.clone(), error.clone()))
    }

    fn append(&self, entry: HistoryEntry) -> Option<HistoryEntry> {
        let max_items = self.settings.get().max_history_items;
        let (snapshot, revision) = {
            let mut entries = match self.entries.lock() {
                Ok(entries) => entries,
                Err(e) => {
                    log::error!("History is unavailable: {}", e);
                    return None;
                }
            };

            entries.push(entry.clone());
            if entries.len() > max_items {
                let excess = entries.len() - max_items;
                entries.drain(..excess);
            }
            (entries.clone(), self.next_revision())
        };

        self.persist(&snapshot, revision);
        Some(entry)
    }

    fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Gets a copy of the full history, oldest first.
    pub fn get_history(&self) -> Vec<HistoryEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Finds an entry by id.
    pub fn get_history_by_id(&self, id: &str) -> Option<HistoryEntry> {
        self.entries
            .lock()
            .ok()?
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    /// Runs `query` over the history, oldest first.
    pub fn search(&self, query: &HistoryQuery) -> Vec<HistoryEntry> {
        self.entries
            .lock()
            .map(|entries| query.run(&entries).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Empties the history and persists the empty state.
    pub fn clear_history(&self) {
        let revision = match self.entries.lock() {
            Ok(mut entries) => {
                entries.clear();
                self.next_revision()
            }
            Err(e) => {
                log::error!("History is unavailable: {}", e);
                return;
            }
        };
        self.persist(&[], revision);
    }

    /// Writes the full history to `destination`.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if rendering or writing fails. The in-memory
    /// history is unaffected either way.
    pub fn export_history(
        &self,
        format: ExportFormat,
        destination: &Path,
    ) -> Result<(), HistoryError> {
        let content = format.render(&self.get_history())?;
        std::fs::write(destination, content)?;
        log::info!("Exported history as {} to {}", format, destination.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, snapshot: &[HistoryEntry], revision: u64) {
        let Ok(mut written) = self.written.lock() else {
            log::error!("History store is unavailable");
            return;
        };
        if *written > revision {
            log::debug!("Skipping stale history snapshot {}", revision);
            return;
        }

        match self.store.save(snapshot) {
            Ok(()) => *written = revision,
            Err(e) => log::error!("Failed to persist request history: {}", e),
        }
    }
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("entries", &self.len())
            .finish()
    }
}
