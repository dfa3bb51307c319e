//! Request history tracking and persistence.
//!
//! Every dispatched request is recorded with its response or error, so users
//! can review past requests and re-execute them.
//!
//! # Features
//!
//! - Append-only history, trimmed from the oldest end to `maxHistoryItems`
//! - Pluggable persistence through [`HistoryStore`] (JSONL file or memory)
//! - Export as JSON or CSV
//! - Search and filtering helpers
//!
//! # Example
//!
//! ```
//! use rest_client_pipeline::config::SettingsHandle;
//! use rest_client_pipeline::history::{HistoryManager, MemoryHistoryStore};
//! use rest_client_pipeline::models::{HttpMethod, RequestConfig, RequestResponse};
//!
//! let history = HistoryManager::new(SettingsHandle::default(), Box::new(MemoryHistoryStore::new()));
//! let config = RequestConfig::new(HttpMethod::GET, "https://api.example.com/users");
//! let entry = history
//!     .add_successful_request(&config, &RequestResponse::new(200, "OK"))
//!     .unwrap();
//!
//! assert_eq!(history.get_history_by_id(&entry.id), Some(entry));
//! ```

pub mod export;
pub mod manager;
pub mod models;
pub mod search;
pub mod storage;

// Re-export commonly used types
pub use export::ExportFormat;
pub use manager::HistoryManager;
pub use models::{HistoryEntry, HistoryError, HistoryOutcome};
pub use search::{
    filter_by_method, filter_by_status, filter_errors, filter_successful, get_recent_entries,
    search_history, HistoryQuery, OutcomeFilter,
};
pub use storage::{default_history_path, FileHistoryStore, HistoryStore, MemoryHistoryStore};
