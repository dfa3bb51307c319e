//! Data models for request history.
//!
//! This module defines the entry recorded for every dispatched request and
//! the errors history operations can produce.

use crate::executor::RequestError;
use crate::models::{RequestConfig, RequestResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a recorded request ended.
///
/// Serialized flattened into the entry with a `status` tag, so an entry
/// reads as `{"id": .., "status": "success", "response": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HistoryOutcome {
    Success { response: RequestResponse },
    Error { error: RequestError },
}

/// A single entry in the request history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier for this history entry.
    ///
    /// Generated using UUID v4 for guaranteed uniqueness.
    pub id: String,

    /// When the request completed, in UTC.
    pub timestamp: DateTime<Utc>,

    /// The request as it was dispatched.
    pub request: RequestConfig,

    #[serde(flatten)]
    pub outcome: HistoryOutcome,
}

impl HistoryEntry {
    /// Creates an entry for a request that produced a response.
    ///
    /// # Arguments
    ///
    /// * `request` - The request that was sent
    /// * `response` - The response that was received
    ///
    /// # Returns
    ///
    /// A new `HistoryEntry` with a unique ID and current timestamp.
    pub fn success(request: RequestConfig, response: RequestResponse) -> Self {
        Self::new(request, HistoryOutcome::Success { response })
    }

    /// Creates an entry for a request that failed.
    pub fn failure(request: RequestConfig, error: RequestError) -> Self {
        Self::new(request, HistoryOutcome::Error { error })
    }

    fn new(request: RequestConfig, outcome: HistoryOutcome) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            request,
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, HistoryOutcome::Success { .. })
    }

    pub fn response(&self) -> Option<&RequestResponse> {
        match &self.outcome {
            HistoryOutcome::Success { response } => Some(response),
            HistoryOutcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&RequestError> {
        match &self.outcome {
            HistoryOutcome::Success { .. } => None,
            HistoryOutcome::Error { error } => Some(error),
        }
    }

    /// Short status label: the response code, or `error`.
    pub fn status_label(&self) -> String {
        match &self.outcome {
            HistoryOutcome::Success { response } => response.status.to_string(),
            HistoryOutcome::Error { .. } => "error".to_string(),
        }
    }
}

/// Errors that can occur during history operations.
#[derive(Debug)]
pub enum HistoryError {
    /// Error occurred during storage operations (file I/O).
    ///
    /// Contains the underlying I/O error for detailed diagnostics.
    StorageError(std::io::Error),

    /// Error occurred during serialization or deserialization.
    ///
    /// Contains the underlying serde_json error.
    SerializationError(serde_json::Error),

    /// The history store could not be used.
    Unavailable(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::StorageError(err) => {
                write!(f, "History storage error: {}", err)
            }
            HistoryError::SerializationError(err) => {
                write!(f, "History serialization error: {}", err)
            }
            HistoryError::Unavailable(reason) => {
                write!(f, "History unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::StorageError(err) => Some(err),
            HistoryError::SerializationError(err) => Some(err),
            HistoryError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        HistoryError::StorageError(err)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::SerializationError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use serde_json::json;

    fn create_test_request() -> RequestConfig {
        RequestConfig::new(HttpMethod::GET, "https://api.example.com/users")
            .with_header("Accept", "application/json")
    }

    #[test]
    fn test_success_entry() {
        let response = RequestResponse::new(200, "OK").with_data(json!({"id": 1}));
        let entry = HistoryEntry::success(create_test_request(), response.clone());

        assert!(!entry.id.is_empty());
        assert!(entry.is_success());
        assert_eq!(entry.response(), Some(&response));
        assert!(entry.error().is_none());
        assert_eq!(entry.status_label(), "200");
    }

    #[test]
    fn test_failure_entry() {
        let error = RequestError::network("connection refused");
        let entry = HistoryEntry::failure(create_test_request(), error.clone());

        assert!(!entry.is_success());
        assert_eq!(entry.error(), Some(&error));
        assert_eq!(entry.status_label(), "error");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = HistoryEntry::success(create_test_request(), RequestResponse::new(200, "OK"));
        let b = HistoryEntry::success(create_test_request(), RequestResponse::new(200, "OK"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialization_shape() {
        let entry = HistoryEntry::failure(
            create_test_request(),
            RequestError::http_status(404, Some(json!({"message": "missing"}))),
        );

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["code"], 404);
        assert_eq!(value["request"]["method"], "GET");

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, entry);
    }

    #[test]
    fn test_history_error_display() {
        let io_error = HistoryError::StorageError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(format!("{}", io_error).contains("storage error"));

        let unavailable = HistoryError::Unavailable("lock poisoned".to_string());
        assert!(format!("{}", unavailable).contains("lock poisoned"));
    }
}
