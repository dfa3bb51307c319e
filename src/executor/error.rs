//! HTTP request execution error types.
//!
//! This module defines the error produced when a dispatch fails, whether the
//! request was rejected before sending, the transport failed, or the server
//! answered with a non-success status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a request failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// The request description was rejected before dispatch.
    Validation,

    /// Network error occurred during request execution.
    ///
    /// This includes connection failures, DNS resolution errors,
    /// and other network-level issues.
    Network,

    /// Request timed out before completion.
    Timeout,

    /// TLS/SSL error occurred during HTTPS connection.
    Tls,

    /// The server answered with a non-2xx status.
    HttpStatus,

    /// The transport could not build the request from its options.
    Build,

    /// Any other failure during orchestration.
    Unexpected,
}

/// Machine-readable error code: an HTTP status or a symbolic code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(n) => write!(f, "{}", n),
            ErrorCode::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Errors that can occur during HTTP request execution.
///
/// Carries a human-readable message plus optional code and response-body
/// details so users can diagnose failed requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestError {
    pub kind: ErrorKind,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,

    /// Response body of a failed request, when the server sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl RequestError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            details: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message).with_code(ErrorCode::Text("ETIMEDOUT".to_string()))
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Build, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Creates the error for a response with a non-success status.
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code, kept as the error code
    /// * `details` - Decoded response body, if any
    pub fn http_status(status: u16, details: Option<serde_json::Value>) -> Self {
        Self {
            kind: ErrorKind::HttpStatus,
            message: format!("Request failed with status code {}", status),
            code: Some(ErrorCode::Number(i64::from(status))),
            details: details.filter(|d| !d.is_null()),
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Returns the HTTP status code for `HttpStatus` errors.
    pub fn status(&self) -> Option<u16> {
        match (&self.kind, &self.code) {
            (ErrorKind::HttpStatus, Some(ErrorCode::Number(n))) => u16::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Validation => write!(f, "Invalid request: {}", self.message),
            ErrorKind::Network => write!(f, "Network error: {}", self.message),
            ErrorKind::Timeout => write!(f, "Request timed out: {}", self.message),
            ErrorKind::Tls => write!(f, "TLS/SSL error: {}", self.message),
            ErrorKind::HttpStatus => write!(f, "{}", self.message),
            ErrorKind::Build => write!(f, "Request build error: {}", self.message),
            ErrorKind::Unexpected => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RequestError {}

/// Convert reqwest errors to RequestError.
///
/// Maps reqwest's error types to our error kinds for consistent
/// error handling throughout the pipeline.
impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            RequestError::timeout(message)
        } else if err.is_builder() {
            RequestError::build(message)
        } else if let Some(status) = err.status() {
            RequestError::http_status(status.as_u16(), None)
        } else if message.contains("certificate") || message.contains("TLS") || message.contains("SSL")
        {
            RequestError::new(ErrorKind::Tls, message)
        } else {
            RequestError::network(message)
        }
    }
}

/// Convert URL parsing errors to RequestError.
impl From<url::ParseError> for RequestError {
    fn from(err: url::ParseError) -> Self {
        RequestError::validation(format!("Invalid URL: {}", err))
    }
}
