//! HTTP response data models.
//!
//! This module defines the response snapshot produced by a successful dispatch:
//! status information, headers, the decoded body, and timing/size metrics.

use super::request::{ScalarMap, ScalarValue};
use serde::{Deserialize, Serialize};

/// Represents an HTTP response received from a server.
///
/// Created once per successful dispatch and never mutated afterwards; the
/// cache and the history keep their own clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status: u16,

    /// HTTP status text (e.g., "OK", "Not Found").
    #[serde(default)]
    pub status_text: String,

    /// Response headers as key-value pairs.
    #[serde(default)]
    pub headers: ScalarMap,

    /// Decoded response body.
    ///
    /// JSON bodies are kept as parsed values; anything else is kept as a
    /// string. An empty body is `null`.
    #[serde(default)]
    pub data: serde_json::Value,

    /// Elapsed time of the dispatch in milliseconds.
    #[serde(default)]
    pub time: u64,

    /// Size of the response body in bytes.
    #[serde(default)]
    pub size: usize,
}

impl RequestResponse {
    /// Creates a new RequestResponse with the given status code and text.
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code
    /// * `status_text` - HTTP status text description
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: ScalarMap::new(),
            data: serde_json::Value::Null,
            time: 0,
            size: 0,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the decoded body from raw bytes and records its size.
    pub fn with_raw_body(mut self, bytes: &[u8]) -> Self {
        self.data = decode_body(bytes);
        self.size = bytes.len();
        self
    }

    /// Sets an already decoded body, recording the size of its JSON encoding.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.size = match &data {
            serde_json::Value::Null => 0,
            serde_json::Value::String(s) => s.len(),
            other => other.to_string().len(),
        };
        self.data = data;
        self
    }

    pub fn with_time(mut self, time_ms: u64) -> Self {
        self.time = time_ms;
        self
    }

    /// Checks if the response status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Checks if the response status indicates a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Checks if the response status indicates a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Gets the Content-Type header value if present.
    pub fn content_type(&self) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.to_string())
    }

    /// Returns the body as display text.
    ///
    /// String bodies are returned as-is, JSON bodies are pretty-printed.
    pub fn body_text(&self) -> String {
        match &self.data {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}

/// Decodes a raw response body.
///
/// Bodies that parse as JSON become JSON values, everything else becomes a
/// (lossily decoded) UTF-8 string.
pub fn decode_body(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value) => value,
        Err(_) => serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_classes() {
        assert!(RequestResponse::new(204, "No Content").is_success());
        assert!(RequestResponse::new(404, "Not Found").is_client_error());
        assert!(RequestResponse::new(503, "Service Unavailable").is_server_error());
        assert!(!RequestResponse::new(301, "Moved").is_success());
    }

    #[test]
    fn test_decode_json_body() {
        let response = RequestResponse::new(200, "OK").with_raw_body(br#"{"id": 1}"#);
        assert_eq!(response.data, json!({"id": 1}));
        assert_eq!(response.size, 9);
    }

    #[test]
    fn test_decode_text_body() {
        let response = RequestResponse::new(200, "OK").with_raw_body(b"<html></html>");
        assert_eq!(response.data, json!("<html></html>"));
        assert_eq!(response.body_text(), "<html></html>");
    }

    #[test]
    fn test_decode_empty_body() {
        assert_eq!(decode_body(b""), serde_json::Value::Null);
        assert_eq!(RequestResponse::new(204, "").body_text(), "");
    }

    #[test]
    fn test_content_type_lookup_is_case_insensitive() {
        let response =
            RequestResponse::new(200, "OK").with_header("content-type", "application/json");
        assert_eq!(response.content_type().as_deref(), Some("application/json"));
    }

    #[test]
    fn test_serialization() {
        let response = RequestResponse::new(201, "Created")
            .with_header("Location", "/users/1")
            .with_data(json!({"id": 1}))
            .with_time(42);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("statusText"));

        let deserialized: RequestResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, response);
    }
}
