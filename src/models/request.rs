//! HTTP request data models.
//!
//! This module defines the declarative request description that flows through
//! the dispatch pipeline: the method, URL, query parameters, headers, body and
//! authentication settings of a single request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP request method.
///
/// The fixed set of verbs a request can be composed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    /// Returns the lower-case form used by the transport layer.
    pub fn as_lowercase(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    /// Parses a string into an HttpMethod.
    ///
    /// # Arguments
    ///
    /// * `s` - A string slice representing the HTTP method
    ///
    /// # Returns
    ///
    /// `Some(HttpMethod)` if the string is a valid HTTP method, `None` otherwise.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            "HEAD" => Some(HttpMethod::HEAD),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scalar value stored in parameter and header maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Number(n) => write!(f, "{}", n),
            ScalarValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Number(value.into())
    }
}

/// String-keyed map of scalar values, ordered by key.
pub type ScalarMap = BTreeMap<String, ScalarValue>;

/// Request body, tagged by its encoding.
///
/// Serialized as `{"type": "json", "content": {...}}`. Binary content is
/// carried as base64 text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum RequestBody {
    None,
    Json(serde_json::Value),
    FormData(ScalarMap),
    UrlEncoded(ScalarMap),
    Xml(String),
    Text(String),
    Binary(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl RequestBody {
    /// Returns the `Content-Type` this body is sent with.
    ///
    /// `None` and binary bodies carry no explicit content type.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::None | RequestBody::Binary(_) => None,
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::FormData(_) => Some("multipart/form-data"),
            RequestBody::UrlEncoded(_) => Some("application/x-www-form-urlencoded"),
            RequestBody::Xml(_) => Some("application/xml"),
            RequestBody::Text(_) => Some("text/plain"),
        }
    }

    /// The serialized `type` tag of this body.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::None => "none",
            RequestBody::Json(_) => "json",
            RequestBody::FormData(_) => "form-data",
            RequestBody::UrlEncoded(_) => "url-encoded",
            RequestBody::Xml(_) => "xml",
            RequestBody::Text(_) => "text",
            RequestBody::Binary(_) => "binary",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RequestBody::None)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// Authentication settings attached to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    /// No authentication
    None,
    /// HTTP Basic authentication (RFC 7617)
    Basic { username: String, password: String },
    /// Bearer token authentication (RFC 6750)
    Bearer { token: String },
    /// OAuth2 client credentials.
    ///
    /// Modeled for storage and import only; token acquisition is not
    /// performed at dispatch time.
    #[serde(rename = "oauth2", rename_all = "camelCase")]
    OAuth2 {
        client_id: String,
        client_secret: String,
        token_url: String,
        #[serde(default)]
        scopes: Vec<String>,
    },
}

/// A declarative description of an HTTP request.
///
/// Built once by the caller; the pipeline only ever works on copies of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    /// HTTP method (GET, POST, PUT, DELETE, etc.).
    pub method: HttpMethod,

    /// Target URL for the request, passed to the transport unchanged.
    pub url: String,

    /// Query parameters appended to the URL by the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<ScalarMap>,

    /// Request headers as key-value pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<ScalarMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    /// Per-request timeout in milliseconds.
    ///
    /// Overrides the configured default timeout when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl RequestConfig {
    /// Creates a new RequestConfig with no parameters, headers, body or auth.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `url` - Target URL
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: None,
            headers: None,
            body: None,
            auth: None,
            timeout: None,
        }
    }

    /// Adds a query parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.params
            .get_or_insert_with(ScalarMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.headers
            .get_or_insert_with(ScalarMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the per-request timeout in milliseconds.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    /// Checks if the request carries a body other than `none`.
    pub fn has_body(&self) -> bool {
        self.body.as_ref().map_or(false, |b| !b.is_none())
    }

    /// Looks up a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&ScalarValue> {
        self.headers
            .as_ref()?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}
