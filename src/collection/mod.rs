//! Request collections.
//!
//! A collection is a named group of saved requests, stored as JSON:
//!
//! ```json
//! {
//!   "name": "Users API",
//!   "requests": [
//!     { "id": "1", "name": "List users", "method": "GET",
//!       "url": "https://api.example.com/users", "headers": {} }
//!   ]
//! }
//! ```
//!
//! Import also accepts the export format of a popular third-party REST
//! client (see [`thunder`]), converting it into the native shape.

pub mod thunder;

use crate::models::{AuthConfig, HttpMethod, RequestBody, RequestConfig, ScalarMap};
use crate::validation::parse_method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A named group of saved requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub requests: Vec<SavedRequest>,
}

/// A request saved in a collection.
///
/// Method names are read case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest")]
pub struct SavedRequest {
    pub id: String,
    pub name: String,
    pub method: HttpMethod,
    pub url: String,

    pub headers: ScalarMap,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ScalarMap>,
}

/// Native request as written, before the method is checked.
#[derive(Deserialize)]
struct RawRequest {
    id: String,
    name: String,
    method: String,
    url: String,
    #[serde(default)]
    headers: ScalarMap,
    #[serde(default)]
    body: Option<RequestBody>,
    #[serde(default)]
    auth: Option<AuthConfig>,
    #[serde(default)]
    params: Option<ScalarMap>,
}

#[derive(Deserialize)]
struct RawCollection {
    name: String,
    requests: Vec<RawRequest>,
}

impl TryFrom<RawRequest> for SavedRequest {
    type Error = CollectionError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let method = parse_method(&raw.method).map_err(|e| CollectionError::InvalidRequest {
            name: raw.name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            id: raw.id,
            name: raw.name,
            method,
            url: raw.url,
            headers: raw.headers,
            body: raw.body,
            auth: raw.auth,
            params: raw.params,
        })
    }
}

impl SavedRequest {
    /// Saves a request under a new id.
    pub fn from_request_config(name: impl Into<String>, config: &RequestConfig) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            method: config.method,
            url: config.url.clone(),
            headers: config.headers.clone().unwrap_or_default(),
            body: config.body.clone(),
            auth: config.auth.clone(),
            params: config.params.clone(),
        }
    }

    /// Builds a dispatchable request from the saved one.
    pub fn to_request_config(&self) -> RequestConfig {
        RequestConfig {
            method: self.method,
            url: self.url.clone(),
            params: self.params.clone(),
            headers: if self.headers.is_empty() {
                None
            } else {
                Some(self.headers.clone())
            },
            body: self.body.clone(),
            auth: self.auth.clone(),
            timeout: None,
        }
    }
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requests: Vec::new(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&SavedRequest> {
        self.requests.iter().find(|r| r.id == id)
    }
}

/// Errors that can occur while importing or exporting collections.
#[derive(Debug)]
pub enum CollectionError {
    /// Reading or writing a collection file failed.
    Io(std::io::Error),

    /// The document is not valid JSON.
    Json(serde_json::Error),

    /// Valid JSON in neither supported collection shape.
    UnrecognizedFormat,

    /// A request in the document could not be converted.
    InvalidRequest {
        /// Name of the offending request
        name: String,
        reason: String,
    },
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::Io(err) => write!(f, "Collection I/O error: {}", err),
            CollectionError::Json(err) => write!(f, "Invalid collection JSON: {}", err),
            CollectionError::UnrecognizedFormat => {
                write!(f, "Unrecognized collection format")
            }
            CollectionError::InvalidRequest { name, reason } => {
                write!(f, "Invalid request '{}' in collection: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectionError::Io(err) => Some(err),
            CollectionError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CollectionError {
    fn from(err: std::io::Error) -> Self {
        CollectionError::Io(err)
    }
}

impl From<serde_json::Error> for CollectionError {
    fn from(err: serde_json::Error) -> Self {
        CollectionError::Json(err)
    }
}

/// Imports a collection from JSON.
///
/// The native shape is tried first, then the third-party shape.
///
/// # Errors
///
/// Returns `CollectionError::Json` for malformed JSON and
/// `CollectionError::UnrecognizedFormat` when neither shape matches.
pub fn import_collection(json: &str) -> Result<Collection, CollectionError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    if let Ok(raw) = serde_json::from_value::<RawCollection>(value.clone()) {
        let requests = raw
            .requests
            .into_iter()
            .map(SavedRequest::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let collection = Collection {
            name: raw.name,
            requests,
        };
        log::debug!(
            "Imported collection '{}' ({} requests)",
            collection.name,
            collection.requests.len()
        );
        return Ok(collection);
    }

    match serde_json::from_value::<thunder::ThunderCollection>(value) {
        Ok(external) => {
            let collection = external.into_collection()?;
            log::info!(
                "Imported third-party collection '{}' ({} requests)",
                collection.name,
                collection.requests.len()
            );
            Ok(collection)
        }
        Err(e) => {
            log::warn!("Collection matches no known format: {}", e);
            Err(CollectionError::UnrecognizedFormat)
        }
    }
}

/// Exports a collection as pretty-printed native JSON.
pub fn export_collection(collection: &Collection) -> Result<String, CollectionError> {
    Ok(serde_json::to_string_pretty(collection)?)
}

/// Reads and imports a collection file.
pub fn load_collection(path: &Path) -> Result<Collection, CollectionError> {
    let content = std::fs::read_to_string(path)?;
    import_collection(&content)
}

/// Writes a collection file in the native shape.
pub fn save_collection(collection: &Collection, path: &Path) -> Result<(), CollectionError> {
    std::fs::write(path, export_collection(collection)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Collection {
        let create = RequestConfig::new(HttpMethod::POST, "https://api.example.com/users")
            .with_header("Content-Type", "application/json")
            .with_body(RequestBody::Json(json!({"name": "Ada"})))
            .with_auth(AuthConfig::Bearer {
                token: "secret".to_string(),
            });

        let mut collection = Collection::new("Users API");
        collection.requests.push(SavedRequest::from_request_config(
            "List users",
            &RequestConfig::new(HttpMethod::GET, "https://api.example.com/users")
                .with_param("page", 1i64),
        ));
        collection
            .requests
            .push(SavedRequest::from_request_config("Create user", &create));
        collection
    }

    #[test]
    fn test_import_native() {
        let json = r#"{
            "name": "Native",
            "requests": [
                {
                    "id": "r1",
                    "name": "Health",
                    "method": "GET",
                    "url": "https://api.example.com/health",
                    "headers": {"Accept": "application/json"},
                    "auth": {"type": "basic", "username": "u", "password": "p"}
                }
            ]
        }"#;

        let collection = import_collection(json).unwrap();
        assert_eq!(collection.name, "Native");
        let request = collection.find("r1").unwrap();
        assert_eq!(request.method, HttpMethod::GET);
        assert_eq!(request.headers["Accept"].to_string(), "application/json");
        assert!(matches!(request.auth, Some(AuthConfig::Basic { .. })));
    }

    #[test]
    fn test_import_native_lowercase_method() {
        let json = r#"{
            "name": "N",
            "requests": [
                {"id": "1", "name": "a", "method": "get", "url": "https://api.example.com"},
                {"id": "2", "name": "b", "method": " Patch ", "url": "https://api.example.com"}
            ]
        }"#;

        let collection = import_collection(json).unwrap();
        assert_eq!(collection.requests[0].method, HttpMethod::GET);
        assert_eq!(collection.requests[1].method, HttpMethod::PATCH);
    }

    #[test]
    fn test_import_native_unknown_method_names_request() {
        let json = r#"{
            "name": "N",
            "requests": [
                {"id": "1", "name": "ok", "method": "GET", "url": "https://api.example.com"},
                {"id": "2", "name": "Brew coffee", "method": "BREW", "url": "https://api.example.com"}
            ]
        }"#;

        match import_collection(json) {
            Err(CollectionError::InvalidRequest { name, reason }) => {
                assert_eq!(name, "Brew coffee");
                assert!(reason.contains("BREW"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_export_then_import_preserves_collection() {
        let collection = sample();
        let exported = export_collection(&collection).unwrap();
        assert_eq!(import_collection(&exported).unwrap(), collection);
    }

    #[test]
    fn test_to_request_config() {
        let collection = sample();
        let create = collection.requests[1].to_request_config();
        assert_eq!(create.method, HttpMethod::POST);
        assert_eq!(create.body, Some(RequestBody::Json(json!({"name": "Ada"}))));
        assert!(create.header("content-type").is_some());

        let list = collection.requests[0].to_request_config();
        assert!(list.headers.is_none());
        assert_eq!(list.params.unwrap()["page"].to_string(), "1");
    }

    #[test]
    fn test_unrecognized_and_malformed() {
        assert!(matches!(
            import_collection(r#"{"title": "nope"}"#),
            Err(CollectionError::UnrecognizedFormat)
        ));
        assert!(matches!(
            import_collection("{not json"),
            Err(CollectionError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");

        let collection = sample();
        save_collection(&collection, &path).unwrap();
        assert_eq!(load_collection(&path).unwrap(), collection);

        assert!(matches!(
            load_collection(&temp_dir.path().join("missing.json")),
            Err(CollectionError::Io(_))
        ));
    }
}
