//! Thunder Client collection import.
//!
//! Thunder Client exports use `collectionName`, `_id` request ids, headers as
//! a list of `{name, value, isDisabled}` (or a flat map), bodies as
//! `{type, raw}` and only bearer auth. Header values may hold `{{variable}}`
//! placeholders; the braces are stripped on import.

use super::{Collection, CollectionError, SavedRequest};
use crate::models::{AuthConfig, RequestBody, ScalarMap, ScalarValue};
use crate::validation::parse_method;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("Failed to compile placeholder regex")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThunderCollection {
    #[serde(alias = "name")]
    pub collection_name: String,
    pub requests: Vec<ThunderRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThunderRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Option<ThunderHeaders>,
    #[serde(default)]
    pub params: Vec<ThunderPair>,
    #[serde(default)]
    pub body: Option<ThunderBody>,
    #[serde(default)]
    pub auth: Option<ThunderAuth>,
}

/// Headers either as a list of pairs or as a flat map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ThunderHeaders {
    List(Vec<ThunderPair>),
    Map(ScalarMap),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThunderPair {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub is_disabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct ThunderBody {
    #[serde(rename = "type", default)]
    pub body_type: String,
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub form: Vec<ThunderPair>,
}

#[derive(Debug, Deserialize)]
pub struct ThunderAuth {
    #[serde(rename = "type", default)]
    pub auth_type: String,
    #[serde(default, alias = "token")]
    pub bearer: Option<String>,
}

impl ThunderCollection {
    /// Converts to the native collection shape.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidRequest` for unknown HTTP methods.
    pub fn into_collection(self) -> Result<Collection, CollectionError> {
        let requests = self
            .requests
            .into_iter()
            .map(ThunderRequest::into_saved_request)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Collection {
            name: self.collection_name,
            requests,
        })
    }
}

impl ThunderRequest {
    fn into_saved_request(self) -> Result<SavedRequest, CollectionError> {
        let method = parse_method(&self.method).map_err(|e| CollectionError::InvalidRequest {
            name: self.name.clone(),
            reason: e.to_string(),
        })?;

        let headers = match self.headers {
            Some(ThunderHeaders::List(pairs)) => pairs_to_map(pairs, strip_placeholders),
            Some(ThunderHeaders::Map(map)) => map
                .into_iter()
                .map(|(name, value)| match value {
                    ScalarValue::String(s) => (name, ScalarValue::String(strip_placeholders(&s))),
                    other => (name, other),
                })
                .collect(),
            None => ScalarMap::new(),
        };

        let params = if self.params.is_empty() {
            None
        } else {
            Some(pairs_to_map(self.params, |v| v.to_string()))
        };

        Ok(SavedRequest {
            id: self.id,
            name: self.name,
            method,
            url: self.url,
            headers,
            body: self.body.and_then(convert_body),
            auth: self.auth.and_then(convert_auth),
            params,
        })
    }
}

/// Removes `{{` `}}` markers, keeping the variable name.
///
/// # Examples
///
/// ```
/// use rest_client_pipeline::collection::thunder::strip_placeholders;
///
/// assert_eq!(strip_placeholders("Bearer {{ token }}"), "Bearer token");
/// ```
pub fn strip_placeholders(value: &str) -> String {
    PLACEHOLDER_REGEX.replace_all(value, "$1").into_owned()
}

fn pairs_to_map(pairs: Vec<ThunderPair>, clean: impl Fn(&str) -> String) -> ScalarMap {
    pairs
        .into_iter()
        .filter(|pair| !pair.is_disabled && !pair.name.is_empty())
        .map(|pair| (pair.name, ScalarValue::String(clean(&pair.value))))
        .collect()
}

fn convert_body(body: ThunderBody) -> Option<RequestBody> {
    match body.body_type.to_ascii_lowercase().as_str() {
        "json" => Some(match serde_json::from_str(&body.raw) {
            Ok(value) => RequestBody::Json(value),
            Err(_) => RequestBody::Text(body.raw),
        }),
        "xml" => Some(RequestBody::Xml(body.raw)),
        "text" => Some(RequestBody::Text(body.raw)),
        "formencoded" => {
            let fields: ScalarMap = if body.form.is_empty() {
                url::form_urlencoded::parse(body.raw.as_bytes())
                    .map(|(k, v)| (k.into_owned(), ScalarValue::String(v.into_owned())))
                    .collect()
            } else {
                pairs_to_map(body.form, |v| v.to_string())
            };
            Some(RequestBody::UrlEncoded(fields))
        }
        _ => None,
    }
}

fn convert_auth(auth: ThunderAuth) -> Option<AuthConfig> {
    match (auth.auth_type.to_ascii_lowercase().as_str(), auth.bearer) {
        ("bearer", Some(token)) => Some(AuthConfig::Bearer {
            token: strip_placeholders(&token),
        }),
        ("none", _) => Some(AuthConfig::None),
        _ => None,
    }
}
