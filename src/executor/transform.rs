//! Request description to transport options mapping.
//!
//! The transformer is a pure function: it never performs I/O and never fails.
//! Validation happens before it is called.

use crate::config::RestClientConfig;
use crate::models::{AuthConfig, RequestBody, RequestConfig, ScalarMap};
use std::collections::BTreeMap;

/// Request payload handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestData {
    Json(serde_json::Value),
    FormData(BTreeMap<String, String>),
    UrlEncoded(BTreeMap<String, String>),
    Text(String),
    Binary(Vec<u8>),
}

/// Username/password pair applied with the transport's native basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Transport-level call options.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportOptions {
    /// Lower-cased HTTP method.
    pub method: String,
    pub url: String,
    pub params: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub data: Option<RequestData>,
    pub basic_auth: Option<BasicCredentials>,
    /// Effective timeout in milliseconds.
    pub timeout_ms: u64,
}

impl TransportOptions {
    /// Looks up a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Maps a request description to transport call options.
///
/// # Arguments
///
/// * `config` - The request description
/// * `settings` - Settings supplying the default timeout
///
/// # Returns
///
/// The options the transport executes. Body and auth rules are applied on
/// top of the copied headers, so they win over user-supplied values.
pub fn transform_config(config: &RequestConfig, settings: &RestClientConfig) -> TransportOptions {
    let mut options = TransportOptions {
        method: config.method.as_lowercase(),
        url: config.url.clone(),
        params: config.params.as_ref().map(stringify).unwrap_or_default(),
        headers: config.headers.as_ref().map(stringify).unwrap_or_default(),
        data: None,
        basic_auth: None,
        timeout_ms: config.timeout.unwrap_or(settings.timeout),
    };

    if let Some(body) = &config.body {
        apply_body(&mut options, body);
    }

    if let Some(auth) = &config.auth {
        apply_auth(&mut options, auth);
    }

    options
}

fn apply_body(options: &mut TransportOptions, body: &RequestBody) {
    if let Some(content_type) = body.content_type() {
        set_header(&mut options.headers, "Content-Type", content_type.to_string());
    }

    options.data = match body {
        RequestBody::None => None,
        RequestBody::Json(value) => Some(RequestData::Json(value.clone())),
        RequestBody::FormData(fields) => Some(RequestData::FormData(stringify(fields))),
        RequestBody::UrlEncoded(fields) => Some(RequestData::UrlEncoded(stringify(fields))),
        RequestBody::Xml(text) | RequestBody::Text(text) => Some(RequestData::Text(text.clone())),
        RequestBody::Binary(bytes) => Some(RequestData::Binary(bytes.clone())),
    };
}

fn apply_auth(options: &mut TransportOptions, auth: &AuthConfig) {
    match auth {
        AuthConfig::Basic { username, password } => {
            // The transport adds its own Authorization header for these.
            options
                .headers
                .retain(|k, _| !k.eq_ignore_ascii_case("authorization"));
            options.basic_auth = Some(BasicCredentials {
                username: username.clone(),
                password: password.clone(),
            });
        }
        AuthConfig::Bearer { token } => {
            set_header(&mut options.headers, "Authorization", bearer_token(token));
        }
        // OAuth2 token acquisition is not performed at dispatch time.
        AuthConfig::OAuth2 { .. } | AuthConfig::None => {}
    }
}

/// Formats a token into a Bearer authentication header value.
///
/// # Examples
///
/// ```
/// use rest_client_pipeline::executor::transform::bearer_token;
///
/// assert_eq!(bearer_token("abc123xyz"), "Bearer abc123xyz");
/// ```
pub fn bearer_token(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Inserts a header, replacing any existing entry regardless of name case.
fn set_header(headers: &mut BTreeMap<String, String>, name: &str, value: String) {
    headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value);
}

fn stringify(map: &ScalarMap) -> BTreeMap<String, String> {
    map.iter().map(|(k, v)| (k.clone(), v.to_string())).collect()
}
