//! Cache key derivation.
//!
//! The key is `method|url|params|headers|body|auth`, each optional part
//! rendered as canonical JSON (object keys sorted at every depth, `null` when
//! absent), so it depends only on field values and never on map ordering.

use crate::models::RequestConfig;
use serde::Serialize;
use serde_json::Value;

const SEPARATOR: &str = "|";

/// Derives the cache key of a request.
///
/// # Examples
///
/// ```
/// use rest_client_pipeline::cache::cache_key;
/// use rest_client_pipeline::models::{HttpMethod, RequestConfig};
///
/// let config = RequestConfig::new(HttpMethod::GET, "https://api.example.com/users");
/// assert_eq!(
///     cache_key(&config),
///     "GET|https://api.example.com/users|null|null|null|null"
/// );
/// ```
pub fn cache_key(config: &RequestConfig) -> String {
    [
        config.method.as_str().to_string(),
        config.url.clone(),
        canonical_part(&config.params),
        canonical_part(&config.headers),
        canonical_part(&config.body),
        canonical_part(&config.auth),
    ]
    .join(SEPARATOR)
}

fn canonical_part<T: Serialize>(part: &Option<T>) -> String {
    let value = part
        .as_ref()
        .and_then(|p| serde_json::to_value(p).ok())
        .unwrap_or(Value::Null);
    let mut out = String::new();
    write_canonical(&value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
