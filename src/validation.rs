//! Pre-dispatch request validation.
//!
//! Malformed requests are rejected before they reach the interceptors or the
//! transport. Nothing is coerced: a request is either valid as given or
//! rejected with a [`ValidationError`].

use crate::executor::RequestError;
use crate::models::{AuthConfig, HttpMethod, RequestConfig};
use std::fmt;
use url::Url;

/// Reasons a request is rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Unknown HTTP method.
    InvalidMethod {
        /// The rejected method string
        method: String,
    },

    /// The URL is empty.
    MissingUrl,

    /// The URL could not be parsed.
    InvalidUrl {
        url: String,
        reason: String,
    },

    /// Only http and https are dispatched.
    UnsupportedScheme {
        scheme: String,
    },

    /// An auth configuration is missing a required field.
    InvalidAuth {
        /// Auth type (`basic`, `bearer`, `oauth2`)
        auth_type: &'static str,
        /// The missing or empty field
        field: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidMethod { method } => {
                write!(
                    f,
                    "Invalid HTTP method '{}'. Expected one of: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS",
                    method
                )
            }
            ValidationError::MissingUrl => write!(f, "URL is required"),
            ValidationError::InvalidUrl { url, reason } => {
                write!(f, "Invalid URL '{}': {}", url, reason)
            }
            ValidationError::UnsupportedScheme { scheme } => {
                write!(
                    f,
                    "Unsupported URL scheme '{}'. URL must start with http:// or https://",
                    scheme
                )
            }
            ValidationError::InvalidAuth { auth_type, field } => {
                write!(f, "{} auth requires a non-empty {}", auth_type, field)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for RequestError {
    fn from(err: ValidationError) -> Self {
        RequestError::validation(err.to_string())
    }
}

/// Parses an HTTP method name.
///
/// # Errors
///
/// Returns `ValidationError::InvalidMethod` for unknown verbs.
pub fn parse_method(method: &str) -> Result<HttpMethod, ValidationError> {
    HttpMethod::from_str(method).ok_or_else(|| ValidationError::InvalidMethod {
        method: method.to_string(),
    })
}

/// Checks that a URL is non-empty, parseable and uses http or https.
pub fn validate_url(url: &str) -> Result<Url, ValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|e| ValidationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ValidationError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

fn validate_auth(auth: &AuthConfig) -> Result<(), ValidationError> {
    let missing = |auth_type: &'static str, field: &'static str| -> Result<(), ValidationError> {
        Err(ValidationError::InvalidAuth { auth_type, field })
    };

    match auth {
        AuthConfig::None => Ok(()),
        AuthConfig::Basic { username, .. } if username.is_empty() => missing("basic", "username"),
        AuthConfig::Basic { .. } => Ok(()),
        AuthConfig::Bearer { token } if token.trim().is_empty() => missing("bearer", "token"),
        AuthConfig::Bearer { .. } => Ok(()),
        AuthConfig::OAuth2 { client_id, .. } if client_id.is_empty() => {
            missing("oauth2", "clientId")
        }
        AuthConfig::OAuth2 { token_url, .. } if token_url.is_empty() => {
            missing("oauth2", "tokenUrl")
        }
        AuthConfig::OAuth2 { .. } => Ok(()),
    }
}

/// Validates a request before dispatch.
///
/// # Errors
///
/// Returns the first problem found in the URL or auth configuration.
pub fn validate_request(config: &RequestConfig) -> Result<(), ValidationError> {
    validate_url(&config.url)?;
    if let Some(auth) = &config.auth {
        validate_auth(auth)?;
    }
    Ok(())
}

/// Boolean form of [`validate_request`].
pub fn is_valid_request(config: &RequestConfig) -> bool {
    validate_request(config).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ErrorKind;

    fn get(url: &str) -> RequestConfig {
        RequestConfig::new(HttpMethod::GET, url)
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("get"), Ok(HttpMethod::GET));
        assert_eq!(parse_method(" PATCH "), Ok(HttpMethod::PATCH));
        assert_eq!(
            parse_method("TRACE"),
            Err(ValidationError::InvalidMethod {
                method: "TRACE".to_string()
            })
        );
    }

    #[test]
    fn test_valid_request() {
        assert!(is_valid_request(&get("https://api.example.com/users?page=1")));
        assert!(is_valid_request(&get("http://localhost:8080")));
    }

    #[test]
    fn test_invalid_urls() {
        assert_eq!(validate_request(&get("  ")), Err(ValidationError::MissingUrl));
        assert!(matches!(
            validate_request(&get("not a url")),
            Err(ValidationError::InvalidUrl { .. })
        ));
        assert_eq!(
            validate_request(&get("ftp://files.example.com")),
            Err(ValidationError::UnsupportedScheme {
                scheme: "ftp".to_string()
            })
        );
    }

    #[test]
    fn test_auth_validation() {
        let base = get("https://api.example.com");

        let basic = base.clone().with_auth(AuthConfig::Basic {
            username: String::new(),
            password: "pw".to_string(),
        });
        assert_eq!(
            validate_request(&basic),
            Err(ValidationError::InvalidAuth {
                auth_type: "basic",
                field: "username"
            })
        );

        let bearer = base.clone().with_auth(AuthConfig::Bearer {
            token: " ".to_string(),
        });
        assert!(!is_valid_request(&bearer));

        let oauth = base.clone().with_auth(AuthConfig::OAuth2 {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            token_url: String::new(),
            scopes: vec![],
        });
        assert_eq!(
            validate_request(&oauth),
            Err(ValidationError::InvalidAuth {
                auth_type: "oauth2",
                field: "tokenUrl"
            })
        );

        assert!(is_valid_request(&base.with_auth(AuthConfig::None)));
    }

    #[test]
    fn test_into_request_error() {
        let err: RequestError = ValidationError::MissingUrl.into();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "URL is required");
    }
}
