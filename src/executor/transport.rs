//! HTTP transport backed by reqwest.
//!
//! The pipeline talks to the network only through the [`Transport`] trait, so
//! tests and embedders can substitute their own implementation.

use super::error::RequestError;
use super::transform::{RequestData, TransportOptions};
use crate::config::RestClientConfig;
use crate::models::{decode_body, RequestResponse, ScalarMap, ScalarValue};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Executes transport call options against a server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the call.
    ///
    /// Returns the response for 2xx statuses. Any other status is reported as
    /// an `HttpStatus` error carrying the status code and decoded body.
    async fn execute(&self, options: TransportOptions) -> Result<RequestResponse, RequestError>;
}

/// [`Transport`] implementation using a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds the underlying client from the redirect, TLS and user-agent
    /// settings.
    pub fn new(settings: &RestClientConfig) -> Result<Self, RequestError> {
        let redirect = if settings.follow_redirects {
            reqwest::redirect::Policy::limited(settings.max_redirects as usize)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = reqwest::Client::builder()
            .redirect(redirect)
            .danger_accept_invalid_certs(!settings.validate_ssl)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| RequestError::build(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, options: TransportOptions) -> Result<RequestResponse, RequestError> {
        let method = reqwest::Method::from_bytes(options.method.to_ascii_uppercase().as_bytes())
            .map_err(|e| RequestError::build(format!("Invalid method {}: {}", options.method, e)))?;

        let mut req_builder = self
            .client
            .request(method, options.url.as_str())
            .timeout(Duration::from_millis(options.timeout_ms));

        if !options.params.is_empty() {
            req_builder = req_builder.query(&options.params);
        }

        let is_multipart = matches!(options.data, Some(RequestData::FormData(_)));
        for (name, value) in &options.headers {
            // reqwest supplies the multipart content type with its boundary.
            if is_multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        if let Some(credentials) = &options.basic_auth {
            req_builder = req_builder.basic_auth(&credentials.username, Some(&credentials.password));
        }

        req_builder = match options.data {
            None => req_builder,
            Some(RequestData::Json(value)) => req_builder.json(&value),
            Some(RequestData::FormData(fields)) => {
                let form = fields
                    .into_iter()
                    .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                        form.text(name, value)
                    });
                req_builder.multipart(form)
            }
            Some(RequestData::UrlEncoded(fields)) => req_builder.form(&fields),
            Some(RequestData::Text(text)) => req_builder.body(text),
            Some(RequestData::Binary(bytes)) => req_builder.body(bytes),
        };

        let start_time = Instant::now();
        let response = req_builder.send().await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();

        let headers = collect_headers(response.headers());

        let body = response.bytes().await?;
        let elapsed = start_time.elapsed().as_millis() as u64;

        if !status.is_success() {
            return Err(RequestError::http_status(
                status.as_u16(),
                Some(decode_body(&body)),
            ));
        }

        Ok(RequestResponse {
            status: status.as_u16(),
            status_text,
            headers,
            data: decode_body(&body),
            time: elapsed,
            size: body.len(),
        })
    }
}

/// Flattens response headers, joining repeated values with `", "`.
///
/// Values that are not valid visible ASCII are skipped.
fn collect_headers(map: &reqwest::header::HeaderMap) -> ScalarMap {
    let mut headers = ScalarMap::new();
    for name in map.keys() {
        let values: Vec<&str> = map
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        if !values.is_empty() {
            headers.insert(
                name.as_str().to_string(),
                ScalarValue::String(values.join(", ")),
            );
        }
    }
    headers
}
