//! Logging hooks.

use super::{ErrorInterceptor, RequestInterceptor, RequestOutcome, ResponseInterceptor};
use crate::executor::RequestError;
use crate::models::{RequestConfig, RequestResponse};
use async_trait::async_trait;

/// Logs every request, response and error. Passes payloads through
/// unchanged.
///
/// Header values are never logged since they may carry credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor;

#[async_trait]
impl RequestInterceptor for LoggingInterceptor {
    async fn on_request(&self, config: RequestConfig) -> Result<RequestOutcome, RequestError> {
        log::info!("Request: {} {}", config.method, config.url);
        if let Some(body) = &config.body {
            log::debug!("Request body type: {}", body.kind());
        }
        Ok(RequestOutcome::Proceed(config))
    }
}

#[async_trait]
impl ResponseInterceptor for LoggingInterceptor {
    async fn on_response(
        &self,
        response: RequestResponse,
        config: &RequestConfig,
    ) -> Result<RequestResponse, RequestError> {
        log::info!(
            "Response: {} {} -> {} {} ({} ms, {} bytes)",
            config.method,
            config.url,
            response.status,
            response.status_text,
            response.time,
            response.size
        );
        Ok(response)
    }
}

#[async_trait]
impl ErrorInterceptor for LoggingInterceptor {
    async fn on_error(
        &self,
        error: RequestError,
        config: &RequestConfig,
    ) -> Result<RequestError, RequestError> {
        log::error!("Request failed: {} {}: {}", config.method, config.url, error);
        Ok(error)
    }
}
