//! Cache lookup and store hooks.

use super::{RequestInterceptor, RequestOutcome, ResponseInterceptor};
use crate::cache::CacheService;
use crate::executor::RequestError;
use crate::models::{RequestConfig, RequestResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Serves fresh cached responses before dispatch and stores successful
/// responses after it.
#[derive(Debug, Clone)]
pub struct CacheInterceptor {
    cache: Arc<CacheService>,
}

impl CacheInterceptor {
    pub fn new(cache: Arc<CacheService>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl RequestInterceptor for CacheInterceptor {
    async fn on_request(&self, config: RequestConfig) -> Result<RequestOutcome, RequestError> {
        match self.cache.get(&config) {
            Some(response) => {
                log::debug!("Cache hit: {} {}", config.method, config.url);
                Ok(RequestOutcome::CacheHit(response))
            }
            None => Ok(RequestOutcome::Proceed(config)),
        }
    }
}

#[async_trait]
impl ResponseInterceptor for CacheInterceptor {
    async fn on_response(
        &self,
        response: RequestResponse,
        config: &RequestConfig,
    ) -> Result<RequestResponse, RequestError> {
        if response.is_success() {
            self.cache.set(config, &response);
        }
        Ok(response)
    }
}
