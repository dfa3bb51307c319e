//! The request client.
//!
//! [`RequestClient`] wires the pipeline together around an injected
//! transport:
//!
//! 1. Validate the request
//! 2. Run the request hooks (logging, user hooks, then the cache lookup)
//! 3. Transform the request into transport options
//! 4. Execute it
//! 5. Run the response hooks (logging, then cache store), or the error hooks
//! 6. Record the outcome in history
//!
//! Cache hits return immediately and are not recorded. Validation failures
//! are returned before any hook runs and are not recorded either.

use crate::cache::CacheService;
use crate::config::SettingsHandle;
use crate::executor::{transform_config, ReqwestTransport, RequestError, Transport};
use crate::history::{HistoryManager, HistoryStore};
use crate::interceptors::{InterceptorChain, RequestOutcome};
use crate::models::{RequestConfig, RequestResponse};
use crate::retry::{retry_with, RetryPolicy, Sleeper, TokioSleeper};
use crate::validation::validate_request;
use std::sync::Arc;

pub struct RequestClient {
    settings: SettingsHandle,
    transport: Arc<dyn Transport>,
    interceptors: Arc<InterceptorChain>,
    cache: Arc<CacheService>,
    history: Arc<HistoryManager>,
    sleeper: Arc<dyn Sleeper>,
}

impl RequestClient {
    /// Creates a client from its collaborators.
    ///
    /// The interceptor chain starts with the default logging and caching
    /// hooks bound to `cache`.
    pub fn new(
        settings: SettingsHandle,
        transport: Arc<dyn Transport>,
        cache: Arc<CacheService>,
        history: Arc<HistoryManager>,
    ) -> Self {
        let interceptors = Arc::new(InterceptorChain::with_defaults(cache.clone()));
        Self {
            settings,
            transport,
            interceptors,
            cache,
            history,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Creates a client with a reqwest transport, a fresh cache and a
    /// history manager persisting to `store`.
    ///
    /// # Errors
    ///
    /// Returns a `Build` error if the HTTP client cannot be constructed.
    pub fn from_settings(
        settings: SettingsHandle,
        store: Box<dyn HistoryStore>,
    ) -> Result<Self, RequestError> {
        let transport = Arc::new(ReqwestTransport::new(&settings.get())?);
        let cache = Arc::new(CacheService::new(settings.clone()));
        let history = Arc::new(HistoryManager::new(settings.clone(), store));
        Ok(Self::new(settings, transport, cache, history))
    }

    /// Replaces the sleeper used between retry attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Sends a request through the pipeline.
    ///
    /// # Returns
    ///
    /// The (possibly cached) response, or the error after the error hooks ran.
    pub async fn send_request(&self, config: RequestConfig) -> Result<RequestResponse, RequestError> {
        validate_request(&config)?;

        let prepared = match self.interceptors.intercept_request(config.clone()).await {
            Ok(RequestOutcome::CacheHit(response)) => return Ok(response),
            Ok(RequestOutcome::Proceed(prepared)) => prepared,
            Err(error) => return Err(self.fail(&config, &config, error).await),
        };

        let options = transform_config(&prepared, &self.settings.get());
        let result = match self.transport.execute(options).await {
            Ok(response) => self.interceptors.intercept_response(response, &prepared).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(response) => {
                self.history.add_successful_request(&config, &response);
                Ok(response)
            }
            Err(error) => Err(self.fail(&config, &prepared, error).await),
        }
    }

    /// Sends a request, retrying every failure according to `policy`.
    ///
    /// Each attempt goes through the full pipeline, so each failed attempt
    /// is recorded in history.
    pub async fn retry_request(
        &self,
        config: RequestConfig,
        policy: RetryPolicy,
    ) -> Result<RequestResponse, RequestError> {
        retry_with(&policy, self.sleeper.as_ref(), |_attempt| {
            self.send_request(config.clone())
        })
        .await
    }

    async fn fail(
        &self,
        original: &RequestConfig,
        prepared: &RequestConfig,
        error: RequestError,
    ) -> RequestError {
        let error = match self.interceptors.intercept_error(error, prepared).await {
            Ok(error) | Err(error) => error,
        };
        self.history.add_failed_request(original, &error);
        error
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn interceptors(&self) -> &InterceptorChain {
        &self.interceptors
    }

    pub fn cache(&self) -> &Arc<CacheService> {
        &self.cache
    }

    pub fn history(&self) -> &Arc<HistoryManager> {
        &self.history
    }
}

impl std::fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("interceptors", &self.interceptors)
            .field("cache", &self.cache)
            .field("history", &self.history)
            .finish()
    }
}
