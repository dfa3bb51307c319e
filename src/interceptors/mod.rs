//! Request, response and error hooks around dispatch.
//!
//! An [`InterceptorChain`] holds three ordered hook lists. Each list is folded
//! in registration order, every hook receiving the previous hook's output.
//! A request hook may end the fold early with [`RequestOutcome::CacheHit`],
//! which callers treat as a successful response that skips the transport.
//!
//! Final request hooks run after every regular request hook. The default
//! cache lookup is one, so it keys on the request as it will be dispatched,
//! which is also the request the response stage stores under.
//!
//! # Example
//!
//! ```
//! use rest_client_pipeline::interceptors::{FnInterceptor, InterceptorChain, RequestOutcome};
//! use rest_client_pipeline::models::{HttpMethod, RequestConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let chain = InterceptorChain::new();
//! chain.add_request_interceptor(Arc::new(FnInterceptor::request(|config: RequestConfig| {
//!     Ok(RequestOutcome::Proceed(config.with_header("X-Trace", "1")))
//! })));
//!
//! let config = RequestConfig::new(HttpMethod::GET, "https://api.example.com");
//! match chain.intercept_request(config).await.unwrap() {
//!     RequestOutcome::Proceed(config) => {
//!         assert_eq!(config.header("x-trace").map(|v| v.to_string()), Some("1".to_string()));
//!     }
//!     RequestOutcome::CacheHit(_) => unreachable!(),
//! }
//! # }
//! ```

pub mod cache;
pub mod logging;

pub use cache::CacheInterceptor;
pub use logging::LoggingInterceptor;

use crate::cache::CacheService;
use crate::executor::RequestError;
use crate::models::{RequestConfig, RequestResponse};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Result of the request stage.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// Continue with this (possibly rewritten) request.
    Proceed(RequestConfig),
    /// A cached response satisfies the request; skip dispatch.
    CacheHit(RequestResponse),
}

/// Hook run before dispatch.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn on_request(&self, config: RequestConfig) -> Result<RequestOutcome, RequestError>;
}

/// Hook run after a successful dispatch.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    async fn on_response(
        &self,
        response: RequestResponse,
        config: &RequestConfig,
    ) -> Result<RequestResponse, RequestError>;
}

/// Hook run after a failed dispatch.
///
/// `Ok` passes the (possibly rewritten) error on to the next hook; `Err` stops
/// the chain and replaces the error.
#[async_trait]
pub trait ErrorInterceptor: Send + Sync {
    async fn on_error(
        &self,
        error: RequestError,
        config: &RequestConfig,
    ) -> Result<RequestError, RequestError>;
}

/// Adapts a plain closure into a hook.
///
/// Use [`FnInterceptor::request`], [`FnInterceptor::response`] or
/// [`FnInterceptor::error`] so the closure signature is inferred.
pub struct FnInterceptor<F> {
    f: F,
}

impl<F> FnInterceptor<F> {
    pub fn request(f: F) -> Self
    where
        F: Fn(RequestConfig) -> Result<RequestOutcome, RequestError> + Send + Sync,
    {
        Self { f }
    }

    pub fn response(f: F) -> Self
    where
        F: Fn(RequestResponse, &RequestConfig) -> Result<RequestResponse, RequestError>
            + Send
            + Sync,
    {
        Self { f }
    }

    pub fn error(f: F) -> Self
    where
        F: Fn(RequestError, &RequestConfig) -> Result<RequestError, RequestError> + Send + Sync,
    {
        Self { f }
    }
}

#[async_trait]
impl<F> RequestInterceptor for FnInterceptor<F>
where
    F: Fn(RequestConfig) -> Result<RequestOutcome, RequestError> + Send + Sync,
{
    async fn on_request(&self, config: RequestConfig) -> Result<RequestOutcome, RequestError> {
        (self.f)(config)
    }
}

#[async_trait]
impl<F> ResponseInterceptor for FnInterceptor<F>
where
    F: Fn(RequestResponse, &RequestConfig) -> Result<RequestResponse, RequestError> + Send + Sync,
{
    async fn on_response(
        &self,
        response: RequestResponse,
        config: &RequestConfig,
    ) -> Result<RequestResponse, RequestError> {
        (self.f)(response, config)
    }
}

#[async_trait]
impl<F> ErrorInterceptor for FnInterceptor<F>
where
    F: Fn(RequestError, &RequestConfig) -> Result<RequestError, RequestError> + Send + Sync,
{
    async fn on_error(
        &self,
        error: RequestError,
        config: &RequestConfig,
    ) -> Result<RequestError, RequestError> {
        (self.f)(error, config)
    }
}

/// Ordered hook lists for the three dispatch stages.
#[derive(Default)]
pub struct InterceptorChain {
    request: RwLock<Vec<Arc<dyn RequestInterceptor>>>,
    final_request: RwLock<Vec<Arc<dyn RequestInterceptor>>>,
    response: RwLock<Vec<Arc<dyn ResponseInterceptor>>>,
    error: RwLock<Vec<Arc<dyn ErrorInterceptor>>>,
}

impl InterceptorChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain with the default hooks: logging, then caching.
    ///
    /// The cache lookup is registered as a final request hook.
    ///
    /// # Arguments
    ///
    /// * `cache` - The cache consulted before dispatch and filled after success
    pub fn with_defaults(cache: Arc<CacheService>) -> Self {
        let chain = Self::new();
        let logging = Arc::new(LoggingInterceptor);
        let caching = Arc::new(CacheInterceptor::new(cache));

        chain.add_request_interceptor(logging.clone());
        chain.add_final_request_interceptor(caching.clone());
        chain.add_response_interceptor(logging.clone());
        chain.add_response_interceptor(caching);
        chain.add_error_interceptor(logging);
        chain
    }

    pub fn add_request_interceptor(&self, hook: Arc<dyn RequestInterceptor>) {
        if let Ok(mut hooks) = self.request.write() {
            hooks.push(hook);
        }
    }

    /// Registers a request hook that runs after all regular request hooks.
    pub fn add_final_request_interceptor(&self, hook: Arc<dyn RequestInterceptor>) {
        if let Ok(mut hooks) = self.final_request.write() {
            hooks.push(hook);
        }
    }

    pub fn add_response_interceptor(&self, hook: Arc<dyn ResponseInterceptor>) {
        if let Ok(mut hooks) = self.response.write() {
            hooks.push(hook);
        }
    }

    pub fn add_error_interceptor(&self, hook: Arc<dyn ErrorInterceptor>) {
        if let Ok(mut hooks) = self.error.write() {
            hooks.push(hook);
        }
    }

    /// Folds a request through the regular, then the final request hooks.
    ///
    /// Stops at the first [`RequestOutcome::CacheHit`] or failure.
    pub async fn intercept_request(
        &self,
        config: RequestConfig,
    ) -> Result<RequestOutcome, RequestError> {
        let mut current = config;
        let hooks = snapshot(&self.request)
            .into_iter()
            .chain(snapshot(&self.final_request));
        for hook in hooks {
            match hook.on_request(current).await? {
                RequestOutcome::Proceed(next) => current = next,
                hit @ RequestOutcome::CacheHit(_) => return Ok(hit),
            }
        }
        Ok(RequestOutcome::Proceed(current))
    }

    /// Folds a response through the response hooks.
    pub async fn intercept_response(
        &self,
        response: RequestResponse,
        config: &RequestConfig,
    ) -> Result<RequestResponse, RequestError> {
        let mut current = response;
        for hook in snapshot(&self.response) {
            current = hook.on_response(current, config).await?;
        }
        Ok(current)
    }

    /// Folds an error through the error hooks.
    ///
    /// # Returns
    ///
    /// `Ok` with the error produced by the last hook, or `Err` with the
    /// failure of the hook that stopped the chain.
    pub async fn intercept_error(
        &self,
        error: RequestError,
        config: &RequestConfig,
    ) -> Result<RequestError, RequestError> {
        let mut current = error;
        for hook in snapshot(&self.error) {
            current = hook.on_error(current, config).await?;
        }
        Ok(current)
    }

    /// Number of registered (request, response, error) hooks. Final request
    /// hooks count as request hooks.
    pub fn hook_counts(&self) -> (usize, usize, usize) {
        (
            snapshot(&self.request).len() + snapshot(&self.final_request).len(),
            snapshot(&self.response).len(),
            snapshot(&self.error).len(),
        )
    }
}

impl std::fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (request, response, error) = self.hook_counts();
        f.debug_struct("InterceptorChain")
            .field("request", &request)
            .field("response", &response)
            .field("error", &error)
            .finish()
    }
}

// Hooks are cloned out so no lock is held across an await.
fn snapshot<T: ?Sized>(list: &RwLock<Vec<Arc<T>>>) -> Vec<Arc<T>> {
    list.read().map(|hooks| hooks.clone()).unwrap_or_default()
}
