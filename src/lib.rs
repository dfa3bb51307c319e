//! REST Client Request Pipeline
//!
//! This crate implements the request-dispatch core of a REST client: compose
//! an HTTP request description, send it, and inspect the response, with
//! response caching, request history, retries and collection import/export.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **models**: Request descriptions and response snapshots
//! - **executor**: Maps requests to transport options and executes them with reqwest
//! - **interceptors**: Ordered request/response/error hooks (logging, caching)
//! - **cache**: TTL-bound in-memory response cache
//! - **history**: Persisted request history with search and export
//! - **retry**: Fixed-count, fixed-delay retries
//! - **validation**: Pre-dispatch request validation
//! - **client**: The [`RequestClient`] that wires the pipeline together
//! - **collection**: Import/export of saved request collections
//! - **config**: Settings loading, validation and the shared [`SettingsHandle`]
//! - **logging**: Logger setup
//!
//! # Request Flow
//!
//! 1. The request is validated
//! 2. Request hooks run: logging, user hooks, then the cache lookup (a hit
//!    returns immediately)
//! 3. The request is transformed into transport options
//! 4. The transport executes it
//! 5. Response hooks run (logging, then cache store), or error hooks on failure
//! 6. The outcome is recorded in history
//!
//! # Usage
//!
//! ```no_run
//! use rest_client_pipeline::config::{load_config, SettingsHandle};
//! use rest_client_pipeline::history::FileHistoryStore;
//! use rest_client_pipeline::models::{HttpMethod, RequestConfig};
//! use rest_client_pipeline::RequestClient;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?;
//! rest_client_pipeline::logging::init(config.log_level);
//!
//! let settings = SettingsHandle::new(config);
//! let store = FileHistoryStore::at_default_path()?;
//! let client = RequestClient::from_settings(settings, Box::new(store))?;
//!
//! let request = RequestConfig::new(HttpMethod::GET, "https://api.example.com/users")
//!     .with_header("Accept", "application/json");
//! let response = client.send_request(request).await?;
//! println!("{} {}", response.status, response.body_text());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod collection;
pub mod config;
pub mod executor;
pub mod history;
pub mod interceptors;
pub mod logging;
pub mod models;
pub mod retry;
pub mod validation;

pub use cache::CacheService;
pub use client::RequestClient;
pub use config::{RestClientConfig, SettingsHandle};
pub use executor::{RequestError, Transport};
pub use history::HistoryManager;
pub use interceptors::{InterceptorChain, RequestOutcome};
pub use models::{RequestConfig, RequestResponse};
pub use retry::RetryPolicy;
