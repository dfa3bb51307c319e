//! Integration tests module for the request pipeline
//!
//! Shared helpers for building clients against a local mock server.

pub mod collection_test;
pub mod pipeline_test;

use rest_client_pipeline::config::{RestClientConfig, SettingsHandle};
use rest_client_pipeline::history::MemoryHistoryStore;
use rest_client_pipeline::RequestClient;

/// Builds a client with a reqwest transport and in-memory history.
pub fn client_with(config: RestClientConfig) -> RequestClient {
    RequestClient::from_settings(
        SettingsHandle::new(config),
        Box::new(MemoryHistoryStore::new()),
    )
    .expect("Failed to build client")
}
