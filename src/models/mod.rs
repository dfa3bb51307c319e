//! Data models for HTTP requests and responses.
//!
//! This module contains the core data structures that flow through the
//! dispatch pipeline: request descriptions and response snapshots.

pub mod request;
pub mod response;

pub use request::{AuthConfig, HttpMethod, RequestBody, RequestConfig, ScalarMap, ScalarValue};
pub use response::{decode_body, RequestResponse};
