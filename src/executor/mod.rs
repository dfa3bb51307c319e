//! HTTP request executor.
//!
//! This module turns request descriptions into transport calls:
//!
//! - [`transform`] maps a [`RequestConfig`](crate::models::RequestConfig) to
//!   [`TransportOptions`] (method, URL, headers, body encoding, auth)
//! - [`transport`] executes those options with reqwest
//! - [`error`] defines the normalized [`RequestError`]

pub mod error;
pub mod transform;
pub mod transport;

pub use error::{ErrorCode, ErrorKind, RequestError};
pub use transform::{transform_config, BasicCredentials, RequestData, TransportOptions};
pub use transport::{ReqwestTransport, Transport};
