//! Transport seam between the provider and the resource endpoint.
//!
//! The provider only needs `GET url` for fetching pages and `POST url` for
//! saving a model. [`HttpTransport`] is the reqwest-backed default; tests and
//! embedders can supply any other [`Transport`].

mod http;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpTransport;

/// Errors raised by a transport call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to reach the endpoint
    #[error("Connection failed to '{url}': {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Endpoint answered with a non-success status
    #[error("Request to '{url}' failed: {status} - {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// Response body could not be read or decoded
    #[error("Failed to decode response from '{url}': {message}")]
    Decode { url: String, message: String },

    /// Request exceeded the configured timeout
    #[error("Request to '{url}' timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },
}

impl TransportError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            TransportError::Connection { url, .. }
            | TransportError::Status { url, .. }
            | TransportError::Decode { url, .. }
            | TransportError::Timeout { url, .. } => url,
        }
    }

    /// HTTP status, when the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Minimal request surface the provider depends on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return the decoded JSON body.
    async fn get(&self, url: &str) -> Result<Value, TransportError>;

    /// Send `body` as JSON to `url` and return the decoded response body
    /// (`Value::Null` for an empty body).
    async fn post(&self, url: &str, body: Value) -> Result<Value, TransportError>;
}
