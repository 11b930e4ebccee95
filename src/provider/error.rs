use thiserror::Error;

use crate::config::ConfigError;
use crate::parser::ParseError;
use crate::transport::TransportError;

/// Errors surfaced by provider operations that return a result.
///
/// Fetches triggered by mutators never return errors to the caller; their
/// failures are logged and leave the committed view in place.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The request to the resource endpoint failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The endpoint answered with an unexpected payload
    #[error("Response parse error: {0}")]
    Parse(#[from] ParseError),

    /// A model could not be serialized for saving
    #[error("Failed to encode model: {0}")]
    Encode(#[source] serde_json::Error),

    /// The provider was created without a resource URL
    #[error("Provider has no resource URL")]
    MissingResourceUrl,
}

impl ProviderError {
    /// Short machine-readable name of the error kind, for log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            ProviderError::Config(_) => "config_error",
            ProviderError::Client(_) => "client_error",
            ProviderError::Transport(_) => "transport_error",
            ProviderError::Parse(_) => "parse_error",
            ProviderError::Encode(_) => "encode_error",
            ProviderError::MissingResourceUrl => "missing_resource_url",
        }
    }
}
