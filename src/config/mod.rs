//! Provider configuration loaded from `config.toml`.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{FetchOrdering, HttpConfig, ProviderConfig};
