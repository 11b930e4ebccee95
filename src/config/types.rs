use serde::{Deserialize, Serialize};

use crate::settings::ViewSettings;

/// Provider factory configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Delay between the last settings change and the request, in
    /// milliseconds (default: 150). Zero sends every change immediately.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// How overlapping responses are committed (default: last response wins).
    #[serde(default)]
    pub fetch_ordering: FetchOrdering,
    /// Settings a new provider starts with and `reset()` returns to.
    #[serde(default)]
    pub default_view_settings: ViewSettings,
    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Commit policy when several fetches are in flight at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchOrdering {
    /// Every successful response is committed as it arrives, so whichever
    /// lands last is shown even if it was requested first.
    #[default]
    #[serde(rename = "last_response")]
    LastResponseWins,
    /// Responses older than the last committed one are discarded.
    #[serde(rename = "latest_request")]
    LatestRequestWins,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_timeout_seconds() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            fetch_ordering: FetchOrdering::default(),
            default_view_settings: ViewSettings::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}
