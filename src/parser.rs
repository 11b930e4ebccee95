//! Normalization of raw server payloads into a page of rows.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One page of results plus the total number of matching records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPage<R> {
    pub data: Vec<R>,
    pub total_results: u64,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to decode response payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response payload: {0}")]
    Invalid(String),
}

/// Strategy turning a transport payload into a [`GridPage`].
pub trait ResponseParser<R>: Send + Sync {
    fn parse(&self, payload: Value) -> Result<GridPage<R>, ParseError>;
}

impl<R, F> ResponseParser<R> for F
where
    F: Fn(Value) -> Result<GridPage<R>, ParseError> + Send + Sync,
{
    fn parse(&self, payload: Value) -> Result<GridPage<R>, ParseError> {
        self(payload)
    }
}

/// Default parser for endpoints that already answer with
/// `{ "data": [...], "totalResults": n }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughParser;

impl<R: DeserializeOwned> ResponseParser<R> for PassthroughParser {
    fn parse(&self, payload: Value) -> Result<GridPage<R>, ParseError> {
        Ok(serde_json::from_value(payload)?)
    }
}
