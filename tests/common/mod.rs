//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_endpoint;

use async_trait::async_trait;
use lightgrid::config::{FetchOrdering, ProviderConfig};
use lightgrid::timer::TokioTimer;
use lightgrid::transport::{Transport, TransportError};
use lightgrid::ServerDataProvider;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

pub const RESOURCE_URL: &str = "/api/items";

/// Canned answer for one GET.
#[derive(Debug, Clone)]
pub struct Scripted {
    pub result: Result<Value, u16>,
    pub delay: Duration,
}

impl Scripted {
    pub fn payload(payload: Value) -> Self {
        Self {
            result: Ok(payload),
            delay: Duration::ZERO,
        }
    }

    /// `{data: [{id}...], totalResults}` for the given ids.
    pub fn page(ids: Range<u64>, total: u64) -> Self {
        Self::payload(page_payload(ids, total))
    }

    pub fn failure(status: u16) -> Self {
        Self {
            result: Err(status),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

pub fn page_payload(ids: Range<u64>, total: u64) -> Value {
    let data: Vec<Value> = ids.map(|id| json!({ "id": id, "name": format!("Value {id}") })).collect();
    json!({ "data": data, "totalResults": total })
}

/// In-memory transport that records every call and replays scripted
/// answers in order. Unscripted GETs answer with an empty page.
#[derive(Default)]
pub struct RecordingTransport {
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, Value)>>,
    script: Mutex<VecDeque<Scripted>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn enqueue(&self, scripted: Scripted) {
        self.script.lock().push_back(scripted);
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().clone()
    }

    /// Query strings of every GET so far (empty when there was none).
    pub fn queries(&self) -> Vec<String> {
        self.gets()
            .iter()
            .map(|url| url.split_once('?').map(|(_, q)| q.to_string()).unwrap_or_default())
            .collect()
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get(&self, url: &str) -> Result<Value, TransportError> {
        self.gets.lock().push(url.to_string());
        let scripted = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Scripted::page(0..0, 0));

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }

        scripted.result.map_err(|status| TransportError::Status {
            url: url.to_string(),
            status,
            message: "scripted failure".to_string(),
        })
    }

    async fn post(&self, url: &str, body: Value) -> Result<Value, TransportError> {
        self.posts.lock().push((url.to_string(), body.clone()));
        Ok(json!({ "saved": body }))
    }
}

pub fn config(debounce_ms: u64) -> ProviderConfig {
    ProviderConfig {
        debounce_ms,
        ..ProviderConfig::default()
    }
}

pub fn config_with_ordering(debounce_ms: u64, fetch_ordering: FetchOrdering) -> ProviderConfig {
    ProviderConfig {
        debounce_ms,
        fetch_ordering,
        ..ProviderConfig::default()
    }
}

/// Provider over `transport` with the Tokio timer.
pub fn provider(transport: &Arc<RecordingTransport>, config: &ProviderConfig) -> ServerDataProvider {
    ServerDataProvider::new(RESOURCE_URL, config, transport.clone(), Arc::new(TokioTimer))
}

/// Advances the paused clock by `ms`, letting due timers and tasks run.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
