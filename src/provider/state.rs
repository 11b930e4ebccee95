use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::parser::{GridPage, PassthroughParser, ResponseParser};
use crate::provider::coalescer::RequestCoalescer;
use crate::serializer::{QueryStringSerializer, SettingsSerializer};
use crate::settings::ViewSettings;

/// Snapshot published on every provider state change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderActivity {
    /// Incremented on every change.
    pub revision: u64,
    /// A request is scheduled or in flight.
    pub busy: bool,
}

/// A request that has been dispatched and not yet completed.
#[derive(Debug, Clone)]
pub(crate) struct Fetch {
    pub id: u64,
    pub url: String,
    pub settings: ViewSettings,
}

pub(crate) struct ProviderState<R> {
    pub view_settings: ViewSettings,
    pub view_model: Arc<Vec<R>>,
    pub filtered_item_count: u64,
    pub is_first_request_complete: bool,
    pub in_flight: usize,
    pub coalescer: RequestCoalescer,
    pub debounce: Duration,
    pub serializer: Option<Arc<dyn SettingsSerializer>>,
    pub parser: Option<Arc<dyn ResponseParser<R>>>,
    last_fetch_id: u64,
    committed_fetch_id: u64,
    last_change: u64,
    revision: u64,
}

impl<R: DeserializeOwned + Send + Sync + 'static> ProviderState<R> {
    pub fn new(view_settings: ViewSettings, debounce: Duration) -> Self {
        Self {
            view_settings,
            view_model: Arc::new(Vec::new()),
            filtered_item_count: 0,
            is_first_request_complete: false,
            in_flight: 0,
            coalescer: RequestCoalescer::new(),
            debounce,
            serializer: None,
            parser: None,
            last_fetch_id: 0,
            committed_fetch_id: 0,
            last_change: 0,
            revision: 0,
        }
    }

    pub fn serializer(&self) -> Arc<dyn SettingsSerializer> {
        match &self.serializer {
            Some(serializer) => serializer.clone(),
            None => Arc::new(QueryStringSerializer),
        }
    }

    pub fn parser(&self) -> Arc<dyn ResponseParser<R>> {
        match &self.parser {
            Some(parser) => parser.clone(),
            None => Arc::new(PassthroughParser),
        }
    }

    /// Tickets a settings change; only the newest ticket may schedule.
    pub fn next_change(&mut self) -> u64 {
        self.last_change += 1;
        self.last_change
    }

    pub fn is_current_change(&self, ticket: u64) -> bool {
        ticket == self.last_change
    }

    /// Records a dispatch and hands back the request to perform.
    pub fn begin_fetch(&mut self, url: String, settings: ViewSettings) -> Fetch {
        self.in_flight += 1;
        self.last_fetch_id += 1;
        Fetch {
            id: self.last_fetch_id,
            url,
            settings,
        }
    }

    /// Marks `fetch` as finished, successful or not.
    pub fn end_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Whether `fetch` is the most recently dispatched request.
    pub fn is_latest(&self, fetch: &Fetch) -> bool {
        fetch.id == self.last_fetch_id
    }

    /// Whether a response to `fetch` arrives after a newer one was committed.
    pub fn is_stale(&self, fetch: &Fetch) -> bool {
        fetch.id < self.committed_fetch_id
    }

    /// Replaces rows, count and settings in one step.
    pub fn commit(&mut self, fetch: Fetch, page: GridPage<R>) {
        self.view_model = Arc::new(page.data);
        self.filtered_item_count = page.total_results;
        self.view_settings = fetch.settings;
        self.committed_fetch_id = fetch.id;
        self.is_first_request_complete = true;
    }

    pub fn is_request_pending(&self) -> bool {
        self.in_flight > 0
    }

    pub fn activity(&mut self) -> ProviderActivity {
        self.revision += 1;
        ProviderActivity {
            revision: self.revision,
            busy: self.coalescer.is_armed() || self.in_flight > 0,
        }
    }
}
