//! Server-backed grid data provider.
//!
//! [`ServerDataProvider`] holds the committed view (rows, total count and
//! the settings they were fetched with) and turns sort/filter/page changes
//! into debounced GET requests against a single resource URL.
//!
//! # Flow
//!
//! ```text
//! order_by / filter / limit_to / page ──→ SettingsPatch ──→ RequestCoalescer
//!                                                              │ debounce
//!          accessors ←── commit ←── ResponseParser ←── Transport::get
//! ```
//!
//! Accessors only ever reflect the last *successful* fetch. A failed fetch
//! clears its in-flight marker and nothing else.

pub mod coalescer;
mod error;
mod factory;
mod state;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::config::{FetchOrdering, ProviderConfig};
use crate::pager::GridDataSource;
use crate::parser::ResponseParser;
use crate::serializer::{append_query, SettingsSerializer};
use crate::settings::{
    Filter, FilterExpression, LimitTo, OrderBy, SettingsPatch, ViewSettings, DEFAULT_PAGE_SIZE,
};
use crate::timer::{Timer, TimerTask};
use crate::transport::{Transport, TransportError};

pub use coalescer::RequestCoalescer;
pub use error::ProviderError;
pub use factory::ServerDataProviderFactory;
pub use state::ProviderActivity;

use state::{Fetch, ProviderState};

enum SettingsChange {
    Patch(SettingsPatch),
    Refresh,
    Replace(ViewSettings),
}

/// A change folded into the pending overlay, waiting to be serialized.
struct StagedChange {
    ticket: u64,
    settings: ViewSettings,
    serializer: Arc<dyn SettingsSerializer>,
}

struct Shared<R> {
    resource_url: String,
    default_view_settings: ViewSettings,
    fetch_ordering: FetchOrdering,
    transport: Arc<dyn Transport>,
    timer: Arc<dyn Timer>,
    state: Mutex<ProviderState<R>>,
    activity: watch::Sender<ProviderActivity>,
}

/// Grid data provider for one remote resource.
///
/// Cloning is cheap and yields another handle to the same provider.
/// Mutators may spawn Tokio tasks and must be called inside a runtime.
pub struct ServerDataProvider<R = Value> {
    shared: Arc<Shared<R>>,
}

impl<R> Clone for ServerDataProvider<R> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<R> ServerDataProvider<R>
where
    R: DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        resource_url: impl Into<String>,
        config: &ProviderConfig,
        transport: Arc<dyn Transport>,
        timer: Arc<dyn Timer>,
    ) -> Self {
        let state = ProviderState::new(
            config.default_view_settings.clone(),
            Duration::from_millis(config.debounce_ms),
        );
        let (activity, _) = watch::channel(ProviderActivity::default());

        Self {
            shared: Arc::new(Shared {
                resource_url: resource_url.into(),
                default_view_settings: config.default_view_settings.clone(),
                fetch_ordering: config.fetch_ordering,
                transport,
                timer,
                state: Mutex::new(state),
                activity,
            }),
        }
    }

    pub fn resource_url(&self) -> &str {
        &self.shared.resource_url
    }

    // ---- mutators ----

    pub fn order_by(&self, expression: impl Into<String>, reverse: bool) {
        let patch = SettingsPatch::new().with_order_by(Some(OrderBy::new(expression, reverse)));
        self.route(SettingsChange::Patch(patch));
    }

    /// Filters the collection and rewinds any paging window to its start.
    pub fn filter(&self, expression: impl Into<FilterExpression>) {
        let mut patch = SettingsPatch::new().with_filter(Some(Filter::new(expression)));

        let state = self.shared.state.lock();
        let effective = state.coalescer.effective(&state.view_settings);
        if let Some(limit_to) = effective.limit_to {
            patch = patch.with_limit_to(Some(LimitTo::new(limit_to.limit, 0)));
        }
        self.route_locked(state, SettingsChange::Patch(patch));
    }

    /// Sets the paging window; `None` removes paging altogether.
    pub fn limit_to(&self, limit: Option<u64>, begin: u64) {
        let limit_to = limit.map(|limit| LimitTo::new(limit, begin));
        let patch = SettingsPatch::new().with_limit_to(limit_to);
        self.route(SettingsChange::Patch(patch));
    }

    /// Moves to the zero-based page `index`, using a page size of
    /// [`DEFAULT_PAGE_SIZE`] if none is set.
    pub fn page(&self, index: u64) {
        let state = self.shared.state.lock();
        let effective = state.coalescer.effective(&state.view_settings);
        let limit = effective
            .limit_to
            .map(|limit_to| limit_to.limit)
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let limit_to = LimitTo::new(limit, limit.saturating_mul(index));
        let patch = SettingsPatch::new().with_limit_to(Some(limit_to));
        self.route_locked(state, SettingsChange::Patch(patch));
    }

    pub fn set_page_size(&self, size: u64) {
        self.limit_to(Some(size), 0);
    }

    pub fn set_view_settings(&self, patch: SettingsPatch) {
        self.route(SettingsChange::Patch(patch));
    }

    /// Re-requests the current (effective) settings.
    pub fn refresh(&self) {
        self.route(SettingsChange::Refresh);
    }

    /// Returns to the configured default settings, dropping pending changes.
    pub fn reset(&self) {
        let defaults = self.shared.default_view_settings.clone();
        self.route(SettingsChange::Replace(defaults));
    }

    // ---- accessors ----

    pub fn is_request_pending(&self) -> bool {
        self.shared.state.lock().is_request_pending()
    }

    pub fn has_results(&self) -> bool {
        !self.shared.state.lock().view_model.is_empty()
    }

    /// True only for a genuinely empty result: something has loaded, nothing
    /// is loading, and there are no rows.
    pub fn has_no_results(&self) -> bool {
        let state = self.shared.state.lock();
        state.view_model.is_empty() && !state.is_request_pending() && state.is_first_request_complete
    }

    pub fn is_first_request_complete(&self) -> bool {
        self.shared.state.lock().is_first_request_complete
    }

    pub fn grid_model(&self) -> Arc<Vec<R>> {
        self.shared.state.lock().view_model.clone()
    }

    /// Total number of records matching the committed filter, across pages.
    pub fn model_item_count(&self) -> u64 {
        self.shared.state.lock().filtered_item_count
    }

    pub fn current_view_settings(&self) -> ViewSettings {
        self.shared.state.lock().view_settings.clone()
    }

    /// Settings the next request will carry: committed plus pending changes.
    pub fn effective_view_settings(&self) -> ViewSettings {
        let state = self.shared.state.lock();
        state.coalescer.effective(&state.view_settings)
    }

    pub fn debounce(&self) -> Duration {
        self.shared.state.lock().debounce
    }

    /// Applies from the next settings change on.
    pub fn set_debounce(&self, debounce: Duration) {
        self.shared.state.lock().debounce = debounce;
    }

    /// `None` restores the default query-string serializer.
    pub fn set_settings_serializer(&self, serializer: Option<Arc<dyn SettingsSerializer>>) {
        self.shared.state.lock().serializer = serializer;
    }

    /// `None` restores the default passthrough parser.
    pub fn set_response_parser(&self, parser: Option<Arc<dyn ResponseParser<R>>>) {
        self.shared.state.lock().parser = parser;
    }

    /// Receiver notified after every state change.
    pub fn activity(&self) -> watch::Receiver<ProviderActivity> {
        self.shared.activity.subscribe()
    }

    /// Waits until no request is scheduled or in flight.
    pub async fn settled(&self) {
        let mut activity = self.activity();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = activity.wait_for(|activity| !activity.busy).await;
    }

    /// POSTs `model` to the resource URL. Provider state is not touched.
    pub async fn save_model<M>(&self, model: &M) -> Result<Value, ProviderError>
    where
        M: Serialize + ?Sized,
    {
        if self.shared.resource_url.is_empty() {
            return Err(ProviderError::MissingResourceUrl);
        }
        let body = serde_json::to_value(model).map_err(ProviderError::Encode)?;
        let response = self
            .shared
            .transport
            .post(&self.shared.resource_url, body)
            .await?;
        Ok(response)
    }

    // ---- request coalescing ----

    fn route(&self, change: SettingsChange) {
        let state = self.shared.state.lock();
        self.route_locked(state, change);
    }

    fn route_locked(
        &self,
        mut state: parking_lot::MutexGuard<'_, ProviderState<R>>,
        change: SettingsChange,
    ) {
        let Some(staged) = self.stage(&mut state, change) else {
            return;
        };
        drop(state);

        // The serializer may call back into the provider, so it runs unlocked.
        let query = staged.serializer.serialize(&staged.settings);
        let url = append_query(&self.shared.resource_url, &query);

        let fetch = {
            let mut state = self.shared.state.lock();
            self.schedule(&mut state, staged, url)
        };

        if let Some(fetch) = fetch {
            self.spawn_fetch(fetch);
        }
    }

    /// Folds `change` into the pending overlay and returns the settings the
    /// next request will carry.
    fn stage(&self, state: &mut ProviderState<R>, change: SettingsChange) -> Option<StagedChange> {
        if self.shared.resource_url.is_empty() {
            tracing::debug!("No resource URL, ignoring settings change");
            return None;
        }

        let settings = match change {
            SettingsChange::Patch(patch) => state.coalescer.stage(patch, &state.view_settings),
            SettingsChange::Refresh => state.coalescer.effective(&state.view_settings),
            SettingsChange::Replace(settings) => state.coalescer.replace(&settings),
        };

        Some(StagedChange {
            ticket: state.next_change(),
            settings,
            serializer: state.serializer(),
        })
    }

    /// Arms the debounce timer for `staged`, or returns a fetch to dispatch
    /// right away. A change staged after this one carries its patch too, so
    /// a superseded change schedules nothing.
    fn schedule(
        &self,
        state: &mut ProviderState<R>,
        staged: StagedChange,
        url: String,
    ) -> Option<Fetch> {
        if !state.is_current_change(staged.ticket) {
            tracing::debug!(url = %url, "Settings change superseded before scheduling");
            return None;
        }
        let settings = staged.settings;

        // Without a debounce the pending overlay stays until the request
        // carrying it commits, so back-to-back changes build on each other.
        let fetch = if state.debounce.is_zero() {
            state.coalescer.cancel();
            Some(state.begin_fetch(url, settings))
        } else {
            tracing::debug!(
                url = %url,
                debounce_ms = state.debounce.as_millis() as u64,
                "Request scheduled"
            );
            let provider = self.clone();
            let delay = state.debounce;
            state
                .coalescer
                .arm(self.shared.timer.as_ref(), delay, move |generation| -> TimerTask {
                    Box::pin(async move {
                        provider.on_debounce_elapsed(generation, url, settings);
                    })
                });
            None
        };

        self.publish(state);
        fetch
    }

    fn on_debounce_elapsed(&self, generation: u64, url: String, settings: ViewSettings) {
        let fetch = {
            let mut state = self.shared.state.lock();
            if !state.coalescer.fire(generation) {
                tracing::debug!(generation, "Superseded request dropped");
                return;
            }
            let fetch = state.begin_fetch(url, settings);
            self.publish(&mut state);
            fetch
        };
        self.spawn_fetch(fetch);
    }

    fn spawn_fetch(&self, fetch: Fetch) {
        tracing::debug!(url = %fetch.url, fetch_id = fetch.id, "Dispatching fetch");

        let provider = self.clone();
        let transport = self.shared.transport.clone();
        tokio::spawn(async move {
            let result = transport.get(&fetch.url).await;
            provider.complete(fetch, result);
        });
    }

    fn complete(&self, fetch: Fetch, result: Result<Value, TransportError>) {
        // Parsed unlocked, like serialization.
        let parser = self.shared.state.lock().parser();
        let parsed = result
            .map_err(ProviderError::from)
            .and_then(|payload| parser.parse(payload).map_err(ProviderError::from));

        let mut state = self.shared.state.lock();
        state.end_fetch();

        match parsed {
            Ok(_) if self.shared.fetch_ordering == FetchOrdering::LatestRequestWins
                && state.is_stale(&fetch) =>
            {
                tracing::debug!(
                    url = %fetch.url,
                    fetch_id = fetch.id,
                    "Discarding response older than the committed view"
                );
            }
            Ok(page) => {
                tracing::debug!(
                    url = %fetch.url,
                    fetch_id = fetch.id,
                    rows = page.data.len(),
                    total_results = page.total_results,
                    "Fetch committed"
                );
                let settles_pending = state.is_latest(&fetch) && !state.coalescer.is_armed();
                state.commit(fetch, page);
                if settles_pending {
                    state.coalescer.discard_pending();
                }
            }
            Err(err) => {
                tracing::warn!(
                    url = %fetch.url,
                    error_type = err.error_type(),
                    error = %err,
                    "Fetch failed, keeping committed view"
                );
            }
        }

        self.publish(&mut state);
    }

    fn publish(&self, state: &mut ProviderState<R>) {
        self.shared.activity.send_replace(state.activity());
    }
}

impl<R> GridDataSource for ServerDataProvider<R>
where
    R: DeserializeOwned + Send + Sync + 'static,
{
    fn model_item_count(&self) -> u64 {
        ServerDataProvider::model_item_count(self)
    }

    fn current_view_settings(&self) -> ViewSettings {
        ServerDataProvider::current_view_settings(self)
    }

    fn effective_view_settings(&self) -> ViewSettings {
        ServerDataProvider::effective_view_settings(self)
    }

    fn page(&self, index: u64) {
        ServerDataProvider::page(self, index);
    }

    fn set_page_size(&self, size: u64) {
        ServerDataProvider::set_page_size(self, size);
    }
}
