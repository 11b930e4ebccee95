//! Debounce/merge engine behind [`ServerDataProvider`](super::ServerDataProvider).
//!
//! Partial setting changes made inside one debounce window are folded into a
//! single pending patch. At most one scheduled request exists at a time:
//! arming a new one cancels the previous one. Every arm bumps a generation
//! counter so a timer task that already woke up before it was cancelled can
//! tell that it has been superseded.

use std::time::Duration;

use crate::settings::{SettingsPatch, ViewSettings};
use crate::timer::{Timer, TimerHandle, TimerTask};

struct ScheduledRequest {
    generation: u64,
    handle: TimerHandle,
}

#[derive(Default)]
pub struct RequestCoalescer {
    pending: Option<SettingsPatch>,
    scheduled: Option<ScheduledRequest>,
    generation: u64,
}

impl RequestCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes accumulated since the last dispatch, if any.
    pub fn pending(&self) -> Option<&SettingsPatch> {
        self.pending.as_ref()
    }

    /// Whether a scheduled request is waiting for its delay to elapse.
    pub fn is_armed(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Merges `patch` into the pending changes and returns the settings the
    /// next request will carry.
    pub fn stage(&mut self, patch: SettingsPatch, committed: &ViewSettings) -> ViewSettings {
        let merged = match self.pending.take() {
            Some(pending) => pending.merge(patch),
            None => patch,
        };
        let effective = merged.apply_to(committed);
        self.pending = Some(merged);
        effective
    }

    /// Replaces all pending changes with a full replacement by `settings`.
    pub fn replace(&mut self, settings: &ViewSettings) -> ViewSettings {
        self.pending = Some(SettingsPatch::replacing(settings));
        settings.clone()
    }

    /// Committed settings overlaid with the pending changes.
    pub fn effective(&self, committed: &ViewSettings) -> ViewSettings {
        match &self.pending {
            Some(pending) => pending.apply_to(committed),
            None => committed.clone(),
        }
    }

    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    /// Cancels the scheduled request, if any. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        match self.scheduled.take() {
            Some(scheduled) => {
                scheduled.handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Schedules `make_task(generation)` after `delay`, replacing any
    /// previously scheduled request. `timer` must not run the task inline.
    pub fn arm<F>(&mut self, timer: &dyn Timer, delay: Duration, make_task: F) -> u64
    where
        F: FnOnce(u64) -> TimerTask,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let handle = timer.schedule(delay, make_task(generation));
        self.scheduled = Some(ScheduledRequest { generation, handle });
        generation
    }

    /// Claims the scheduled slot for a timer that just fired.
    ///
    /// Returns `false` if `generation` has been superseded or cancelled, in
    /// which case the caller must not dispatch. On success the pending
    /// changes are dropped: they are now carried by the outgoing request.
    pub fn fire(&mut self, generation: u64) -> bool {
        match &self.scheduled {
            Some(scheduled) if scheduled.generation == generation => {
                self.scheduled = None;
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}
