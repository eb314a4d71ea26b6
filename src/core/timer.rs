//! Per-user clock-in/clock-out timers.
//!
//! The marker store is the single source of truth: every decision (is a timer
//! open, who owns it, when it started) is read from it, never from a cached
//! copy.

use crate::clock::Clock;
use crate::core::permissions::require_admin;
use crate::errors::{AppError, AppResult};
use crate::models::time_log::NewTimeLog;
use crate::models::timer::TimerMarker;
use crate::models::user::User;
use crate::storage::traits::TimerMarkerStore;
use std::collections::BTreeMap;
use tracing::debug;

pub struct TimerStore<'a, S: TimerMarkerStore + ?Sized, C: Clock> {
    markers: &'a S,
    clock: C,
}

impl<'a, S: TimerMarkerStore + ?Sized, C: Clock> TimerStore<'a, S, C> {
    pub fn new(markers: &'a S, clock: C) -> Self {
        Self { markers, clock }
    }

    /// Open a timer for `user_id` starting now.
    /// Fails with `AlreadyRunning` when one is open; the stored start is kept.
    pub fn start(&self, user_id: &str) -> AppResult<TimerMarker> {
        let marker = TimerMarker::new(user_id, self.clock.now_ms());
        if !self.markers.put_marker_if_absent(&marker)? {
            return Err(AppError::AlreadyRunning(user_id.to_string()));
        }
        debug!(user = user_id, started_at = marker.started_at, "timer started");
        Ok(marker)
    }

    /// Close the user's timer and return the entry to append to the ledger.
    pub fn stop(&self, user_id: &str) -> AppResult<NewTimeLog> {
        let marker = self
            .markers
            .take_marker(user_id)?
            .ok_or_else(|| AppError::NotRunning(user_id.to_string()))?;

        // a clock that went backwards still yields a valid interval
        let end = self.clock.now_ms().max(marker.started_at);
        debug!(user = user_id, started_at = marker.started_at, end, "timer stopped");
        Ok(NewTimeLog::closed(marker.user_id, marker.started_at, end))
    }

    /// `stop` on behalf of another user. Admins only.
    pub fn force_stop(&self, user_id: &str, acting: &User) -> AppResult<NewTimeLog> {
        require_admin(acting, "force stop")?;
        self.stop(user_id)
    }

    pub fn is_running(&self, user_id: &str) -> AppResult<bool> {
        Ok(self.markers.get_marker(user_id)?.is_some())
    }

    pub fn running_since(&self, user_id: &str) -> AppResult<Option<i64>> {
        Ok(self.markers.get_marker(user_id)?.map(|m| m.started_at))
    }

    /// Snapshot of every open timer: user id → start instant.
    pub fn list_open(&self) -> AppResult<BTreeMap<String, i64>> {
        Ok(self
            .markers
            .list_markers()?
            .into_iter()
            .map(|m| (m.user_id, m.started_at))
            .collect())
    }

    /// Put back a marker removed by `stop` whose entry could not be stored.
    pub(crate) fn restore(&self, marker: &TimerMarker) -> AppResult<bool> {
        self.markers.put_marker_if_absent(marker)
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }
}
