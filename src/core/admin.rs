//! Admin time-log editor: filtered listing, edit buffer, edit and delete.
//!
//! Every operation checks the acting user's role first and fails with
//! `PermissionDenied` before touching the store.

use crate::clock::Clock;
use crate::core::ledger::{RUNNING_ROW_ID, TimeLogLedger};
use crate::core::permissions::require_admin;
use crate::core::timer::TimerStore;
use crate::errors::{AppError, AppResult};
use crate::models::time_log::{LogFilter, TimeLogEntry, TimeLogPatch};
use crate::models::user::{User, display_name};
use crate::storage::traits::{LedgerStore, TimerMarkerStore, UserDirectory};
use crate::utils::date::{format_local_date, format_local_datetime};
use crate::utils::formatting::duration_label;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminLogRow {
    pub entry: TimeLogEntry,
    pub user_name: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub duration: String,
}

impl AdminLogRow {
    fn build(entry: TimeLogEntry, roster: &[User]) -> Self {
        Self {
            user_name: display_name(roster, &entry.user_id).to_string(),
            date: format_local_date(entry.start_time),
            start: format_local_datetime(entry.start_time),
            end: entry
                .end_time
                .map(format_local_datetime)
                .unwrap_or_else(|| "Active".to_string()),
            duration: duration_label(entry.start_time, entry.end_time),
            entry,
        }
    }
}

/// Pending changes for the selected entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub id: i64,
    pub start_time: i64,
    pub end_time: Option<i64>,
}

pub struct AdminTimeLogEditor<'a, S, C>
where
    S: TimerMarkerStore + LedgerStore + UserDirectory + ?Sized,
    C: Clock,
{
    store: &'a S,
    ledger: TimeLogLedger<'a, S>,
    timers: TimerStore<'a, S, C>,
    acting: User,
    buffer: Option<EditBuffer>,
}

impl<'a, S, C> AdminTimeLogEditor<'a, S, C>
where
    S: TimerMarkerStore + LedgerStore + UserDirectory + ?Sized,
    C: Clock,
{
    pub fn new(store: &'a S, clock: C, acting: User) -> Self {
        Self {
            store,
            ledger: TimeLogLedger::new(store),
            timers: TimerStore::new(store, clock),
            acting,
            buffer: None,
        }
    }

    /// Ledger rows plus running timers, newest first, optionally for one user.
    pub fn list(&self, user_filter: Option<&str>) -> AppResult<Vec<AdminLogRow>> {
        require_admin(&self.acting, "list time logs")?;

        let filter = LogFilter {
            user_id: user_filter.map(str::to_string),
            date_range: None,
        };
        let open = self.timers.list_open()?;
        let roster = self.store.list_users()?;

        Ok(self
            .ledger
            .query_with_open(&filter, &open)?
            .into_iter()
            .map(|e| AdminLogRow::build(e, &roster))
            .collect())
    }

    pub fn edit(&self, id: i64, patch: &TimeLogPatch) -> AppResult<TimeLogEntry> {
        require_admin(&self.acting, "edit time log")?;
        if id == RUNNING_ROW_ID {
            return Err(AppError::NotFound(id));
        }
        self.ledger.update(id, patch)
    }

    pub fn delete(&self, id: i64) -> AppResult<bool> {
        require_admin(&self.acting, "delete time log")?;
        self.ledger.remove(id)
    }

    /// Entries of the same user that intersect the given one.
    pub fn overlaps(&self, entry: &TimeLogEntry) -> AppResult<Vec<TimeLogEntry>> {
        require_admin(&self.acting, "list time logs")?;
        self.ledger.overlapping(entry, self.timers.now_ms())
    }

    pub fn select(&mut self, id: i64) -> AppResult<&EditBuffer> {
        require_admin(&self.acting, "edit time log")?;
        let entry = self.ledger.get(id)?.ok_or(AppError::NotFound(id))?;
        Ok(self.buffer.insert(EditBuffer {
            id: entry.id,
            start_time: entry.start_time,
            end_time: entry.end_time,
        }))
    }

    pub fn selected(&self) -> Option<&EditBuffer> {
        self.buffer.as_ref()
    }

    pub fn set_start(&mut self, ms: i64) {
        if let Some(b) = self.buffer.as_mut() {
            b.start_time = ms;
        }
    }

    pub fn set_end(&mut self, ms: i64) {
        if let Some(b) = self.buffer.as_mut() {
            b.end_time = Some(ms);
        }
    }

    pub fn cancel(&mut self) {
        self.buffer = None;
    }

    /// Write the buffer through the ledger. On failure the buffer is kept so
    /// the values can be corrected.
    pub fn save(&mut self) -> AppResult<TimeLogEntry> {
        let buffer = self
            .buffer
            .clone()
            .ok_or_else(|| AppError::Other("no time log selected".to_string()))?;

        let patch = TimeLogPatch {
            start_time: Some(buffer.start_time),
            end_time: buffer.end_time,
        };
        let saved = self.edit(buffer.id, &patch)?;
        self.buffer = None;
        Ok(saved)
    }
}
