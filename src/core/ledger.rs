//! Admin-editable ledger of completed time intervals.

use crate::errors::{AppError, AppResult};
use crate::models::time_log::{LogFilter, NewTimeLog, TimeLogEntry, TimeLogPatch, sort_desc};
use crate::storage::traits::LedgerStore;
use std::collections::BTreeMap;

/// Id carried by rows derived from an open timer. Stores never hand it out.
pub const RUNNING_ROW_ID: i64 = 0;

pub struct TimeLogLedger<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: LedgerStore + ?Sized> TimeLogLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn append(&self, draft: &NewTimeLog) -> AppResult<TimeLogEntry> {
        draft.validate()?;
        self.store.insert_entry(draft)
    }

    /// Replace start and/or end of an entry. The result must still satisfy
    /// `end >= start`; otherwise nothing is written.
    pub fn update(&self, id: i64, patch: &TimeLogPatch) -> AppResult<TimeLogEntry> {
        let current = self.store.get_entry(id)?.ok_or(AppError::NotFound(id))?;
        let next = patch.apply(&current)?;
        if !self.store.replace_entry(&next)? {
            return Err(AppError::NotFound(id));
        }
        Ok(next)
    }

    /// Idempotent: removing an unknown id is not an error.
    pub fn remove(&self, id: i64) -> AppResult<bool> {
        self.store.delete_entry(id)
    }

    pub fn get(&self, id: i64) -> AppResult<Option<TimeLogEntry>> {
        self.store.get_entry(id)
    }

    /// Stored entries matching `filter`, newest first.
    pub fn query(&self, filter: &LogFilter) -> AppResult<Vec<TimeLogEntry>> {
        let entries = self.store.list_entries(filter.user_id.as_deref())?;
        Ok(entries.into_iter().filter(|e| filter.matches(e)).collect())
    }

    /// `query` plus one running row per open timer that matches the filter.
    pub fn query_with_open(
        &self,
        filter: &LogFilter,
        open: &BTreeMap<String, i64>,
    ) -> AppResult<Vec<TimeLogEntry>> {
        let mut rows = self.query(filter)?;
        rows.extend(
            running_rows(open)
                .into_iter()
                .filter(|r| filter.matches(r)),
        );
        sort_desc(&mut rows);
        Ok(rows)
    }

    /// Other entries of the same user whose interval intersects `entry`.
    pub fn overlapping(&self, entry: &TimeLogEntry, now_ms: i64) -> AppResult<Vec<TimeLogEntry>> {
        Ok(self
            .store
            .list_entries(Some(&entry.user_id))?
            .into_iter()
            .filter(|o| o.id != entry.id && o.overlaps(entry, now_ms))
            .collect())
    }
}

/// Open timers rendered as ledger rows without an end.
pub fn running_rows(open: &BTreeMap<String, i64>) -> Vec<TimeLogEntry> {
    open.iter()
        .map(|(user_id, &started_at)| TimeLogEntry {
            id: RUNNING_ROW_ID,
            user_id: user_id.clone(),
            start_time: started_at,
            end_time: None,
        })
        .collect()
}
