// src/export/model.rs

use crate::models::time_log::TimeLogEntry;
use crate::models::user::{User, display_name};
use crate::utils::date::to_rfc3339_local;
use crate::utils::formatting::ms_to_hours;
use serde::Serialize;

/// Flat row for CSV / JSON export of the ledger.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TimeLogExport {
    pub id: i64,
    pub user_id: String,
    pub user_name: String,
    /// Local calendar date (America/Denver) of the start.
    pub date: String,
    pub start: String,
    pub end: Option<String>,
    pub start_ms: i64,
    pub end_ms: Option<i64>,
    /// Hours rounded to two decimals; empty for entries without an end.
    pub hours: Option<f64>,
}

impl TimeLogExport {
    pub fn from_entry(entry: &TimeLogEntry, roster: &[User]) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id.clone(),
            user_name: display_name(roster, &entry.user_id).to_string(),
            date: entry.local_date().format("%Y-%m-%d").to_string(),
            start: to_rfc3339_local(entry.start_time),
            end: entry.end_time.map(to_rfc3339_local),
            start_ms: entry.start_time,
            end_ms: entry.end_time,
            hours: entry
                .end_time
                .map(|end| (ms_to_hours(end - entry.start_time) * 100.0).round() / 100.0),
        }
    }
}
