//! Billable hours over an inclusive range of Mountain-time calendar dates.
//!
//! An entry belongs to the range when the local date of its start falls in
//! it. Open timers count up to "now", so a report that includes one keeps
//! growing until the timer is stopped.

use crate::clock::Clock;
use crate::core::ledger::{TimeLogLedger, running_rows};
use crate::core::timer::TimerStore;
use crate::errors::{AppError, AppResult};
use crate::models::time_log::{DateRange, LogFilter};
use crate::storage::traits::{LedgerStore, TimerMarkerStore};
use crate::utils::date::parse_date;
use crate::utils::formatting::ms_to_hours;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollReport {
    pub user_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub hours: f64,
    pub entries: usize,
    /// True when an open timer contributed; the total moves with the clock.
    pub includes_running: bool,
}

pub struct PayrollReportEngine<'a, S, C>
where
    S: TimerMarkerStore + LedgerStore + ?Sized,
    C: Clock,
{
    ledger: TimeLogLedger<'a, S>,
    timers: TimerStore<'a, S, C>,
}

impl<'a, S, C> PayrollReportEngine<'a, S, C>
where
    S: TimerMarkerStore + LedgerStore + ?Sized,
    C: Clock,
{
    pub fn new(store: &'a S, clock: C) -> Self {
        Self {
            ledger: TimeLogLedger::new(store),
            timers: TimerStore::new(store, clock),
        }
    }

    /// Form-style entry point: any unset input yields 0.0, not an error.
    /// Dates are `YYYY-MM-DD`; unparseable text or `start > end` fail with
    /// `InvalidDateRange`.
    pub fn compute_billable_hours(
        &self,
        user_id: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> AppResult<f64> {
        let (Some(user_id), Some(start), Some(end)) = (
            non_empty(user_id),
            non_empty(start),
            non_empty(end),
        ) else {
            return Ok(0.0);
        };

        let start = parse_date(start)
            .ok_or_else(|| AppError::InvalidDateRange(format!("invalid start date '{start}'")))?;
        let end = parse_date(end)
            .ok_or_else(|| AppError::InvalidDateRange(format!("invalid end date '{end}'")))?;

        self.billable_hours(user_id, start, end)
    }

    pub fn billable_hours(&self, user_id: &str, start: NaiveDate, end: NaiveDate) -> AppResult<f64> {
        Ok(self.report(user_id, DateRange::new(start, end)?)?.hours)
    }

    pub fn report(&self, user_id: &str, range: DateRange) -> AppResult<PayrollReport> {
        let filter = LogFilter::for_user(user_id).with_range(range);

        let open: BTreeMap<String, i64> = self
            .timers
            .running_since(user_id)?
            .map(|started_at| BTreeMap::from([(user_id.to_string(), started_at)]))
            .unwrap_or_default();
        // read after the marker so a start landing in between is not in the future
        let now = self.timers.now_ms();

        let mut rows = self.ledger.query(&filter)?;
        rows.extend(running_rows(&open).into_iter().filter(|r| filter.matches(r)));

        let total_ms: i64 = rows.iter().map(|e| e.duration_ms(now)).sum();

        Ok(PayrollReport {
            user_id: user_id.to_string(),
            start: range.start,
            end: range.end,
            hours: ms_to_hours(total_ms),
            entries: rows.len(),
            includes_running: rows.iter().any(|e| e.is_running()),
        })
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::time_log::NewTimeLog;
    use crate::storage::memory::MemoryStore;
    use chrono::DateTime;

    fn ms(rfc: &str) -> i64 {
        DateTime::parse_from_rfc3339(rfc).unwrap().timestamp_millis()
    }

    fn seed(store: &MemoryStore, user: &str, from: &str, to: &str) {
        TimeLogLedger::new(store)
            .append(&NewTimeLog::closed(user, ms(from), ms(to)))
            .unwrap();
    }

    #[test]
    fn two_shifts_on_one_day_sum_to_nine_hours() {
        let store = MemoryStore::new();
        seed(&store, "u1", "2025-02-12T09:00:00-07:00", "2025-02-12T17:00:00-07:00");
        seed(&store, "u1", "2025-02-12T18:00:00-07:00", "2025-02-12T19:00:00-07:00");
        seed(&store, "u2", "2025-02-12T09:00:00-07:00", "2025-02-12T10:00:00-07:00");

        let engine = PayrollReportEngine::new(&store, ManualClock::at("2025-03-01T00:00:00Z"));
        let hours = engine
            .compute_billable_hours(Some("u1"), Some("2025-02-12"), Some("2025-02-12"))
            .unwrap();
        assert_eq!(hours, 9.0);
    }

    #[test]
    fn late_shift_counts_on_its_local_day() {
        let store = MemoryStore::new();
        seed(&store, "u1", "2025-02-12T23:30:00-07:00", "2025-02-13T00:30:00-07:00");
        let engine = PayrollReportEngine::new(&store, ManualClock::at("2025-03-01T00:00:00Z"));

        assert_eq!(
            engine
                .compute_billable_hours(Some("u1"), Some("2025-02-12"), Some("2025-02-12"))
                .unwrap(),
            1.0
        );
        assert_eq!(
            engine
                .compute_billable_hours(Some("u1"), Some("2025-02-13"), Some("2025-02-13"))
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn unset_inputs_yield_zero() {
        let store = MemoryStore::new();
        seed(&store, "u1", "2025-02-12T09:00:00-07:00", "2025-02-12T17:00:00-07:00");
        let engine = PayrollReportEngine::new(&store, ManualClock::new(0));

        assert_eq!(engine.compute_billable_hours(None, Some("2025-02-12"), Some("2025-02-12")).unwrap(), 0.0);
        assert_eq!(engine.compute_billable_hours(Some("u1"), None, Some("2025-02-12")).unwrap(), 0.0);
        assert_eq!(engine.compute_billable_hours(Some("u1"), Some("2025-02-12"), Some("  ")).unwrap(), 0.0);
    }

    #[test]
    fn malformed_dates_are_invalid_ranges() {
        let store = MemoryStore::new();
        let engine = PayrollReportEngine::new(&store, ManualClock::new(0));

        assert!(matches!(
            engine.compute_billable_hours(Some("u1"), Some("2025-13-01"), Some("2025-02-12")),
            Err(AppError::InvalidDateRange(_))
        ));
        assert!(matches!(
            engine.compute_billable_hours(Some("u1"), Some("2025-02-13"), Some("2025-02-12")),
            Err(AppError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn open_timer_counts_up_to_now_and_keeps_growing() {
        let store = MemoryStore::new();
        let clock = ManualClock::at("2025-02-12T10:00:00-07:00");
        TimerStore::new(&store, clock.clone()).start("u3").unwrap();
        clock.advance_secs(3 * 3600);

        let engine = PayrollReportEngine::new(&store, clock.clone());
        let today = crate::utils::date::today(clock.now_ms());
        let first = engine.billable_hours("u3", today, today).unwrap();
        assert!((first - 3.0).abs() < 1e-9);

        clock.advance_secs(90);
        let later = engine.report("u3", DateRange::single(today)).unwrap();
        assert!(later.hours > first);
        assert!(later.includes_running);
        assert_eq!(later.entries, 1);
    }

    #[test]
    fn timer_started_by_a_clock_running_ahead_counts_as_zero() {
        let store = MemoryStore::new();
        let field = ManualClock::at("2025-02-12T09:10:00-07:00");
        let office = ManualClock::at("2025-02-12T09:00:00-07:00");
        TimerStore::new(&store, field).start("u1").unwrap();

        let engine = PayrollReportEngine::new(&store, office.clone());
        let hours = engine
            .compute_billable_hours(Some("u1"), Some("2025-02-12"), Some("2025-02-12"))
            .unwrap();
        assert_eq!(hours, 0.0);

        office.advance_secs(20 * 60);
        let report = engine.report("u1", DateRange::single(local_day("2025-02-12"))).unwrap();
        assert!((report.hours - 10.0 / 60.0).abs() < 1e-9);
        assert!(report.includes_running);
    }

    fn local_day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn open_timer_outside_range_is_ignored() {
        let store = MemoryStore::new();
        let clock = ManualClock::at("2025-02-12T10:00:00-07:00");
        TimerStore::new(&store, clock.clone()).start("u3").unwrap();
        clock.advance_secs(3600);

        let engine = PayrollReportEngine::new(&store, clock);
        let hours = engine
            .compute_billable_hours(Some("u3"), Some("2025-02-10"), Some("2025-02-11"))
            .unwrap();
        assert_eq!(hours, 0.0);
    }
}
