use crate::errors::{AppError, AppResult};
use crate::utils::date::local_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A completed (or, for virtual rows, still running) work interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeLogEntry {
    pub id: i64,
    pub user_id: String,
    pub start_time: i64,       // ms since epoch
    pub end_time: Option<i64>, // None ⇔ still running
}

impl TimeLogEntry {
    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }

    /// Duration in ms, open entries measured up to `now_ms`. Never negative:
    /// a marker written by a session whose clock runs ahead counts as zero.
    pub fn duration_ms(&self, now_ms: i64) -> i64 {
        (self.end_time.unwrap_or(now_ms) - self.start_time).max(0)
    }

    pub fn local_date(&self) -> NaiveDate {
        local_date(self.start_time)
    }

    pub fn overlaps(&self, other: &TimeLogEntry, now_ms: i64) -> bool {
        let a_end = self.end_time.unwrap_or(now_ms);
        let b_end = other.end_time.unwrap_or(now_ms);
        self.start_time < b_end && other.start_time < a_end
    }
}

/// Entry as produced by a stopped timer, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeLog {
    pub user_id: String,
    pub start_time: i64,
    pub end_time: Option<i64>,
}

impl NewTimeLog {
    pub fn closed(user_id: impl Into<String>, start_time: i64, end_time: i64) -> Self {
        Self {
            user_id: user_id.into(),
            start_time,
            end_time: Some(end_time),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        check_interval(self.start_time, self.end_time)
    }

    pub fn into_entry(self, id: i64) -> TimeLogEntry {
        TimeLogEntry {
            id,
            user_id: self.user_id,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Admin correction: only the provided fields are replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeLogPatch {
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl TimeLogPatch {
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }

    /// Apply to a copy of `entry` and validate the result.
    pub fn apply(&self, entry: &TimeLogEntry) -> AppResult<TimeLogEntry> {
        let mut out = entry.clone();
        if let Some(s) = self.start_time {
            out.start_time = s;
        }
        if let Some(e) = self.end_time {
            out.end_time = Some(e);
        }
        check_interval(out.start_time, out.end_time)?;
        Ok(out)
    }
}

pub fn check_interval(start: i64, end: Option<i64>) -> AppResult<()> {
    match end {
        Some(end) if end < start => Err(AppError::InvalidInterval { start, end }),
        _ => Ok(()),
    }
}

/// Inclusive range of local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start > end {
            return Err(AppError::InvalidDateRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Compare the local calendar date of `ms`, not the instant itself.
    pub fn contains_instant(&self, ms: i64) -> bool {
        let d = local_date(ms);
        d >= self.start && d <= self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub user_id: Option<String>,
    pub date_range: Option<DateRange>,
}

impl LogFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            date_range: None,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn matches(&self, entry: &TimeLogEntry) -> bool {
        if let Some(u) = &self.user_id
            && &entry.user_id != u
        {
            return false;
        }
        match &self.date_range {
            Some(r) => r.contains_instant(entry.start_time),
            None => true,
        }
    }
}

/// Newest first; ties broken by id so the order is stable.
pub fn sort_desc(entries: &mut [TimeLogEntry]) {
    entries.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ms(rfc: &str) -> i64 {
        DateTime::parse_from_rfc3339(rfc).unwrap().timestamp_millis()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn patch_keeps_untouched_fields_and_validates() {
        let e = NewTimeLog::closed("u1", 1_000, 5_000).into_entry(7);
        let p = TimeLogPatch {
            start_time: Some(2_000),
            end_time: None,
        };
        let out = p.apply(&e).unwrap();
        assert_eq!(out.start_time, 2_000);
        assert_eq!(out.end_time, Some(5_000));

        let bad = TimeLogPatch {
            start_time: Some(6_000),
            end_time: None,
        };
        assert!(matches!(
            bad.apply(&e),
            Err(AppError::InvalidInterval { start: 6_000, end: 5_000 })
        ));
    }

    #[test]
    fn zero_length_interval_is_valid() {
        assert!(NewTimeLog::closed("u1", 10, 10).validate().is_ok());
        assert!(NewTimeLog::closed("u1", 10, 9).validate().is_err());
    }

    #[test]
    fn open_entry_duration_is_never_negative() {
        let running = TimeLogEntry {
            id: 0,
            user_id: "u1".into(),
            start_time: 5_000,
            end_time: None,
        };
        assert_eq!(running.duration_ms(2_000), 0);
        assert_eq!(running.duration_ms(8_000), 3_000);
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        assert!(DateRange::new(day(2025, 2, 13), day(2025, 2, 12)).is_err());
        assert!(DateRange::new(day(2025, 2, 12), day(2025, 2, 12)).is_ok());
    }

    #[test]
    fn filter_uses_local_date_of_start() {
        let e = NewTimeLog::closed(
            "u1",
            ms("2025-02-12T23:30:00-07:00"),
            ms("2025-02-13T01:00:00-07:00"),
        )
        .into_entry(1);

        let on_12 = LogFilter::for_user("u1").with_range(DateRange::single(day(2025, 2, 12)));
        let on_13 = LogFilter::for_user("u1").with_range(DateRange::single(day(2025, 2, 13)));
        let other = LogFilter::for_user("u2");

        assert!(on_12.matches(&e));
        assert!(!on_13.matches(&e));
        assert!(!other.matches(&e));
        assert!(LogFilter::default().matches(&e));
    }

    #[test]
    fn overlap_is_strict() {
        let a = NewTimeLog::closed("u1", 0, 100).into_entry(1);
        let b = NewTimeLog::closed("u1", 100, 200).into_entry(2);
        let c = NewTimeLog::closed("u1", 50, 150).into_entry(3);
        assert!(!a.overlaps(&b, 1_000));
        assert!(a.overlaps(&c, 1_000));
        assert!(c.overlaps(&b, 1_000));
    }

    #[test]
    fn sort_is_newest_first() {
        let mut v = vec![
            NewTimeLog::closed("u1", 10, 20).into_entry(1),
            NewTimeLog::closed("u1", 30, 40).into_entry(2),
            NewTimeLog::closed("u1", 30, 50).into_entry(3),
        ];
        sort_desc(&mut v);
        let ids: Vec<i64> = v.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
