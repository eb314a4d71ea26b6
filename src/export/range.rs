// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::models::time_log::DateRange;
use chrono::{Datelike, NaiveDate};

fn bad(msg: &str, input: &str) -> AppError {
    AppError::InvalidDateRange(format!("{msg}: '{input}'"))
}

/// Parse `--range` (year / month / day / interval of the same granularity).
///
/// Accepted:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<DateRange> {
    let r = r.trim();
    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let (start, end) = (start_raw.trim(), end_raw.trim());
        if start.len() != end.len() {
            return Err(bad("start and end must have the same format", r));
        }
        let (first, _) = bounds(start)?;
        let (_, last) = bounds(end)?;
        DateRange::new(first, last)
    } else {
        let (first, last) = bounds(r)?;
        DateRange::new(first, last)
    }
}

/// First and last day covered by a single YYYY, YYYY-MM or YYYY-MM-DD token.
fn bounds(token: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match token.len() {
        4 => {
            let y: i32 = token.parse().map_err(|_| bad("invalid year", token))?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| bad("invalid year", token))?;
            let last =
                NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| bad("invalid year", token))?;
            Ok((first, last))
        }
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{token}-01"), "%Y-%m-%d")
                .map_err(|_| bad("invalid month", token))?;
            Ok((first, last_day_of_month(first)))
        }
        10 => {
            let d = NaiveDate::parse_from_str(token, "%Y-%m-%d")
                .map_err(|_| bad("invalid date", token))?;
            Ok((d, d))
        }
        _ => Err(bad("unsupported --range format", token)),
    }
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(first)
}
