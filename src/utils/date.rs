//! Calendar helpers pinned to the reference time zone.
//! Every date-range comparison and every formatted timestamp goes through
//! America/Denver, whatever the machine's own locale says.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const REFERENCE_TZ: Tz = chrono_tz::America::Denver;
pub const REFERENCE_TZ_NAME: &str = "America/Denver";

fn to_local(ms: i64) -> DateTime<Tz> {
    // out-of-range instants collapse to the epoch
    let utc = DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default();
    utc.with_timezone(&REFERENCE_TZ)
}

/// Local calendar date of an instant.
pub fn local_date(ms: i64) -> NaiveDate {
    to_local(ms).date_naive()
}

pub fn today(now_ms: i64) -> NaiveDate {
    local_date(now_ms)
}

/// `2/12/2025, 11:30 PM`
pub fn format_local_datetime(ms: i64) -> String {
    to_local(ms).format("%-m/%-d/%Y, %-I:%M %p").to_string()
}

/// `2/12/2025`
pub fn format_local_date(ms: i64) -> String {
    to_local(ms).format("%-m/%-d/%Y").to_string()
}

/// `2025-02-12T23:30:00-07:00`
pub fn to_rfc3339_local(ms: i64) -> String {
    to_local(ms).to_rfc3339()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a timestamp typed by an admin.
///
/// Accepts RFC 3339 (`2025-02-12T23:30:00-07:00`) or a wall-clock time in the
/// reference zone (`2025-02-12 23:30` / `2025-02-12T23:30`). During the autumn
/// DST fold the earlier of the two instants is used; wall-clock times skipped
/// by the spring jump are rejected.
pub fn parse_local_datetime(s: &str) -> AppResult<i64> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }

    let naive = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| AppError::InvalidTime(s.to_string()))?;

    match REFERENCE_TZ.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.timestamp_millis()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp_millis()),
        LocalResult::None => Err(AppError::InvalidTime(format!(
            "{} does not exist in {}",
            s, REFERENCE_TZ_NAME
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(rfc: &str) -> i64 {
        DateTime::parse_from_rfc3339(rfc).unwrap().timestamp_millis()
    }

    #[test]
    fn late_evening_stays_on_the_local_day() {
        // 06:30 UTC on the 13th is 23:30 MST on the 12th
        let t = ms("2025-02-13T06:30:00Z");
        assert_eq!(local_date(t), NaiveDate::from_ymd_opt(2025, 2, 12).unwrap());
    }

    #[test]
    fn summer_uses_daylight_offset() {
        // MDT is UTC-6: 05:30 UTC is still the previous local day
        let t = ms("2025-07-04T05:30:00Z");
        assert_eq!(local_date(t), NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        let t = ms("2025-07-04T06:30:00Z");
        assert_eq!(local_date(t), NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
    }

    #[test]
    fn formats_like_en_us() {
        let t = ms("2025-02-12T23:30:00-07:00");
        assert_eq!(format_local_datetime(t), "2/12/2025, 11:30 PM");
        assert_eq!(format_local_date(t), "2/12/2025");
    }

    #[test]
    fn parses_wall_clock_in_reference_zone() {
        assert_eq!(
            parse_local_datetime("2025-02-12 09:00").unwrap(),
            ms("2025-02-12T09:00:00-07:00")
        );
        assert_eq!(
            parse_local_datetime("2025-02-12T09:00:00Z").unwrap(),
            ms("2025-02-12T09:00:00Z")
        );
        assert!(parse_local_datetime("yesterday").is_err());
    }

    #[test]
    fn dst_gap_is_rejected_and_fold_takes_earliest() {
        // 2025-03-09 02:30 does not exist in Denver
        assert!(parse_local_datetime("2025-03-09 02:30").is_err());
        // 2025-11-02 01:30 happens twice; MDT comes first
        assert_eq!(
            parse_local_datetime("2025-11-02 01:30").unwrap(),
            ms("2025-11-02T01:30:00-06:00")
        );
    }
}
