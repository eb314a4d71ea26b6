//! Formatting utilities used for CLI and export outputs.

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Running-timer display: `03:07:42`. Negative spans render as zero.
pub fn hms(ms: i64) -> String {
    let ms = ms.max(0);
    let h = ms / MS_PER_HOUR;
    let m = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let s = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Ledger duration column: `8h 0m 0s`, or `Running...` for an open entry.
pub fn duration_label(start_ms: i64, end_ms: Option<i64>) -> String {
    match end_ms {
        None => "Running...".to_string(),
        Some(end) => {
            let diff = end - start_ms;
            let h = diff / MS_PER_HOUR;
            let m = (diff % MS_PER_HOUR) / MS_PER_MINUTE;
            let s = (diff % MS_PER_MINUTE) / MS_PER_SECOND;
            format!("{}h {}m {}s", h, m, s)
        }
    }
}

pub fn ms_to_hours(ms: i64) -> f64 {
    ms as f64 / MS_PER_HOUR as f64
}

/// Two decimals, the payroll display precision.
pub fn hours2readable(hours: f64) -> String {
    format!("{:.2}", hours)
}
