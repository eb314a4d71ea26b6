/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Running rows ("Active" end, "Running..." duration) are shown in green.
pub fn colorize_running(value: &str, running: bool) -> String {
    if running {
        format!("{GREEN}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// Unknown roster entries are greyed out.
pub fn colorize_name(name: &str, known: bool) -> String {
    if known {
        name.to_string()
    } else {
        format!("{GREY}{name}{RESET}")
    }
}

/// Zero hours grey, anything else yellow.
pub fn color_for_hours(hours: f64) -> &'static str {
    if hours > 0.0 { YELLOW } else { GREY }
}
