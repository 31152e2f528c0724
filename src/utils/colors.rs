/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Color of a rendered cell:
/// sentinel → red
/// empty → grey
/// anything else → reset
pub fn color_for_cell(value: &str) -> &'static str {
    let v = value.trim();
    if v == crate::models::SENTINEL {
        RED
    } else if v.is_empty() {
        GREY
    } else {
        RESET
    }
}

/// Wrap a value in the color `color_for_cell` picks for it.
pub fn colorize_cell(value: &str) -> String {
    match color_for_cell(value) {
        RESET => value.to_string(),
        color => format!("{color}{value}{RESET}"),
    }
}
