/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Returns GREY when the value is a placeholder ("", "--", "0m").
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" || value.trim() == "0m" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// Due dates: overdue or due today in yellow, future ones in grey.
pub fn colorize_due(value: &str, due: bool) -> String {
    if due {
        format!("{YELLOW}{value}{RESET}")
    } else {
        format!("{GREY}{value}{RESET}")
    }
}
