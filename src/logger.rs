//! Logging utilities with colored task prefixes.
//!
//! Provides the `log!` macro for formatted terminal output. Every line
//! carries a bracketed task prefix, colored by task kind:
//!
//! ```ignore
//! log!("pages"; "rendered {} files", count);
//! log!("error"; "{}: {:#}", path.display(), err);
//! ```

use colored::{ColoredString, Colorize};
use crossterm::terminal::size;
use std::{
    io::{Write, stderr},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of "[", "]" and the trailing space around a prefix
const PREFIX_DECORATION_LEN: usize = 3;

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120)) as usize
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored task prefix.
///
/// # Usage
/// ```ignore
/// log!("task"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($task:expr; $($arg:tt)*) => {{
        $crate::logger::log($task, &format!($($arg)*))
    }};
}

// ============================================================================
// Implementation
// ============================================================================

/// Log a message with a colored task prefix.
///
/// Single-line messages are truncated to the terminal width; multi-line
/// messages (external command output, template errors) are printed whole.
pub fn log(task: &str, message: &str) {
    let prefix = colorize_prefix(task);
    let mut stderr = stderr().lock();

    if message.contains('\n') {
        writeln!(stderr, "{prefix} {message}").ok();
    } else {
        let max_msg_len = terminal_width().saturating_sub(task.len() + PREFIX_DECORATION_LEN);
        writeln!(stderr, "{prefix} {}", truncate_str(message, max_msg_len)).ok();
    }

    stderr.flush().ok();
}

/// Apply color to a task prefix based on task kind.
fn colorize_prefix(task: &str) -> ColoredString {
    let prefix = format!("[{task}]");
    match task {
        "serve" => prefix.bright_blue().bold(),
        "watch" => prefix.bright_green().bold(),
        "error" | "lint" => prefix.bright_red().bold(),
        "deploy" | "git" => prefix.bright_magenta().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_str_exact_length() {
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "é" is 2 bytes; truncating mid-char must back up to a boundary
        let s = "éé";
        assert_eq!(truncate_str(s, 3), "é");
        assert_eq!(truncate_str(s, 2), "é");
        assert_eq!(truncate_str(s, 1), "");
    }

    #[test]
    fn test_truncate_str_empty() {
        assert_eq!(truncate_str("", 10), "");
    }

    #[test]
    fn test_truncate_str_zero_limit() {
        assert_eq!(truncate_str("hello", 0), "");
    }
}
