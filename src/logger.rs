//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro that only prints when verbose mode is enabled
//!
//! # Example
//!
//! ```ignore
//! log!("find"; "found {}", path.display());
//! debug!("locate"; "probing {}", candidate.display());
//! ```

use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log_stderr($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// Errors and warnings go to stderr so they never mix with command output
/// (`tiapp show --json | jq`).
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();

    if is_diagnostic(&module_lower) {
        let prefix = colorize_prefix(module, &module_lower, Stream::Stderr);
        let mut out = stderr().lock();
        writeln!(out, "{prefix} {message}").ok();
        out.flush().ok();
    } else {
        let prefix = colorize_prefix(module, &module_lower, Stream::Stdout);
        let mut out = stdout().lock();
        writeln!(out, "{prefix} {message}").ok();
        out.flush().ok();
    }
}

/// Log a message to stderr regardless of module (used by `debug!`).
#[inline]
pub fn log_stderr(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase(), Stream::Stderr);
    let mut out = stderr().lock();
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

#[inline]
fn is_diagnostic(module_lower: &str) -> bool {
    matches!(module_lower, "error" | "warning" | "hint")
}

/// Apply color to a module prefix based on module type.
///
/// Colour is only emitted when `stream` supports it, which also honours
/// `owo_colors::set_override` (`--color never`).
#[inline]
fn colorize_prefix(module: &str, module_lower: &str, stream: Stream) -> String {
    let style = match module_lower {
        "find" => Style::new().bright_blue(),
        "load" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        "warning" => Style::new().yellow(),
        _ => Style::new().bright_yellow(),
    }
    .bold();

    let prefix = format!("[{module}]");
    prefix
        .if_supports_color(stream, |text| text.style(style))
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_plain_when_color_disabled() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("find", "find", Stream::Stdout), "[find]");
        assert_eq!(colorize_prefix("Error", "error", Stream::Stderr), "[Error]");
        owo_colors::unset_override();
    }

    #[test]
    fn test_diagnostic_modules_route_to_stderr() {
        assert!(is_diagnostic("error"));
        assert!(is_diagnostic("warning"));
        assert!(!is_diagnostic("find"));
    }
}
