// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Simple diagnostics library for the sqlplan workspace
//!
//! Provides lightweight, configurable logging across all crates in the project.
//!
//! Usage:
//! - Set SQLPLAN_LOG=off (default) - no logs
//! - Set SQLPLAN_LOG=info - one line per stage invocation
//! - Set SQLPLAN_LOG=debug - discovered files, plan units, resolved queries

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable selecting the minimum log level
pub const LOG_ENV: &str = "SQLPLAN_LOG";

static INIT: Once = Once::new();

/// Initialize diagnostics based on the SQLPLAN_LOG environment variable
///
/// This should be called once at application startup. It's safe to call
/// multiple times - subsequent calls will be ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let log_level = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());

        match parse_level(&log_level) {
            Some(None) => {}
            Some(Some(level)) => install(level),
            None => {
                install(emit::Level::Info);
                emit::warn!(
                    "unknown {var} value {value}, using info",
                    var: LOG_ENV,
                    value: log_level
                );
            }
        }
    });
}

/// Maps a level name to a filter. `Some(None)` means logging is off,
/// `None` means the name was not recognised.
fn parse_level(name: &str) -> Option<Option<emit::Level>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "" | "off" => Some(None),
        "debug" => Some(Some(emit::Level::Debug)),
        "info" => Some(Some(emit::Level::Info)),
        "warn" => Some(Some(emit::Level::Warn)),
        "error" => Some(Some(emit::Level::Error)),
        _ => None,
    }
}

fn install(level: emit::Level) {
    let rt = emit::setup()
        .emit_to(emit_term::stderr())
        .emit_when(emit::level::min_filter(level))
        .init();

    // The runtime lives for the rest of the process; stdout stays reserved
    // for stage responses.
    std::mem::forget(rt);
}

/// Log one line per stage invocation (files discovered, units planned, query resolved)
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (individual files, plan units, query text)
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log conditions that don't stop the stage but should be noted
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log a failed stage with the offending field or file
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        init_diagnostics();
        init_diagnostics();
        init_diagnostics();
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("off"), Some(None));
        assert_eq!(parse_level(""), Some(None));
        assert_eq!(parse_level("DEBUG"), Some(Some(emit::Level::Debug)));
        assert_eq!(parse_level(" warn "), Some(Some(emit::Level::Warn)));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_macros_compile() {
        info!("Test message");
        debug!("Debug message with {value}", value: 42);
        warn!("Warning message");
        error!("Error message");
    }
}
