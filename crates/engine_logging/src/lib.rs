#![deny(missing_docs)]
//! Logging macros shared by the grabber crates.
//!
//! Library crates log through the `engine_*` macros only; the binary decides
//! where records end up. Tests call [`initialize_for_tests`] once.

/// Logs a trace-level record.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: "grabber", $($arg)*);
    }};
}

/// Logs a debug-level record.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: "grabber", $($arg)*);
    }};
}

/// Logs an info-level record.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!(target: "grabber", $($arg)*);
    }};
}

/// Logs a warn-level record.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: "grabber", $($arg)*);
    }};
}

/// Logs an error-level record.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!(target: "grabber", $($arg)*);
    }};
}

/// Installs a capture-friendly logger for test binaries.
///
/// Output goes through `print!` so the test harness only shows it for
/// failing tests. Calling this more than once is harmless.
pub fn initialize_for_tests() {
    use simplelog::{Config, TestLogger};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = TestLogger::init(level, Config::default());
}
