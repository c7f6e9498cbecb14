#![deny(missing_docs)]
//! Shared logging bootstrap for the engine workspace.
//!
//! The engine itself only emits through the `log` facade; binaries and tests
//! that embed it pick a backend here.

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

/// Initializes a terminal logger at the given level for embedding binaries.
///
/// Safely no-ops if another logger has already been installed.
pub fn init_terminal(level: LevelFilter) {
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

/// Initializes a terminal logger for use in tests.
///
/// Uses debug level in debug builds, info in release builds, and ignores the
/// error if a logger was already set by another test.
pub fn init_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    init_terminal(level);
}
