//! Logger construction shared by the collector and server binaries

use std::env;

use slog::{o, Drain, Level, Logger};

/// Map a textual level onto an slog level, defaulting to `Info`.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

/// Build the root logger. An explicit level wins over `RUST_LOG`.
pub fn setup_logger(level: Option<&str>) -> Logger {
    let log_level = match level {
        Some(level) => parse_level(level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    };

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(log_level).fuse();
    Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

/// Logger that drops everything, for tests and library callers without output.
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}
