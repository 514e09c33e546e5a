//! Dust Monitor Core Library
//!
//! Shared utilities for the collector and server:
//! - Configuration loading (XDG-compliant)
//! - Logger setup

mod config;
mod logging;

pub use config::{find_config_file, load_config, search_paths, ConfigSource};
pub use logging::{discard_logger, parse_level, setup_logger};

/// Application name used for XDG paths
pub const APP_NAME: &str = "dust-monitor";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default lookback window when a request names neither hours nor dates
pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

/// Default result cache lifetime (5 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
