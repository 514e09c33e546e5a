use clap::{Args, Parser, ValueEnum};
use dust_monitor_core::{find_config_file, load_config, ConfigSource, DEFAULT_CACHE_TTL_SECS};
use serde::Deserialize;
use slog::Logger;
use std::{collections::HashMap, sync::Arc, time::Duration as StdDuration};

use crate::{
    CoordinatePatcher, Coordinates, DustService, Error, FetchConfig, FetchOrchestrator,
    MesonetClient, MesonetCsvParser, ReportBuilder, ResultCache, RetryPolicy, SystemClock,
    DEFAULT_ARCHIVE_URL,
};

/// Upstream and pipeline tunables shared by every binary that hosts a [`DustService`].
#[derive(Args, Clone, Debug, Deserialize, Default)]
pub struct FetchSettings {
    /// Mesonet ASOS download endpoint
    #[arg(long, env = "DUST_BASE_URL")]
    pub base_url: Option<String>,

    /// Station networks to query, comma separated
    #[arg(long, env = "DUST_NETWORKS", value_delimiter = ',')]
    pub networks: Option<Vec<String>>,

    /// Networks per upstream request
    #[arg(long, env = "DUST_NETWORK_CHUNK_SIZE")]
    pub network_chunk_size: Option<usize>,

    /// Longest date range, in days, sent in one upstream request
    #[arg(long, env = "DUST_WINDOW_SPAN_DAYS")]
    pub window_span_days: Option<u32>,

    /// Upstream requests allowed in flight at once
    #[arg(long, env = "DUST_MAX_IN_FLIGHT")]
    pub max_in_flight: Option<usize>,

    /// Retries per request after the first attempt
    #[arg(long, env = "DUST_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Backoff unit in milliseconds; attempt `i` waits `i` units
    #[arg(long, env = "DUST_RETRY_BASE_DELAY_MS")]
    pub retry_base_delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, env = "DUST_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// How long a fetched window is served from memory, in seconds
    #[arg(long, env = "DUST_CACHE_TTL_SECS")]
    pub cache_ttl_secs: Option<u64>,

    /// HTTP User-Agent header for upstream requests
    #[arg(long, env = "DUST_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Extra station coordinate corrections (config file only)
    #[arg(skip)]
    pub coordinates: Option<HashMap<String, Coordinates>>,
}

impl FetchSettings {
    /// Field-wise merge, `self` winning over `fallback`.
    pub fn or(self, fallback: FetchSettings) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.or(fallback.base_url),
            networks: self.networks.or(fallback.networks),
            network_chunk_size: self.network_chunk_size.or(fallback.network_chunk_size),
            window_span_days: self.window_span_days.or(fallback.window_span_days),
            max_in_flight: self.max_in_flight.or(fallback.max_in_flight),
            max_retries: self.max_retries.or(fallback.max_retries),
            retry_base_delay_ms: self.retry_base_delay_ms.or(fallback.retry_base_delay_ms),
            request_timeout_secs: self.request_timeout_secs.or(fallback.request_timeout_secs),
            cache_ttl_secs: self.cache_ttl_secs.or(fallback.cache_ttl_secs),
            user_agent: self.user_agent.or(fallback.user_agent),
            coordinates: self.coordinates.or(fallback.coordinates),
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_ARCHIVE_URL.to_string())
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("dust-monitor/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn request_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.request_timeout_secs.unwrap_or(45))
    }

    pub fn cache_ttl(&self) -> time::Duration {
        let secs = self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS);
        time::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    pub fn fetch_config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        let retry = RetryPolicy::new(
            self.max_retries.unwrap_or(defaults.retry.max_retries),
            self.retry_base_delay_ms
                .map(StdDuration::from_millis)
                .unwrap_or(defaults.retry.base_delay),
        );
        FetchConfig {
            networks: self.networks.clone().unwrap_or(defaults.networks),
            network_chunk_size: self
                .network_chunk_size
                .unwrap_or(defaults.network_chunk_size),
            window_span_days: self.window_span_days.unwrap_or(defaults.window_span_days),
            max_in_flight: self.max_in_flight.unwrap_or(defaults.max_in_flight),
            retry,
        }
    }

    pub fn patcher(&self) -> CoordinatePatcher {
        CoordinatePatcher::default().with_overrides(self.coordinates.clone().unwrap_or_default())
    }

    /// Wire up the mesonet client, orchestrator and cache behind one service.
    pub fn build_service(&self, logger: &Logger) -> Result<DustService, Error> {
        let client = MesonetClient::new(
            logger.clone(),
            self.base_url(),
            &self.user_agent(),
            self.request_timeout(),
        )?;
        let orchestrator = FetchOrchestrator::new(
            logger.clone(),
            Arc::new(client),
            Arc::new(MesonetCsvParser),
            Arc::new(self.patcher()),
            self.fetch_config(),
        )?;
        let clock = Arc::new(SystemClock);
        let cache = ResultCache::new(logger.clone(), self.cache_ttl(), clock.clone());
        Ok(DustService::new(
            logger.clone(),
            orchestrator,
            cache,
            clock,
            ReportBuilder::default(),
        ))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Every classified observation
    #[default]
    All,
    Summary,
    Map,
    Windrose,
    /// Daily regional report, needs --date
    Report,
}

#[derive(Parser, Clone, Debug, Deserialize, Default)]
#[command(
    author,
    version,
    about = "Dust collector - Fetches dust and sand METARs and prints one view as JSON"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $DUST_COLLECTOR_CONFIG, ./collector.toml,
    /// $XDG_CONFIG_HOME/dust-monitor/collector.toml, /etc/dust-monitor/collector.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "DUST_COLLECTOR_LEVEL")]
    pub level: Option<String>,

    #[command(flatten)]
    #[serde(flatten)]
    pub fetch: FetchSettings,

    /// Which view to print
    #[arg(short, long, value_enum)]
    pub view: Option<View>,

    /// Look back this many hours (default 24)
    #[arg(long)]
    pub hours: Option<u32>,

    /// Range start, YYYY-MM-DD (used together with --end)
    #[arg(short, long)]
    pub start: Option<String>,

    /// Range end, YYYY-MM-DD (used together with --start)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Report date, YYYY-MM-DD
    #[arg(short, long)]
    pub date: Option<String>,

    /// Only this station (all and windrose views)
    #[arg(long)]
    pub station: Option<String>,
}

impl Cli {
    pub fn view(&self) -> View {
        self.view.unwrap_or_default()
    }

    /// CLI args override file config (env vars are handled by clap)
    pub fn merge(self, file_config: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file_config.level),
            fetch: self.fetch.or(file_config.fetch),
            view: self.view.or(file_config.view),
            hours: self.hours.or(file_config.hours),
            start: self.start.or(file_config.start),
            end: self.end.or(file_config.end),
            date: self.date.or(file_config.date),
            station: self.station.or(file_config.station),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> anyhow::Result<Cli> {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("DUST_COLLECTOR_CONFIG", "collector.toml")
    };

    let file_config: Cli = load_config(&source)?;
    Ok(cli_args.merge(file_config))
}
