use clap::Parser;
use collector::FetchSettings;
use dust_monitor_core::{find_config_file, load_config, ConfigSource, DEFAULT_SERVER_PORT};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Dust monitor server - Serves dust and sand METAR views over HTTP"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $DUST_SERVER_CONFIG, ./server.toml,
    /// $XDG_CONFIG_HOME/dust-monitor/server.toml, /etc/dust-monitor/server.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "DUST_SERVER_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(long, env = "DUST_SERVER_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "DUST_SERVER_PORT")]
    pub port: Option<u16>,

    #[command(flatten)]
    #[serde(flatten)]
    pub fetch: FetchSettings,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn host(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// CLI args override file config (env vars are handled by clap)
    pub fn merge(self, file_config: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file_config.level),
            host: self.host.or(file_config.host),
            port: self.port.or(file_config.port),
            fetch: self.fetch.or(file_config.fetch),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> anyhow::Result<Cli> {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("DUST_SERVER_CONFIG", "server.toml")
    };

    let file_config: Cli = load_config(&source)?;
    Ok(cli_args.merge(file_config))
}
