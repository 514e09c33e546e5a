//! TOML config file discovery and loading.
//!
//! Each binary merges three layers: command-line flags (clap also fills a
//! flag from its `DUST_*` environment variable when the flag is absent), then
//! the first config file found by [`find_config_file`], then built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where a config file was found, or [`ConfigSource::Defaults`] when none was.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Named by a flag or by the binary's config env var
    Explicit(PathBuf),
    CurrentDir(PathBuf),
    /// `$XDG_CONFIG_HOME/dust-monitor/`, else `~/.config/dust-monitor/`
    XdgConfig(PathBuf),
    /// `/etc/dust-monitor/`
    System(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// First existing file among [`search_paths`], e.g.
/// `find_config_file("DUST_SERVER_CONFIG", "server.toml")`.
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    search_paths(env_var, filename)
        .into_iter()
        .find(|source| source.path().is_some_and(|p| p.exists()))
        .unwrap_or(ConfigSource::Defaults)
}

/// Candidate locations for `filename`, most specific first: the path in
/// `env_var`, the working directory, the XDG config dir, then `/etc`.
pub fn search_paths(env_var: &str, filename: &str) -> Vec<ConfigSource> {
    let mut candidates = Vec::with_capacity(4);
    if let Ok(path) = env::var(env_var) {
        candidates.push(ConfigSource::Explicit(PathBuf::from(path)));
    }
    candidates.push(ConfigSource::CurrentDir(PathBuf::from(filename)));
    candidates.push(ConfigSource::XdgConfig(xdg_config_dir().join(filename)));
    candidates.push(ConfigSource::System(
        Path::new("/etc").join(APP_NAME).join(filename),
    ));
    candidates
}

fn xdg_config_dir() -> PathBuf {
    match (env::var("XDG_CONFIG_HOME"), env::var("HOME")) {
        (Ok(xdg), _) => PathBuf::from(xdg).join(APP_NAME),
        (_, Ok(home)) => PathBuf::from(home).join(".config").join(APP_NAME),
        _ => Path::new(".config").join(APP_NAME),
    }
}

/// Load and parse a TOML configuration file
///
/// Returns `T::default()` when the source is [`ConfigSource::Defaults`],
/// and an error when the file cannot be read or is not valid TOML for `T`.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    match source.path() {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let config: T = toml::from_str(&content)?;
            Ok(config)
        }
        None => Ok(T::default()),
    }
}
