use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::logging::setup_logging;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Deserialize, Debug, Clone)]
pub struct WebServer {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DBConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

impl DBConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

fn default_connect_timeout() -> u64 { 5 }
fn default_query_timeout() -> u64 { 10 }

#[derive(Deserialize, Debug, Clone, Default)]
pub struct General {
    pub log_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub web_server: WebServer,
    pub db: DBConfig,
    #[serde(default)]
    pub general: General,
}

/// Reads the configuration file and sets up logging
///
/// The configuration path is taken from the first command line argument, then from the
/// `CONFIG_PATH` environment variable, and finally defaults to `config.toml`.
pub fn config() -> Result<Config, ConfigError> {
    let config_path = std::env::args().nth(1)
        .or_else(|| std::env::var("CONFIG_PATH").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = load_config(&config_path)?;

    let level = parse_level(config.general.log_level.as_deref())?;
    setup_logging(config.general.log_path.as_deref(), level)?;

    Ok(config)
}

/// Loads and parses a TOML configuration file
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)
        .map_err(|e| ConfigError(format!("unable to read {}: {}", config_path, e)))?;

    parse_config(&toml)
}

fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(toml)?;
    if config.db.query_timeout_secs <= config.db.connect_timeout_secs {
        return Err(ConfigError(format!(
            "db.query_timeout_secs ({}) must be greater than db.connect_timeout_secs ({})",
            config.db.query_timeout_secs, config.db.connect_timeout_secs,
        )));
    }

    Ok(config)
}

fn parse_level(level: Option<&str>) -> Result<LevelFilter, ConfigError> {
    match level {
        None => Ok(LevelFilter::Info),
        Some(l) => l.parse::<LevelFilter>()
            .map_err(|_| ConfigError(format!("unknown log level: {}", l))),
    }
}
