use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Server {
    pub port: u16,
    pub max_body_size: usize,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            port: 8080,
            max_body_size: 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Logger {
    pub directory: Option<String>,
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Database {
    pub db_uri: String,
    pub max_connections: u32,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            db_uri: "postgres://localhost/wled_usage".into(),
            max_connections: 5,
        }
    }
}

/// Tunables for the aggregated statistics.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Stats {
    /// Length of the trailing window used by the weekly time series.
    pub window_months: u32,
    /// LED count compiled into the firmware; reports carrying it on a fresh
    /// install are treated as unknown hardware.
    pub default_led_count: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            window_months: 3,
            default_led_count: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub database: Database,
    pub stats: Stats,
}

impl Settings {
    pub fn with_config_dir(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name(&format!("{config_dir}/default")).required(false))
            .add_source(File::with_name(&format!("{config_dir}/{run_mode}")).required(false))
            .add_source(File::with_name(&format!("{config_dir}/local")).required(false))
            .add_source(Environment::default().separator("__"));

        builder.build()?.try_deserialize()
    }
}
