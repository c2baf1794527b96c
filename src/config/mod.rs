//! Configuration management for `PermitDesk`.
//!
//! Settings come from an optional `config.toml` with environment variables
//! taking precedence, so deployments can ship a file and still override
//! per-host values.

/// Database configuration and connection management
pub mod database;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default sweep cadence; frequent enough that an expired reservation is
/// reclaimed well before a buyer retries.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Runtime settings for the daemon.
#[derive(Debug, Clone)]
pub struct Settings {
    /// SeaORM connection string
    pub database_url: String,
    /// Seconds between reservation expiry sweeps
    pub sweep_interval_secs: u64,
}

/// `config.toml` top-level structure. All sections are optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseSection>,
    sweeper: Option<SweeperSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SweeperSection {
    interval_secs: Option<u64>,
}

impl Settings {
    /// Loads settings from `./config.toml` (if present) and the environment.
    ///
    /// Precedence: environment variable, then file value, then default.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Loads settings from an explicit config file path plus the environment.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::resolve(
            path,
            std::env::var("DATABASE_URL").ok(),
            std::env::var("SWEEP_INTERVAL_SECS").ok(),
        )
    }

    /// Applies the precedence rules to explicit env values. Split out so
    /// tests can exercise precedence without mutating process environment.
    fn resolve<P: AsRef<Path>>(
        path: P,
        env_database_url: Option<String>,
        env_sweep_interval: Option<String>,
    ) -> Result<Self> {
        let file = if path.as_ref().exists() {
            let contents = std::fs::read_to_string(path.as_ref())?;
            toml::from_str::<FileConfig>(&contents).map_err(|e| Error::Config {
                message: format!("Failed to parse {}: {e}", path.as_ref().display()),
            })?
        } else {
            FileConfig::default()
        };

        let database_url = env_database_url
            .or(file.database.and_then(|d| d.url))
            .unwrap_or_else(|| "sqlite://data/permit_desk.sqlite".to_string());

        let sweep_interval_secs = match env_sweep_interval {
            Some(raw) => raw.parse().map_err(|_| Error::Config {
                message: format!("SWEEP_INTERVAL_SECS is not a number: {raw}"),
            })?,
            None => file
                .sweeper
                .and_then(|s| s.interval_secs)
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        };

        Ok(Self {
            database_url,
            sweep_interval_secs,
        })
    }
}
