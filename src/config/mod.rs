mod schema;

pub use schema::{Config, DEFAULT_TIMEOUT};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;
use crate::github::MAX_PAGE_SIZE;

/// Get the config directory path (~/.config/teamboard/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("teamboard"))
}

/// Get the default config file path (~/.config/teamboard/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/teamboard/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing default config file yields `Config::default()`; org and team
/// must then come from the command line.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let Some(config_path) = path.or_else(get_config_path) else {
        return Ok(Config::default());
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validated settings handed to the pipeline for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub org: String,
    pub team: String,
    pub page_size: u32,
    pub timeout: Duration,
}

fn required(value: Option<String>, name: &str) -> Result<String, Error> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("'{}' must be set in the config file or with --{}", name, name)))
}

impl Config {
    /// Parsed per-request deadline.
    pub fn deadline(&self) -> Result<Duration, Error> {
        let timeout = humantime::parse_duration(self.timeout.trim())
            .map_err(|e| Error::Config(format!("invalid timeout '{}': {}", self.timeout, e)))?;
        if timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        Ok(timeout)
    }

    /// The organization alone, for lookups that don't need a team.
    pub fn resolve_org(&self, org: Option<String>) -> Result<String, Error> {
        required(org.or_else(|| self.org.clone()), "org")
    }

    /// Apply command-line overrides and validate.
    pub fn resolve(self, org: Option<String>, team: Option<String>) -> Result<Settings, Error> {
        let timeout = self.deadline()?;
        let org = required(org.or(self.org), "org")?;
        let team = required(team.or(self.team), "team")?;

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }

        Ok(Settings {
            org,
            team,
            page_size: self.page_size,
            timeout,
        })
    }
}
