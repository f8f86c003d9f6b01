//! Application configuration management

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use crate::cli::CliOptions;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => bail!("unknown log format '{}'", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the quality profiles
    pub profiles_path: PathBuf,

    /// JSON file holding the custom format definitions
    pub custom_formats_path: PathBuf,

    pub log_format: LogFormat,

    /// Upper bound on media items decided in parallel
    pub max_concurrent_decisions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profiles_path: PathBuf::from("./data/profiles.json"),
            custom_formats_path: PathBuf::from("./data/custom_formats.json"),
            log_format: LogFormat::Json,
            max_concurrent_decisions: 4,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse().context("Invalid LOG_FORMAT")?,
            None => defaults.log_format,
        };

        let max_concurrent_decisions = match lookup("MAX_CONCURRENT_DECISIONS") {
            Some(value) => value
                .parse::<usize>()
                .context("Invalid MAX_CONCURRENT_DECISIONS")?
                .max(1),
            None => defaults.max_concurrent_decisions,
        };

        Ok(Self {
            profiles_path: lookup("PROFILES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.profiles_path),

            custom_formats_path: lookup("CUSTOM_FORMATS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.custom_formats_path),

            log_format,

            max_concurrent_decisions,
        })
    }

    /// Command line flags win over the environment.
    pub fn with_cli_overrides(mut self, options: &CliOptions) -> Self {
        if let Some(path) = &options.profiles_path {
            self.profiles_path = path.clone();
        }
        if let Some(path) = &options.formats_path {
            self.custom_formats_path = path.clone();
        }
        if options.pretty {
            self.log_format = LogFormat::Pretty;
        }
        self
    }
}
