//! Runtime configuration: OSS Index access, search limits and logging.
//!
//! Values come from an optional JSON file and are then overlaid with
//! `DEPSCOUT_*` environment variables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_OSS_INDEX_URL: &str = "https://ossindex.sonatype.org";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub oss_index: OssIndexConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every lookup or send fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oss_index.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "oss_index.timeout_secs",
                value: "0".to_string(),
            });
        }
        if self.search.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "search.channel_capacity",
                value: "0".to_string(),
            });
        }
        if self.search.max_concurrent_searches == 0 {
            return Err(ConfigError::InvalidValue {
                key: "search.max_concurrent_searches",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Overlay `DEPSCOUT_*` environment variables.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars<F>(mut self, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("DEPSCOUT_OSS_INDEX_URL") {
            self.oss_index.base_url = val;
        }
        if let Some(val) = var("DEPSCOUT_OSS_INDEX_USER") {
            self.oss_index.credentials.user = val;
        }
        if let Some(val) = var("DEPSCOUT_OSS_INDEX_PASSWORD") {
            self.oss_index.credentials.password = val;
        }
        if let Some(val) = var("DEPSCOUT_OSS_INDEX_TIMEOUT_SECS") {
            self.oss_index.timeout_secs = parse_positive("DEPSCOUT_OSS_INDEX_TIMEOUT_SECS", val)?;
        }
        if let Some(val) = var("DEPSCOUT_CHANNEL_CAPACITY") {
            self.search.channel_capacity = parse_positive("DEPSCOUT_CHANNEL_CAPACITY", val)?;
        }
        if let Some(val) = var("DEPSCOUT_MAX_CONCURRENT_SEARCHES") {
            self.search.max_concurrent_searches =
                parse_positive("DEPSCOUT_MAX_CONCURRENT_SEARCHES", val)?;
        }
        if let Some(val) = var("DEPSCOUT_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = var("DEPSCOUT_LOG_FORMAT") {
            self.logging.format = val.parse()?;
        }
        Ok(self)
    }
}

/// Parses a count or duration that must be at least 1.
fn parse_positive<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    match value.trim().parse::<T>() {
        Ok(n) if n != T::default() => Ok(n),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

/// OSS Index account. An empty user means anonymous access.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OssIndexConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub credentials: Credentials,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OssIndexConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for OssIndexConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials: Credentials::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_OSS_INDEX_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Capacity of the output channel handed to the searcher
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Upper bound on batches searched at the same time
    #[serde(default = "default_max_concurrent_searches")]
    pub max_concurrent_searches: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            max_concurrent_searches: default_max_concurrent_searches(),
        }
    }
}

fn default_channel_capacity() -> usize {
    64
}

fn default_max_concurrent_searches() -> usize {
    4
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "DEPSCOUT_LOG_FORMAT",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
