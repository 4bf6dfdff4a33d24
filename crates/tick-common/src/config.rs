//! Configuration for the tick scheduler and its host tick source.
//!
//! Supports TOML deserialization with sensible defaults. Table capacities
//! are deliberately absent here: they are compile-time constants (const
//! generics on the tables), not runtime configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedConfig {
    /// Hardware clock speed in cycles per second. Used once at init to
    /// derive the timing multiplier consumed by the external timer setup.
    pub clock_hz: u64,

    /// Interval at which the tick source invokes the dispatcher.
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,

    /// Ticks per millisecond. Periods and delays are given in
    /// milliseconds and scaled by this factor at registration time.
    pub ticks_per_ms: u32,

    /// Metrics reporting configuration for the daemon.
    pub report: ReportConfig,
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self {
            clock_hz: 8_000_000,
            tick_interval: Duration::from_millis(1),
            ticks_per_ms: 1,
            report: ReportConfig::default(),
        }
    }
}

/// Periodic metrics reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Enable periodic metrics reports.
    pub enabled: bool,

    /// Interval between reports.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(10),
        }
    }
}

impl SchedConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
