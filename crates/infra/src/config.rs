//! Configuration loading and representation.
//!
//! Read from the process environment:
//!
//! - `STOCKFLOW_CONCURRENCY`: `last-write-wins` (default) or `optimistic`
//! - `STOCKFLOW_LOG_FORMAT`: `json` (default) or `pretty`
//! - `STOCKFLOW_LOG_FILTER`: default filter directives when `RUST_LOG` is unset

use core::str::FromStr;

use thiserror::Error;

use stockflow_observability::{LogFormat, TracingConfig};

/// How the disposition service writes records back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Plain overwrite. Concurrent passes over the same product can lose a
    /// decrement.
    #[default]
    LastWriteWins,
    /// Compare-and-swap on the record revision; a stale snapshot fails with a
    /// retryable conflict.
    Optimistic,
}

impl FromStr for ConcurrencyMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-write-wins" | "lww" => Ok(ConcurrencyMode::LastWriteWins),
            "optimistic" | "cas" => Ok(ConcurrencyMode::Optimistic),
            other => Err(ConfigError::Invalid {
                key: ENV_CONCURRENCY,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

pub const ENV_CONCURRENCY: &str = "STOCKFLOW_CONCURRENCY";
pub const ENV_LOG_FORMAT: &str = "STOCKFLOW_LOG_FORMAT";
pub const ENV_LOG_FILTER: &str = "STOCKFLOW_LOG_FILTER";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub concurrency: ConcurrencyMode,
    pub tracing: TracingConfig,
}

impl EngineConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (unset keys use defaults).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CONCURRENCY) {
            config.concurrency = raw.parse()?;
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.tracing.format = raw.parse::<LogFormat>().map_err(|e| ConfigError::Invalid {
                key: ENV_LOG_FORMAT,
                value: e.0,
            })?;
        }

        if let Some(raw) = lookup(ENV_LOG_FILTER) {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(ConfigError::Invalid {
                    key: ENV_LOG_FILTER,
                    value: String::new(),
                });
            }
            config.tracing.default_filter = raw.to_string();
        }

        Ok(config)
    }

    /// Install the process-wide tracing subscriber described by this config.
    pub fn init_tracing(&self) {
        stockflow_observability::init_with(&self.tracing);
    }
}
