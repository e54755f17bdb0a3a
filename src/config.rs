use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const MAX_LOOKUP_TIMEOUT_MS: u64 = 10_000;
pub const MAX_GATEWAY_TIMEOUT_MS: u64 = 30_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be between 1 and {max} ms, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

/// Settings injected into the pipeline at construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub lookup_timeout_ms: u64,
    pub tokenize_timeout_ms: u64,
    pub settle_timeout_ms: u64,
    /// Stage events kept per report.
    pub event_log_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: MAX_LOOKUP_TIMEOUT_MS,
            tokenize_timeout_ms: MAX_GATEWAY_TIMEOUT_MS,
            settle_timeout_ms: MAX_GATEWAY_TIMEOUT_MS,
            event_log_capacity: 16,
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = [
            ("lookup_timeout_ms", self.lookup_timeout_ms, MAX_LOOKUP_TIMEOUT_MS),
            ("tokenize_timeout_ms", self.tokenize_timeout_ms, MAX_GATEWAY_TIMEOUT_MS),
            ("settle_timeout_ms", self.settle_timeout_ms, MAX_GATEWAY_TIMEOUT_MS),
        ];
        for (field, value, max) in bounds {
            if value == 0 || value > max {
                return Err(ConfigError::OutOfRange { field, value, max });
            }
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn tokenize_timeout(&self) -> Duration {
        Duration::from_millis(self.tokenize_timeout_ms)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}
