//! Error types for stmtcache.

use crate::metric::MetricKind;
use thiserror::Error;

/// The main error type for stmtcache operations.
#[derive(Debug, Error)]
pub enum StmtCacheError {
    /// A timing value outside the metric domain (negative) was recorded.
    #[error("Invalid metric in '{label}': {kind} reported {value} µs")]
    InvalidMetric {
        label: String,
        kind: MetricKind,
        value: i64,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed configuration file.
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StmtCacheError {
    /// Create an invalid metric error for the given execution.
    pub fn invalid_metric(label: impl Into<String>, kind: MetricKind, value: i64) -> Self {
        Self::InvalidMetric {
            label: label.into(),
            kind,
            value,
        }
    }
}

/// Result type alias for stmtcache operations.
pub type StmtCacheResult<T> = Result<T, StmtCacheError>;
