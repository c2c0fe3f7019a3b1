//! Logger error model.

use thiserror::Error;

/// Result type used across the logger.
pub type WideLogResult<T> = Result<T, WideLogError>;

/// Failure raised while rendering or emitting a wide log line.
///
/// The logger never retries and never swallows these: they surface to whoever
/// called `flush` (or `add_serialize`). The underlying error is kept as the
/// `source()` so callers can inspect it unchanged.
#[derive(Debug, Error)]
pub enum WideLogError {
    /// A value could not be serialized by `serde_json`.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The output sink rejected the write.
    #[error("sink write failed: {0}")]
    Sink(#[from] std::io::Error),
}

/// Invalid logger configuration (usually from environment variables).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `WIDE_LOG_FORMAT` named a formatter that does not exist.
    #[error("unknown log format '{0}' (expected one of: json, key_value)")]
    UnknownFormat(String),

    /// A boolean flag had a value that could not be parsed.
    #[error("invalid value '{value}' for {var}")]
    InvalidFlag { var: String, value: String },
}

impl ConfigError {
    pub fn unknown_format(name: impl Into<String>) -> Self {
        Self::UnknownFormat(name.into())
    }

    pub fn invalid_flag(var: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFlag {
            var: var.into(),
            value: value.into(),
        }
    }
}
