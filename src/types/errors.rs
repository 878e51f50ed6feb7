//! Error types for Stratus.

use thiserror::Error;

/// Default result type for Stratus.
pub type StratusResult<T> = Result<T, StratusError>;

/// Errors that can occur in Stratus.
///
/// A cache miss is not an error: lookups return `Option`.
#[derive(Error, Debug)]
pub enum StratusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fewer samples than required inside the sufficiency window.
    #[error("not enough data yet for this location: {0}")]
    InsufficientData(String),

    /// A statistics routine was called without samples.
    #[error("contract violation: {0} called with zero samples")]
    EmptySamples(&'static str),

    #[error("invalid sample date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid sample: {0}")]
    InvalidSample(String),

    #[error("location name must not be empty")]
    InvalidLocation,

    #[error("upstream provider failed: {0}")]
    Upstream(String),

    #[error("{0}")]
    Other(String),
}

impl StratusError {
    /// Creates a generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an upstream provider error.
    pub fn upstream<S: Into<String>>(msg: S) -> Self {
        Self::Upstream(msg.into())
    }

    /// True for the "cannot answer yet" outcome of a statistics query.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }
}
