//! Error handling for the TrafficVis-RS application
//!
//! The derivation pipeline itself never fails: missing metadata and malformed
//! counters are resolved locally. These errors cover the collaborators around
//! it (traffic sources, configuration files, channels).

use thiserror::Error;

/// Main error type for TrafficVis-RS operations
#[derive(Error, Debug)]
pub enum TrafficVisError {
    /// Errors reported by a traffic source
    #[error("Source error: {0}")]
    Source(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TrafficVisError>,
    },
}

impl TrafficVisError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TrafficVisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any context wrappers
    pub fn root(&self) -> &TrafficVisError {
        match self {
            TrafficVisError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for TrafficVisError {
    fn from(err: serde_json::Error) -> Self {
        TrafficVisError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TrafficVisError {
    fn from(err: toml::de::Error) -> Self {
        TrafficVisError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for TrafficVisError {
    fn from(err: toml::ser::Error) -> Self {
        TrafficVisError::Serialization(err.to_string())
    }
}

/// Result type alias for TrafficVis-RS operations
pub type Result<T> = std::result::Result<T, TrafficVisError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
