//! Error types for the isthmus-rs library.
//!
//! Configuration and validation errors carry the identifier of the offending
//! feature, family, or field so callers can localize a fault without re-running
//! the pipeline stages that produced it.

use std::io;

use thiserror::Error;

/// Main result type for isthmus operations.
pub type Result<T> = std::result::Result<T, IsthmusError>;

/// Error type for all isthmus operations.
#[derive(Error, Debug)]
pub enum IsthmusError {
    /// The corpus does not carry enough observations to compute a statistic
    #[error("Insufficient data: {message}")]
    InsufficientData {
        /// Error description
        message: String,
    },

    /// Configuration errors (missing priors, non-positive variances, bad schema)
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Language family the entry belongs to
        family: Option<String>,
        /// Feature the entry belongs to
        feature: Option<String>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or record that failed validation
        field: Option<String>,
    },

    /// I/O related errors
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data format being processed
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl IsthmusError {
    /// Create a new insufficient-data error
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            family: None,
            feature: None,
        }
    }

    /// Create a new configuration error for a feature-level setting
    pub fn config_feature(message: impl Into<String>, feature: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            family: None,
            feature: Some(feature.into()),
        }
    }

    /// Create a new configuration error for a `(family, feature)` prior entry
    pub fn config_prior(
        message: impl Into<String>,
        family: impl Into<String>,
        feature: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            family: Some(family.into()),
            feature: Some(feature.into()),
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// True for errors the caller can only fix by supplying more data
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// True for configuration faults
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl From<io::Error> for IsthmusError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for IsthmusError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for IsthmusError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}
