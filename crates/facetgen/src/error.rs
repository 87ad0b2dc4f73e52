//! Error types for facetgen.
//!
//! All fallible operations in the crate return [`Result`], backed by the
//! single [`FacetgenError`] enum.
//!
//! # Error Handling Philosophy
//!
//! **Configuration errors surface before any file is processed:**
//! - `UnknownProcessor` - a facet definition names an unregistered processor or method
//! - `ChainMismatch` - adjacent post-processors disagree on the value shape
//! - `Validation` - a processor rejected its option mapping
//! - `Io` from a config file loader bubbles up unchanged
//!
//! **Extraction-time errors follow the configured error policy:**
//! - `MissingField`, `MalformedTimestamp`, `Extraction`, and `Io` raised while
//!   processing one facet - recorded per facet in best-effort mode, fatal for
//!   the file in fail-fast mode

use thiserror::Error;

/// Result type alias using `FacetgenError`.
pub type Result<T> = std::result::Result<T, FacetgenError>;

/// Main error type for all facetgen operations.
#[derive(Debug, Error)]
pub enum FacetgenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown processor '{name}' referenced by facet '{facet}'")]
    UnknownProcessor { name: String, facet: String },

    #[error("required field '{field}' is missing")]
    MissingField { field: String },

    #[error("malformed timestamp: {message}")]
    MalformedTimestamp { message: String },

    #[error("processor chain mismatch in facet '{facet}': {message}")]
    ChainMismatch { facet: String, message: String },

    #[error("extraction error: {message}")]
    Extraction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for FacetgenError {
    fn from(err: serde_json::Error) -> Self {
        FacetgenError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl FacetgenError {
    /// Create an Extraction error.
    pub fn extraction<S: Into<String>>(message: S) -> Self {
        Self::Extraction {
            message: message.into(),
            source: None,
        }
    }

    /// Create an Extraction error with source.
    pub fn extraction_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Extraction {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error with source.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Serialization error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }

    /// Create a MalformedTimestamp error.
    pub fn malformed_timestamp<S: Into<String>>(message: S) -> Self {
        Self::MalformedTimestamp { message: message.into() }
    }
}
