//! Error types for glucowatch
//!
//! Every failure in the ingestion path maps to one of the kinds below so
//! callers can branch on the error instead of parsing text.

use thiserror::Error;

/// Result type alias using glucowatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for glucowatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// A reading failed structural validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The durable store failed to acknowledge a write
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The notification channel failed to accept a dispatch
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Structural problems with an inbound reading payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent (or empty, for `device_id`)
    #[error("missing field: {field}")]
    MissingField {
        /// Name of the absent field
        field: &'static str,
    },

    /// A field is present but cannot be interpreted as its expected type
    #[error("invalid type for field: {field}")]
    InvalidType {
        /// Name of the offending field
        field: &'static str,
    },
}

/// Infrastructure failures from the durable reading store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write (constraint, capacity, serialization)
    #[error("store rejected write: {0}")]
    Rejected(String),
}

/// Failures from the notification channel
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The channel could not be reached or timed out
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),

    /// The channel refused the message
    #[error("notification channel rejected message: {0}")]
    Rejected(String),
}
