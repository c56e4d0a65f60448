//! Error types for the Argus side panel
//!
//! This module provides error handling using thiserror for structured
//! error definitions and anyhow for error propagation at the binary rim.
//!
//! No error here is ever fatal to the panel: callers catch at the call
//! site, log, and degrade (stale/zero data or a silent no-op).

use thiserror::Error;

/// Main error type for Argus operations
#[derive(Error, Debug)]
pub enum ArgusError {
    /// The key-value storage service rejected or dropped a call
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A tabs/bookmarks/panel host call rejected or threw
    #[error("Host unavailable: {0}")]
    HostUnavailable(String),

    /// The user declined a destructive confirmation step
    #[error("Aborted by user")]
    UserAborted,

    /// HTTP request to the host bridge failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Argus operations
pub type Result<T> = std::result::Result<T, ArgusError>;

/// Convert anyhow::Error to ArgusError
impl From<anyhow::Error> for ArgusError {
    fn from(err: anyhow::Error) -> Self {
        ArgusError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArgusError::StorageUnavailable("bridge offline".to_string());
        assert_eq!(err.to_string(), "Storage unavailable: bridge offline");

        let err = ArgusError::UserAborted;
        assert_eq!(err.to_string(), "Aborted by user");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let argus_err: ArgusError = io_err.into();
        assert!(matches!(argus_err, ArgusError::Io(_)));

        let anyhow_err = anyhow::anyhow!("wrapped");
        let argus_err: ArgusError = anyhow_err.into();
        assert_eq!(argus_err.to_string(), "wrapped");
    }
}
