//! Error types for the Navigator client
//!
//! Every failure the client can surface is a variant of [`NavigatorError`].
//! Nothing in this crate retries; callers decide whether an error ends the run.

use thiserror::Error;

/// Navigator client error types
#[derive(Error, Debug)]
pub enum NavigatorError {
    /// Bad command-line arguments
    #[error("Argument error: {0}")]
    Argument(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file access failed (config or marker files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection, timeout or other transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credentials were rejected by the service
    #[error("Authentication failed ({status}): {message}")]
    Auth {
        /// HTTP status returned by the service
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The service refused a read request (malformed filter, unknown endpoint, ...)
    #[error("Query failed ({status}): {message}")]
    Query {
        /// HTTP status returned by the service, 0 when the failure is local
        status: u16,
        /// Response body or local description
        message: String,
    },

    /// A response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// A record lacks a field needed to build an update entity
    #[error("{entity} entity requires field '{field}'")]
    MissingField {
        /// Kind of entity being built
        entity: &'static str,
        /// Wire name of the missing field
        field: &'static str,
    },

    /// Zero or several sources matched where exactly one was expected
    #[error("Source lookup failed: {0}")]
    SourceLookup(String),

    /// The service reported errors for a submitted entity
    #[error("Write failed: {details}")]
    Write {
        /// Error descriptions reported by the service
        details: String,
    },
}

/// Result type for Navigator client operations
pub type NavigatorResult<T> = Result<T, NavigatorError>;

impl From<reqwest::Error> for NavigatorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NavigatorError::Transport(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            NavigatorError::Transport(format!("Connection error: {}", err))
        } else if err.is_decode() {
            NavigatorError::Decode(format!("Failed to parse response: {}", err))
        } else {
            NavigatorError::Transport(format!("HTTP error: {}", err))
        }
    }
}

impl From<serde_json::Error> for NavigatorError {
    fn from(err: serde_json::Error) -> Self {
        NavigatorError::Decode(format!("JSON error: {}", err))
    }
}

impl From<::config::ConfigError> for NavigatorError {
    fn from(err: ::config::ConfigError) -> Self {
        NavigatorError::Config(err.to_string())
    }
}

impl NavigatorError {
    /// Check if the error came from talking to the service
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            NavigatorError::Transport(_) | NavigatorError::Auth { .. } | NavigatorError::Query { .. }
        )
    }

    /// Check if the error is a rejected write
    pub fn is_write_error(&self) -> bool {
        matches!(self, NavigatorError::Write { .. })
    }
}
