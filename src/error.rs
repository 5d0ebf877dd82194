use std::path::PathBuf;
use thiserror::Error;

/// DataFlow client error types
#[derive(Error, Debug)]
pub enum DataFlowError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-success HTTP status returned by the DataFlow server
    #[error("{reason}: {message}")]
    Remote {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid type: {0}")]
    InvalidType(String),

    #[error("{} not found", .0.display())]
    FileNotFound(PathBuf),
}

/// Result type for DataFlow operations
pub type DataFlowResult<T> = Result<T, DataFlowError>;

impl DataFlowError {
    /// Create a remote error from a status code, reason phrase and body text
    pub fn remote(status: u16, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            reason: reason.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Create an invalid type error
    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::InvalidType(message.into())
    }

    /// True when the server answered with a non-success status
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// HTTP status of a remote error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
