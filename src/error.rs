//! Error types for Pharos.

use thiserror::Error;

/// Errors that can occur in Pharos operations.
#[derive(Error, Debug)]
pub enum PharosError {
    /// An argument passed to an API was invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration value was invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The index record violates a structural invariant.
    #[error("index error: {0}")]
    Index(String),

    /// Text analysis failed.
    #[error("analysis error: {0}")]
    Analysis(String),

    /// A storage backend operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serialization of the index record failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl PharosError {
    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        PharosError::InvalidArgument(message.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        PharosError::InvalidConfig(message.into())
    }

    /// Create a not found error.
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        PharosError::NotFound(message.into())
    }

    /// Create an index error.
    pub fn index<S: Into<String>>(message: S) -> Self {
        PharosError::Index(message.into())
    }

    /// Create an analysis error.
    pub fn analysis<S: Into<String>>(message: S) -> Self {
        PharosError::Analysis(message.into())
    }

    /// Create a storage error.
    pub fn storage<S: Into<String>>(message: S) -> Self {
        PharosError::Storage(message.into())
    }

    /// Create a generic error.
    pub fn other<S: Into<String>>(message: S) -> Self {
        PharosError::Other(message.into())
    }
}

/// Result type alias for Pharos operations.
pub type Result<T> = std::result::Result<T, PharosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PharosError::invalid_argument("bad input");
        assert_eq!(err.to_string(), "invalid argument: bad input");

        let err = PharosError::index("posting out of bounds");
        assert_eq!(err.to_string(), "index error: posting out of bounds");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PharosError = io_err.into();
        assert!(matches!(err, PharosError::Io(_)));
    }
}
