//! Error types for the gherkin-rag pipeline

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for a single pipeline run
///
/// Every variant is fatal for the run that produced it: there is no retry
/// or partial-output path anywhere in the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration (chunking parameters, missing credentials)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Ticket does not exist in the tracker
    #[error("ticket not found: {0}")]
    TicketNotFound(String),

    /// Tracker-boundary failure other than a missing ticket (auth, transport)
    #[error("tracker error: {0}")]
    Tracker(String),

    /// Embedding service failure (network, auth, quota)
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Generation service failure (timeout, auth, rate limit)
    #[error("generation error: {0}")]
    Generation(String),

    /// Embedding dimension mismatch between build and query
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the index was built with
        expected: usize,
        /// Dimension actually supplied
        actual: usize,
    },

    /// IO error (feature-file export)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_config() {
        let err = Error::InvalidConfig("overlap must be smaller than size".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: overlap must be smaller than size"
        );
    }

    #[test]
    fn test_error_display_ticket_not_found() {
        let err = Error::TicketNotFound("KAN-1".to_string());
        assert_eq!(err.to_string(), "ticket not found: KAN-1");
    }

    #[test]
    fn test_error_display_dimension_mismatch() {
        let err = Error::DimensionMismatch {
            expected: 1536,
            actual: 384,
        };
        assert_eq!(
            err.to_string(),
            "embedding dimension mismatch: expected 1536, got 384"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_type() {
        fn may_fail(succeed: bool) -> Result<i32> {
            if succeed {
                Ok(7)
            } else {
                Err(Error::Embedding("quota exceeded".to_string()))
            }
        }

        assert_eq!(may_fail(true).unwrap(), 7);
        assert!(may_fail(false).is_err());
    }
}
