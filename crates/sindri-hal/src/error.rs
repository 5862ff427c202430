//! Error types for backend operations.

use thiserror::Error;

/// Errors that can occur while talking to a backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend is not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Job submission failed.
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout waiting for job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),
}

/// Result type for backend operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HalError::InvalidShots("shots must be at least 1".into());
        assert_eq!(err.to_string(), "Invalid shots: shots must be at least 1");

        let err = HalError::Timeout("job-42".into());
        assert_eq!(err.to_string(), "Timeout waiting for job job-42");
    }

    #[test]
    fn test_serde_errors_convert() {
        let parse_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: HalError = parse_err.into();
        assert!(matches!(err, HalError::Serialization(_)));
    }
}
