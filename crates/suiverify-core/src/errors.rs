//! Error type for the verification pipeline.
use thiserror::Error;

use crate::saga::PipelineStep;

/// An error raised while processing a verification request.
///
/// Every variant aborts the remaining pipeline steps. None of them trigger a retry.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Client input was missing or malformed. The caller may fix it and resubmit.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Building, signing, submitting or executing a ledger transaction failed.
    #[error("Ledger submission failed: {0}")]
    LedgerSubmission(String),
    /// The threshold encryption service rejected or failed the request.
    #[error("Encryption service error: {0}")]
    EncryptionService(String),
    /// The blob storage network could not be reached or returned an error status.
    #[error("Storage service error: {0}")]
    StorageService(String),
    /// An upstream service answered with a shape this backend does not recognise.
    #[error("Unrecognised upstream response: {0}")]
    UpstreamProtocol(String),
    /// A required setting is absent or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// An adapter call did not complete within the per-call timeout.
    #[error("Step {step} timed out after {seconds}s.")]
    Timeout { step: PipelineStep, seconds: u64 },
    /// No capacity to admit the request within the admission timeout.
    #[error("Verification service is at capacity, try again later.")]
    Overloaded,
}

impl PipelineError {
    /// Whether the error was caused by the client rather than a downstream service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = PipelineError::Timeout {
            step: PipelineStep::Storage,
            seconds: 30,
        };
        assert_eq!(err.to_string(), "Step storage timed out after 30s.");
        assert!(PipelineError::InvalidRequest("x".to_string()).is_client_error());
        assert!(!PipelineError::Overloaded.is_client_error());
    }
}
