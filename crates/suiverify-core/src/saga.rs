//! Step log and compensation hooks for the multi-step verification pipeline.
//!
//! Each ledger-visible step that completes is pushed onto a [`Saga`]. If a later step
//! fails, the saga unwinds in reverse order, handing every completed step to a
//! [`Compensation`]. The default compensation does nothing beyond logging, so a failed
//! request leaves earlier writes (e.g. the allowlist entry) in place.
use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::errors::PipelineError;

/// Named steps of the verification pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineStep {
    Allowlist,
    WhitelistAttestation,
    Encryption,
    Storage,
    EncryptionAttestation,
    UploadAttestation,
}

impl Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStep::Allowlist => "allowlist",
            PipelineStep::WhitelistAttestation => "whitelist_attestation",
            PipelineStep::Encryption => "encryption",
            PipelineStep::Storage => "storage",
            PipelineStep::EncryptionAttestation => "encryption_attestation",
            PipelineStep::UploadAttestation => "upload_attestation",
        };
        write!(f, "{name}")
    }
}

/// A step that finished successfully, with the identifier it produced
/// (transaction digest, content id or blob id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedStep {
    pub step: PipelineStep,
    pub reference: String,
}

/// Undo hook for a completed step.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Compensation: Send + Sync {
    async fn compensate(&self, completed: &CompletedStep) -> Result<(), PipelineError>;
}

/// Leaves every completed step in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCompensation;

#[async_trait]
impl Compensation for NoCompensation {
    async fn compensate(&self, completed: &CompletedStep) -> Result<(), PipelineError> {
        info!(
            "No compensation for step {} ({}), leaving it in place.",
            completed.step, completed.reference
        );
        Ok(())
    }
}

/// Log of the steps completed so far for one request.
pub struct Saga<'a> {
    completed: Vec<CompletedStep>,
    compensation: &'a dyn Compensation,
}

impl<'a> Saga<'a> {
    pub fn new(compensation: &'a dyn Compensation) -> Self {
        Self {
            completed: Vec::new(),
            compensation,
        }
    }

    pub fn complete(&mut self, step: PipelineStep, reference: impl Into<String>) {
        self.completed.push(CompletedStep {
            step,
            reference: reference.into(),
        });
    }

    pub fn completed(&self) -> &[CompletedStep] {
        &self.completed
    }

    /// Runs compensation for every completed step, most recent first.
    ///
    /// Compensation failures are logged and do not replace the error that caused the unwind.
    pub async fn unwind(self, cause: &PipelineError) {
        warn!(
            "Verification failed after {} completed step(s): {}",
            self.completed.len(),
            cause
        );
        for completed in self.completed.iter().rev() {
            if let Err(err) = self.compensation.compensate(completed).await {
                warn!(
                    "Compensation for step {} ({}) failed: {}",
                    completed.step, completed.reference, err
                );
            }
        }
    }
}
