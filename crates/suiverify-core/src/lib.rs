//! Core types, adapter traits and the verification pipeline (ledger independent).
pub mod address;
pub mod attestation;
#[cfg(test)]
pub(crate) mod data;
pub mod encryption;
pub mod envelope;
pub mod errors;
pub mod ledger;
pub mod orchestrator;
pub mod policy;
pub mod request;
pub mod saga;
pub mod storage;

pub use address::SuiAddress;
pub use errors::PipelineError;
pub use ledger::TransactionRef;
pub use orchestrator::{Adapters, Orchestrator, OrchestratorConfig};
pub use request::{UploadedFile, VerificationRequest};

/// Environment variable name for the SuiVerify config file.
pub const SUIVERIFY_CONFIG: &str = "SUIVERIFY_CONFIG";

/// Number of random bytes appended to the policy object id when deriving a content id.
pub const CONTENT_ID_NONCE_LEN: usize = 5;
