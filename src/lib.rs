//! SuiVerify library.
//!
//! Re-exports the verification pipeline, its Sui adapters and the HTTP server.
pub use suiverify_core::{
    Adapters, Orchestrator, OrchestratorConfig, PipelineError, SuiAddress, TransactionRef,
    UploadedFile, VerificationRequest,
};
pub use suiverify_http::{server::SuiVerifyRouter, state::AppState};
pub use suiverify_sui::{SuiConfig, SuiContext, SuiSettings};
