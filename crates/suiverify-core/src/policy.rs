//! Allowlist access policy and the registry adapter trait.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::address::SuiAddress;
use crate::errors::PipelineError;
use crate::ledger::TransactionRef;

/// The on-chain allowlist object guarding encrypted documents, with the capability
/// needed to add members to it. Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyObject {
    pub object_id: SuiAddress,
    pub cap_id: SuiAddress,
}

impl PolicyObject {
    pub fn new(object_id: SuiAddress, cap_id: SuiAddress) -> Self {
        Self { object_id, cap_id }
    }

    /// Object id bytes used as the prefix of content ids.
    pub fn id_bytes(&self) -> Vec<u8> {
        self.object_id.to_bytes()
    }
}

/// Adds addresses to an allowlist policy.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait PolicyRegistry: Send + Sync {
    /// Adds `user` to `policy` in a single ledger transaction.
    async fn add_to_allowlist(
        &self,
        user: &SuiAddress,
        policy: &PolicyObject,
    ) -> Result<TransactionRef, PipelineError>;
}
