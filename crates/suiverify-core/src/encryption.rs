//! Threshold encryption adapter trait and content id derivation.
use async_trait::async_trait;
use rand::RngCore;

use crate::errors::PipelineError;
use crate::policy::PolicyObject;
use crate::CONTENT_ID_NONCE_LEN;

/// Ciphertext together with the policy-scoped id it was encrypted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionResult {
    pub ciphertext: Vec<u8>,
    /// Lower-case hex of `policy object bytes || nonce`.
    pub content_id: String,
}

/// Draws a fresh nonce for a content id.
pub fn fresh_nonce() -> [u8; CONTENT_ID_NONCE_LEN] {
    let mut nonce = [0u8; CONTENT_ID_NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Content id for `policy` and `nonce`: hex of the object id bytes followed by the nonce.
pub fn derive_content_id(policy: &PolicyObject, nonce: &[u8]) -> String {
    let mut id = policy.id_bytes();
    id.extend_from_slice(nonce);
    hex::encode(id)
}

/// Encrypts data under an allowlist policy with an external threshold encryption service.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ThresholdEncryptor: Send + Sync {
    /// Encrypts `data` so that only members of `policy` can obtain decryption shares.
    async fn encrypt(
        &self,
        data: &[u8],
        policy: &PolicyObject,
    ) -> Result<EncryptionResult, PipelineError>;

    /// Identifier of the encryption service recorded in attestations.
    fn service_id(&self) -> String;
}
