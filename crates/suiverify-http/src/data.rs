//! Test fixtures for the HTTP handlers.
use async_trait::async_trait;
use axum::Router;
use std::sync::Arc;
use suiverify_core::attestation::{AttestationEvent, AttestationRecorder};
use suiverify_core::encryption::{
    derive_content_id, fresh_nonce, EncryptionResult, ThresholdEncryptor,
};
use suiverify_core::ledger::{LedgerClient, MockLedgerClient};
use suiverify_core::policy::{PolicyObject, PolicyRegistry};
use suiverify_core::storage::{BlobStore, StorageRecord};
use suiverify_core::{
    Adapters, Orchestrator, OrchestratorConfig, PipelineError, SuiAddress, TransactionRef,
};

use crate::config::HTTPConfig;
use crate::server::SuiVerifyRouter;
use crate::state::AppState;

pub(crate) const TEST_USER_ADDRESS: &str =
    "0xABC0000000000000000000000000000000000000000000000000000000000123";

pub(crate) const TEST_POLICY_OBJECT_ID: &str =
    "0x7a1c9c3c2f8a1d7c0e0c43a1f9b88d2c8e1c2b14a4f5c6d7e8f9a0b1c2d3e4f5";

pub(crate) const TEST_POLICY_CAP_ID: &str =
    "0x1f2e3d4c5b6a79880716253443526170f0e1d2c3b4a5968778695a4b3c2d1e0f";

pub(crate) const MULTIPART_BOUNDARY: &str = "suiverify-test-boundary";
pub(crate) const MULTIPART_CONTENT_TYPE: &str =
    "multipart/form-data; boundary=suiverify-test-boundary";

/// Builds a multipart body with an optional address field and an optional file
/// `(file name, media type, contents)`.
pub(crate) fn multipart_body(
    user_address: Option<&str>,
    file: Option<(&str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(address) = user_address {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"userAddress\"\r\n\r\n{address}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, media_type, contents)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"{file_name}\"\r\nContent-Type: {media_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub(crate) struct FakeRegistry;

#[async_trait]
impl PolicyRegistry for FakeRegistry {
    async fn add_to_allowlist(
        &self,
        _user: &SuiAddress,
        _policy: &PolicyObject,
    ) -> Result<TransactionRef, PipelineError> {
        Ok(TransactionRef::new("allowlist-digest"))
    }
}

/// Reverses the plaintext and derives a real content id.
pub(crate) struct FakeEncryptor;

#[async_trait]
impl ThresholdEncryptor for FakeEncryptor {
    async fn encrypt(
        &self,
        data: &[u8],
        policy: &PolicyObject,
    ) -> Result<EncryptionResult, PipelineError> {
        Ok(EncryptionResult {
            ciphertext: data.iter().rev().copied().collect(),
            content_id: derive_content_id(policy, &fresh_nonce()),
        })
    }

    fn service_id(&self) -> String {
        "seal".to_string()
    }
}

pub(crate) struct FakeStore;

#[async_trait]
impl BlobStore for FakeStore {
    async fn store(&self, data: &[u8]) -> Result<StorageRecord, PipelineError> {
        Ok(StorageRecord::NewlyCreated {
            blob_id: format!("blob-{}", data.len()),
            end_epoch: 42,
            storage_object: "0x4748".to_string(),
        })
    }

    fn blob_url(&self, blob_id: &str) -> Option<String> {
        Some(format!("http://aggregator/v1/blobs/{blob_id}"))
    }
}

pub(crate) struct FailingStore;

#[async_trait]
impl BlobStore for FailingStore {
    async fn store(&self, _data: &[u8]) -> Result<StorageRecord, PipelineError> {
        Err(PipelineError::StorageService(
            "publisher unreachable".to_string(),
        ))
    }

    fn blob_url(&self, _blob_id: &str) -> Option<String> {
        None
    }
}

/// Returns a distinct digest per attestation kind.
pub(crate) struct FakeRecorder;

#[async_trait]
impl AttestationRecorder for FakeRecorder {
    async fn record(&self, event: &AttestationEvent) -> Result<TransactionRef, PipelineError> {
        Ok(TransactionRef::new(format!("attestation-{}", event.kind())))
    }
}

pub(crate) fn fake_adapters() -> Adapters {
    Adapters {
        registry: Arc::new(FakeRegistry),
        encryptor: Arc::new(FakeEncryptor),
        store: Arc::new(FakeStore),
        recorder: Arc::new(FakeRecorder),
    }
}

pub(crate) fn test_orchestrator_config() -> OrchestratorConfig {
    OrchestratorConfig::new(PolicyObject::new(
        SuiAddress::parse(TEST_POLICY_OBJECT_ID).unwrap(),
        SuiAddress::parse(TEST_POLICY_CAP_ID).unwrap(),
    ))
}

fn build_state(
    config: HTTPConfig,
    adapters: Adapters,
    ledger: Arc<dyn LedgerClient>,
) -> Arc<AppState> {
    Arc::new(AppState::new(
        config,
        Orchestrator::new(test_orchestrator_config(), adapters),
        ledger,
    ))
}

pub(crate) fn test_state(config: HTTPConfig) -> Arc<AppState> {
    test_state_with(config, fake_adapters())
}

pub(crate) fn test_state_with(config: HTTPConfig, adapters: Adapters) -> Arc<AppState> {
    build_state(config, adapters, Arc::new(MockLedgerClient::new()))
}

pub(crate) fn test_state_with_ledger(
    config: HTTPConfig,
    ledger: MockLedgerClient,
) -> Arc<AppState> {
    build_state(config, fake_adapters(), Arc::new(ledger))
}

pub(crate) fn test_router(state: Arc<AppState>) -> Router {
    SuiVerifyRouter::from(state).into_router()
}
