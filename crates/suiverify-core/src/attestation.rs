//! Attestation events written to the on-chain audit registry.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::address::SuiAddress;
use crate::errors::PipelineError;
use crate::ledger::TransactionRef;

/// Kinds of attestation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttestationKind {
    WhitelistAdd,
    EncryptionRecorded,
    BlobUploadRecorded,
}

impl Display for AttestationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttestationKind::WhitelistAdd => "whitelist_add",
            AttestationKind::EncryptionRecorded => "encryption_recorded",
            AttestationKind::BlobUploadRecorded => "blob_upload_recorded",
        };
        write!(f, "{name}")
    }
}

/// Payload of an attestation to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationEvent {
    /// `user` was added to the allowlist by `allowlist_tx`.
    WhitelistAdd {
        user: SuiAddress,
        allowlist_tx: TransactionRef,
    },
    /// A document for `user` was encrypted under `policy_object` as `content_id`.
    EncryptionRecorded {
        user: SuiAddress,
        content_id: String,
        policy_object: SuiAddress,
        encryption_service: String,
    },
    /// Ciphertext owned by `data_owner` was uploaded on behalf of `user`.
    BlobUploadRecorded {
        user: SuiAddress,
        data_owner: SuiAddress,
        blob_id: String,
    },
}

impl AttestationEvent {
    pub fn kind(&self) -> AttestationKind {
        match self {
            AttestationEvent::WhitelistAdd { .. } => AttestationKind::WhitelistAdd,
            AttestationEvent::EncryptionRecorded { .. } => AttestationKind::EncryptionRecorded,
            AttestationEvent::BlobUploadRecorded { .. } => AttestationKind::BlobUploadRecorded,
        }
    }

    /// The acting user address.
    pub fn user(&self) -> &SuiAddress {
        match self {
            AttestationEvent::WhitelistAdd { user, .. }
            | AttestationEvent::EncryptionRecorded { user, .. }
            | AttestationEvent::BlobUploadRecorded { user, .. } => user,
        }
    }
}

/// A recorded attestation. Append-only: records are never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationRecord {
    pub kind: AttestationKind,
    pub user: SuiAddress,
    pub timestamp: DateTime<Utc>,
    pub transaction: TransactionRef,
}

impl AttestationRecord {
    pub fn new(event: &AttestationEvent, transaction: TransactionRef) -> Self {
        Self {
            kind: event.kind(),
            user: event.user().to_owned(),
            timestamp: Utc::now(),
            transaction,
        }
    }
}

/// Writes attestation events to the on-chain registry, one transaction per event.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait AttestationRecorder: Send + Sync {
    async fn record(&self, event: &AttestationEvent) -> Result<TransactionRef, PipelineError>;
}
