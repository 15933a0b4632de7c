//! Accumulated response for a verification request.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::SuiAddress;
use crate::attestation::{AttestationKind, AttestationRecord};
use crate::encryption::EncryptionResult;
use crate::ledger::TransactionRef;
use crate::policy::PolicyObject;
use crate::request::UploadedFile;
use crate::storage::StorageRecord;

/// Allowlist change produced by the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistDetails {
    pub whitelist_id: String,
    pub transaction_digest: TransactionRef,
}

/// Digests of the attestation transactions recorded for the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist_transaction_digest: Option<TransactionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_transaction_digest: Option<TransactionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_transaction_digest: Option<TransactionRef>,
    /// Every attestation in the order it was recorded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<AttestationRecord>,
}

/// Uploaded document and its encryption metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetails {
    pub file_name: String,
    pub media_type: String,
    pub size: usize,
    pub encryption_id: String,
    pub whitelist_id: String,
    pub encryption_service: String,
}

/// How the storage network treated the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageStatus {
    NewlyCreated,
    AlreadyCertified,
}

/// Storage metadata for the uploaded ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageDetails {
    pub status: StorageStatus,
    pub blob_id: String,
    pub end_epoch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sui_object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certified_tx_digest: Option<TransactionRef>,
    pub whitelist_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator_url: Option<String>,
}

/// The response returned to the caller, filled in as each pipeline step succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub user_address: String,
    /// Digest of the allowlist transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_digest: Option<TransactionRef>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<WhitelistDetails>,
    #[serde(default)]
    pub attestation: AttestationDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageDetails>,
}

impl ResultEnvelope {
    /// Creates an empty envelope for `user`.
    pub fn new(user: &SuiAddress) -> Self {
        Self {
            user_address: user.as_submitted().to_string(),
            transaction_digest: None,
            timestamp: Utc::now(),
            whitelist: None,
            attestation: AttestationDetails::default(),
            file: None,
            storage: None,
        }
    }

    pub fn set_whitelist(&mut self, policy: &PolicyObject, transaction: TransactionRef) {
        self.transaction_digest = Some(transaction.clone());
        self.whitelist = Some(WhitelistDetails {
            whitelist_id: policy.object_id.to_string(),
            transaction_digest: transaction,
        });
    }

    pub fn add_attestation(&mut self, record: AttestationRecord) {
        let digest = Some(record.transaction.clone());
        match record.kind {
            AttestationKind::WhitelistAdd => self.attestation.whitelist_transaction_digest = digest,
            AttestationKind::EncryptionRecorded => {
                self.attestation.encryption_transaction_digest = digest
            }
            AttestationKind::BlobUploadRecorded => {
                self.attestation.upload_transaction_digest = digest
            }
        }
        self.attestation.records.push(record);
    }

    pub fn set_file(
        &mut self,
        file: &UploadedFile,
        encryption: &EncryptionResult,
        policy: &PolicyObject,
        encryption_service: &str,
    ) {
        self.file = Some(FileDetails {
            file_name: file.name.to_owned(),
            media_type: file.media_type.to_owned(),
            size: file.size(),
            encryption_id: encryption.content_id.to_owned(),
            whitelist_id: policy.object_id.to_string(),
            encryption_service: encryption_service.to_string(),
        });
    }

    pub fn set_storage(
        &mut self,
        record: &StorageRecord,
        policy: &PolicyObject,
        aggregator_url: Option<String>,
    ) {
        let (status, sui_object_id, certified_tx_digest) = match record {
            StorageRecord::NewlyCreated { storage_object, .. } => (
                StorageStatus::NewlyCreated,
                Some(storage_object.to_owned()),
                None,
            ),
            StorageRecord::AlreadyCertified { certifying_tx, .. } => (
                StorageStatus::AlreadyCertified,
                None,
                Some(certifying_tx.to_owned()),
            ),
        };
        self.storage = Some(StorageDetails {
            status,
            blob_id: record.blob_id().to_string(),
            end_epoch: record.end_epoch(),
            sui_object_id,
            certified_tx_digest,
            whitelist_id: policy.object_id.to_string(),
            aggregator_url,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::AttestationEvent;
    use crate::data::{test_policy, TEST_USER_ADDRESS};

    #[test]
    fn test_whitelist_only_serialization() {
        let user = SuiAddress::parse(TEST_USER_ADDRESS).unwrap();
        let policy = test_policy();
        let mut envelope = ResultEnvelope::new(&user);
        envelope.set_whitelist(&policy, TransactionRef::new("tx-allow"));
        let event = AttestationEvent::WhitelistAdd {
            user: user.clone(),
            allowlist_tx: TransactionRef::new("tx-allow"),
        };
        envelope.add_attestation(AttestationRecord::new(&event, TransactionRef::new("tx-att")));

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["userAddress"], TEST_USER_ADDRESS);
        assert_eq!(value["transactionDigest"], "tx-allow");
        assert_eq!(value["whitelist"]["transactionDigest"], "tx-allow");
        assert_eq!(value["attestation"]["whitelistTransactionDigest"], "tx-att");
        assert!(value["attestation"].get("encryptionTransactionDigest").is_none());
        assert!(value.get("file").is_none());
        assert!(value.get("storage").is_none());
    }

    #[test]
    fn test_storage_variants() {
        let user = SuiAddress::parse(TEST_USER_ADDRESS).unwrap();
        let policy = test_policy();
        let mut envelope = ResultEnvelope::new(&user);
        envelope.set_storage(
            &StorageRecord::AlreadyCertified {
                blob_id: "blob".to_string(),
                end_epoch: 7,
                certifying_tx: TransactionRef::new("tx-cert"),
            },
            &policy,
            None,
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["storage"]["status"], "alreadyCertified");
        assert_eq!(value["storage"]["certifiedTxDigest"], "tx-cert");
        assert!(value["storage"].get("suiObjectId").is_none());
        assert!(value["storage"].get("aggregatorUrl").is_none());
    }
}
