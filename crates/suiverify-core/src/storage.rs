//! Blob storage adapter trait and storage outcomes.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::ledger::TransactionRef;

/// Outcome of storing a blob. Exactly one variant is produced per successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageRecord {
    /// The same content had already been stored and certified.
    AlreadyCertified {
        blob_id: String,
        end_epoch: u64,
        certifying_tx: TransactionRef,
    },
    /// A new storage object was created for the content.
    NewlyCreated {
        blob_id: String,
        end_epoch: u64,
        storage_object: String,
    },
}

impl StorageRecord {
    pub fn blob_id(&self) -> &str {
        match self {
            StorageRecord::AlreadyCertified { blob_id, .. }
            | StorageRecord::NewlyCreated { blob_id, .. } => blob_id,
        }
    }

    pub fn end_epoch(&self) -> u64 {
        match self {
            StorageRecord::AlreadyCertified { end_epoch, .. }
            | StorageRecord::NewlyCreated { end_epoch, .. } => *end_epoch,
        }
    }
}

/// Stores ciphertext on a blob storage network.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `data` in a single request. Payload size is not capped here.
    async fn store(&self, data: &[u8]) -> Result<StorageRecord, PipelineError>;

    /// Public read URL for a stored blob, if the store exposes one.
    fn blob_url(&self, blob_id: &str) -> Option<String>;
}
