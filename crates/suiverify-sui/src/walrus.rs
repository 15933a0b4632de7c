//! Blob storage through a Walrus publisher.
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use suiverify_core::storage::{BlobStore, StorageRecord};
use suiverify_core::{PipelineError, TransactionRef};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct StorageResource {
    end_epoch: u64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct BlobObject {
    id: String,
    blob_id: String,
    storage: StorageResource,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct NewlyCreated {
    blob_object: BlobObject,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CertifiedEvent {
    tx_digest: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AlreadyCertified {
    blob_id: String,
    end_epoch: u64,
    event: CertifiedEvent,
}

/// The two documented publisher outcomes. Anything else is rejected.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
enum PublisherResponse {
    NewlyCreated(NewlyCreated),
    AlreadyCertified(AlreadyCertified),
}

impl From<PublisherResponse> for StorageRecord {
    fn from(response: PublisherResponse) -> Self {
        match response {
            PublisherResponse::NewlyCreated(NewlyCreated { blob_object }) => {
                StorageRecord::NewlyCreated {
                    blob_id: blob_object.blob_id,
                    end_epoch: blob_object.storage.end_epoch,
                    storage_object: blob_object.id,
                }
            }
            PublisherResponse::AlreadyCertified(certified) => StorageRecord::AlreadyCertified {
                blob_id: certified.blob_id,
                end_epoch: certified.end_epoch,
                certifying_tx: TransactionRef::new(certified.event.tx_digest),
            },
        }
    }
}

/// Interprets a publisher response body.
pub fn parse_publisher_response(body: Value) -> Result<StorageRecord, PipelineError> {
    serde_json::from_value::<PublisherResponse>(body)
        .map(StorageRecord::from)
        .map_err(|err| {
            PipelineError::UpstreamProtocol(format!("Unrecognised storage response: {err}"))
        })
}

/// A [`BlobStore`] writing to a Walrus publisher and reading through an aggregator.
pub struct WalrusPublisher {
    client: reqwest::Client,
    publisher_url: String,
    aggregator_url: String,
    epochs: u64,
}

impl WalrusPublisher {
    pub fn new(
        client: reqwest::Client,
        publisher_url: &str,
        aggregator_url: &str,
        epochs: u64,
    ) -> Self {
        Self {
            client,
            publisher_url: publisher_url.trim_end_matches('/').to_owned(),
            aggregator_url: aggregator_url.trim_end_matches('/').to_owned(),
            epochs,
        }
    }
}

#[async_trait]
impl BlobStore for WalrusPublisher {
    async fn store(&self, data: &[u8]) -> Result<StorageRecord, PipelineError> {
        debug!("Storing {} bytes for {} epochs", data.len(), self.epochs);
        let response = self
            .client
            .put(format!("{}/v1/blobs", self.publisher_url))
            .query(&[("epochs", self.epochs)])
            .body(data.to_vec())
            .send()
            .await
            .map_err(|err| PipelineError::StorageService(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::StorageService(format!(
                "Publisher returned HTTP {status}: {body}"
            )));
        }
        let body: Value = response.json().await.map_err(|err| {
            PipelineError::UpstreamProtocol(format!("Malformed storage response: {err}"))
        })?;
        let record = parse_publisher_response(body)?;
        info!("Stored blob {} until epoch {}", record.blob_id(), record.end_epoch());
        Ok(record)
    }

    fn blob_url(&self, blob_id: &str) -> Option<String> {
        Some(format!("{}/v1/blobs/{}", self.aggregator_url, blob_id))
    }
}
