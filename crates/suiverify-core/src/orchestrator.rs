//! Sequencing of the verification pipeline for a single request.
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::address::SuiAddress;
use crate::attestation::{AttestationEvent, AttestationRecord, AttestationRecorder};
use crate::encryption::ThresholdEncryptor;
use crate::envelope::ResultEnvelope;
use crate::errors::PipelineError;
use crate::policy::{PolicyObject, PolicyRegistry};
use crate::request::{UploadedFile, VerificationRequest};
use crate::saga::{Compensation, NoCompensation, PipelineStep, Saga};
use crate::storage::BlobStore;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_IN_FLIGHT: usize = 64;
const DEFAULT_ADMISSION_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrator settings.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Allowlist every request is added to and encrypted under.
    pub policy: PolicyObject,
    /// Upper bound on each adapter call.
    pub call_timeout: Duration,
    /// Maximum number of requests processed at once.
    pub max_in_flight: usize,
    /// How long a request may wait for a free slot before being rejected.
    pub admission_timeout: Duration,
}

impl OrchestratorConfig {
    pub fn new(policy: PolicyObject) -> Self {
        Self {
            policy,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            admission_timeout: DEFAULT_ADMISSION_TIMEOUT,
        }
    }
}

/// The external services the pipeline drives.
#[derive(Clone)]
pub struct Adapters {
    pub registry: Arc<dyn PolicyRegistry>,
    pub encryptor: Arc<dyn ThresholdEncryptor>,
    pub store: Arc<dyn BlobStore>,
    pub recorder: Arc<dyn AttestationRecorder>,
}

/// Runs verification requests: allowlist, attest, and for requests with a document,
/// encrypt, store and attest again. Steps run strictly in order, each attempted once.
pub struct Orchestrator {
    config: OrchestratorConfig,
    adapters: Adapters,
    compensation: Arc<dyn Compensation>,
    permits: Semaphore,
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig, adapters: Adapters) -> Self {
        let permits = Semaphore::new(config.max_in_flight.max(1));
        Self {
            config,
            adapters,
            compensation: Arc::new(NoCompensation),
            permits,
        }
    }

    /// Replaces the compensation run for completed steps when a request fails.
    pub fn with_compensation(mut self, compensation: Arc<dyn Compensation>) -> Self {
        self.compensation = compensation;
        self
    }

    pub fn policy(&self) -> &PolicyObject {
        &self.config.policy
    }

    /// Processes one verification request and returns the accumulated envelope.
    ///
    /// The address is validated before any adapter is touched. On failure, completed
    /// steps are handed to the configured compensation and the first error is returned.
    pub async fn process_verification(
        &self,
        request: VerificationRequest,
    ) -> Result<ResultEnvelope, PipelineError> {
        let user = SuiAddress::parse(request.user_address.as_deref().unwrap_or_default())?;
        let _permit = self.admit().await?;
        info!("Processing verification request for {}", user);

        let mut saga = Saga::new(self.compensation.as_ref());
        match self.run(&user, request.document(), &mut saga).await {
            Ok(envelope) => {
                info!(
                    "Verification for {} completed in {} step(s).",
                    user,
                    saga.completed().len()
                );
                Ok(envelope)
            }
            Err(err) => {
                saga.unwind(&err).await;
                Err(err)
            }
        }
    }

    async fn admit(&self) -> Result<SemaphorePermit<'_>, PipelineError> {
        match tokio::time::timeout(self.config.admission_timeout, self.permits.acquire()).await {
            Ok(Ok(permit)) => Ok(permit),
            _ => {
                warn!(
                    "Rejecting verification request: {} requests already in flight.",
                    self.config.max_in_flight
                );
                Err(PipelineError::Overloaded)
            }
        }
    }

    /// Awaits an adapter call under the per-call timeout.
    async fn call<T, F>(&self, step: PipelineStep, call: F) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, PipelineError>>,
    {
        debug!("Starting step {}", step);
        tokio::time::timeout(self.config.call_timeout, call)
            .await
            .map_err(|_| PipelineError::Timeout {
                step,
                seconds: self.config.call_timeout.as_secs(),
            })?
    }

    async fn run(
        &self,
        user: &SuiAddress,
        file: Option<&UploadedFile>,
        saga: &mut Saga<'_>,
    ) -> Result<ResultEnvelope, PipelineError> {
        let policy = &self.config.policy;
        let mut envelope = ResultEnvelope::new(user);

        let allowlist_tx = self
            .call(
                PipelineStep::Allowlist,
                self.adapters.registry.add_to_allowlist(user, policy),
            )
            .await?;
        info!(
            "Added {} to allowlist {} in transaction {}",
            user, policy.object_id, allowlist_tx
        );
        saga.complete(PipelineStep::Allowlist, allowlist_tx.digest());
        envelope.set_whitelist(policy, allowlist_tx.clone());

        self.attest(
            PipelineStep::WhitelistAttestation,
            AttestationEvent::WhitelistAdd {
                user: user.clone(),
                allowlist_tx,
            },
            saga,
            &mut envelope,
        )
        .await?;

        let file = match file {
            Some(file) => file,
            None => {
                info!("No document attached for {}, whitelist only.", user);
                return Ok(envelope);
            }
        };

        let encryption = self
            .call(
                PipelineStep::Encryption,
                self.adapters.encryptor.encrypt(&file.bytes, policy),
            )
            .await?;
        info!(
            "Encrypted {} ({} bytes) as {}",
            file.name,
            file.size(),
            encryption.content_id
        );
        saga.complete(PipelineStep::Encryption, &encryption.content_id);
        let encryption_service = self.adapters.encryptor.service_id();
        envelope.set_file(file, &encryption, policy, &encryption_service);

        let record = self
            .call(
                PipelineStep::Storage,
                self.adapters.store.store(&encryption.ciphertext),
            )
            .await?;
        info!(
            "Stored ciphertext as blob {} until epoch {}",
            record.blob_id(),
            record.end_epoch()
        );
        saga.complete(PipelineStep::Storage, record.blob_id());
        envelope.set_storage(
            &record,
            policy,
            self.adapters.store.blob_url(record.blob_id()),
        );

        self.attest(
            PipelineStep::EncryptionAttestation,
            AttestationEvent::EncryptionRecorded {
                user: user.clone(),
                content_id: encryption.content_id.to_owned(),
                policy_object: policy.object_id.clone(),
                encryption_service,
            },
            saga,
            &mut envelope,
        )
        .await?;

        // Delegated uploads are not supported: the requester owns the data.
        self.attest(
            PipelineStep::UploadAttestation,
            AttestationEvent::BlobUploadRecorded {
                user: user.clone(),
                data_owner: user.clone(),
                blob_id: record.blob_id().to_string(),
            },
            saga,
            &mut envelope,
        )
        .await?;

        Ok(envelope)
    }

    async fn attest(
        &self,
        step: PipelineStep,
        event: AttestationEvent,
        saga: &mut Saga<'_>,
        envelope: &mut ResultEnvelope,
    ) -> Result<(), PipelineError> {
        let transaction = self
            .call(step, self.adapters.recorder.record(&event))
            .await?;
        info!("Recorded {} attestation in {}", event.kind(), transaction);
        saga.complete(step, transaction.digest());
        envelope.add_attestation(AttestationRecord::new(&event, transaction));
        Ok(())
    }
}
