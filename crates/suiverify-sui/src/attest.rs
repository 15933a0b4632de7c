//! Attestations recorded through the `attestation` Move module.
use async_trait::async_trait;
use log::info;
use serde_json::json;
use std::sync::Arc;
use suiverify_core::attestation::{AttestationEvent, AttestationKind, AttestationRecorder};
use suiverify_core::ledger::{LedgerClient, MoveCall};
use suiverify_core::{PipelineError, SuiAddress, TransactionRef};

use crate::identity::{Role, RoleIdentities};
use crate::transaction::sign_and_execute;

const ATTESTATION_MODULE: &str = "attestation";

/// On-chain objects the attestation calls operate on.
#[derive(Debug, Clone)]
pub struct AttestationObjects {
    pub package_id: SuiAddress,
    pub cap_id: SuiAddress,
    pub registry_id: SuiAddress,
    pub clock_id: SuiAddress,
}

/// Gas budget for each attestation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttestationGasBudgets {
    pub whitelist: u64,
    pub encryption: u64,
    pub upload: u64,
}

impl AttestationGasBudgets {
    pub fn uniform(budget: u64) -> Self {
        Self {
            whitelist: budget,
            encryption: budget,
            upload: budget,
        }
    }

    pub fn for_kind(&self, kind: AttestationKind) -> u64 {
        match kind {
            AttestationKind::WhitelistAdd => self.whitelist,
            AttestationKind::EncryptionRecorded => self.encryption,
            AttestationKind::BlobUploadRecorded => self.upload,
        }
    }
}

/// Records attestation events in the registry, signing each with the key of the role
/// that performed the attested action.
pub struct SuiAttestationRecorder {
    ledger: Arc<dyn LedgerClient>,
    objects: AttestationObjects,
    identities: RoleIdentities,
    gas_budgets: AttestationGasBudgets,
}

impl SuiAttestationRecorder {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        objects: AttestationObjects,
        identities: RoleIdentities,
        gas_budgets: AttestationGasBudgets,
    ) -> Self {
        Self {
            ledger,
            objects,
            identities,
            gas_budgets,
        }
    }

    /// The Move call recording `event`, and the role that signs it.
    pub fn move_call_for(&self, event: &AttestationEvent) -> (MoveCall, Role) {
        let AttestationObjects {
            package_id,
            cap_id,
            registry_id,
            clock_id,
        } = &self.objects;
        let mut arguments = vec![
            json!(cap_id.canonical()),
            json!(registry_id.canonical()),
            json!(event.user().canonical()),
        ];
        let (function, role) = match event {
            AttestationEvent::WhitelistAdd { allowlist_tx, .. } => {
                arguments.push(json!(allowlist_tx.digest()));
                ("record_whitelist", Role::Whitelister)
            }
            AttestationEvent::EncryptionRecorded {
                content_id,
                policy_object,
                encryption_service,
                ..
            } => {
                arguments.push(json!(content_id));
                arguments.push(json!(policy_object.canonical()));
                arguments.push(json!(encryption_service));
                ("record_encryption", Role::Encrypter)
            }
            AttestationEvent::BlobUploadRecorded {
                data_owner,
                blob_id,
                ..
            } => {
                arguments.push(json!(data_owner.canonical()));
                arguments.push(json!(blob_id));
                ("record_upload", Role::Uploader)
            }
        };
        arguments.push(json!(clock_id.canonical()));
        (
            MoveCall::new(
                package_id.canonical(),
                ATTESTATION_MODULE,
                function,
                arguments,
            ),
            role,
        )
    }
}

#[async_trait]
impl AttestationRecorder for SuiAttestationRecorder {
    async fn record(&self, event: &AttestationEvent) -> Result<TransactionRef, PipelineError> {
        let (call, role) = self.move_call_for(event);
        let signer = self.identities.for_role(role);
        let gas_budget = self.gas_budgets.for_kind(event.kind());
        let response = sign_and_execute(self.ledger.as_ref(), signer, &call, gas_budget).await?;
        info!(
            "Recorded {} attestation for {} in {}",
            event.kind(),
            event.user(),
            response.digest
        );
        Ok(response.transaction_ref())
    }
}
