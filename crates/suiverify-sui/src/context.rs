//! Wiring of the Sui adapters from validated settings.
use std::sync::Arc;
use suiverify_core::ledger::LedgerClient;
use suiverify_core::{Adapters, Orchestrator, PipelineError};

use crate::allowlist::SuiAllowlist;
use crate::attest::{AttestationObjects, SuiAttestationRecorder};
use crate::config::SuiSettings;
use crate::rpc::SuiRpcClient;
use crate::seal::SealEncryptor;
use crate::walrus::WalrusPublisher;

/// Process-wide clients shared by every request.
pub struct SuiContext {
    settings: SuiSettings,
    ledger: Arc<dyn LedgerClient>,
    adapters: Adapters,
}

impl SuiContext {
    pub fn from_settings(settings: SuiSettings) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .timeout(settings.call_timeout)
            .build()
            .map_err(|err| PipelineError::Configuration(err.to_string()))?;
        let ledger: Arc<dyn LedgerClient> =
            Arc::new(SuiRpcClient::with_client(http.clone(), &settings.rpc_url));
        Ok(Self::with_ledger(settings, ledger, http))
    }

    /// Builds the adapters on top of an existing ledger client.
    pub fn with_ledger(
        settings: SuiSettings,
        ledger: Arc<dyn LedgerClient>,
        http: reqwest::Client,
    ) -> Self {
        let identities = &settings.identities;
        let adapters = Adapters {
            registry: Arc::new(SuiAllowlist::new(
                ledger.clone(),
                settings.allowlist_package_id.clone(),
                identities.whitelister.clone(),
                settings.allowlist_gas_budget,
            )),
            encryptor: Arc::new(SealEncryptor::new(
                http.clone(),
                &settings.seal_service_url,
                settings.seal_package_id.clone(),
                settings.seal_threshold,
                settings.seal_key_servers.clone(),
            )),
            store: Arc::new(WalrusPublisher::new(
                http,
                &settings.walrus_publisher_url,
                &settings.walrus_aggregator_url,
                settings.walrus_epochs,
            )),
            recorder: Arc::new(SuiAttestationRecorder::new(
                ledger.clone(),
                AttestationObjects {
                    package_id: settings.attestation_package_id.clone(),
                    cap_id: settings.attestation_cap_id.clone(),
                    registry_id: settings.attestation_registry_id.clone(),
                    clock_id: settings.clock_object_id.clone(),
                },
                identities.clone(),
                settings.attestation_gas_budgets,
            )),
        };
        Self {
            settings,
            ledger,
            adapters,
        }
    }

    pub fn settings(&self) -> &SuiSettings {
        &self.settings
    }

    pub fn ledger(&self) -> Arc<dyn LedgerClient> {
        self.ledger.clone()
    }

    pub fn adapters(&self) -> Adapters {
        self.adapters.clone()
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.settings.orchestrator_config(), self.adapters())
    }
}
