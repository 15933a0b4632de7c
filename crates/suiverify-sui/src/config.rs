//! SuiVerify Sui configuration types and utilities.
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use suiverify_core::policy::PolicyObject;
use suiverify_core::{OrchestratorConfig, PipelineError, SuiAddress};
use thiserror::Error;
use toml;

use crate::attest::AttestationGasBudgets;
use crate::identity::{KeyError, RoleIdentities, SigningIdentity};
use crate::SUI_CLOCK_OBJECT_ID;

const DEFAULT_GAS_BUDGET: u64 = 10_000_000;
const DEFAULT_WALRUS_EPOCHS: u64 = 5;
const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_IN_FLIGHT: usize = 64;
const DEFAULT_ADMISSION_TIMEOUT_SECS: u64 = 5;

/// An error relating to SuiVerify configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SuiConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Missing required settings: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("Invalid setting {0}: {1}")]
    Invalid(&'static str, String),
    #[error("Invalid signing key {0}: {1}")]
    Key(&'static str, KeyError),
}

impl From<SuiConfigError> for PipelineError {
    fn from(err: SuiConfigError) -> Self {
        PipelineError::Configuration(err.to_string())
    }
}

/// Sui, Seal and Walrus configuration as read from the `[sui]` table.
///
/// Every field is optional at parse time so that [`SuiConfig::validate`] can report all
/// missing settings at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuiConfig {
    /// Sui fullnode JSON-RPC endpoint.
    pub rpc_url: Option<String>,
    /// Operational key in `sui.keystore` format; signs for every role by default.
    pub private_key: Option<String>,
    /// Optional separate key for encryption attestations.
    pub encrypter_key: Option<String>,
    /// Optional separate key for upload attestations.
    pub uploader_key: Option<String>,
    /// Package containing the `allowlist` module.
    pub allowlist_package_id: Option<String>,
    /// Allowlist object users are added to.
    pub policy_object_id: Option<String>,
    /// Capability for adding members to the allowlist.
    pub policy_cap_id: Option<String>,
    /// Threshold encryption service endpoint.
    pub seal_service_url: Option<String>,
    /// Package whose access policy the encryption is bound to.
    pub seal_package_id: Option<String>,
    /// Number of key servers needed to decrypt.
    pub seal_threshold: Option<u8>,
    /// Key server object ids.
    pub seal_key_servers: Option<Vec<String>>,
    /// Walrus publisher (write) endpoint.
    pub walrus_publisher_url: Option<String>,
    /// Walrus aggregator (read) endpoint.
    pub walrus_aggregator_url: Option<String>,
    /// Number of epochs blobs are retained for.
    pub walrus_epochs: Option<u64>,
    /// Package containing the `attestation` module.
    pub attestation_package_id: Option<String>,
    /// Capability for recording attestations.
    pub attestation_cap_id: Option<String>,
    /// Attestation registry object.
    pub attestation_registry_id: Option<String>,
    /// Clock object (`0x6` by default).
    pub clock_object_id: Option<String>,
    pub allowlist_gas_budget: Option<u64>,
    /// Default gas budget for attestation calls.
    pub attestation_gas_budget: Option<u64>,
    pub whitelist_attestation_gas_budget: Option<u64>,
    pub encryption_attestation_gas_budget: Option<u64>,
    pub upload_attestation_gas_budget: Option<u64>,
    /// Timeout for each external call in seconds.
    pub call_timeout_secs: Option<u64>,
    /// Maximum concurrent verification requests.
    pub max_in_flight: Option<usize>,
    /// Maximum wait for a free request slot in seconds.
    pub admission_timeout_secs: Option<u64>,
}

impl std::fmt::Display for SuiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        write!(
            f,
            "RPC: {:?} | Key: {:?} | Allowlist: {:?} | Seal: {:?} | Walrus: {:?} | Attestation registry: {:?}",
            self.rpc_url,
            redacted(&self.private_key),
            self.policy_object_id,
            self.seal_service_url,
            self.walrus_publisher_url,
            self.attestation_registry_id
        )
    }
}

/// Validated configuration with every required value present and parsed.
#[derive(Debug, Clone)]
pub struct SuiSettings {
    pub rpc_url: String,
    pub identities: RoleIdentities,
    pub allowlist_package_id: SuiAddress,
    pub policy: PolicyObject,
    pub seal_service_url: String,
    pub seal_package_id: SuiAddress,
    pub seal_threshold: u8,
    pub seal_key_servers: Vec<SuiAddress>,
    pub walrus_publisher_url: String,
    pub walrus_aggregator_url: String,
    pub walrus_epochs: u64,
    pub attestation_package_id: SuiAddress,
    pub attestation_cap_id: SuiAddress,
    pub attestation_registry_id: SuiAddress,
    pub clock_object_id: SuiAddress,
    pub allowlist_gas_budget: u64,
    pub attestation_gas_budgets: AttestationGasBudgets,
    pub call_timeout: Duration,
    pub max_in_flight: usize,
    pub admission_timeout: Duration,
}

impl SuiSettings {
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            policy: self.policy.clone(),
            call_timeout: self.call_timeout,
            max_in_flight: self.max_in_flight,
            admission_timeout: self.admission_timeout,
        }
    }
}

fn address(field: &'static str, value: &str) -> Result<SuiAddress, SuiConfigError> {
    SuiAddress::parse(value).map_err(|err| SuiConfigError::Invalid(field, err.to_string()))
}

fn identity(field: &'static str, value: &str) -> Result<SigningIdentity, SuiConfigError> {
    SigningIdentity::from_keystore(value).map_err(|err| SuiConfigError::Key(field, err))
}

impl SuiConfig {
    fn attestation_gas_budgets(&self) -> AttestationGasBudgets {
        let default = self.attestation_gas_budget.unwrap_or(DEFAULT_GAS_BUDGET);
        AttestationGasBudgets {
            whitelist: self.whitelist_attestation_gas_budget.unwrap_or(default),
            encryption: self.encryption_attestation_gas_budget.unwrap_or(default),
            upload: self.upload_attestation_gas_budget.unwrap_or(default),
        }
    }

    fn walrus_epochs(&self) -> u64 {
        self.walrus_epochs.unwrap_or_else(|| {
            warn!("walrus_epochs not set, storing blobs for {DEFAULT_WALRUS_EPOCHS} epochs.");
            DEFAULT_WALRUS_EPOCHS
        })
    }

    fn clock_object_id(&self) -> &str {
        self.clock_object_id.as_deref().unwrap_or_else(|| {
            warn!("clock_object_id not set, using the system clock {SUI_CLOCK_OBJECT_ID}.");
            SUI_CLOCK_OBJECT_ID
        })
    }

    /// Checks that every required setting is present and well formed.
    pub fn validate(&self) -> Result<SuiSettings, SuiConfigError> {
        let mut missing = Vec::new();
        macro_rules! required {
            ($field:ident) => {
                match self.$field.as_ref() {
                    Some(value) => Some(value),
                    None => {
                        missing.push(stringify!($field));
                        None
                    }
                }
            };
        }
        let rpc_url = required!(rpc_url);
        let private_key = required!(private_key);
        let allowlist_package_id = required!(allowlist_package_id);
        let policy_object_id = required!(policy_object_id);
        let policy_cap_id = required!(policy_cap_id);
        let seal_service_url = required!(seal_service_url);
        let seal_package_id = required!(seal_package_id);
        let seal_threshold = required!(seal_threshold);
        let seal_key_servers = required!(seal_key_servers);
        let walrus_publisher_url = required!(walrus_publisher_url);
        let walrus_aggregator_url = required!(walrus_aggregator_url);
        let attestation_package_id = required!(attestation_package_id);
        let attestation_cap_id = required!(attestation_cap_id);
        let attestation_registry_id = required!(attestation_registry_id);

        let (
            Some(rpc_url),
            Some(private_key),
            Some(allowlist_package_id),
            Some(policy_object_id),
            Some(policy_cap_id),
            Some(seal_service_url),
            Some(seal_package_id),
            Some(seal_threshold),
            Some(seal_key_servers),
            Some(walrus_publisher_url),
            Some(walrus_aggregator_url),
            Some(attestation_package_id),
            Some(attestation_cap_id),
            Some(attestation_registry_id),
        ) = (
            rpc_url,
            private_key,
            allowlist_package_id,
            policy_object_id,
            policy_cap_id,
            seal_service_url,
            seal_package_id,
            seal_threshold,
            seal_key_servers,
            walrus_publisher_url,
            walrus_aggregator_url,
            attestation_package_id,
            attestation_cap_id,
            attestation_registry_id,
        )
        else {
            return Err(SuiConfigError::Missing(missing));
        };

        let seal_key_servers = seal_key_servers
            .iter()
            .map(|id| address("seal_key_servers", id))
            .collect::<Result<Vec<_>, _>>()?;
        if *seal_threshold == 0 || usize::from(*seal_threshold) > seal_key_servers.len() {
            return Err(SuiConfigError::Invalid(
                "seal_threshold",
                format!(
                    "threshold {} must be between 1 and the number of key servers ({})",
                    seal_threshold,
                    seal_key_servers.len()
                ),
            ));
        }

        let default_identity = identity("private_key", private_key)?;
        let identities = RoleIdentities {
            whitelister: default_identity.clone(),
            encrypter: match &self.encrypter_key {
                Some(key) => identity("encrypter_key", key)?,
                None => default_identity.clone(),
            },
            uploader: match &self.uploader_key {
                Some(key) => identity("uploader_key", key)?,
                None => default_identity,
            },
        };

        Ok(SuiSettings {
            rpc_url: rpc_url.to_owned(),
            identities,
            allowlist_package_id: address("allowlist_package_id", allowlist_package_id)?,
            policy: PolicyObject::new(
                address("policy_object_id", policy_object_id)?,
                address("policy_cap_id", policy_cap_id)?,
            ),
            seal_service_url: seal_service_url.trim_end_matches('/').to_owned(),
            seal_package_id: address("seal_package_id", seal_package_id)?,
            seal_threshold: *seal_threshold,
            seal_key_servers,
            walrus_publisher_url: walrus_publisher_url.trim_end_matches('/').to_owned(),
            walrus_aggregator_url: walrus_aggregator_url.trim_end_matches('/').to_owned(),
            walrus_epochs: self.walrus_epochs(),
            attestation_package_id: address("attestation_package_id", attestation_package_id)?,
            attestation_cap_id: address("attestation_cap_id", attestation_cap_id)?,
            attestation_registry_id: address("attestation_registry_id", attestation_registry_id)?,
            clock_object_id: address("clock_object_id", self.clock_object_id())?,
            allowlist_gas_budget: self.allowlist_gas_budget.unwrap_or(DEFAULT_GAS_BUDGET),
            attestation_gas_budgets: self.attestation_gas_budgets(),
            call_timeout: Duration::from_secs(
                self.call_timeout_secs.unwrap_or(DEFAULT_CALL_TIMEOUT_SECS),
            ),
            max_in_flight: self.max_in_flight.unwrap_or(DEFAULT_MAX_IN_FLIGHT),
            admission_timeout: Duration::from_secs(
                self.admission_timeout_secs
                    .unwrap_or(DEFAULT_ADMISSION_TIMEOUT_SECS),
            ),
        })
    }
}

/// Parses the `[sui]` table of a SuiVerify config file.
pub fn parse_toml(toml_str: &str) -> Result<SuiConfig, SuiConfigError> {
    toml::from_str::<Config>(toml_str)
        .map(|config| config.sui)
        .map_err(|err| SuiConfigError::Parse(err.to_string()))
}

/// Wrapper struct for parsing the `sui` config table.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct Config {
    /// Sui configuration data.
    #[serde(default)]
    sui: SuiConfig,
}
