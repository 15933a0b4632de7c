//! Remote ledger client abstraction and transaction types.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

use crate::errors::PipelineError;

/// Reference to an executed ledger transaction (its digest).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRef(pub String);

impl TransactionRef {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn digest(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Move function call to be built into a transaction by the ledger node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCall {
    pub package: String,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

impl MoveCall {
    pub fn new(package: &str, module: &str, function: &str, arguments: Vec<Value>) -> Self {
        Self {
            package: package.to_string(),
            module: module.to_string(),
            function: function.to_string(),
            type_arguments: Vec::new(),
            arguments,
        }
    }

    /// Fully qualified target, e.g. `0x2::clock::timestamp_ms`.
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

/// Unsigned transaction data returned by the ledger node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBytes {
    /// BCS serialised transaction data, base64 encoded.
    pub tx_bytes: String,
}

/// Execution status reported in transaction effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Transaction effects; only the status is interpreted, the rest is passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Result of executing a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<TransactionEffects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_changes: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_local_execution: Option<bool>,
}

impl TransactionResponse {
    pub fn transaction_ref(&self) -> TransactionRef {
        TransactionRef::new(&self.digest)
    }

    /// Fails unless the effects report a successful execution.
    pub fn ensure_success(&self) -> Result<(), PipelineError> {
        match &self.effects {
            Some(effects) if effects.status.status == "success" => Ok(()),
            Some(effects) => Err(PipelineError::LedgerSubmission(format!(
                "Transaction {} failed: {}",
                self.digest,
                effects
                    .status
                    .error
                    .as_deref()
                    .unwrap_or(effects.status.status.as_str())
            ))),
            None => Err(PipelineError::LedgerSubmission(format!(
                "Transaction {} returned no effects",
                self.digest
            ))),
        }
    }
}

/// A client that builds and executes transactions on the ledger.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Builds an unsigned transaction for a single Move call paid for by `signer`.
    async fn move_call(
        &self,
        signer: &str,
        call: &MoveCall,
        gas_budget: u64,
    ) -> Result<TransactionBytes, PipelineError>;

    /// Executes a signed transaction and waits for local execution.
    async fn execute(
        &self,
        tx_bytes: &str,
        signatures: &[String],
    ) -> Result<TransactionResponse, PipelineError>;
}
