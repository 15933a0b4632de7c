//! JSON-RPC client for a Sui fullnode.
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use suiverify_core::ledger::{LedgerClient, MoveCall, TransactionBytes, TransactionResponse};
use suiverify_core::PipelineError;

/// Request type that waits until the node has executed the transaction locally.
const WAIT_FOR_LOCAL_EXECUTION: &str = "WaitForLocalExecution";

#[derive(Deserialize, Debug)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize, Debug)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// A [`LedgerClient`] backed by the Sui fullnode JSON-RPC API.
pub struct SuiRpcClient {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    pub fn new(url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends a JSON-RPC request and returns its `result`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, PipelineError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("Sending {method} (id {id}) to {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params,
            }))
            .send()
            .await
            .map_err(|err| PipelineError::LedgerSubmission(format!("{method}: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::LedgerSubmission(format!(
                "{method}: fullnode returned HTTP {status}"
            )));
        }
        let body: RpcResponse<T> = response.json().await.map_err(|err| {
            PipelineError::UpstreamProtocol(format!("{method}: malformed response: {err}"))
        })?;
        match body {
            RpcResponse {
                error: Some(RpcError { code, message }),
                ..
            } => Err(PipelineError::LedgerSubmission(format!(
                "{method} failed ({code}): {message}"
            ))),
            RpcResponse {
                result: Some(result),
                ..
            } => Ok(result),
            _ => Err(PipelineError::UpstreamProtocol(format!(
                "{method}: response has neither result nor error"
            ))),
        }
    }
}

#[async_trait]
impl LedgerClient for SuiRpcClient {
    async fn move_call(
        &self,
        signer: &str,
        call: &MoveCall,
        gas_budget: u64,
    ) -> Result<TransactionBytes, PipelineError> {
        self.request(
            "unsafe_moveCall",
            json!([
                signer,
                call.package,
                call.module,
                call.function,
                call.type_arguments,
                call.arguments,
                null,
                gas_budget.to_string(),
                null
            ]),
        )
        .await
    }

    async fn execute(
        &self,
        tx_bytes: &str,
        signatures: &[String],
    ) -> Result<TransactionResponse, PipelineError> {
        self.request(
            "sui_executeTransactionBlock",
            json!([
                tx_bytes,
                signatures,
                {
                    "showEffects": true,
                    "showObjectChanges": true,
                    "showEvents": true
                },
                WAIT_FOR_LOCAL_EXECUTION
            ]),
        )
        .await
    }
}
