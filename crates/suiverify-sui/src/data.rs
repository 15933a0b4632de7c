//! Test fixtures for the Sui adapters.
use axum::Router;
use serde_json::json;
use suiverify_core::ledger::TransactionResponse;

/// `sui.keystore` entry for the secret `[1u8; 32]`.
pub(crate) const TEST_KEYSTORE_KEY: &str = "AAEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEB";

pub(crate) const TEST_USER_ADDRESS: &str =
    "0xabc0000000000000000000000000000000000000000000000000000000000123";

pub(crate) const TEST_CONFIG: &str = r#"
[sui]
rpc_url = "http://127.0.0.1:9000"
private_key = "AAEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEB"
allowlist_package_id = "0x9d2a3f1b7c4e5d6a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a"
policy_object_id = "0x7a1c9c3c2f8a1d7c0e0c43a1f9b88d2c8e1c2b14a4f5c6d7e8f9a0b1c2d3e4f5"
policy_cap_id = "0x1f2e3d4c5b6a79880716253443526170f0e1d2c3b4a5968778695a4b3c2d1e0f"
seal_service_url = "http://127.0.0.1:27182/"
seal_package_id = "0x9d2a3f1b7c4e5d6a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a"
seal_threshold = 2
seal_key_servers = [
    "0x73d05d62c18d9374e3ea529e8e0ed6161da1a141a94d3f76ae3fe4e99356db75",
    "0xf5d14a81a982144ae441cd7d64b09027f116a468bd36e7eca494f750591623c8",
]
walrus_publisher_url = "http://127.0.0.1:31415/"
walrus_aggregator_url = "http://127.0.0.1:31416"
attestation_package_id = "0x4c8e2b1a9f7d6c5b4a3928170f6e5d4c3b2a19087f6e5d4c3b2a190817263544"
attestation_cap_id = "0x2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f80910"
attestation_registry_id = "0x5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d"
encryption_attestation_gas_budget = 20000000

[http]
port = 3000
"#;

/// Result of `sui_executeTransactionBlock` for a successful transaction.
pub(crate) const TEST_EXECUTE_RESULT: &str = r#"{
    "digest": "9LkHkDDaN2ZuvRbDhbCvVF1jhWStM7Mvn8b3wfwUxWHn",
    "effects": {
        "messageVersion": "v1",
        "status": { "status": "success" },
        "executedEpoch": "412",
        "transactionDigest": "9LkHkDDaN2ZuvRbDhbCvVF1jhWStM7Mvn8b3wfwUxWHn"
    },
    "objectChanges": [],
    "events": [],
    "confirmedLocalExecution": true
}"#;

pub(crate) fn success_response(digest: &str) -> TransactionResponse {
    serde_json::from_value(json!({
        "digest": digest,
        "effects": { "status": { "status": "success" } },
        "confirmedLocalExecution": true
    }))
    .unwrap()
}

pub(crate) fn failed_response(digest: &str, error: &str) -> TransactionResponse {
    serde_json::from_value(json!({
        "digest": digest,
        "effects": { "status": { "status": "failure", "error": error } }
    }))
    .unwrap()
}

/// Serves `router` on an ephemeral local port and returns its base url.
pub(crate) fn spawn_server(router: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(router.into_make_service())
            .await
            .unwrap();
    });
    format!("http://{addr}")
}
