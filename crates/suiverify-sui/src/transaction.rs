//! Build, sign and execute a single Move call.
use log::{debug, info};
use suiverify_core::ledger::{LedgerClient, MoveCall, TransactionResponse};
use suiverify_core::PipelineError;

use crate::identity::SigningIdentity;

/// Builds a transaction for `call` paid for by `signer`, signs it and executes it.
///
/// Succeeds only when the executed transaction reports a successful status.
pub async fn sign_and_execute(
    ledger: &dyn LedgerClient,
    signer: &SigningIdentity,
    call: &MoveCall,
    gas_budget: u64,
) -> Result<TransactionResponse, PipelineError> {
    let sender = signer.address().canonical();
    debug!("Building {} for {sender}", call.target());
    let unsigned = ledger.move_call(sender, call, gas_budget).await?;
    let signature = signer.sign_transaction(&unsigned.tx_bytes).map_err(|err| {
        PipelineError::LedgerSubmission(format!("Cannot sign {}: {err}", call.target()))
    })?;
    let response = ledger.execute(&unsigned.tx_bytes, &[signature]).await?;
    response.ensure_success()?;
    info!("Executed {} in {}", call.target(), response.digest);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{failed_response, success_response};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};
    use serde_json::json;
    use suiverify_core::ledger::{MockLedgerClient, TransactionBytes};

    fn test_call() -> MoveCall {
        MoveCall::new("0x1", "allowlist", "add", vec![json!("0x2")])
    }

    #[tokio::test]
    async fn test_sign_and_execute() {
        let signer = SigningIdentity::from_secret([9u8; 32]);
        let sender = signer.address().canonical().to_string();
        let tx_bytes = STANDARD.encode(b"unsigned transaction");
        let public_key = signer.public_key_bytes();

        let mut ledger = MockLedgerClient::new();
        let returned = tx_bytes.clone();
        ledger
            .expect_move_call()
            .withf(move |signer, call, gas_budget| {
                signer == sender && call.target() == "0x1::allowlist::add" && *gas_budget == 100
            })
            .times(1)
            .returning(move |_, _, _| {
                Ok(TransactionBytes {
                    tx_bytes: returned.clone(),
                })
            });
        let expected = tx_bytes.clone();
        ledger
            .expect_execute()
            .withf(move |tx_bytes, signatures| {
                let serialized = STANDARD.decode(&signatures[0]).unwrap();
                let key = VerifyingKey::from_bytes(&public_key).unwrap();
                let signature = Signature::from_slice(&serialized[1..65]).unwrap();
                tx_bytes == expected
                    && signatures.len() == 1
                    && key
                        .verify(
                            &crate::identity::intent_digest(b"unsigned transaction"),
                            &signature,
                        )
                        .is_ok()
            })
            .times(1)
            .returning(|_, _| Ok(success_response("digest-1")));

        let response = sign_and_execute(&ledger, &signer, &test_call(), 100)
            .await
            .unwrap();
        assert_eq!(response.digest, "digest-1");
    }

    #[tokio::test]
    async fn test_failed_execution() {
        let signer = SigningIdentity::from_secret([9u8; 32]);
        let mut ledger = MockLedgerClient::new();
        ledger.expect_move_call().returning(|_, _, _| {
            Ok(TransactionBytes {
                tx_bytes: STANDARD.encode(b"tx"),
            })
        });
        ledger
            .expect_execute()
            .returning(|_, _| Ok(failed_response("digest-2", "InsufficientGas")));
        match sign_and_execute(&ledger, &signer, &test_call(), 100).await {
            Err(PipelineError::LedgerSubmission(message)) => {
                assert!(message.contains("InsufficientGas"))
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_move_call_error_skips_execute() {
        let signer = SigningIdentity::from_secret([9u8; 32]);
        let mut ledger = MockLedgerClient::new();
        ledger
            .expect_move_call()
            .returning(|_, _, _| Err(PipelineError::LedgerSubmission("no gas".to_string())));
        ledger.expect_execute().never();
        assert!(sign_and_execute(&ledger, &signer, &test_call(), 100)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_invalid_tx_bytes() {
        let signer = SigningIdentity::from_secret([9u8; 32]);
        let mut ledger = MockLedgerClient::new();
        ledger.expect_move_call().returning(|_, _, _| {
            Ok(TransactionBytes {
                tx_bytes: "%%%".to_string(),
            })
        });
        ledger.expect_execute().never();
        match sign_and_execute(&ledger, &signer, &test_call(), 100).await {
            Err(PipelineError::LedgerSubmission(message)) => {
                assert!(message.contains("Cannot sign 0x1::allowlist::add"))
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
