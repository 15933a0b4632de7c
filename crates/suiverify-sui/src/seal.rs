//! Threshold encryption through a Seal encryption service.
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use serde::{Deserialize, Serialize};
use suiverify_core::encryption::{
    derive_content_id, fresh_nonce, EncryptionResult, ThresholdEncryptor,
};
use suiverify_core::policy::PolicyObject;
use suiverify_core::{PipelineError, SuiAddress};

use crate::SEAL_SERVICE_ID;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct EncryptRequest<'a> {
    package_id: &'a str,
    id: &'a str,
    threshold: u8,
    key_servers: Vec<&'a str>,
    data: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct EncryptResponse {
    encrypted_object: String,
}

/// A [`ThresholdEncryptor`] that asks a Seal service to encrypt under the allowlist policy.
pub struct SealEncryptor {
    client: reqwest::Client,
    url: String,
    package_id: SuiAddress,
    threshold: u8,
    key_servers: Vec<SuiAddress>,
}

impl SealEncryptor {
    pub fn new(
        client: reqwest::Client,
        url: &str,
        package_id: SuiAddress,
        threshold: u8,
        key_servers: Vec<SuiAddress>,
    ) -> Self {
        Self {
            client,
            url: url.trim_end_matches('/').to_owned(),
            package_id,
            threshold,
            key_servers,
        }
    }
}

#[async_trait]
impl ThresholdEncryptor for SealEncryptor {
    async fn encrypt(
        &self,
        data: &[u8],
        policy: &PolicyObject,
    ) -> Result<EncryptionResult, PipelineError> {
        let content_id = derive_content_id(policy, &fresh_nonce());
        debug!("Encrypting {} bytes as {content_id}", data.len());
        let request = EncryptRequest {
            package_id: self.package_id.canonical(),
            id: &content_id,
            threshold: self.threshold,
            key_servers: self.key_servers.iter().map(|id| id.canonical()).collect(),
            data: STANDARD.encode(data),
        };
        let response = self
            .client
            .post(format!("{}/v1/encrypt", self.url))
            .json(&request)
            .send()
            .await
            .map_err(|err| PipelineError::EncryptionService(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::EncryptionService(format!(
                "Encryption service returned HTTP {status}: {body}"
            )));
        }
        let encrypted: EncryptResponse = response.json().await.map_err(|err| {
            PipelineError::UpstreamProtocol(format!("Malformed encryption response: {err}"))
        })?;
        let ciphertext = STANDARD.decode(encrypted.encrypted_object).map_err(|err| {
            PipelineError::UpstreamProtocol(format!("Encrypted object is not base64: {err}"))
        })?;
        Ok(EncryptionResult {
            ciphertext,
            content_id,
        })
    }

    fn service_id(&self) -> String {
        SEAL_SERVICE_ID.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::spawn_server;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    fn test_policy() -> PolicyObject {
        PolicyObject::new(
            SuiAddress::parse("0x7a").unwrap(),
            SuiAddress::parse("0x1f").unwrap(),
        )
    }

    fn encryptor(url: &str) -> SealEncryptor {
        SealEncryptor::new(
            reqwest::Client::new(),
            url,
            SuiAddress::parse("0x9d").unwrap(),
            1,
            vec![SuiAddress::parse("0x73").unwrap()],
        )
    }

    async fn seal(Json(request): Json<Value>) -> Json<Value> {
        // Reverse the plaintext so the test can tell the service ran.
        let mut data = STANDARD.decode(request["data"].as_str().unwrap()).unwrap();
        data.reverse();
        assert_eq!(request["threshold"], 1);
        assert_eq!(request["keyServers"].as_array().unwrap().len(), 1);
        assert_eq!(request["id"].as_str().unwrap().len(), 74);
        Json(json!({ "encryptedObject": STANDARD.encode(data) }))
    }

    #[tokio::test]
    async fn test_encrypt() {
        let url = spawn_server(Router::new().route("/v1/encrypt", post(seal)));
        let policy = test_policy();
        let result = encryptor(&url).encrypt(b"abc", &policy).await.unwrap();
        assert_eq!(result.ciphertext, b"cba");
        assert!(result
            .content_id
            .starts_with(&policy.object_id.canonical()[2..]));
        assert_eq!(encryptor(&url).service_id(), "seal");
    }

    #[tokio::test]
    async fn test_encrypt_same_input_fresh_content_id() {
        let url = spawn_server(Router::new().route("/v1/encrypt", post(seal)));
        let encryptor = encryptor(&url);
        let policy = test_policy();
        let first = encryptor.encrypt(b"passport", &policy).await.unwrap();
        let second = encryptor.encrypt(b"passport", &policy).await.unwrap();
        assert_eq!(first.ciphertext, second.ciphertext);
        assert_ne!(first.content_id, second.content_id);
        assert_eq!(first.content_id[..64], second.content_id[..64]);
    }

    #[tokio::test]
    async fn test_service_error() {
        let url = spawn_server(Router::new().route(
            "/v1/encrypt",
            post(|| async { (StatusCode::BAD_GATEWAY, "key servers unavailable") }),
        ));
        match encryptor(&url).encrypt(b"abc", &test_policy()).await {
            Err(PipelineError::EncryptionService(message)) => {
                assert!(message.contains("key servers unavailable"))
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let url = spawn_server(Router::new().route(
            "/v1/encrypt",
            post(|| async { Json(json!({ "unexpected": true })) }),
        ));
        assert!(matches!(
            encryptor(&url).encrypt(b"abc", &test_policy()).await,
            Err(PipelineError::UpstreamProtocol(_))
        ));
    }
}
