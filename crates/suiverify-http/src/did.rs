//! Handler for submitting pre-signed DID creation transactions.
use axum::extract::{rejection::JsonRejection, State};
use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::errors::{ErrorResponse, SuiVerifyHTTPError};
use crate::state::AppState;

/// Body of a DID creation request: a transaction signed by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDIDRequest {
    /// Base64 transaction bytes.
    pub tx_bytes: Option<String>,
    /// Base64 serialized signature.
    pub signature: Option<String>,
}

impl CreateDIDRequest {
    /// Both fields, if present and non-empty.
    fn fields(&self) -> Option<(&str, &str)> {
        match (self.tx_bytes.as_deref(), self.signature.as_deref()) {
            (Some(tx_bytes), Some(signature)) if !tx_bytes.is_empty() && !signature.is_empty() => {
                Some((tx_bytes, signature))
            }
            _ => None,
        }
    }
}

/// Type for the DID handler methods.
pub struct DIDHTTPHandler {}

impl DIDHTTPHandler {
    pub async fn post_create_did(
        State(app_state): State<Arc<AppState>>,
        payload: Result<Json<CreateDIDRequest>, JsonRejection>,
    ) -> Result<impl IntoResponse, ErrorResponse> {
        let expose_details = app_state.config.is_development();
        let Json(request) = payload.map_err(|rejection| {
            SuiVerifyHTTPError::InvalidJson(rejection.body_text()).with_details(expose_details)
        })?;
        let (tx_bytes, signature) = request
            .fields()
            .ok_or_else(|| SuiVerifyHTTPError::MissingDIDFields.with_details(expose_details))?;
        let response = app_state
            .ledger
            .execute(tx_bytes, &[signature.to_owned()])
            .await
            .map_err(|err| SuiVerifyHTTPError::DIDCreation(err).with_details(expose_details))?;
        info!("Submitted DID transaction {}", response.digest);
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "DID created successfully",
                "suiResponse": response,
            })),
        ))
    }
}
