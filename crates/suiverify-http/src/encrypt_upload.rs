//! Handler for verification document uploads.
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;
use log::{debug, info};
use serde_json::json;
use std::sync::Arc;
use suiverify_core::{UploadedFile, VerificationRequest};

use crate::errors::{ErrorResponse, SuiVerifyHTTPError};
use crate::state::AppState;

/// Multipart field holding the user's Sui address.
pub const USER_ADDRESS_FIELD: &str = "userAddress";
const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Type for the encrypt-and-upload handler methods.
pub struct EncryptUploadHTTPHandler {}

impl EncryptUploadHTTPHandler {
    /// Reads the address and the first attached file from a multipart body.
    ///
    /// Further files and unknown fields are ignored, as are file parts with an empty name
    /// or no contents. A file larger than `max_upload_bytes` is rejected as soon as the
    /// limit is crossed.
    pub async fn read_request(
        mut multipart: Multipart,
        max_upload_bytes: usize,
    ) -> Result<VerificationRequest, SuiVerifyHTTPError> {
        let mut request = VerificationRequest::default();
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|err| SuiVerifyHTTPError::InvalidMultipart(err.to_string()))?
        {
            let is_address = field.name() == Some(USER_ADDRESS_FIELD);
            let file_name = field
                .file_name()
                .filter(|name| !name.is_empty())
                .map(str::to_owned);
            match (is_address, file_name) {
                (_, Some(file_name)) if request.file.is_none() => {
                    let media_type = field
                        .content_type()
                        .unwrap_or(DEFAULT_MEDIA_TYPE)
                        .to_owned();
                    let mut bytes = Vec::new();
                    while let Some(chunk) = field
                        .chunk()
                        .await
                        .map_err(|err| SuiVerifyHTTPError::InvalidMultipart(err.to_string()))?
                    {
                        if bytes.len() + chunk.len() > max_upload_bytes {
                            return Err(SuiVerifyHTTPError::PayloadTooLarge(max_upload_bytes));
                        }
                        bytes.extend_from_slice(&chunk);
                    }
                    if bytes.is_empty() {
                        debug!("Skipping empty file part {}", file_name);
                        continue;
                    }
                    debug!("Received file {} ({} bytes)", file_name, bytes.len());
                    request.file = Some(UploadedFile::new(&file_name, &media_type, bytes));
                }
                (true, None) => {
                    request.user_address = Some(
                        field
                            .text()
                            .await
                            .map_err(|err| SuiVerifyHTTPError::InvalidMultipart(err.to_string()))?,
                    );
                }
                _ => continue,
            }
        }
        Ok(request)
    }

    pub async fn post_encrypt_upload(
        State(app_state): State<Arc<AppState>>,
        multipart: Multipart,
    ) -> Result<impl IntoResponse, ErrorResponse> {
        let expose_details = app_state.config.is_development();
        let request = Self::read_request(multipart, app_state.config.max_upload_bytes)
            .await
            .map_err(|err| err.with_details(expose_details))?;
        let has_file = request.document().is_some();
        let envelope = app_state
            .orchestrator
            .process_verification(request)
            .await
            .map_err(|err| SuiVerifyHTTPError::from(err).with_details(expose_details))?;
        let message = if has_file {
            "File encrypted and uploaded successfully"
        } else {
            "User added to whitelist successfully"
        };
        info!("{} for {}", message, envelope.user_address);
        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "message": message, "data": envelope })),
        ))
    }
}
