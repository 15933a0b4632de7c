//! Error type and conversions.
use axum::{response::IntoResponse, Json};
use hyper::StatusCode;
use serde_json::{json, Value};
use suiverify_core::PipelineError;
use thiserror::Error;

/// SuiVerify HTTP error type.
#[derive(Error, Debug)]
pub enum SuiVerifyHTTPError {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),
    #[error("File exceeds the maximum upload size of {0} bytes.")]
    PayloadTooLarge(usize),
    #[error("Invalid multipart request: {0}")]
    InvalidMultipart(String),
    #[error("Missing required fields: txBytes and signature are required")]
    MissingDIDFields,
    #[error("Invalid request body: {0}")]
    InvalidJson(String),
    #[error("Failed to create DID: {0}")]
    DIDCreation(PipelineError),
}

impl SuiVerifyHTTPError {
    pub fn status(&self) -> StatusCode {
        match self {
            SuiVerifyHTTPError::Pipeline(PipelineError::InvalidRequest(_))
            | SuiVerifyHTTPError::InvalidMultipart(_)
            | SuiVerifyHTTPError::MissingDIDFields
            | SuiVerifyHTTPError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            SuiVerifyHTTPError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SuiVerifyHTTPError::Pipeline(PipelineError::Overloaded) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SuiVerifyHTTPError::Pipeline(PipelineError::Timeout { .. }) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            SuiVerifyHTTPError::Pipeline(_) | SuiVerifyHTTPError::DIDCreation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Attaches whether upstream details may be shown to the caller.
    pub fn with_details(self, expose_details: bool) -> ErrorResponse {
        ErrorResponse {
            error: self,
            expose_details,
        }
    }
}

/// An error rendered as `{success: false, message, error}`.
///
/// Client errors always carry their message. For internal errors the message is generic
/// and the upstream detail is only included when `expose_details` is set.
#[derive(Debug)]
pub struct ErrorResponse {
    pub error: SuiVerifyHTTPError,
    pub expose_details: bool,
}

impl ErrorResponse {
    fn body(&self) -> (StatusCode, Value) {
        let status = self.status();
        let (message, error) = match &self.error {
            SuiVerifyHTTPError::DIDCreation(inner) => (
                "Failed to create DID".to_string(),
                self.detail(inner.to_string(), &self.error),
            ),
            err if status == StatusCode::INTERNAL_SERVER_ERROR => (
                "Something went wrong!".to_string(),
                self.detail(err.to_string(), err),
            ),
            err => (err.to_string(), json!(err.to_string())),
        };
        (
            status,
            json!({ "success": false, "message": message, "error": error }),
        )
    }

    fn detail(&self, detail: String, err: &SuiVerifyHTTPError) -> Value {
        log::error!("Request failed: {}", err);
        if self.expose_details {
            json!(detail)
        } else {
            json!({})
        }
    }

    fn status(&self) -> StatusCode {
        self.error.status()
    }
}

impl From<SuiVerifyHTTPError> for ErrorResponse {
    fn from(error: SuiVerifyHTTPError) -> Self {
        error.with_details(false)
    }
}

// Make errors suitable for axum responses.
impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = self.body();
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for SuiVerifyHTTPError {
    fn into_response(self) -> axum::response::Response {
        ErrorResponse::from(self).into_response()
    }
}
