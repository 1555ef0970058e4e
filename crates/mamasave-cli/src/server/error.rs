use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{error::Category, json};

use mamasave_classifiers::InferenceError;

/// Failures surfaced by the HTTP layer.
#[derive(Debug)]
pub enum ApiError {
    /// The body did not match the request schema; the handler never ran.
    Validation { status: StatusCode, message: String },
    /// The loaded model failed on a structurally valid request.
    Inference(InferenceError),
}

impl ApiError {
    pub fn unsupported_media_type(content_type: &str) -> Self {
        let message = format!(
            "Expected request with `Content-Type: application/json`, got `{}`",
            content_type
        );
        log::warn!("Rejected request body: {}", message);
        ApiError::Validation {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message,
        }
    }
}

/// Syntax and schema errors are both unprocessable content.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        let message = match err.classify() {
            Category::Data => format!("Failed to deserialize the JSON body: {}", err),
            Category::Syntax | Category::Eof | Category::Io => {
                format!("Failed to parse the request body as JSON: {}", err)
            }
        };
        log::warn!("Rejected request body: {}", message);
        ApiError::Validation {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message,
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        ApiError::Inference(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { status, message } => {
                (status, Json(json!({ "detail": message }))).into_response()
            }
            ApiError::Inference(err) => {
                log::error!("Inference failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
