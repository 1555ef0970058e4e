use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;

use mamasave_classifiers::{RiskFeatures, RiskPrediction};

use super::error::ApiError;
use super::AppState;

/// `POST /predict`: one reading in, decoded risk and probabilities out.
///
/// A body without a `Content-Type` header is read as JSON.
pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RiskPrediction>, ApiError> {
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        let content_type = content_type.to_str().unwrap_or_default();
        if !is_json_media_type(content_type) {
            return Err(ApiError::unsupported_media_type(content_type));
        }
    }
    let features: RiskFeatures = serde_json::from_slice(&body)?;
    let prediction = state.predictor.predict(&features)?;
    log::debug!("{:?} -> {}", features, prediction.predicted_risk);
    Ok(Json(prediction))
}

/// `application/json` or any `application/*+json`, ignoring parameters.
pub fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: Option<String>,
    pub classifier: String,
    pub classes: Vec<String>,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let info = state.predictor.info();
    Json(HealthResponse {
        status: "ok",
        model: info.name.clone(),
        classifier: info.classifier.clone(),
        classes: info.classes.clone(),
    })
}
