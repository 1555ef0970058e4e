//! Request-to-response mapping for one reading: feature vector in, decoded
//! risk label and per-class probabilities out.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;
use crate::features::{RiskFeatures, N_FEATURES};
use crate::label_encoder::LabelEncoder;
use crate::math::Array2;
use crate::pipeline::Pipeline;

/// Decoded prediction for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub predicted_risk: String,
    pub probabilities: BTreeMap<String, f64>,
}

/// Descriptive metadata about the loaded model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub format_version: u32,
    pub trained_at: Option<DateTime<Utc>>,
    pub feature_names: Vec<String>,
    pub steps: Vec<String>,
    pub classifier: String,
    pub classes: Vec<String>,
}

/// Loaded model state: a fitted pipeline plus the encoder that names its classes.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug)]
pub struct RiskPredictor {
    pipeline: Pipeline,
    encoder: LabelEncoder,
    info: ModelInfo,
}

impl RiskPredictor {
    /// Callers are expected to have checked that the pipeline's class count
    /// matches the encoder; see `ModelArtifact::into_predictor`.
    pub(crate) fn new(pipeline: Pipeline, encoder: LabelEncoder, info: ModelInfo) -> Self {
        Self {
            pipeline,
            encoder,
            info,
        }
    }

    pub fn classes(&self) -> &[String] {
        self.encoder.classes()
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Predict the risk category and class probabilities for one reading.
    pub fn predict(&self, features: &RiskFeatures) -> Result<RiskPrediction, InferenceError> {
        let x = Array2::from_shape_vec((1, N_FEATURES), features.to_row().to_vec())?;

        let codes = self.pipeline.predict(&x)?;
        let proba = self.pipeline.predict_proba(&x)?;

        self.decode(codes[0], proba.row_slice(0))
    }

    /// Same mapping as [`RiskPredictor::predict`] over many readings.
    pub fn predict_batch(
        &self,
        readings: &[RiskFeatures],
    ) -> Result<Vec<RiskPrediction>, InferenceError> {
        if readings.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<[f64; N_FEATURES]> = readings.iter().map(RiskFeatures::to_row).collect();
        let x = Array2::from_rows(&rows)?;

        let codes = self.pipeline.predict(&x)?;
        let proba = self.pipeline.predict_proba(&x)?;

        codes
            .par_iter()
            .enumerate()
            .map(|(i, &code)| self.decode(code, proba.row_slice(i)))
            .collect()
    }

    fn decode(&self, code: usize, probs: &[f64]) -> Result<RiskPrediction, InferenceError> {
        let predicted_risk = self.encoder.inverse_transform(code)?.to_string();

        if probs.len() != self.encoder.len() {
            return Err(InferenceError::ProbabilityShape {
                expected: self.encoder.len(),
                found: probs.len(),
            });
        }
        if let Some(k) = probs.iter().position(|p| !p.is_finite()) {
            return Err(InferenceError::NonFinite(k));
        }

        let probabilities = self
            .encoder
            .classes()
            .iter()
            .zip(probs)
            .map(|(label, &p)| (label.clone(), p))
            .collect();

        Ok(RiskPrediction {
            predicted_risk,
            probabilities,
        })
    }
}
