use std::path::PathBuf;

use thiserror::Error;

use crate::math::ShapeError;

/// Failures while reading or validating a persisted model artifact.
///
/// Every variant is fatal for the process that tried to load the artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("feature names {found:?} do not match the expected order {expected:?}")]
    FeatureNames {
        found: Vec<String>,
        expected: Vec<String>,
    },

    #[error("invalid label encoder: {0}")]
    Encoder(String),

    #[error("invalid preprocessing step {index}: {reason}")]
    Step { index: usize, reason: String },

    #[error("invalid classifier: {0}")]
    Classifier(String),

    #[error("classifier predicts {model} classes but the label encoder knows {encoder}")]
    ClassCount { model: usize, encoder: usize },
}

/// Failures inside the predict / predict_proba / decode chain.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("expected {expected} features per row, got {found}")]
    FeatureCount { expected: usize, found: usize },

    #[error("class code {code} is outside the {n_classes} known classes")]
    UnknownClass { code: usize, n_classes: usize },

    #[error("classifier returned {found} probabilities for {expected} classes")]
    ProbabilityShape { expected: usize, found: usize },

    #[error("classifier returned a non-finite probability for class {0}")]
    NonFinite(usize),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
