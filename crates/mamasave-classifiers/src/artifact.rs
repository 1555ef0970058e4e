//! Persisted model artifact: one JSON document holding a fitted pipeline and
//! the label encoder for its classes.
//!
//! Loading is all-or-nothing. Every structural problem (unreadable file,
//! unknown format version, shape disagreements between steps, classifier and
//! encoder) is reported as an [`ArtifactError`] so the caller can refuse to
//! start instead of failing on the first request.
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;
use crate::features::{FEATURE_NAMES, N_FEATURES};
use crate::label_encoder::{LabelEncoder, LabelEncoderSpec};
use crate::pipeline::{Pipeline, PipelineSpec};
use crate::predictor::{ModelInfo, RiskPredictor};

/// Artifact layout version understood by this crate.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    /// Column order used at fit time. Checked against [`FEATURE_NAMES`] when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub pipeline: PipelineSpec,
    pub label_encoder: LabelEncoderSpec,
}

impl ModelArtifact {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the artifact and build the immutable predictor from it.
    pub fn into_predictor(self) -> Result<RiskPredictor, ArtifactError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }

        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(ArtifactError::FeatureNames {
                    found: names.clone(),
                    expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                });
            }
        }

        let pipeline = Pipeline::from_spec(self.pipeline, N_FEATURES)?;
        let encoder = LabelEncoder::from_spec(self.label_encoder)?;

        if pipeline.n_classes() != encoder.len() {
            return Err(ArtifactError::ClassCount {
                model: pipeline.n_classes(),
                encoder: encoder.len(),
            });
        }

        let info = ModelInfo {
            name: self.name,
            description: self.description,
            format_version: self.format_version,
            trained_at: self.trained_at,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            steps: pipeline.step_kinds().iter().map(|s| s.to_string()).collect(),
            classifier: pipeline.classifier_name().to_string(),
            classes: encoder.classes().to_vec(),
        };

        Ok(RiskPredictor::new(pipeline, encoder, info))
    }
}

/// Read, validate and build the predictor in one step.
pub fn load_predictor<P: AsRef<Path>>(path: P) -> Result<RiskPredictor, ArtifactError> {
    let path = path.as_ref();
    let predictor = ModelArtifact::from_path(path)?.into_predictor()?;
    log::info!(
        "Loaded {} model from {} with classes {:?}",
        predictor.info().classifier,
        path.display(),
        predictor.classes()
    );
    Ok(predictor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "format_version": 1,
        "pipeline": {
            "classifier": {
                "kind": "softmax_regression",
                "coef": [[0, 0, 0, 0, 0], [0, 0, 0, 0, 0]],
                "intercept": [0, 0]
            }
        },
        "label_encoder": { "classes": ["high risk", "low risk"] }
    }"#;

    #[test]
    fn minimal_artifact_loads_without_steps() {
        let predictor = ModelArtifact::from_json(MINIMAL)
            .unwrap()
            .into_predictor()
            .unwrap();
        assert_eq!(predictor.classes(), &["high risk", "low risk"]);
        assert!(predictor.info().steps.is_empty());
        assert_eq!(predictor.info().classifier, "softmax_regression");
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut artifact = ModelArtifact::from_json(MINIMAL).unwrap();
        artifact.format_version = 2;
        assert!(matches!(
            artifact.into_predictor(),
            Err(ArtifactError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn class_count_mismatch_is_rejected() {
        let mut artifact = ModelArtifact::from_json(MINIMAL).unwrap();
        artifact.label_encoder.classes.push("mid risk".to_string());
        assert!(matches!(
            artifact.into_predictor(),
            Err(ArtifactError::ClassCount { model: 2, encoder: 3 })
        ));
    }

    #[test]
    fn reordered_feature_names_are_rejected() {
        let mut artifact = ModelArtifact::from_json(MINIMAL).unwrap();
        let mut names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        names.swap(0, 1);
        artifact.feature_names = Some(names);
        assert!(matches!(
            artifact.into_predictor(),
            Err(ArtifactError::FeatureNames { .. })
        ));
    }

    #[test]
    fn serialization_omits_absent_metadata() {
        let artifact = ModelArtifact::from_json(MINIMAL).unwrap();
        let json = artifact.to_json_pretty().unwrap();
        assert!(!json.contains("trained_at"));
        assert_eq!(ModelArtifact::from_json(&json).unwrap(), artifact);
    }
}
