//! Preprocessing steps composed with a final classifier.
use serde::{Deserialize, Serialize};

use crate::config::ClassifierSpec;
use crate::error::{ArtifactError, InferenceError};
use crate::math::Array2;
use crate::models::factory::{build_model, SharedClassifier};
use crate::preprocessing::{transform_all, Scaler, StepSpec};

/// Persisted form of a fitted pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    #[serde(default)]
    pub steps: Vec<StepSpec>,
    pub classifier: ClassifierSpec,
}

/// A fitted pipeline, treated by callers as one opaque predictive function.
pub struct Pipeline {
    steps: Vec<Scaler>,
    step_kinds: Vec<&'static str>,
    classifier: SharedClassifier,
}

impl Pipeline {
    pub fn from_spec(spec: PipelineSpec, n_features: usize) -> Result<Self, ArtifactError> {
        let step_kinds = spec.steps.iter().map(StepSpec::kind).collect();
        let steps = spec
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| Scaler::from_spec(i, step, n_features))
            .collect::<Result<Vec<_>, _>>()?;
        let classifier = build_model(spec.classifier, n_features)?;

        Ok(Self {
            steps,
            step_kinds,
            classifier,
        })
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, InferenceError> {
        let mut current = x.clone();
        for step in &self.steps {
            current = transform_all(&current, step)?;
        }
        Ok(current)
    }

    /// Predicted class code per row.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>, InferenceError> {
        let xt = self.transform(x)?;
        self.classifier.predict(&xt)
    }

    /// Per-class probabilities per row, columns in class-code order.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>, InferenceError> {
        let xt = self.transform(x)?;
        self.classifier.predict_proba(&xt)
    }

    pub fn n_features(&self) -> usize {
        self.classifier.n_features()
    }

    pub fn n_classes(&self) -> usize {
        self.classifier.n_classes()
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn step_kinds(&self) -> &[&'static str] {
        &self.step_kinds
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_kinds)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}
