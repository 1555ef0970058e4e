//! Fitted preprocessing steps applied before the classifier.
//!
//! Steps operate row-wise on the crate `Array2` and carry parameters fitted
//! upstream. Each step is validated against the expected feature count when
//! the artifact is loaded, so `transform_all` only has to check the input
//! width.

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, InferenceError};
use crate::math::Array2;

/// Persisted form of a preprocessing step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepSpec {
    /// `(x - mean) / scale` per column.
    StandardScaler { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min` per column.
    MinMaxScaler { min: Vec<f64>, scale: Vec<f64> },
}

impl StepSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            StepSpec::StandardScaler { .. } => "standard_scaler",
            StepSpec::MinMaxScaler { .. } => "min_max_scaler",
        }
    }
}

/// A fitted per-column scaler.
#[derive(Clone, Debug)]
pub enum Scaler {
    /// `(x - mean) / std`
    Standard { mean: Vec<f64>, std: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Standard-scaler scales at or below this magnitude are treated as 1.0,
    /// which is what a fitted scaler stores for a constant column.
    const MIN_STD: f64 = 1e-12;

    /// Build a scaler from a step spec, checking it against `n_features`.
    pub fn from_spec(index: usize, spec: &StepSpec, n_features: usize) -> Result<Self, ArtifactError> {
        let invalid = |reason: String| ArtifactError::Step { index, reason };

        let (a, b) = match spec {
            StepSpec::StandardScaler { mean, scale } => (mean, scale),
            StepSpec::MinMaxScaler { min, scale } => (min, scale),
        };
        if a.len() != n_features || b.len() != n_features {
            return Err(invalid(format!(
                "{} expects {} parameters per vector, got {} and {}",
                spec.kind(),
                n_features,
                a.len(),
                b.len()
            )));
        }
        if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
            return Err(invalid(format!("{} has non-finite parameters", spec.kind())));
        }

        let scaler = match spec {
            StepSpec::StandardScaler { mean, scale } => Scaler::Standard {
                mean: mean.clone(),
                std: scale
                    .iter()
                    .map(|&s| if s.abs() <= Self::MIN_STD { 1.0 } else { s })
                    .collect(),
            },
            StepSpec::MinMaxScaler { min, scale } => Scaler::MinMax {
                min: min.clone(),
                scale: scale.clone(),
            },
        };
        Ok(scaler)
    }

    pub fn n_features(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
        }
    }

    /// Transform one row in place.
    pub fn transform_row(&self, row: &mut [f64]) {
        match self {
            Scaler::Standard { mean, std } => {
                for (c, v) in row.iter_mut().enumerate() {
                    *v = (*v - mean[c]) / std[c];
                }
            }
            Scaler::MinMax { min, scale } => {
                for (c, v) in row.iter_mut().enumerate() {
                    *v = *v * scale[c] + min[c];
                }
            }
        }
    }
}

/// Transform all rows using the provided `Scaler` and return a new `Array2<f64>`.
pub fn transform_all(x: &Array2<f64>, sc: &Scaler) -> Result<Array2<f64>, InferenceError> {
    if x.ncols() != sc.n_features() {
        return Err(InferenceError::FeatureCount {
            expected: sc.n_features(),
            found: x.ncols(),
        });
    }

    let mut out = x.clone();
    for r in 0..out.nrows() {
        sc.transform_row(out.row_slice_mut(r));
    }
    Ok(out)
}
