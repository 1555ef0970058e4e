use crate::error::InferenceError;
use crate::math::Array2;

/// Inference contract for a fitted classifier.
///
/// Implementations are immutable after construction so a single instance can
/// serve concurrent callers without locking.
pub trait ClassifierModel {
    /// Number of input columns the model was fitted on.
    fn n_features(&self) -> usize;

    /// Number of classes in the model's output, in code order.
    fn n_classes(&self) -> usize;

    /// Per-class probabilities, one row per input row, columns in code order.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>, InferenceError>;

    /// Predicted class code per row: the most probable class, lowest code on ties.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>, InferenceError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.rows().map(argmax).collect())
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Reject inputs whose width does not match what the model was fitted on.
pub(crate) fn check_features(x: &Array2<f64>, expected: usize) -> Result<(), InferenceError> {
    if x.ncols() != expected {
        return Err(InferenceError::FeatureCount {
            expected,
            found: x.ncols(),
        });
    }
    Ok(())
}

pub(crate) fn argmax(row: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate().skip(1) {
        if v > row[best] {
            best = i;
        }
    }
    best
}

/// Exponentiate and normalize log-scores in place, shifting by the max first.
pub(crate) fn softmax_in_place(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        sum += *s;
    }
    for s in scores.iter_mut() {
        *s /= sum;
    }
}
