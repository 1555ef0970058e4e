use crate::config::SoftmaxRegressionParams;
use crate::error::{ArtifactError, InferenceError};
use crate::math::Array2;
use crate::models::classifier_trait::{check_features, softmax_in_place, ClassifierModel};

/// Multinomial logistic regression evaluated as `softmax(coef · x + intercept)`.
#[derive(Debug, Clone)]
pub struct SoftmaxRegression {
    coef: Array2<f64>,
    intercept: Vec<f64>,
}

impl SoftmaxRegression {
    pub fn new(params: SoftmaxRegressionParams, n_features: usize) -> Result<Self, ArtifactError> {
        let invalid = |msg: String| ArtifactError::Classifier(format!("softmax_regression: {}", msg));

        if params.coef.is_empty() {
            return Err(invalid("coef has no rows".to_string()));
        }
        if params.intercept.len() != params.coef.len() {
            return Err(invalid(format!(
                "{} coefficient rows but {} intercepts",
                params.coef.len(),
                params.intercept.len()
            )));
        }
        if let Some(row) = params.coef.iter().find(|r| r.len() != n_features) {
            return Err(invalid(format!(
                "coefficient row has {} entries, expected {}",
                row.len(),
                n_features
            )));
        }
        let all = params.coef.iter().flatten().chain(params.intercept.iter());
        if all.copied().any(|v| !v.is_finite()) {
            return Err(invalid("non-finite parameter".to_string()));
        }

        let coef = Array2::from_rows(&params.coef)
            .map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            coef,
            intercept: params.intercept,
        })
    }

    fn is_binary(&self) -> bool {
        self.coef.nrows() == 1
    }

    fn decision_row(&self, x: &[f64], out: &mut [f64]) {
        for (k, score) in out.iter_mut().enumerate() {
            let w = self.coef.row_slice(k);
            *score = self.intercept[k] + w.iter().zip(x).map(|(a, b)| a * b).sum::<f64>();
        }
    }
}

impl ClassifierModel for SoftmaxRegression {
    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn n_classes(&self) -> usize {
        if self.is_binary() {
            2
        } else {
            self.coef.nrows()
        }
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>, InferenceError> {
        check_features(x, self.n_features())?;

        let n_classes = self.n_classes();
        let mut out = Vec::with_capacity(x.nrows() * n_classes);
        let mut scores = vec![0.0; self.coef.nrows()];

        for row in x.rows() {
            self.decision_row(row, &mut scores);
            if self.is_binary() {
                let p = 1.0 / (1.0 + (-scores[0]).exp());
                out.push(1.0 - p);
                out.push(p);
            } else {
                softmax_in_place(&mut scores);
                out.extend_from_slice(&scores);
            }
        }

        Ok(Array2::from_shape_vec((x.nrows(), n_classes), out)?)
    }

    fn name(&self) -> &str {
        "softmax_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> SoftmaxRegressionParams {
        SoftmaxRegressionParams { coef, intercept }
    }

    #[test]
    fn zero_weights_give_uniform_distribution() {
        let model = SoftmaxRegression::new(params(vec![vec![0.0; 2]; 3], vec![0.0; 3]), 2).unwrap();
        let x = Array2::from_rows(&[[5.0, -3.0]]).unwrap();
        let p = model.predict_proba(&x).unwrap();
        for k in 0..3 {
            assert!((p[(0, k)] - 1.0 / 3.0).abs() < 1e-12);
        }
        assert_eq!(model.predict(&x).unwrap(), vec![0]);
    }

    #[test]
    fn strongest_score_wins() {
        let model = SoftmaxRegression::new(
            params(vec![vec![1.0, 0.0], vec![0.0, 1.0]], vec![0.0, 0.0]),
            2,
        )
        .unwrap();
        let x = Array2::from_rows(&[[3.0, 1.0], [1.0, 3.0]]).unwrap();
        assert_eq!(model.predict(&x).unwrap(), vec![0, 1]);
        let p = model.predict_proba(&x).unwrap();
        for row in p.rows() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn single_row_is_a_binary_logistic_model() {
        let model = SoftmaxRegression::new(params(vec![vec![1.0]], vec![0.0]), 1).unwrap();
        assert_eq!(model.n_classes(), 2);
        let x = Array2::from_rows(&[[0.0], [10.0]]).unwrap();
        let p = model.predict_proba(&x).unwrap();
        assert!((p[(0, 0)] - 0.5).abs() < 1e-12);
        assert!(p[(1, 1)] > 0.99);
        assert_eq!(model.predict(&x).unwrap(), vec![0, 1]);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        assert!(SoftmaxRegression::new(params(vec![vec![0.0; 3]], vec![0.0]), 5).is_err());
        assert!(SoftmaxRegression::new(params(vec![vec![0.0; 5]; 2], vec![0.0]), 5).is_err());
        assert!(SoftmaxRegression::new(params(Vec::new(), Vec::new()), 5).is_err());
    }

    #[test]
    fn wrong_input_width_is_an_inference_error() {
        let model = SoftmaxRegression::new(params(vec![vec![0.0; 2]; 2], vec![0.0; 2]), 2).unwrap();
        let x = Array2::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(
            model.predict_proba(&x),
            Err(InferenceError::FeatureCount { expected: 2, found: 3 })
        ));
    }
}
