use statrs::distribution::{Continuous, Normal};

use crate::config::GaussianNbParams;
use crate::error::{ArtifactError, InferenceError};
use crate::math::Array2;
use crate::models::classifier_trait::{check_features, softmax_in_place, ClassifierModel};

/// Gaussian naive Bayes: per-class independent normal likelihoods plus a log prior.
#[derive(Debug, Clone)]
pub struct GaussianNb {
    // [class][feature]
    likelihoods: Vec<Vec<Normal>>,
    log_prior: Vec<f64>,
    n_features: usize,
}

impl GaussianNb {
    pub fn new(params: GaussianNbParams, n_features: usize) -> Result<Self, ArtifactError> {
        let invalid = |msg: String| ArtifactError::Classifier(format!("gaussian_nb: {}", msg));

        let n_classes = params.class_prior.len();
        if n_classes == 0 {
            return Err(invalid("class_prior is empty".to_string()));
        }
        if params.theta.len() != n_classes || params.var.len() != n_classes {
            return Err(invalid(format!(
                "expected {} rows of theta and var, got {} and {}",
                n_classes,
                params.theta.len(),
                params.var.len()
            )));
        }
        if params
            .class_prior
            .iter()
            .any(|&p| !(p.is_finite() && p > 0.0 && p <= 1.0))
        {
            return Err(invalid("class priors must lie in (0, 1]".to_string()));
        }

        let mut likelihoods = Vec::with_capacity(n_classes);
        for (class, (theta, var)) in params.theta.iter().zip(&params.var).enumerate() {
            if theta.len() != n_features || var.len() != n_features {
                return Err(invalid(format!(
                    "class {} has {} means and {} variances, expected {}",
                    class,
                    theta.len(),
                    var.len(),
                    n_features
                )));
            }
            let mut row = Vec::with_capacity(n_features);
            for (feature, (&mean, &v)) in theta.iter().zip(var).enumerate() {
                if !(v.is_finite() && v > 0.0) {
                    return Err(invalid(format!(
                        "class {} feature {} has non-positive variance {}",
                        class, feature, v
                    )));
                }
                let normal = Normal::new(mean, v.sqrt()).map_err(|e| {
                    invalid(format!("class {} feature {}: {}", class, feature, e))
                })?;
                row.push(normal);
            }
            likelihoods.push(row);
        }

        Ok(Self {
            likelihoods,
            log_prior: params.class_prior.iter().map(|p| p.ln()).collect(),
            n_features,
        })
    }

    fn joint_log_likelihood(&self, x: &[f64], out: &mut [f64]) {
        for (k, jll) in out.iter_mut().enumerate() {
            *jll = self.log_prior[k]
                + self.likelihoods[k]
                    .iter()
                    .zip(x)
                    .map(|(dist, &v)| dist.ln_pdf(v))
                    .sum::<f64>();
        }
    }
}

impl ClassifierModel for GaussianNb {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.log_prior.len()
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>, InferenceError> {
        check_features(x, self.n_features)?;

        let n_classes = self.n_classes();
        let mut out = Vec::with_capacity(x.nrows() * n_classes);
        let mut jll = vec![0.0; n_classes];
        for row in x.rows() {
            self.joint_log_likelihood(row, &mut jll);
            softmax_in_place(&mut jll);
            out.extend_from_slice(&jll);
        }

        Ok(Array2::from_shape_vec((x.nrows(), n_classes), out)?)
    }

    fn name(&self) -> &str {
        "gaussian_nb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class() -> GaussianNb {
        GaussianNb::new(
            GaussianNbParams {
                theta: vec![vec![0.0, 0.0], vec![5.0, 5.0]],
                var: vec![vec![1.0, 1.0], vec![1.0, 1.0]],
                class_prior: vec![0.5, 0.5],
            },
            2,
        )
        .unwrap()
    }

    #[test]
    fn nearest_mean_is_most_likely() {
        let model = two_class();
        let x = Array2::from_rows(&[[0.1, -0.2], [4.8, 5.3]]).unwrap();
        assert_eq!(model.predict(&x).unwrap(), vec![0, 1]);
    }

    #[test]
    fn midpoint_with_equal_priors_is_even() {
        let model = two_class();
        let x = Array2::from_rows(&[[2.5, 2.5]]).unwrap();
        let p = model.predict_proba(&x).unwrap();
        assert!((p[(0, 0)] - 0.5).abs() < 1e-9);
        assert!((p[(0, 1)] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn prior_shifts_the_midpoint() {
        let model = GaussianNb::new(
            GaussianNbParams {
                theta: vec![vec![0.0], vec![2.0]],
                var: vec![vec![1.0], vec![1.0]],
                class_prior: vec![0.9, 0.1],
            },
            1,
        )
        .unwrap();
        let x = Array2::from_rows(&[[1.0]]).unwrap();
        let p = model.predict_proba(&x).unwrap();
        assert!((p[(0, 0)] - 0.9).abs() < 1e-9);
    }

    #[test]
    fn far_outliers_stay_finite() {
        let model = two_class();
        let x = Array2::from_rows(&[[1e6, -1e6]]).unwrap();
        let p = model.predict_proba(&x).unwrap();
        assert!(p.as_slice().iter().all(|v| v.is_finite()));
        assert!((p.as_slice().iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let base = GaussianNbParams {
            theta: vec![vec![0.0]],
            var: vec![vec![1.0]],
            class_prior: vec![1.0],
        };
        let mut zero_var = base.clone();
        zero_var.var = vec![vec![0.0]];
        assert!(GaussianNb::new(zero_var, 1).is_err());

        let mut bad_prior = base.clone();
        bad_prior.class_prior = vec![0.0];
        assert!(GaussianNb::new(bad_prior, 1).is_err());

        assert!(GaussianNb::new(base, 2).is_err());
    }
}
