use serde::{Deserialize, Serialize};

/// Persisted parameters of the final estimator in a pipeline.
///
/// The `kind` tag selects the model family; the remaining fields are the
/// fitted parameters for that family.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    SoftmaxRegression(SoftmaxRegressionParams),
    GaussianNb(GaussianNbParams),
    RandomForest(RandomForestParams),
}

impl ClassifierSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierSpec::SoftmaxRegression(_) => "softmax_regression",
            ClassifierSpec::GaussianNb(_) => "gaussian_nb",
            ClassifierSpec::RandomForest(_) => "random_forest",
        }
    }
}

/// Multinomial logistic regression.
///
/// `coef` has one row per class. A single row denotes a binary model whose
/// row scores the second class.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SoftmaxRegressionParams {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

/// Gaussian naive Bayes.
///
/// `var` already includes any smoothing applied at fit time.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GaussianNbParams {
    pub theta: Vec<Vec<f64>>,
    pub var: Vec<Vec<f64>>,
    pub class_prior: Vec<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RandomForestParams {
    pub n_classes: usize,
    pub trees: Vec<TreeParams>,
}

/// A fitted decision tree stored as a flat node array rooted at index 0.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TreeParams {
    pub nodes: Vec<TreeNode>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, otherwise to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class counts (or weights) of the training samples that reached the leaf.
    Leaf { value: Vec<f64> },
}
