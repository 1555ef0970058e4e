use crate::config::{RandomForestParams, TreeNode, TreeParams};
use crate::error::{ArtifactError, InferenceError};
use crate::math::Array2;
use crate::models::classifier_trait::{check_features, ClassifierModel};

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(Vec<f64>),
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Validate a persisted tree. Children must point forward, which rules out
    /// cycles and keeps traversal bounded by the node count.
    fn new(
        tree_idx: usize,
        params: TreeParams,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, ArtifactError> {
        let invalid = |msg: String| {
            ArtifactError::Classifier(format!("random_forest: tree {}: {}", tree_idx, msg))
        };

        if params.nodes.is_empty() {
            return Err(invalid("no nodes".to_string()));
        }

        let len = params.nodes.len();
        let mut nodes = Vec::with_capacity(len);
        for (i, node) in params.nodes.into_iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(invalid(format!("node {} splits on feature {}", i, feature)));
                    }
                    if threshold.is_nan() {
                        return Err(invalid(format!("node {} has a NaN threshold", i)));
                    }
                    if left <= i || right <= i || left >= len || right >= len {
                        return Err(invalid(format!(
                            "node {} has children ({}, {}) outside ({}, {})",
                            i, left, right, i, len
                        )));
                    }
                    nodes.push(Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    });
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(invalid(format!(
                            "leaf {} has {} class values, expected {}",
                            i,
                            value.len(),
                            n_classes
                        )));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(invalid(format!("leaf {} has negative or non-finite values", i)));
                    }
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return Err(invalid(format!("leaf {} is empty", i)));
                    }
                    nodes.push(Node::Leaf(value.iter().map(|v| v / total).collect()));
                }
            }
        }

        Ok(Self { nodes })
    }

    fn leaf_proba(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf(proba) => return proba,
            }
        }
    }
}

/// Random forest classifier: the class distribution is the mean of the
/// normalized leaf distributions reached in every tree.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    pub fn new(params: RandomForestParams, n_features: usize) -> Result<Self, ArtifactError> {
        if params.n_classes == 0 {
            return Err(ArtifactError::Classifier(
                "random_forest: n_classes must be positive".to_string(),
            ));
        }
        if params.trees.is_empty() {
            return Err(ArtifactError::Classifier(
                "random_forest: no trees".to_string(),
            ));
        }

        let trees = params
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| DecisionTree::new(i, t, n_features, params.n_classes))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trees,
            n_features,
            n_classes: params.n_classes,
        })
    }
}

impl ClassifierModel for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>, InferenceError> {
        check_features(x, self.n_features)?;

        let n_trees = self.trees.len() as f64;
        let mut out = Array2::from_shape_vec(
            (x.nrows(), self.n_classes),
            vec![0.0; x.nrows() * self.n_classes],
        )?;
        for (r, row) in x.rows().enumerate() {
            let acc = out.row_slice_mut(r);
            for tree in &self.trees {
                for (a, p) in acc.iter_mut().zip(tree.leaf_proba(row)) {
                    *a += p;
                }
            }
            for a in acc.iter_mut() {
                *a /= n_trees;
            }
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}
