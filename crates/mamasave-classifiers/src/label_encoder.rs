//! Bidirectional mapping between class labels and classifier codes.
//!
//! The class list is discovered from the artifact at load time; the lookup
//! tables are built once and never mutated afterwards.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, InferenceError};

/// Persisted form of a fitted label encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoderSpec {
    /// Known labels in ascending order; the position of a label is its class code.
    pub classes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Classes must be unique and sorted, as a fitted encoder stores them.
    /// Probability maps keyed by label then iterate in code order.
    pub fn new(classes: Vec<String>) -> Result<Self, ArtifactError> {
        if classes.is_empty() {
            return Err(ArtifactError::Encoder("class list is empty".to_string()));
        }
        if let Some(pair) = classes.windows(2).find(|pair| pair[0] > pair[1]) {
            return Err(ArtifactError::Encoder(format!(
                "classes must be sorted, found '{}' before '{}'",
                pair[0], pair[1]
            )));
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            if codes.insert(label.clone(), code).is_some() {
                return Err(ArtifactError::Encoder(format!(
                    "duplicate class label '{}'",
                    label
                )));
            }
        }

        Ok(Self { classes, codes })
    }

    pub fn from_spec(spec: LabelEncoderSpec) -> Result<Self, ArtifactError> {
        Self::new(spec.classes)
    }

    /// Known labels in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Code for a label, if the encoder was fitted on it.
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.codes.get(label).copied()
    }

    /// Label for a classifier code.
    pub fn inverse_transform(&self, code: usize) -> Result<&str, InferenceError> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(InferenceError::UnknownClass {
                code,
                n_classes: self.classes.len(),
            })
    }
}
