//! mamasave-classifiers: inference-side pieces of the maternal risk model.
//!
//! This crate loads a fitted pipeline (preprocessing steps plus a classifier)
//! and its label encoder from a JSON artifact, and maps the five physiological
//! measurements of one patient onto a decoded risk label and a per-class
//! probability distribution.
//!
//! Fitting is done upstream; nothing here trains or mutates a model after it
//! has been loaded, so a [`predictor::RiskPredictor`] can be shared freely
//! across threads.
pub mod artifact;
pub mod config;
pub mod error;
pub mod features;
pub mod label_encoder;
pub mod math;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod preprocessing;

pub use artifact::{load_predictor, ModelArtifact};
pub use error::{ArtifactError, InferenceError};
pub use features::RiskFeatures;
pub use predictor::{RiskPrediction, RiskPredictor};
