//! Small ndarray-like matrix type used by the pipeline.
//!
//! `Array2` is a row-major buffer with just enough API for row-wise
//! preprocessing and per-class probability output. It is kept dependency-free
//! so the inference path stays easy to test.
pub mod matrix;

pub use matrix::{Array2, ShapeError};
