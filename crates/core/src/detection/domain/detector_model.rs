use std::path::PathBuf;

use ndarray::Array4;
use thiserror::Error;

use super::detection::Candidate;

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("model file {name} not found (searched: {searched})")]
    NotFound { name: String, searched: String },
    #[error("weights {weights} must sit next to topology {topology}")]
    WeightsNotAdjacent { topology: PathBuf, weights: PathBuf },
    #[error("failed to load detector model from {path}: {message}")]
    Runtime { path: PathBuf, message: String },
}

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("inference failed: {0}")]
    Runtime(String),
    #[error("unexpected detector output shape {0:?}")]
    OutputShape(Vec<usize>),
}

/// A loaded face detector network.
///
/// Takes a preprocessed NCHW blob and returns every candidate row the
/// network produced, unfiltered and in output order. `&mut self` because the
/// runtime session needs exclusive access while running; the weights never
/// change after load.
pub trait DetectorModel {
    fn forward(&mut self, blob: Array4<f32>) -> Result<Vec<Candidate>, InferenceError>;
}
