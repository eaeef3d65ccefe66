//! ResNet-10 SSD face detector running on ONNX Runtime via `ort`.
//!
//! The network takes a `[1, 3, 300, 300]` mean-subtracted BGR blob and emits
//! `[1, 1, N, 7]` rows of `[image_id, class_id, confidence, x1, y1, x2, y2]`
//! with normalised coordinates.

use std::path::Path;

use ndarray::Array4;

use crate::detection::domain::detection::Candidate;
use crate::detection::domain::detector_model::{DetectorModel, InferenceError, ModelLoadError};

use super::execution_provider::build_session;
use super::model_resolver::ModelFiles;

/// Values per detection row in the SSD output.
const ROW_LEN: usize = 7;

pub struct OnnxSsdModel {
    session: ort::session::Session,
}

impl OnnxSsdModel {
    /// Loads the detector from its graph and weights files.
    ///
    /// The weights are an external-initializer file that ONNX Runtime reads
    /// relative to the graph, so both must live in the same directory.
    pub fn load(files: &ModelFiles) -> Result<Self, ModelLoadError> {
        for path in [&files.topology, &files.weights] {
            if !path.is_file() {
                return Err(ModelLoadError::NotFound {
                    name: path.display().to_string(),
                    searched: path
                        .parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                });
            }
        }
        if files.topology.parent() != files.weights.parent() {
            return Err(ModelLoadError::WeightsNotAdjacent {
                topology: files.topology.clone(),
                weights: files.weights.clone(),
            });
        }

        let session = build_session(&files.topology).map_err(|message| ModelLoadError::Runtime {
            path: files.topology.clone(),
            message,
        })?;
        log::info!("Loaded face detector from {}", display(&files.topology));
        Ok(Self { session })
    }
}

impl DetectorModel for OnnxSsdModel {
    fn forward(&mut self, blob: Array4<f32>) -> Result<Vec<Candidate>, InferenceError> {
        let input = ort::value::Tensor::from_array(blob)
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;
        let outputs = self
            .session
            .run(ort::inputs![input])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;
        if outputs.len() == 0 {
            return Err(InferenceError::Runtime("detector produced no outputs".into()));
        }

        let tensor = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;
        let shape = tensor.shape().to_vec();
        let data = tensor
            .as_slice()
            .ok_or_else(|| InferenceError::Runtime("detector output is not contiguous".into()))?;
        parse_output(&shape, data)
    }
}

/// Decodes SSD `detection_out` rows into candidates, keeping output order.
fn parse_output(shape: &[usize], data: &[f32]) -> Result<Vec<Candidate>, InferenceError> {
    if shape.last() != Some(&ROW_LEN) || data.len() % ROW_LEN != 0 {
        return Err(InferenceError::OutputShape(shape.to_vec()));
    }

    Ok(data
        .chunks_exact(ROW_LEN)
        .map(|row| Candidate {
            confidence: row[2],
            x1: row[3],
            y1: row[4],
            x2: row[5],
            y2: row[6],
        })
        .collect())
}

fn display(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
