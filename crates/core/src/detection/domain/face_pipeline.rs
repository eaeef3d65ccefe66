use crate::shared::frame::Frame;

use super::detection::{select_detections, Detection};
use super::detector_model::{DetectorModel, InferenceError};
use super::input_blob::build_input_blob;

/// Runs one frame through the detector: preprocess, forward pass, threshold.
///
/// Returns detections with confidence strictly above `threshold`, boxes in
/// the frame's pixel space, in the model's output order.
pub fn detect(
    frame: &Frame,
    model: &mut dyn DetectorModel,
    threshold: f32,
) -> Result<Vec<Detection>, InferenceError> {
    let blob = build_input_blob(frame);
    let candidates = model.forward(blob)?;
    Ok(select_detections(
        &candidates,
        frame.width(),
        frame.height(),
        threshold,
    ))
}
