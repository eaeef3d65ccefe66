pub mod detection;
pub mod detector_model;
pub mod face_pipeline;
pub mod input_blob;
