/// ONNX export of the ResNet-10 SSD face detector (graph only).
pub const SSD_TOPOLOGY_NAME: &str = "res10_300x300_ssd_iter_140000.onnx";
/// External initializer file referenced by [`SSD_TOPOLOGY_NAME`].
pub const SSD_WEIGHTS_NAME: &str = "res10_300x300_ssd_iter_140000.onnx.data";

/// Minimum confidence for a candidate to count as a face.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Period of the live capture loop (~30 fps).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 30;

pub const SNAPSHOT_PREFIX: &str = "snap";
pub const ANNOTATED_SUFFIX: &str = "_imagedetect";
pub const SNAPSHOT_EXTENSION: &str = "png";

/// Application directory name under the platform data/config dirs.
pub const APP_DIR_NAME: &str = "EyeSee";
