use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    /// The device produced no frame this time. Callers skip the cycle.
    #[error("no frame available from camera: {0}")]
    Unavailable(String),
}

/// A camera that hands out one frame per call.
///
/// `capture` blocks until the device delivers a frame or reports that it has
/// none. Implementations never retry; the caller decides whether to try
/// again on its next cycle.
pub trait FrameSource {
    fn capture(&mut self) -> Result<Frame, CaptureError>;

    /// Releases the underlying device. Calling it more than once is a no-op.
    fn release(&mut self);
}
