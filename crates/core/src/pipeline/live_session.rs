use std::time::Instant;

use thiserror::Error;

use crate::annotation::box_annotator::annotate;
use crate::detection::domain::detector_model::{DetectorModel, InferenceError};
use crate::detection::domain::face_pipeline::detect;
use crate::shared::frame::Frame;
use crate::snapshot::snapshot_writer::{SnapshotError, SnapshotPaths, SnapshotWriter};
use crate::video::domain::frame_source::{CaptureError, FrameSource};

use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

#[derive(Error, Debug)]
pub enum SaveSnapshotError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Write(#[from] SnapshotError),
}

/// What one tick produced for the display surface.
#[derive(Debug)]
pub enum TickOutcome {
    /// The camera had no frame; nothing changed.
    Skipped,
    Frame(LiveFrame),
}

#[derive(Debug)]
pub struct LiveFrame {
    /// Annotated when detection is on, otherwise the raw capture.
    pub frame: Frame,
    pub face_count: usize,
}

/// Live detection state owned by one application instance.
///
/// Hosts drive it through three commands: [`tick`](Self::tick) on every
/// timer period, [`toggle_detection`](Self::toggle_detection) and
/// [`save_snapshot`](Self::save_snapshot) on user action. Everything runs on
/// the caller's thread.
pub struct LiveSession {
    source: Box<dyn FrameSource>,
    model: Box<dyn DetectorModel>,
    snapshots: SnapshotWriter,
    threshold: f32,
    detection_enabled: bool,
    face_count: usize,
    logger: Box<dyn PipelineLogger>,
    shut_down: bool,
}

impl LiveSession {
    pub fn new(
        source: Box<dyn FrameSource>,
        model: Box<dyn DetectorModel>,
        snapshots: SnapshotWriter,
        threshold: f32,
    ) -> Self {
        Self {
            source,
            model,
            snapshots,
            threshold,
            detection_enabled: true,
            face_count: 0,
            logger: Box::new(NullPipelineLogger),
            shut_down: false,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }

    /// Faces in the most recently displayed frame.
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Flips detection on or off and returns the new state.
    pub fn toggle_detection(&mut self) -> bool {
        self.detection_enabled = !self.detection_enabled;
        log::info!(
            "Face detection {}",
            if self.detection_enabled { "enabled" } else { "disabled" }
        );
        self.detection_enabled
    }

    /// Captures one frame and, when detection is on, annotates it.
    ///
    /// A failed capture skips the tick entirely: the face count keeps its
    /// previous value. A failed forward pass shows the raw frame with no
    /// faces.
    pub fn tick(&mut self) -> TickOutcome {
        let started = Instant::now();
        let frame = match self.source.capture() {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("Skipping tick: {e}");
                self.logger.tick(false);
                return TickOutcome::Skipped;
            }
        };
        self.logger.tick(true);
        self.logger.timing("capture", elapsed_ms(started));

        if !self.detection_enabled {
            self.face_count = 0;
            return TickOutcome::Frame(LiveFrame {
                frame,
                face_count: 0,
            });
        }

        let detect_started = Instant::now();
        let detections = match detect(&frame, self.model.as_mut(), self.threshold) {
            Ok(detections) => detections,
            Err(e) => {
                log::warn!("Face detection failed: {e}");
                self.face_count = 0;
                return TickOutcome::Frame(LiveFrame {
                    frame,
                    face_count: 0,
                });
            }
        };
        self.logger.timing("detect", elapsed_ms(detect_started));

        let annotate_started = Instant::now();
        let annotated = annotate(&frame, &detections);
        self.logger.timing("annotate", elapsed_ms(annotate_started));

        self.face_count = detections.len();
        self.logger.metric("faces", self.face_count as f64);
        TickOutcome::Frame(LiveFrame {
            frame: annotated,
            face_count: self.face_count,
        })
    }

    /// Captures a fresh frame, detects faces regardless of the toggle and
    /// saves the clean and annotated images as one snapshot.
    pub fn save_snapshot(&mut self) -> Result<SnapshotPaths, SaveSnapshotError> {
        let raw = self.source.capture()?;
        let detections = detect(&raw, self.model.as_mut(), self.threshold)?;
        let annotated = annotate(&raw, &detections);
        let paths = self.snapshots.save(&raw, &annotated)?;
        log::info!(
            "Snapshots saved as: {} and {}",
            paths.plain.display(),
            paths.annotated.display()
        );
        Ok(paths)
    }

    /// Releases the camera and emits the run summary. Safe to call more than
    /// once; only the first call has any effect.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.source.release();
        self.logger.summary();
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
