use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{ANNOTATED_SUFFIX, SNAPSHOT_EXTENSION, SNAPSHOT_PREFIX};
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

use super::snapshot_counter::SnapshotCounter;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to write snapshot {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// File paths of one saved snapshot pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub index: u64,
    pub plain: PathBuf,
    pub annotated: PathBuf,
}

impl SnapshotPaths {
    fn for_index(dir: &Path, index: u64) -> Self {
        Self {
            index,
            plain: dir.join(format!("{SNAPSHOT_PREFIX}{index}.{SNAPSHOT_EXTENSION}")),
            annotated: dir.join(format!(
                "{SNAPSHOT_PREFIX}{index}{ANNOTATED_SUFFIX}.{SNAPSHOT_EXTENSION}"
            )),
        }
    }
}

/// Saves raw/annotated frame pairs as `snap<N>.png` and
/// `snap<N>_imagedetect.png`.
pub struct SnapshotWriter {
    dir: PathBuf,
    counter: SnapshotCounter,
    image_writer: Box<dyn ImageWriter>,
}

impl SnapshotWriter {
    pub fn new(dir: PathBuf, counter: SnapshotCounter, image_writer: Box<dyn ImageWriter>) -> Self {
        Self {
            dir,
            counter,
            image_writer,
        }
    }

    pub fn next_index(&self) -> u64 {
        self.counter.peek()
    }

    /// Writes both images under the current index.
    ///
    /// Both writes are attempted and the counter advances whatever their
    /// outcome, so a failed save never leaves an index to be reused. The
    /// first write error, if any, is returned afterwards.
    pub fn save(&mut self, raw: &Frame, annotated: &Frame) -> Result<SnapshotPaths, SnapshotError> {
        let paths = SnapshotPaths::for_index(&self.dir, self.counter.peek());

        let plain_result = self.write(&paths.plain, raw);
        let annotated_result = self.write(&paths.annotated, annotated);
        self.counter.advance();

        plain_result?;
        annotated_result?;
        Ok(paths)
    }

    fn write(&self, path: &Path, frame: &Frame) -> Result<(), SnapshotError> {
        self.image_writer
            .write(path, frame)
            .map_err(|e| SnapshotError::Write {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::infrastructure::image_file_writer::ImageFileWriter;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingWriter {
        written: Rc<RefCell<Vec<PathBuf>>>,
        fail_on: Option<&'static str>,
    }

    impl ImageWriter for RecordingWriter {
        fn write(&self, path: &Path, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written.borrow_mut().push(path.to_path_buf());
            let name = path.file_name().unwrap().to_string_lossy();
            if self.fail_on.is_some_and(|f| name == f) {
                return Err("disk full".into());
            }
            Ok(())
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![10u8; 4 * 4 * 3], 4, 4)
    }

    #[test]
    fn test_first_snapshot_in_empty_dir_is_snap1() {
        let dir = tempfile::tempdir().unwrap();
        let counter = SnapshotCounter::scan(dir.path()).unwrap();
        let mut writer =
            SnapshotWriter::new(dir.path().to_path_buf(), counter, Box::new(ImageFileWriter::new()));

        let paths = writer.save(&frame(), &frame()).unwrap();

        assert_eq!(paths.index, 1);
        assert_eq!(paths.plain, dir.path().join("snap1.png"));
        assert_eq!(paths.annotated, dir.path().join("snap1_imagedetect.png"));
        assert!(paths.plain.exists());
        assert!(paths.annotated.exists());
    }

    #[test]
    fn test_continues_after_existing_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("snap5.png"), b"").unwrap();
        let counter = SnapshotCounter::scan(dir.path()).unwrap();
        let mut writer =
            SnapshotWriter::new(dir.path().to_path_buf(), counter, Box::new(ImageFileWriter::new()));

        let paths = writer.save(&frame(), &frame()).unwrap();
        assert_eq!(paths.plain, dir.path().join("snap6.png"));
    }

    #[test]
    fn test_consecutive_saves_use_increasing_indices() {
        let written = Rc::new(RefCell::new(Vec::new()));
        let mut writer = SnapshotWriter::new(
            PathBuf::from("out"),
            SnapshotCounter::starting_at(1),
            Box::new(RecordingWriter {
                written: written.clone(),
                fail_on: None,
            }),
        );

        let first = writer.save(&frame(), &frame()).unwrap();
        let second = writer.save(&frame(), &frame()).unwrap();

        assert!(second.index > first.index);
        assert_ne!(first.plain, second.plain);
        assert_eq!(written.borrow().len(), 4);
    }

    #[test]
    fn test_failed_write_still_advances_counter() {
        let written = Rc::new(RefCell::new(Vec::new()));
        let mut writer = SnapshotWriter::new(
            PathBuf::from("out"),
            SnapshotCounter::starting_at(7),
            Box::new(RecordingWriter {
                written: written.clone(),
                fail_on: Some("snap7.png"),
            }),
        );

        let err = writer.save(&frame(), &frame()).unwrap_err();
        assert!(matches!(err, SnapshotError::Write { ref path, .. } if path.ends_with("snap7.png")));
        // The annotated write was still attempted.
        assert_eq!(written.borrow().len(), 2);
        assert_eq!(writer.next_index(), 8);
    }

    #[test]
    fn test_plain_and_annotated_share_index() {
        let dir = PathBuf::from("shots");
        let paths = SnapshotPaths::for_index(&dir, 42);
        assert_eq!(paths.plain, dir.join("snap42.png"));
        assert_eq!(paths.annotated, dir.join("snap42_imagedetect.png"));
    }
}
