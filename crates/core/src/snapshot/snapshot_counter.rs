use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::shared::constants::{SNAPSHOT_EXTENSION, SNAPSHOT_PREFIX};

/// Index for the next snapshot pair.
///
/// Starts one past the highest index already on disk and only moves
/// forward, so an index is never reused within or across runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotCounter {
    next: u64,
}

impl SnapshotCounter {
    /// Scans `dir` for `snap<N>*.png` files and starts after the highest `N`.
    ///
    /// A missing directory counts as empty.
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::starting_at(1)),
            Err(e) => return Err(e),
        };

        let mut highest = 0;
        for entry in entries {
            let name = entry?.file_name();
            if let Some(index) = snapshot_index(&name.to_string_lossy()) {
                highest = highest.max(index);
            }
        }
        Ok(Self::starting_at(highest.saturating_add(1)))
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// The index the next snapshot will use.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn advance(&mut self) {
        self.next = self.next.saturating_add(1);
    }
}

/// Extracts `N` from file names like `snap12.png` or `snap12_imagedetect.png`.
fn snapshot_index(file_name: &str) -> Option<u64> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    let is_candidate = file_name.starts_with(SNAPSHOT_PREFIX)
        && Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext == SNAPSHOT_EXTENSION);
    if !is_candidate {
        return None;
    }

    let pattern = PATTERN.get_or_init(|| {
        Regex::new(&format!(r"{SNAPSHOT_PREFIX}(\d+)")).expect("snapshot pattern is valid")
    });
    pattern.captures(file_name)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[rstest]
    #[case::plain("snap5.png", Some(5))]
    #[case::annotated("snap12_imagedetect.png", Some(12))]
    #[case::no_digits("snapshot.png", None)]
    #[case::other_extension("snap3.jpg", None)]
    #[case::other_prefix("mysnap3.png", None)]
    #[case::overflow("snap99999999999999999999999.png", None)]
    fn test_snapshot_index(#[case] name: &str, #[case] expected: Option<u64>) {
        assert_eq!(snapshot_index(name), expected);
    }

    #[test]
    fn test_empty_dir_starts_at_one() {
        let dir = TempDir::new().unwrap();
        assert_eq!(SnapshotCounter::scan(dir.path()).unwrap().peek(), 1);
    }

    #[test]
    fn test_missing_dir_starts_at_one() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(SnapshotCounter::scan(&missing).unwrap().peek(), 1);
    }

    #[test]
    fn test_existing_snap5_continues_at_six() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "snap5.png");
        assert_eq!(SnapshotCounter::scan(dir.path()).unwrap().peek(), 6);
    }

    #[test]
    fn test_highest_index_wins_across_both_kinds() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "snap2.png");
        touch(dir.path(), "snap9_imagedetect.png");
        touch(dir.path(), "snap10.jpg");
        touch(dir.path(), "notes.txt");
        assert_eq!(SnapshotCounter::scan(dir.path()).unwrap().peek(), 10);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut counter = SnapshotCounter::starting_at(3);
        let first = counter.peek();
        counter.advance();
        let second = counter.peek();
        assert!(second > first);
    }
}
