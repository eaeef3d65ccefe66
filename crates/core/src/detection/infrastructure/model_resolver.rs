use std::path::{Path, PathBuf};

use crate::detection::domain::detector_model::ModelLoadError;
use crate::shared::constants::{APP_DIR_NAME, SSD_TOPOLOGY_NAME, SSD_WEIGHTS_NAME};

/// Paths of the two files that make up the face detector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelFiles {
    pub topology: PathBuf,
    pub weights: PathBuf,
}

/// Locates the SSD face detector on disk.
///
/// Search order:
/// 1. `model_dir` if given, otherwise the working directory
/// 2. Per-user data directory (see [`model_data_dir`])
///
/// The first directory holding the topology wins; its weights must sit next
/// to it.
pub fn resolve_ssd_model(model_dir: Option<&Path>) -> Result<ModelFiles, ModelLoadError> {
    let primary = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut search_dirs = vec![primary];
    if let Some(data_dir) = model_data_dir() {
        search_dirs.push(data_dir);
    }

    let topology = resolve(SSD_TOPOLOGY_NAME, &search_dirs)?;
    let weights = topology.with_file_name(SSD_WEIGHTS_NAME);
    if !weights.is_file() {
        return Err(ModelLoadError::NotFound {
            name: SSD_WEIGHTS_NAME.to_string(),
            searched: display_dirs(topology.parent().into_iter()),
        });
    }

    Ok(ModelFiles { topology, weights })
}

/// Returns the first `dir/name` that exists as a file.
pub fn resolve(name: &str, search_dirs: &[PathBuf]) -> Result<PathBuf, ModelLoadError> {
    search_dirs
        .iter()
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| ModelLoadError::NotFound {
            name: name.to_string(),
            searched: display_dirs(search_dirs.iter().map(PathBuf::as_path)),
        })
}

/// Platform-specific model directory.
///
/// - macOS: `~/Library/Application Support/EyeSee/models/`
/// - Linux: `$XDG_DATA_HOME/EyeSee/models/` or `~/.local/share/EyeSee/models/`
/// - Windows: `%APPDATA%/EyeSee/models/`
pub fn model_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR_NAME).join("models"))
}

fn display_dirs<'a>(dirs: impl Iterator<Item = &'a Path>) -> String {
    dirs.map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_model_pair(dir: &Path) {
        fs::write(dir.join(SSD_TOPOLOGY_NAME), b"graph").unwrap();
        fs::write(dir.join(SSD_WEIGHTS_NAME), b"weights").unwrap();
    }

    #[test]
    fn test_resolve_finds_first_matching_dir() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("m.onnx"), b"x").unwrap();

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(resolve("m.onnx", &dirs).unwrap(), second.path().join("m.onnx"));
    }

    #[test]
    fn test_resolve_missing_lists_searched_dirs() {
        let dir = TempDir::new().unwrap();
        let err = resolve("m.onnx", &[dir.path().to_path_buf()]).unwrap_err();
        match err {
            ModelLoadError::NotFound { name, searched } => {
                assert_eq!(name, "m.onnx");
                assert!(searched.contains(&dir.path().display().to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_ssd_model_in_explicit_dir() {
        let dir = TempDir::new().unwrap();
        write_model_pair(dir.path());

        let files = resolve_ssd_model(Some(dir.path())).unwrap();
        assert_eq!(files.topology, dir.path().join(SSD_TOPOLOGY_NAME));
        assert_eq!(files.weights, dir.path().join(SSD_WEIGHTS_NAME));
    }

    #[test]
    fn test_resolve_ssd_model_requires_weights() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SSD_TOPOLOGY_NAME), b"graph").unwrap();

        let err = resolve_ssd_model(Some(dir.path())).unwrap_err();
        assert!(
            matches!(err, ModelLoadError::NotFound { ref name, .. } if name == SSD_WEIGHTS_NAME)
        );
    }

    #[test]
    fn test_model_data_dir_is_app_scoped() {
        if let Some(path) = model_data_dir() {
            assert!(path.ends_with(Path::new(APP_DIR_NAME).join("models")));
        }
    }
}
