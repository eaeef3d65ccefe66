use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use eyesee_core::shared::constants::{APP_DIR_NAME, DEFAULT_CONFIDENCE, DEFAULT_TICK_INTERVAL_MS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Camera device; `None` uses the platform default.
    pub camera_device: Option<String>,
    pub camera_format: Option<String>,
    /// Confidence threshold in percent.
    pub confidence: u32,
    pub model_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Where the logo, background and font are looked up.
    pub asset_dir: PathBuf,
    pub tick_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_device: None,
            camera_format: None,
            confidence: (DEFAULT_CONFIDENCE * 100.0).round() as u32,
            model_dir: None,
            output_dir: PathBuf::from("."),
            asset_dir: PathBuf::from("."),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    /// Loads the user's settings, writing the defaults on first run.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            let defaults = Self::default();
            if let Err(e) = defaults.save_to(&path) {
                log::warn!("Could not write default settings to {}: {e}", path.display());
            }
            return defaults;
        }
        Self::load_from(&path)
    }

    /// Missing or malformed files yield the defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }

    /// Confidence as a fraction, capped at 1.0.
    pub fn threshold(&self) -> f32 {
        self.confidence.min(100) as f32 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.confidence, 50);
        assert_eq!(settings.threshold(), DEFAULT_CONFIDENCE);
        assert_eq!(settings.tick_interval_ms, 30);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_remaining_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "confidence": 80 }"#).unwrap();

        let settings = Settings::load_from(&path);

        assert_eq!(settings.confidence, 80);
        assert_eq!(settings.tick_interval_ms, 30);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            camera_device: Some("/dev/video1".into()),
            output_dir: PathBuf::from("/tmp/snaps"),
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_threshold_is_capped() {
        let settings = Settings {
            confidence: 250,
            ..Settings::default()
        };
        assert_eq!(settings.threshold(), 1.0);
    }
}
