use std::fs;
use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes frames to image files using the `image` crate.
///
/// Encodes into a sibling `.part` file and renames it into place, so the
/// final path either holds a complete image or nothing.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let format = image::ImageFormat::from_path(path)?;
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".part");
        let temp_path = Path::new(&temp_name);

        let result = img
            .save_with_format(temp_path, format)
            .map_err(Box::<dyn std::error::Error>::from)
            .and_then(|()| fs::rename(temp_path, path).map_err(Into::into));

        if result.is_err() {
            let _ = fs::remove_file(temp_path);
        }
        result
    }
}
