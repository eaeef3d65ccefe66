use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use iced::widget::image::Handle;
use image::imageops::FilterType;
use image::RgbaImage;
use thiserror::Error;

pub const LOGO_FILE: &str = "logo.png";
pub const BACKGROUND_FILE: &str = "background.png";
pub const FONT_FILE: &str = "PixelifySans-VariableFont_wght.ttf";

/// Bounding box the logo is scaled into.
pub const LOGO_SIZE: u32 = 70;

#[derive(Error, Debug)]
pub enum AssetLoadError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Decorations for the window. Each one is optional; the UI falls back to a
/// blank logo slot, a solid background and the default font.
#[derive(Default)]
pub struct Assets {
    pub logo: Option<Handle>,
    pub background: Option<Handle>,
    pub font: Option<Vec<u8>>,
}

impl Assets {
    pub fn load(dir: &Path) -> Self {
        Self {
            logo: report(LOGO_FILE, load_logo(&dir.join(LOGO_FILE))),
            background: report(BACKGROUND_FILE, load_image(&dir.join(BACKGROUND_FILE))),
            font: report(FONT_FILE, read(&dir.join(FONT_FILE))),
        }
    }
}

fn report<T>(name: &str, result: Result<T, AssetLoadError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Failed to load {name}, using fallback: {e}");
            None
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetLoadError> {
    fs::read(path).map_err(|source| AssetLoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn decode(path: &Path) -> Result<RgbaImage, AssetLoadError> {
    let bytes = read(path)?;
    image::load_from_memory(&bytes)
        .map(|img| img.into_rgba8())
        .map_err(|source| AssetLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

fn load_image(path: &Path) -> Result<Handle, AssetLoadError> {
    Ok(to_handle(decode(path)?))
}

fn load_logo(path: &Path) -> Result<Handle, AssetLoadError> {
    let mut logo = decode(path)?;
    log::info!("Logo loaded, {}x{}", logo.width(), logo.height());
    invert_rgb(&mut logo);
    Ok(to_handle(fit_within(&logo, LOGO_SIZE)))
}

/// Inverts the colour channels and leaves alpha alone.
pub fn invert_rgb(img: &mut RgbaImage) {
    for pixel in img.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = 255 - *channel;
        }
    }
}

/// Scales `img` to fit a `size`×`size` box, keeping its aspect ratio.
pub fn fit_within(img: &RgbaImage, size: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let scale = (size as f64 / w as f64).min(size as f64 / h as f64);
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    image::imageops::resize(img, new_w, new_h, FilterType::Lanczos3)
}

fn to_handle(img: RgbaImage) -> Handle {
    let (w, h) = img.dimensions();
    Handle::from_rgba(w, h, img.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_invert_keeps_alpha() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([10, 200, 255, 77]));
        invert_rgb(&mut img);
        assert_eq!(img.get_pixel(1, 1), &Rgba([245, 55, 0, 77]));
    }

    #[test]
    fn test_fit_within_keeps_aspect_ratio() {
        let img = RgbaImage::new(200, 100);
        let fitted = fit_within(&img, LOGO_SIZE);
        assert_eq!(fitted.dimensions(), (70, 35));
    }

    #[test]
    fn test_fit_within_scales_small_images_up() {
        let img = RgbaImage::new(35, 35);
        assert_eq!(fit_within(&img, LOGO_SIZE).dimensions(), (70, 70));
    }

    #[test]
    fn test_missing_assets_fall_back() {
        let dir = TempDir::new().unwrap();
        let assets = Assets::load(dir.path());
        assert!(assets.logo.is_none());
        assert!(assets.background.is_none());
        assert!(assets.font.is_none());
    }

    #[test]
    fn test_undecodable_logo_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOGO_FILE);
        fs::write(&path, b"not a png").unwrap();
        assert!(matches!(
            load_logo(&path),
            Err(AssetLoadError::Decode { .. })
        ));
    }

    #[test]
    fn test_valid_logo_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOGO_FILE);
        RgbaImage::from_pixel(140, 140, Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();
        assert!(load_logo(&path).is_ok());
    }
}
