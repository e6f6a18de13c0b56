//! I/O helpers for track images, masks and JSON.
//!
//! - `load_color_image`: read a PNG/JPEG/BMP/TIFF into an owned RGB buffer
//!   (grayscale files are expanded to three channels).
//! - `save_mask` / `save_grayscale_u8`: write 8-bit single-channel PNGs.
//! - `save_color_image`: write an RGB buffer.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ColorImage, Mask};
use crate::error::{TrackError, TrackResult};
use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as 8-bit RGB.
pub fn load_color_image(path: &Path) -> TrackResult<ColorImage> {
    if !path.is_file() {
        return Err(TrackError::ImageLoad {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }
    let img = image::open(path)
        .map_err(|e| TrackError::ImageLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .into_rgb8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    ColorImage::from_raw(width, height, img.into_raw()).ok_or_else(|| TrackError::ImageLoad {
        path: path.to_path_buf(),
        reason: "decoded buffer has unexpected length".to_string(),
    })
}

/// Save an 8-bit grayscale buffer to a PNG.
pub fn save_grayscale_u8(width: usize, height: usize, data: &[u8], path: &Path) -> TrackResult<()> {
    ensure_parent_dir(path)?;
    let image = GrayImage::from_raw(width as u32, height as u32, data.to_vec()).ok_or_else(|| {
        TrackError::InvalidArtifact(format!("gray buffer does not match {width}x{height}"))
    })?;
    image.save(path).map_err(|e| image_write_error(path, e))
}

pub fn save_mask(mask: &Mask, path: &Path) -> TrackResult<()> {
    save_grayscale_u8(mask.width(), mask.height(), mask.as_raw(), path)
}

pub fn save_color_image(image: &ColorImage, path: &Path) -> TrackResult<()> {
    ensure_parent_dir(path)?;
    let rgb = to_rgb_image(image)?;
    rgb.save(path).map_err(|e| image_write_error(path, e))
}

/// Copy into an `image::RgbImage` for drawing and encoding.
pub fn to_rgb_image(image: &ColorImage) -> TrackResult<RgbImage> {
    RgbImage::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.as_raw().to_vec(),
    )
    .ok_or_else(|| TrackError::InvalidArtifact("rgb buffer size mismatch".to_string()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> TrackResult<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| TrackError::io(path, std::io::Error::other(e)))?;
    fs::write(path, json).map_err(|e| TrackError::io(path, e))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> TrackResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TrackError::io(parent, e))?;
        }
    }
    Ok(())
}

pub(crate) fn image_write_error(path: &Path, err: image::ImageError) -> TrackError {
    match err {
        image::ImageError::IoError(source) => TrackError::io(path, source),
        other => TrackError::io(path, std::io::Error::other(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_image_load_error() {
        let err = load_color_image(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, TrackError::ImageLoad { .. }));
    }

    #[test]
    fn mask_png_round_trip() {
        let dir = std::env::temp_dir().join("track_extract_io_test");
        let path = dir.join("mask.png");
        let mask = Mask::from_fn(8, 4, |x, _| x < 3);
        save_mask(&mask, &path).unwrap();
        let loaded = load_color_image(&path).unwrap();
        assert_eq!(loaded.width(), 8);
        assert_eq!(loaded.pixel(1, 1), [255, 255, 255]);
        assert_eq!(loaded.pixel(5, 2), [0, 0, 0]);
        let _ = fs::remove_dir_all(dir);
    }
}
