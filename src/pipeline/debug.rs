//! Debug image sink.
//!
//! Stages hand intermediate images to a [`DebugSink`] instead of writing
//! files themselves. The default [`NullSink`] drops everything.
use crate::image::io::{image_write_error, save_mask};
use crate::image::Mask;
use image::RgbImage;
use log::warn;
use std::path::PathBuf;

pub enum DebugImage<'a> {
    Mask(&'a Mask),
    Rgb(RgbImage),
}

/// Receiver of intermediate images. Shared across the boundary and
/// centerline workers, hence `Sync`.
pub trait DebugSink: Sync {
    fn emit(&self, name: &str, image: DebugImage<'_>);

    /// Whether emitting is worth the cost of building the image.
    fn enabled(&self) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn emit(&self, _name: &str, _image: DebugImage<'_>) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Writes `<dir>/<prefix>_<name>.png`. Failures are logged, never raised.
#[derive(Clone, Debug)]
pub struct PngSink {
    dir: PathBuf,
    prefix: String,
}

impl PngSink {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}_{name}.png", self.prefix))
    }
}

impl DebugSink for PngSink {
    fn emit(&self, name: &str, image: DebugImage<'_>) {
        let path = self.path_for(name);
        let result = match image {
            DebugImage::Mask(mask) => save_mask(mask, &path),
            DebugImage::Rgb(rgb) => crate::image::io::ensure_parent_dir(&path)
                .and_then(|_| rgb.save(&path).map_err(|e| image_write_error(&path, e))),
        };
        if let Err(err) = result {
            warn!("PngSink: failed to write {}: {err}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_sink_writes_named_file() {
        let dir = std::env::temp_dir().join("track_extract_debug_sink");
        let sink = PngSink::new(&dir, "oval");
        let mask = Mask::from_fn(6, 6, |x, y| x == y);
        sink.emit("mask", DebugImage::Mask(&mask));
        assert!(dir.join("oval_mask.png").is_file());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn null_sink_is_disabled() {
        assert!(!NullSink.enabled());
    }
}
