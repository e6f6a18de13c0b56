use std::path::PathBuf;
use track_extract::image::io::save_color_image;
use track_extract::image::{ColorImage, Mask};

/// Elliptical ribbon between two concentric ellipses.
#[derive(Clone, Copy, Debug)]
pub struct Ring {
    pub center: (f32, f32),
    pub outer: (f32, f32),
    pub inner: (f32, f32),
}

impl Ring {
    /// Ellipse ring centred in a 300×200 frame.
    pub fn standard() -> Self {
        Self {
            center: (150.0, 100.0),
            outer: (120.0, 80.0),
            inner: (80.0, 50.0),
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        let inside = |(a, b): (f32, f32)| {
            let dx = (x as f32 - self.center.0) / a;
            let dy = (y as f32 - self.center.1) / b;
            dx * dx + dy * dy <= 1.0
        };
        inside(self.outer) && !inside(self.inner)
    }

    pub fn mask(&self, width: usize, height: usize) -> Mask {
        Mask::from_fn(width, height, |x, y| self.contains(x, y))
    }

    /// Track painted in `track` colour on a `background` frame.
    pub fn image(&self, width: usize, height: usize, track: [u8; 3], background: [u8; 3]) -> ColorImage {
        let mut img = ColorImage::filled(width, height, background);
        for y in 0..height {
            for x in 0..width {
                if self.contains(x, y) {
                    img.put_pixel(x, y, track);
                }
            }
        }
        img
    }
}

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("track_extract_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

pub fn write_png(image: &ColorImage, dir: &std::path::Path, file: &str) -> PathBuf {
    let path = dir.join(file);
    save_color_image(image, &path).expect("write synthetic png");
    path
}
