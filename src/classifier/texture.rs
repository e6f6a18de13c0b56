//! Low-texture classifier: smooth surfaces have weak gradients.
use crate::edges::sobel_gradients;
use crate::image::{ImageF32, Mask};
use crate::morphology::{self, StructuringElement};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureParams {
    /// Fraction of the maximum gradient below which a pixel is smooth.
    pub low_gradient_fraction: f32,
    /// Diameter of the closing applied to the smooth-pixel mask.
    pub close_diameter: usize,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            low_gradient_fraction: 0.08,
            close_diameter: 3,
        }
    }
}

/// Empty when the image carries no gradient at all.
pub fn texture_mask(smoothed: &ImageF32, params: &TextureParams) -> Mask {
    let grad = sobel_gradients(smoothed);
    let max = grad.mag.max_value();
    if max <= 0.0 {
        return Mask::new(smoothed.w, smoothed.h);
    }
    let cutoff = params.low_gradient_fraction * max;
    let smooth = Mask::from_fn(smoothed.w, smoothed.h, |x, y| grad.mag.get(x, y) < cutoff);
    morphology::close(&smooth, &StructuringElement::ellipse(params.close_diameter), 1)
}
