//! Canny edge detection.
//!
//! Gaussian blur → Sobel → non-maximum suppression along the quantized
//! gradient direction → hysteresis. Thresholds are on the Sobel magnitude of
//! a 0..255 lightness image, so `30/100` mean the same as for 8-bit input.
use super::grad::{sobel_gradients, Grad};
use crate::filters::{self, GAUSSIAN_5TAP};
use crate::image::{ImageF32, ImageView, Mask};
use serde::{Deserialize, Serialize};

const TAN_22_5_DEG: f32 = 0.41421356237;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    pub low_threshold: f32,
    pub high_threshold: f32,
    /// Pre-smoothing with the 5-tap Gaussian before differentiation.
    pub presmooth: bool,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low_threshold: 30.0,
            high_threshold: 100.0,
            presmooth: true,
        }
    }
}

/// Thin the gradient magnitude to ridge pixels. Suppressed pixels become 0;
/// the outer 1-pixel frame is always suppressed.
pub fn non_max_suppression(grad: &Grad) -> ImageF32 {
    let w = grad.width();
    let h = grad.height();
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= 0.0 {
                continue;
            }
            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            let (neighbor1, neighbor2) = if abs_gx >= abs_gy {
                if abs_gy <= abs_gx * TAN_22_5_DEG {
                    (mag_row[x - 1], mag_row[x + 1])
                } else if same_sign {
                    (mag_prev[x - 1], mag_next[x + 1])
                } else {
                    (mag_prev[x + 1], mag_next[x - 1])
                }
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            // Ties along a plateau keep the first pixel in scan order.
            if mag > neighbor1 && mag >= neighbor2 {
                out.set(x, y, mag);
            }
        }
    }
    out
}

/// Canny edges of a 0..255 single-channel image.
pub fn canny(l: &ImageF32, params: &CannyParams) -> Mask {
    let smoothed;
    let src = if params.presmooth {
        smoothed = filters::apply(&GAUSSIAN_5TAP, l);
        &smoothed
    } else {
        l
    };
    let grad = sobel_gradients(src);
    let thin = non_max_suppression(&grad);
    hysteresis(&thin, params.low_threshold, params.high_threshold)
}

/// Keep strong pixels and weak pixels 8-connected to a strong one.
fn hysteresis(thin: &ImageF32, low: f32, high: f32) -> Mask {
    let (w, h) = (thin.w, thin.h);
    let mut out = Mask::new(w, h);
    let mut stack = Vec::new();
    for (idx, &v) in thin.data.iter().enumerate() {
        if v >= high && !out.is_set_idx(idx) {
            out.set_idx(idx, true);
            stack.push(idx);
            while let Some(cur) = stack.pop() {
                let cx = (cur % w) as isize;
                let cy = (cur / w) as isize;
                for dy in -1..=1isize {
                    for dx in -1..=1isize {
                        let nx = cx + dx;
                        let ny = cy + dy;
                        if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                            continue;
                        }
                        let n = ny as usize * w + nx as usize;
                        if !out.is_set_idx(n) && thin.data[n] >= low {
                            out.set_idx(n, true);
                            stack.push(n);
                        }
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_image(size: usize) -> ImageF32 {
        let mut img = ImageF32::new(size, size);
        for y in size / 4..3 * size / 4 {
            for x in size / 4..3 * size / 4 {
                img.set(x, y, 200.0);
            }
        }
        img
    }

    #[test]
    fn flat_image_has_no_edges() {
        let img = ImageF32::from_vec(16, 16, vec![90.0; 256]);
        assert!(canny(&img, &CannyParams::default()).is_empty());
    }

    #[test]
    fn square_outline_is_detected() {
        let edges = canny(&square_image(32), &CannyParams::default());
        assert!(edges.count() > 40);
        assert!(!edges.get(16, 16), "flat interior has no edges");
        assert!(!edges.get(0, 0));
    }
}
