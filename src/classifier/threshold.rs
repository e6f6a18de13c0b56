//! Pixel-wise threshold classifiers: HSV range, Otsu and local adaptive.
use crate::filters::{self, GaussianKernel};
use crate::image::color::histogram;
use crate::image::{HsvPlanes, ImageF32, Mask};
use image::GrayImage;
use imageproc::contrast::otsu_level;
use serde::{Deserialize, Serialize};

use super::regime::RegimeParams;

/// Inclusive hue band in OpenCV units (0..180).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HueBand {
    pub min: u8,
    pub max: u8,
}

impl Default for HueBand {
    fn default() -> Self {
        Self { min: 0, max: 180 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveParams {
    /// Side of the Gaussian window, forced odd.
    pub block_size: usize,
    /// Pixels at or below `local_mean - offset` are track.
    pub offset: f32,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self {
            block_size: 25,
            offset: 8.0,
        }
    }
}

/// HSV value inside `[lower, upper]`, saturation under the cap, hue in band.
pub fn range_mask(hsv: &HsvPlanes, width: usize, height: usize, regime: &RegimeParams, hue: HueBand) -> Mask {
    Mask::from_fn(width, height, |x, y| {
        let i = y * width + x;
        let v = hsv.value[i] as f32;
        let s = hsv.saturation[i] as f32;
        let h = hsv.hue[i];
        v >= regime.lower_value
            && v <= regime.upper_value
            && s <= regime.saturation_cap
            && h >= hue.min
            && h <= hue.max
    })
}

/// Otsu level of a grayscale image, or `None` if only one level occurs.
pub fn otsu_threshold(gray: &GrayImage) -> Option<u8> {
    let hist = histogram(gray.as_raw());
    if hist.iter().filter(|&&c| c > 0).count() < 2 {
        return None;
    }
    Some(otsu_level(gray))
}

/// Dark side of the Otsu split of the smoothed lightness.
pub fn otsu_mask(smoothed: &ImageF32) -> Mask {
    let quantized = smoothed.to_u8_clamped();
    let Some(gray) = GrayImage::from_raw(smoothed.w as u32, smoothed.h as u32, quantized) else {
        return Mask::new(smoothed.w, smoothed.h);
    };
    match otsu_threshold(&gray) {
        Some(t) => Mask::from_fn(smoothed.w, smoothed.h, |x, y| gray.get_pixel(x as u32, y as u32).0[0] <= t),
        None => Mask::new(smoothed.w, smoothed.h),
    }
}

/// Gaussian-weighted local threshold.
pub fn adaptive_mask(lightness: &ImageF32, params: &AdaptiveParams) -> Mask {
    let local_mean = filters::apply(&GaussianKernel::for_window(params.block_size), lightness);
    Mask::from_fn(lightness.w, lightness.h, |x, y| {
        lightness.get(x, y) <= local_mean.get(x, y) - params.offset
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otsu_splits_bimodal_values() {
        let gray = GrayImage::from_fn(20, 10, |x, _| image::Luma([if x < 10 { 40 } else { 200 }]));
        let t = otsu_threshold(&gray).unwrap();
        assert!((40..200).contains(&t));
        let flat = GrayImage::from_pixel(5, 2, image::Luma([7]));
        assert_eq!(otsu_threshold(&flat), None);
    }

    #[test]
    fn adaptive_marks_dark_spot_only() {
        let mut img = ImageF32::from_vec(30, 30, vec![200.0; 900]);
        img.set(15, 15, 20.0);
        let mask = adaptive_mask(&img, &AdaptiveParams::default());
        assert!(mask.get(15, 15));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn flat_image_gives_empty_otsu_mask() {
        let img = ImageF32::from_vec(4, 4, vec![255.0; 16]);
        assert!(otsu_mask(&img).is_empty());
    }
}
