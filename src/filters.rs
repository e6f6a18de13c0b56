//! Separable smoothing filters.
//!
//! Images are convolved row then column with a symmetric 1-D kernel; border
//! samples clamp to the image extents (replicate). The same kernels drive
//! the cyclic 1-D smoothing applied to contour curvature profiles.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Simple wrapper around a static filter kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// Normalised 5-tap Gaussian filter `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[0.0625, 0.25, 0.375, 0.25, 0.0625]);

/// Sampled Gaussian with an owned, normalised tap vector.
#[derive(Clone, Debug)]
pub struct GaussianKernel {
    taps: Vec<f32>,
    sigma: f32,
}

impl GaussianKernel {
    /// Kernel truncated at `radius` samples on each side.
    pub fn new(sigma: f32, radius: usize) -> Self {
        let sigma = sigma.max(1e-3);
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f32> = (0..=2 * radius)
            .map(|i| {
                let d = i as f32 - radius as f32;
                (-(d * d) / denom).exp()
            })
            .collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { taps, sigma }
    }

    /// Odd window size with the usual `0.3·((k−1)/2 − 1) + 0.8` sigma.
    pub fn for_window(ksize: usize) -> Self {
        let ksize = ksize.max(1) | 1;
        let sigma = 0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8;
        Self::new(sigma, ksize / 2)
    }

    /// Radius covering four standard deviations.
    pub fn truncated(sigma: f32) -> Self {
        let radius = (4.0 * sigma).round().max(1.0) as usize;
        Self::new(sigma, radius)
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Convolve `src` with `filter` horizontally then vertically.
pub fn apply<F: SeparableFilter + ?Sized>(filter: &F, src: &ImageF32) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    let mut tmp = ImageF32::new(w, h);
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    let taps = filter.taps();
    let radius = (taps.len() / 2) as isize;

    for y in 0..h {
        let src_row = src.row(y);
        let dst_row = tmp.row_mut(y);
        for (x, dst_px) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - radius, w);
                acc += tap * src_row[sx];
            }
            *dst_px = acc;
        }
    }

    for y in 0..h {
        let dst_row = out.row_mut(y);
        for (k, &tap) in taps.iter().enumerate() {
            let sy = clamp_index(y as isize + k as isize - radius, h);
            let src_row = tmp.row(sy);
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d += tap * s;
            }
        }
    }
    out
}

/// Circular 1-D convolution for closed signals.
pub fn smooth_cyclic<F: SeparableFilter + ?Sized>(filter: &F, signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let taps = filter.taps();
    let radius = (taps.len() / 2) as isize;
    (0..n)
        .map(|i| {
            taps.iter()
                .enumerate()
                .map(|(k, &tap)| {
                    let j = (i as isize + k as isize - radius).rem_euclid(n as isize) as usize;
                    tap * signal[j]
                })
                .sum()
        })
        .collect()
}

#[inline]
pub(crate) fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 || idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}
