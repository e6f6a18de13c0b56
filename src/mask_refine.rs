//! Mask refinement: denoise and regularize a classifier mask.
//!
//! One pass is bilateral smoothing (re-thresholded), closing, opening, a
//! connectivity dilation bounded by the closed mask and removal of small
//! components. Passes repeat until the mask stops changing, so refining a
//! refined mask is a no-op.
use crate::image::Mask;
use crate::morphology::{self, StructuringElement};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineParams {
    pub bilateral_radius: usize,
    pub sigma_color: f32,
    pub sigma_space: f32,
    /// Smoothed values above this stay set.
    pub threshold: f32,
    pub open_iterations: usize,
    /// Diameter of the connectivity dilation.
    pub connect_diameter: usize,
    pub min_component_px: usize,
    pub min_component_fraction: f32,
    pub max_passes: usize,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            bilateral_radius: 4,
            sigma_color: 80.0,
            sigma_space: 80.0,
            threshold: 127.0,
            open_iterations: 3,
            connect_diameter: 3,
            min_component_px: 64,
            min_component_fraction: 0.001,
            max_passes: 8,
        }
    }
}

/// Kernel scale from the image area: `max(3, ⌊√area / 400⌋)`.
pub fn kernel_scale(area: usize) -> usize {
    (((area as f64).sqrt() / 400.0).floor() as usize).max(3)
}

#[derive(Clone, Debug, Default)]
pub struct MaskRefiner {
    params: RefineParams,
}

impl MaskRefiner {
    pub fn new(params: RefineParams) -> Self {
        Self { params }
    }

    /// Refine until a fixed point (or `max_passes`).
    pub fn refine(&self, mask: &Mask) -> Mask {
        let mut current = mask.clone();
        for pass in 1..=self.params.max_passes.max(1) {
            let next = self.refine_once(&current);
            if next == current {
                debug!("MaskRefiner converged after {pass} pass(es), coverage={:.3}", next.coverage());
                return next;
            }
            current = next;
        }
        warn!(
            "MaskRefiner did not converge in {} passes",
            self.params.max_passes
        );
        current
    }

    /// A single refinement pass.
    pub fn refine_once(&self, mask: &Mask) -> Mask {
        let p = &self.params;
        let scale = kernel_scale(mask.area());
        let smoothed = bilateral(mask, p);

        let closed = morphology::close(&smoothed, &StructuringElement::ellipse((scale - 1).max(3)), 1);
        let opened = morphology::open(&closed, &StructuringElement::ellipse(scale), p.open_iterations);
        let connected = morphology::dilate(&opened, &StructuringElement::ellipse(p.connect_diameter)).and(&closed);

        let min_size = p
            .min_component_px
            .max((p.min_component_fraction * mask.area() as f32).ceil() as usize);
        morphology::remove_small_components(&connected, min_size)
    }
}

/// Edge-preserving bilateral filter over a circular window, re-thresholded.
fn bilateral(mask: &Mask, p: &RefineParams) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    let r = p.bilateral_radius as isize;
    let space_denom = 2.0 * p.sigma_space * p.sigma_space;
    let color_denom = 2.0 * p.sigma_color * p.sigma_color;
    // Mask values are 0 or 255, so the range weight only takes two values.
    let same = 1.0f32;
    let differ = (-(255.0f32 * 255.0) / color_denom).exp();

    let window: Vec<(isize, isize, f32)> = (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(|(dx, dy)| dx * dx + dy * dy <= r * r)
        .map(|(dx, dy)| (dx, dy, (-((dx * dx + dy * dy) as f32) / space_denom).exp()))
        .collect();

    let mut out = vec![0u8; w * h];
    out.par_chunks_mut(w.max(1)).enumerate().for_each(|(y, row)| {
        for (x, dst) in row.iter_mut().enumerate() {
            let centre = mask.get(x, y);
            let mut acc = 0.0f32;
            let mut norm = 0.0f32;
            for &(dx, dy, ws) in &window {
                // replicate border
                let nx = (x as isize + dx).clamp(0, w as isize - 1) as usize;
                let ny = (y as isize + dy).clamp(0, h as isize - 1) as usize;
                let on = mask.get(nx, ny);
                let weight = ws * if on == centre { same } else { differ };
                acc += weight * if on { 255.0 } else { 0.0 };
                norm += weight;
            }
            if norm > 0.0 && acc / norm > p.threshold {
                *dst = 255;
            }
        }
    });
    Mask::from_raw(w, h, out).unwrap_or_else(|| mask.clone())
}
