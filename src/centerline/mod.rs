//! Centerline extraction: refined mask → ordered, smoothed polyline.
//!
//! 1. Zhang–Suen thinning to a one-pixel skeleton; tiny skeleton fragments
//!    are discarded and more than `max_components` remaining pieces is an
//!    error.
//! 2. Greedy nearest-neighbour ordering from the first endpoint in raster
//!    order (or the first pixel of a closed skeleton).
//! 3. Natural cubic spline resampling to twice the point count.

pub mod order;
pub mod skeleton;
pub mod smooth;

use crate::error::{TrackError, TrackResult};
use crate::image::Mask;
use crate::morphology::label_components;
use crate::types::{Centerline, Point};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterlineParams {
    /// Skeleton components smaller than this are dropped.
    pub min_component_pixels: usize,
    pub max_components: usize,
    /// Cell size of the neighbour-search grid.
    pub grid_cell: usize,
    /// Spline smoothing only applies above this many points.
    pub min_smoothing_points: usize,
    /// Largest end-to-start gap still treated as a closed loop.
    pub max_closing_gap: f32,
    pub smooth: bool,
}

impl Default for CenterlineParams {
    fn default() -> Self {
        Self {
            min_component_pixels: 10,
            max_components: 1,
            grid_cell: 8,
            min_smoothing_points: 10,
            max_closing_gap: 10.0,
            smooth: true,
        }
    }
}

/// Skeleton pixels in row-major order after fragment filtering.
#[derive(Clone, Debug)]
pub struct Skeleton {
    pub mask: Mask,
    pub pixels: Vec<(usize, usize)>,
    pub components: usize,
}

#[derive(Clone, Debug, Default)]
pub struct CenterlineExtractor {
    params: CenterlineParams,
}

impl CenterlineExtractor {
    pub fn new(params: CenterlineParams) -> Self {
        Self { params }
    }

    pub fn extract(&self, mask: &Mask) -> TrackResult<Centerline> {
        let skel = self.skeletonize(mask)?;
        Ok(self.trace(&skel))
    }

    /// Order and smooth an already filtered skeleton.
    pub fn trace(&self, skel: &Skeleton) -> Centerline {
        let ordered = self.linearize(skel);
        let points = if self.params.smooth && ordered.len() > self.params.min_smoothing_points {
            smooth::spline_resample(&ordered, ordered.len() * 2)
        } else {
            ordered
        };
        let closed = match (points.first(), points.last()) {
            (Some(a), Some(b)) if points.len() > 2 => a.distance(*b) <= self.params.max_closing_gap,
            _ => false,
        };
        debug!(
            "CenterlineExtractor: {} skeleton px -> {} points (closed={closed})",
            skel.pixels.len(),
            points.len()
        );
        Centerline { points, closed }
    }

    /// Thin and filter the mask.
    pub fn skeletonize(&self, mask: &Mask) -> TrackResult<Skeleton> {
        let thinned = skeleton::thin(mask);
        let comps = label_components(&thinned);
        let keep: Vec<bool> = comps
            .sizes
            .iter()
            .enumerate()
            .map(|(label, &size)| label != 0 && size >= self.params.min_component_pixels)
            .collect();
        let components = keep.iter().filter(|&&k| k).count();
        if components == 0 {
            return Err(TrackError::CenterlineDisconnected {
                reason: "skeleton is empty".into(),
            });
        }
        if components > self.params.max_components {
            return Err(TrackError::CenterlineDisconnected {
                reason: format!(
                    "skeleton has {components} components (at most {} allowed)",
                    self.params.max_components
                ),
            });
        }
        let filtered = Mask::from_fn(mask.width(), mask.height(), |x, y| {
            keep[comps.labels[y * mask.width() + x] as usize]
        });
        let pixels = filtered.set_pixels();
        Ok(Skeleton {
            mask: filtered,
            pixels,
            components,
        })
    }

    /// Visit every skeleton pixel once in greedy nearest-neighbour order.
    pub fn linearize(&self, skel: &Skeleton) -> Vec<Point> {
        let seed = skel
            .pixels
            .iter()
            .position(|&(x, y)| skeleton::is_endpoint(&skel.mask, x, y))
            .unwrap_or(0);
        order::greedy_order(&skel.pixels, seed, self.params.grid_cell)
            .into_iter()
            .map(|i| Point::from(skel.pixels[i]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(w: usize, h: usize) -> Mask {
        Mask::from_fn(w, h, |x, y| {
            let dx = (x as f32 - w as f32 / 2.0) / (w as f32 * 0.4);
            let dy = (y as f32 - h as f32 / 2.0) / (h as f32 * 0.4);
            let r = dx * dx + dy * dy;
            (0.45..=1.0).contains(&r)
        })
    }

    #[test]
    fn thick_ring_yields_one_centerline() {
        let line = CenterlineExtractor::default().extract(&ring(160, 120)).unwrap();
        assert!(line.points.len() > 100);
    }

    #[test]
    fn outline_loop_is_closed() {
        let outline = Mask::from_fn(60, 40, |x, y| {
            let on_x = (10..=50).contains(&x) && (y == 8 || y == 32);
            let on_y = (8..=32).contains(&y) && (x == 10 || x == 50);
            on_x || on_y
        });
        let line = CenterlineExtractor::default().extract(&outline).unwrap();
        assert_eq!(line.points.len(), 2 * (2 * 41 + 2 * 23));
        assert!(line.closed);
        assert_eq!(line.points[0], Point::new(10.0, 8.0));
    }

    #[test]
    fn empty_mask_is_disconnected() {
        let err = CenterlineExtractor::default().extract(&Mask::new(30, 30)).unwrap_err();
        assert!(matches!(err, TrackError::CenterlineDisconnected { .. }));
    }

    #[test]
    fn two_blobs_are_disconnected() {
        let mask = Mask::from_fn(80, 40, |x, y| {
            ((5..35).contains(&x) && (15..25).contains(&y)) || ((45..75).contains(&x) && (15..25).contains(&y))
        });
        let err = CenterlineExtractor::default().extract(&mask).unwrap_err();
        assert!(matches!(err, TrackError::CenterlineDisconnected { .. }));
    }
}
