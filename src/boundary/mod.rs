//! Boundary extraction: refined mask → raw outer and inner contours.
//!
//! The morphological strategy picks the dominant track-shaped loop,
//! estimates the half-width of the ribbon from its distance transform and
//! derives the outer boundary by dilation and the inner one by erosion. When
//! no loop survives the primary shape filter, an edge-based fallback traces
//! the Canny outlines of the mask and keeps the two largest loops.
//!
//! Whatever the strategy, the returned outer loop encloses strictly more
//! area than the inner one and both are wound clockwise on screen.

pub mod candidates;
pub mod fallback;
pub mod morphological;
pub mod params;

pub use candidates::LoopCandidate;
pub use params::{BoundaryParams, ShapeFilter};

use crate::error::{TrackError, TrackResult};
use crate::image::Mask;
use crate::types::{BoundaryMethod, Contour, TrackBoundaries};
use log::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct BoundaryExtractor {
    params: BoundaryParams,
}

impl BoundaryExtractor {
    pub fn new(params: BoundaryParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BoundaryParams {
        &self.params
    }

    pub fn extract(&self, mask: &Mask) -> TrackResult<TrackBoundaries> {
        if let Some(found) = morphological::extract(mask, &self.params)? {
            debug!(
                "BoundaryExtractor: morphological outer={} inner={} points",
                found.outer.len(),
                found.inner.len()
            );
            return finish(found.outer, found.inner, BoundaryMethod::Morphological, Some(found.half_width));
        }
        if !self.params.enable_fallback {
            return Err(TrackError::BoundaryNotFound {
                reason: "no loop passed the primary shape filter".into(),
            });
        }
        info!("BoundaryExtractor: primary strategy found no track loop, trying edge fallback");
        let (outer, inner) = fallback::extract(mask, &self.params)?;
        finish(outer, inner, BoundaryMethod::EdgeFallback, None)
    }
}

fn finish(mut outer: Contour, mut inner: Contour, method: BoundaryMethod, half_width: Option<f32>) -> TrackResult<TrackBoundaries> {
    outer.normalize_winding();
    inner.normalize_winding();
    if outer.area() < inner.area() {
        std::mem::swap(&mut outer, &mut inner);
    }
    if outer.area() <= inner.area() {
        return Err(TrackError::AmbiguousBoundary { area: outer.area() });
    }
    Ok(TrackBoundaries {
        outer,
        inner,
        method,
        half_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mask_has_no_boundary() {
        let err = BoundaryExtractor::default().extract(&Mask::new(80, 60)).unwrap_err();
        assert!(matches!(err, TrackError::BoundaryNotFound { .. }));
    }

    #[test]
    fn equal_twin_loops_are_ambiguous() {
        // two identical elongated rings side by side
        let ring = |x: usize, y: usize, cx: f32| {
            let dx = (x as f32 - cx) / 40.0;
            let dy = (y as f32 - 60.0) / 55.0;
            let ix = (x as f32 - cx) / 20.0;
            let iy = (y as f32 - 60.0) / 35.0;
            dx * dx + dy * dy <= 1.0 && ix * ix + iy * iy > 1.0
        };
        let mask = Mask::from_fn(200, 120, |x, y| ring(x, y, 50.0) || ring(x, y, 150.0));
        let err = BoundaryExtractor::default().extract(&mask).unwrap_err();
        assert!(matches!(err, TrackError::AmbiguousBoundary { .. }));
    }
}
