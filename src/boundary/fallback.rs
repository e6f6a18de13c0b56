//! Edge-based fallback: Canny outlines of the mask, two largest loops.
use super::candidates::{ensure_distinct_top, filter_loops};
use super::params::BoundaryParams;
use crate::contour::trace_outer_borders;
use crate::edges::canny;
use crate::error::{TrackError, TrackResult};
use crate::image::{ImageF32, ImageU8, Mask};
use crate::morphology::{self, StructuringElement};
use crate::types::Contour;
use log::debug;

/// Outer and inner loop, or [`TrackError::BoundaryNotFound`].
pub fn extract(mask: &Mask, params: &BoundaryParams) -> TrackResult<(Contour, Contour)> {
    let edges = edge_outline(mask, params);
    let candidates = filter_loops(trace_outer_borders(&edges), &params.fallback_filter, mask.area());
    debug!("edge fallback: {} loop(s) passed the fallback filter", candidates.len());
    if candidates.len() < 2 {
        return Err(TrackError::BoundaryNotFound {
            reason: format!(
                "edge fallback found {} usable loop(s), two are required",
                candidates.len()
            ),
        });
    }
    ensure_distinct_top(&candidates, params.tie_tolerance)?;
    let mut top = candidates.into_iter().take(2).map(|c| c.traced.contour);
    match (top.next(), top.next()) {
        (Some(outer), Some(inner)) => Ok((outer, inner)),
        _ => Err(TrackError::BoundaryNotFound {
            reason: "edge fallback lost its candidates".into(),
        }),
    }
}

/// Canny edges of the mask, closed and thickened into loops.
pub fn edge_outline(mask: &Mask, params: &BoundaryParams) -> Mask {
    let intensity = ImageF32::from_u8(&ImageU8::packed(mask.width(), mask.height(), mask.as_raw()));
    let edges = canny(&intensity, &params.canny);
    let se = StructuringElement::ellipse(params.fallback_close_diameter);
    let closed = morphology::close(&edges, &se, params.fallback_close_iterations);
    morphology::dilate(&closed, &se)
}
