//! Primary strategy: widen/shrink the filled track loop by its half-width.
use super::candidates::{ensure_distinct_top, filter_loops};
use super::params::BoundaryParams;
use crate::contour::{trace_components, trace_outer_border};
use crate::error::TrackResult;
use crate::image::Mask;
use crate::morphology::{self, distance_transform, label_components, StructuringElement};
use crate::types::Contour;
use log::debug;

/// Boundaries derived from the dominant loop.
#[derive(Clone, Debug)]
pub struct MorphologicalBoundaries {
    pub outer: Contour,
    pub inner: Contour,
    pub half_width: f32,
}

/// `Ok(None)` when no loop passes the primary filter or the inner boundary
/// vanishes; the caller then tries the fallback.
pub fn extract(mask: &Mask, params: &BoundaryParams) -> TrackResult<Option<MorphologicalBoundaries>> {
    let comps = label_components(mask);
    let candidates = filter_loops(trace_components(&comps), &params.primary_filter, mask.area());
    debug!("morphological: {} loop(s) passed the primary filter", candidates.len());
    ensure_distinct_top(&candidates, params.tie_tolerance)?;
    let Some(core_loop) = candidates.first() else {
        return Ok(None);
    };

    let core = morphology::fill_holes(&comps.mask_of(core_loop.traced.label));
    let half_width = estimate_half_width(&core, params);
    debug!("morphological: half-width {half_width:.2}px");

    let outer_se = StructuringElement::ellipse(kernel_diameter(half_width + params.outer_margin));
    let inner_se = StructuringElement::ellipse(kernel_diameter(half_width));
    let outer_mask = morphology::dilate(&core, &outer_se);
    let inner_mask = morphology::largest_component(&morphology::erode(&core, &inner_se));

    let (Some(outer), Some(inner)) = (trace_outer_border(&outer_mask), trace_outer_border(&inner_mask)) else {
        debug!("morphological: inner boundary vanished after erosion");
        return Ok(None);
    };
    if inner.contour.len() < 3 {
        return Ok(None);
    }
    Ok(Some(MorphologicalBoundaries {
        outer: outer.contour,
        inner: inner.contour,
        half_width,
    }))
}

/// Percentile of interior distances, clamped to the configured range.
pub fn estimate_half_width(core: &Mask, params: &BoundaryParams) -> f32 {
    let dt = distance_transform(core);
    let mut inside: Vec<f32> = dt
        .data
        .iter()
        .copied()
        .filter(|&d| d > 0.0)
        .collect();
    if inside.is_empty() {
        return params.min_half_width;
    }
    inside.sort_by(f32::total_cmp);
    let rank = ((params.half_width_percentile.clamp(0.0, 100.0) / 100.0) * (inside.len() - 1) as f32).round() as usize;
    inside[rank.min(inside.len() - 1)].clamp(params.min_half_width, params.max_half_width)
}

/// Elliptical kernel diameter for a width in pixels (at least 3).
fn kernel_diameter(width: f32) -> usize {
    (width.floor() as usize).max(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_width_is_clamped() {
        let params = BoundaryParams::default();
        let thin = Mask::from_fn(40, 40, |x, y| (10..30).contains(&x) && (18..22).contains(&y));
        assert_eq!(estimate_half_width(&thin, &params), 5.0);
        let wide = Mask::from_fn(200, 200, |x, y| (5..195).contains(&x) && (5..195).contains(&y));
        assert_eq!(estimate_half_width(&wide, &params), 12.0);
    }
}
