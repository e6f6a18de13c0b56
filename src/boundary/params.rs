//! Calibration knobs of the boundary extractor.
use crate::edges::CannyParams;
use serde::{Deserialize, Serialize};

/// Acceptance thresholds for a candidate loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeFilter {
    /// Enclosed area must exceed this fraction of the image area...
    pub min_area_fraction: f32,
    /// ...and this absolute pixel area.
    pub min_area_px: f32,
    /// Perimeter must exceed `min_perimeter_factor * sqrt(enclosed_area)`...
    pub min_perimeter_factor: f32,
    /// ...and this absolute length.
    pub min_perimeter_px: f32,
    /// Long over short side of the minimum-area rectangle.
    pub min_aspect_ratio: f32,
    pub min_short_side_px: f32,
    pub min_solidity: f32,
    pub max_solidity: f32,
}

impl Default for ShapeFilter {
    fn default() -> Self {
        Self::primary()
    }
}

impl ShapeFilter {
    pub fn primary() -> Self {
        Self {
            min_area_fraction: 0.02,
            min_area_px: 500.0,
            min_perimeter_factor: 1.5,
            min_perimeter_px: 100.0,
            min_aspect_ratio: 1.3,
            min_short_side_px: 15.0,
            min_solidity: 0.1,
            max_solidity: 0.95,
        }
    }

    pub fn fallback() -> Self {
        Self {
            min_area_fraction: 0.01,
            min_area_px: 500.0,
            min_perimeter_factor: 0.0,
            min_perimeter_px: 0.0,
            min_aspect_ratio: 1.3,
            min_short_side_px: 0.0,
            min_solidity: 0.0,
            max_solidity: 1.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryParams {
    pub primary_filter: ShapeFilter,
    pub fallback_filter: ShapeFilter,
    /// Percentile of the interior distance transform taken as half-width.
    pub half_width_percentile: f32,
    pub min_half_width: f32,
    pub max_half_width: f32,
    /// Extra dilation of the outer boundary beyond the half-width.
    pub outer_margin: f32,
    /// Relative area difference under which two loops count as equal.
    pub tie_tolerance: f32,
    pub enable_fallback: bool,
    pub canny: CannyParams,
    /// Closing diameter bridging gaps in the Canny edges.
    pub fallback_close_diameter: usize,
    pub fallback_close_iterations: usize,
}

impl Default for BoundaryParams {
    fn default() -> Self {
        Self {
            primary_filter: ShapeFilter::primary(),
            fallback_filter: ShapeFilter::fallback(),
            half_width_percentile: 80.0,
            min_half_width: 5.0,
            max_half_width: 12.0,
            outer_margin: 2.0,
            tie_tolerance: 1e-6,
            enable_fallback: true,
            canny: CannyParams::default(),
            fallback_close_diameter: 7,
            fallback_close_iterations: 2,
        }
    }
}
