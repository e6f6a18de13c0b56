//! Measuring, filtering and ranking traced loops.
use super::params::ShapeFilter;
use crate::contour::{ShapeMetrics, TracedLoop};
use crate::error::{TrackError, TrackResult};
use log::debug;

/// A traced loop together with its measurements.
#[derive(Clone, Debug)]
pub struct LoopCandidate {
    pub traced: TracedLoop,
    pub metrics: ShapeMetrics,
}

impl ShapeFilter {
    /// Why `m` is rejected, or `None` when it passes.
    pub fn rejection(&self, m: &ShapeMetrics, image_area: usize) -> Option<&'static str> {
        let min_area = self.min_area_px.max(self.min_area_fraction * image_area as f32);
        if m.enclosed_area <= min_area {
            return Some("area");
        }
        let min_perimeter = self
            .min_perimeter_px
            .max(self.min_perimeter_factor * m.enclosed_area.sqrt());
        if m.perimeter <= min_perimeter {
            return Some("perimeter");
        }
        if m.aspect_ratio < self.min_aspect_ratio {
            return Some("aspect");
        }
        if m.short_side < self.min_short_side_px {
            return Some("short side");
        }
        if m.solidity < self.min_solidity || m.solidity > self.max_solidity {
            return Some("solidity");
        }
        None
    }
}

/// Measure every loop and keep those accepted by `filter`, largest first.
pub fn filter_loops(loops: Vec<TracedLoop>, filter: &ShapeFilter, image_area: usize) -> Vec<LoopCandidate> {
    let mut kept: Vec<LoopCandidate> = loops
        .into_iter()
        .filter_map(|traced| {
            let metrics = ShapeMetrics::measure(&traced.contour, traced.pixel_area);
            match filter.rejection(&metrics, image_area) {
                None => Some(LoopCandidate { traced, metrics }),
                Some(reason) => {
                    debug!(
                        "loop label={} area={:.0} rejected by {reason}",
                        traced.label, metrics.enclosed_area
                    );
                    None
                }
            }
        })
        .collect();
    kept.sort_by(|a, b| b.metrics.enclosed_area.total_cmp(&a.metrics.enclosed_area));
    kept
}

/// Error out when the two largest candidates enclose the same area.
pub fn ensure_distinct_top(candidates: &[LoopCandidate], tolerance: f32) -> TrackResult<()> {
    if let [first, second, ..] = candidates {
        let a = first.metrics.enclosed_area;
        let b = second.metrics.enclosed_area;
        if (a - b).abs() <= tolerance * a.max(b) {
            return Err(TrackError::AmbiguousBoundary { area: a });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(area: f32, solidity: f32) -> ShapeMetrics {
        ShapeMetrics {
            enclosed_area: area,
            perimeter: 4.0 * area.sqrt() * 2.0,
            aspect_ratio: 1.5,
            short_side: 40.0,
            region_area: area * solidity,
            hull_area: area,
            solidity,
        }
    }

    #[test]
    fn primary_filter_rejects_blobs_and_specks() {
        let f = ShapeFilter::primary();
        assert_eq!(f.rejection(&metrics(5000.0, 0.5), 60_000), None);
        assert_eq!(f.rejection(&metrics(400.0, 0.5), 60_000), Some("area"));
        assert_eq!(f.rejection(&metrics(5000.0, 0.99), 60_000), Some("solidity"));
        let round = ShapeMetrics {
            aspect_ratio: 1.0,
            ..metrics(5000.0, 0.5)
        };
        assert_eq!(f.rejection(&round, 60_000), Some("aspect"));
    }
}
