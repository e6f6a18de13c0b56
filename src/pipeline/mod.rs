//! Per-image processor tying the stages together.
//!
//! ```text
//! image ─► classify ─► refine ─┬─► boundary ─► resample ─► edges
//!                              └─► centerline (optional)
//! ```
//!
//! The boundary and centerline branches read the same refined mask and run
//! under `rayon::join`. Only a failed segmentation aborts the image; later
//! stage failures are carried in [`TrackOutcome`] so the remaining artifacts
//! can still be written.

pub mod batch;
pub mod debug;
pub mod report;

pub use batch::{is_supported_image, process_image, run_batch, BatchReport};
pub use debug::{DebugImage, DebugSink, NullSink, PngSink};
pub use report::{extract_track_boundaries, BoundaryResponse};

use crate::artifact::overlay;
use crate::boundary::BoundaryExtractor;
use crate::centerline::CenterlineExtractor;
use crate::classifier::SurfaceClassifier;
use crate::config::TrackConfig;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::TrackTrace;
use crate::error::{TrackError, TrackResult};
use crate::image::{ColorImage, Mask};
use crate::mask_refine::MaskRefiner;
use crate::resample::{self, ResampleMode, ResampleOutcome};
use crate::types::{BoundaryMethod, Centerline, Contour, Point, TrackBoundaries};
use log::{debug, warn};
use std::time::Instant;

/// Outer and inner boundaries resampled to the target point count.
#[derive(Clone, Debug)]
pub struct ResampledBoundaries {
    pub outer: Vec<Point>,
    pub inner: Vec<Point>,
    pub method: BoundaryMethod,
    pub half_width: Option<f32>,
    pub outer_mode: ResampleMode,
    pub inner_mode: ResampleMode,
}

/// Everything produced for one image.
#[derive(Debug)]
pub struct TrackOutcome {
    pub mask: Mask,
    pub boundaries: TrackResult<ResampledBoundaries>,
    /// `None` when centerline extraction was not requested.
    pub centerline: Option<TrackResult<Centerline>>,
    pub trace: TrackTrace,
}

pub struct TrackProcessor {
    config: TrackConfig,
    classifier: SurfaceClassifier,
    refiner: MaskRefiner,
    boundary: BoundaryExtractor,
    centerline: CenterlineExtractor,
}

impl TrackProcessor {
    pub fn new(config: TrackConfig) -> Self {
        Self {
            classifier: SurfaceClassifier::new(config.classifier.clone()),
            refiner: MaskRefiner::new(config.refine.clone()),
            boundary: BoundaryExtractor::new(config.boundary.clone()),
            centerline: CenterlineExtractor::new(config.centerline.clone()),
            config,
        }
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn process(&self, image: &ColorImage, sink: &dyn DebugSink) -> TrackResult<TrackOutcome> {
        let total = Instant::now();
        let mut trace = TrackTrace::new(image.width(), image.height());

        let classification = trace
            .timings
            .measure("classify", || self.classifier.segment(image))?;
        trace.regime = Some(classification.regime.name());
        trace.classifier = Some(classification.method);
        if sink.enabled() {
            sink.emit("mask_raw", DebugImage::Mask(&classification.mask));
            if let Some(candidates) = &classification.candidates {
                for (name, mask) in candidates.iter() {
                    sink.emit(&format!("vote_{name}"), DebugImage::Mask(mask));
                }
            }
        }

        let mask = trace
            .timings
            .measure("refine", || self.refiner.refine(&classification.mask));
        trace.mask_coverage = Some(mask.coverage());
        sink.emit("mask_refined", DebugImage::Mask(&mask));

        let want_centerline = self.config.extract_centerline;
        let ((boundaries, boundary_ms), centerline) = rayon::join(
            || {
                let start = Instant::now();
                let found = self.boundary.extract(&mask);
                (found, elapsed_ms(start))
            },
            || want_centerline.then(|| self.run_centerline(&mask, sink)),
        );
        trace.timings.push("boundary", boundary_ms);
        let centerline = centerline.map(|(result, ms)| {
            trace.timings.push("centerline", ms);
            result
        });

        let boundaries = boundaries.map(|found| {
            let start = Instant::now();
            let resampled = self.resample_boundaries(found);
            trace.timings.push("resample", elapsed_ms(start));
            resampled
        });
        match &boundaries {
            Ok(b) => {
                trace.boundary_method = Some(b.method);
                trace.half_width = b.half_width;
                trace.outer_resample = Some(b.outer_mode);
                trace.inner_resample = Some(b.inner_mode);
                if sink.enabled() {
                    let size = (image.width() as u32, image.height() as u32);
                    sink.emit(
                        "edges",
                        DebugImage::Rgb(overlay::render_edges(&b.outer, &b.inner, Some(size))),
                    );
                }
            }
            Err(err) => warn!("TrackProcessor: boundary extraction failed: {err}"),
        }

        trace.timings.total_ms = elapsed_ms(total);
        debug!(
            "TrackProcessor::process {}x{} total {:.1} ms",
            image.width(),
            image.height(),
            trace.timings.total_ms
        );
        Ok(TrackOutcome {
            mask,
            boundaries,
            centerline,
            trace,
        })
    }

    fn run_centerline(&self, mask: &Mask, sink: &dyn DebugSink) -> (TrackResult<Centerline>, f64) {
        let start = Instant::now();
        let result = self.centerline.skeletonize(mask).map(|skel| {
            sink.emit("skeleton", DebugImage::Mask(&skel.mask));
            self.centerline.trace(&skel)
        });
        if let (Ok(centerline), true) = (&result, sink.enabled()) {
            let size = (mask.width() as u32, mask.height() as u32);
            sink.emit(
                "centerline",
                DebugImage::Rgb(overlay::render_centerline(centerline, Some(size))),
            );
        }
        if let Err(err) = &result {
            warn!("TrackProcessor: centerline skipped: {err}");
        }
        (result, elapsed_ms(start))
    }

    fn resample_boundaries(&self, found: TrackBoundaries) -> ResampledBoundaries {
        let outer = self.resample_contour("outer", &found.outer);
        let inner = self.resample_contour("inner", &found.inner);
        ResampledBoundaries {
            outer: outer.points,
            inner: inner.points,
            method: found.method,
            half_width: found.half_width,
            outer_mode: outer.mode,
            inner_mode: inner.mode,
        }
    }

    /// Resample to exactly `target_points`; contours too short for the
    /// curvature estimate fall back to uniform spacing.
    fn resample_contour(&self, which: &str, contour: &Contour) -> ResampleOutcome {
        let n = self.config.target_points;
        let outcome = resample::resample(contour, n, &self.config.resample);
        if outcome.mode != ResampleMode::Passthrough {
            return outcome;
        }
        let err = TrackError::ResamplingDegenerate {
            points: contour.len(),
            required: self.config.resample.required_points(n),
        };
        warn!("TrackProcessor: {which} boundary: {err}; resampling uniformly");
        ResampleOutcome {
            points: resample::uniform_resample(contour, n),
            mode: ResampleMode::Uniform,
        }
    }
}

impl Default for TrackProcessor {
    fn default() -> Self {
        Self::new(TrackConfig::default())
    }
}
