//! Per-image diagnostics: which regime and strategies the pipeline took and
//! how long each stage ran.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};

use crate::classifier::ClassifierMethod;
use crate::resample::ResampleMode;
use crate::types::BoundaryMethod;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}

/// Trace of one image run, written alongside debug output.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regime: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_coverage: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_method: Option<BoundaryMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_resample: Option<ResampleMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_resample: Option<ResampleMode>,
}

impl TrackTrace {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            input: InputDescriptor { width, height },
            timings: TimingBreakdown::default(),
            regime: None,
            classifier: None,
            mask_coverage: None,
            boundary_method: None,
            half_width: None,
            outer_resample: None,
            inner_resample: None,
        }
    }
}
