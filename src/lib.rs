#![doc = include_str!("../README.md")]

// Pipeline stages
pub mod boundary;
pub mod centerline;
pub mod classifier;
pub mod mask_refine;
pub mod resample;

// Outputs and orchestration
pub mod artifact;
pub mod config;
pub mod diagnostics;
pub mod pipeline;

// Shared building blocks
pub mod contour;
pub mod edges;
pub mod error;
pub mod filters;
pub mod image;
pub mod morphology;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::artifact::{ArtifactWriter, EdgeArtifact, ProcessingSummary};
pub use crate::config::{load_config, TrackConfig};
pub use crate::error::{TrackError, TrackResult};
pub use crate::pipeline::{
    extract_track_boundaries, BoundaryResponse, TrackOutcome, TrackProcessor,
};
pub use crate::types::{BoundaryMethod, Centerline, Contour, Point, TrackBoundaries};

/// Stage-level API for tools that drive the pipeline step by step.
pub mod stages {
    pub use crate::boundary::{BoundaryExtractor, BoundaryParams, ShapeFilter};
    pub use crate::centerline::{CenterlineExtractor, CenterlineParams};
    pub use crate::classifier::{ClassifierMethod, ClassifierParams, SurfaceClassifier};
    pub use crate::mask_refine::{MaskRefiner, RefineParams};
    pub use crate::resample::{resample, uniform_resample, ResampleMode, ResampleParams};
}
