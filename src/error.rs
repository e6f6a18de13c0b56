//! Error taxonomy for the extraction pipeline.
//!
//! Every stage returns one of these variants instead of panicking. The batch
//! driver inspects [`TrackError::is_recoverable`] to decide whether the
//! remaining artifacts of an image can still be produced.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning a track image into edge/centerline artifacts.
#[derive(Debug, Error)]
pub enum TrackError {
    /// The image file is missing or could not be decoded.
    #[error("failed to load image {path}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    /// The classifier ensemble (and its alternates) found no track surface.
    #[error("segmentation degenerate: foreground fraction {foreground_fraction:.5}")]
    SegmentationDegenerate { foreground_fraction: f32 },

    /// No loop passed the shape filters in either boundary strategy.
    #[error("no track boundary found: {reason}")]
    BoundaryNotFound { reason: String },

    /// Two candidate loops enclose numerically equal areas.
    #[error("ambiguous boundary: two loops enclose equal area {area:.1}")]
    AmbiguousBoundary { area: f32 },

    /// The contour is too short to estimate curvature reliably.
    #[error("contour has {points} points, at least {required} needed for adaptive resampling")]
    ResamplingDegenerate { points: usize, required: usize },

    /// The skeleton is empty or split into several pieces.
    #[error("centerline disconnected: {reason}")]
    CenterlineDisconnected { reason: String },

    /// A binary artifact was truncated or malformed.
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    /// Configuration file could not be read or parsed.
    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// Filesystem failure while writing outputs.
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackError {
    /// Whether processing of the same image may continue with other artifacts.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::BoundaryNotFound { .. }
                | Self::AmbiguousBoundary { .. }
                | Self::ResamplingDegenerate { .. }
                | Self::CenterlineDisconnected { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used across the crate.
pub type TrackResult<T> = std::result::Result<T, TrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_reason() {
        let err = TrackError::BoundaryNotFound {
            reason: "no loop passed the filters".into(),
        };
        assert!(format!("{err}").contains("no loop passed"));
    }

    #[test]
    fn recoverable_classification() {
        assert!(TrackError::CenterlineDisconnected {
            reason: "empty".into()
        }
        .is_recoverable());
        assert!(!TrackError::SegmentationDegenerate {
            foreground_fraction: 0.0
        }
        .is_recoverable());
        assert!(!TrackError::ImageLoad {
            path: PathBuf::from("missing.png"),
            reason: "not found".into()
        }
        .is_recoverable());
    }
}
