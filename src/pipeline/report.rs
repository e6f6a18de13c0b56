//! Single-call programmatic contract.
use super::{NullSink, TrackProcessor};
use crate::config::TrackConfig;
use crate::error::{TrackError, TrackResult};
use crate::image::io::load_color_image;
use crate::types::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of [`extract_track_boundaries`]. On failure both boundaries are
/// empty and `error` carries the reason.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryResponse {
    pub success: bool,
    pub outer_boundary: Vec<Point>,
    pub inner_boundary: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BoundaryResponse {
    fn failure(err: &TrackError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Default::default()
        }
    }
}

/// Load `path` and extract resampled outer/inner boundaries. Never fails:
/// errors are reported inside the response.
pub fn extract_track_boundaries(path: &Path, config: &TrackConfig) -> BoundaryResponse {
    match try_extract(path, config) {
        Ok((outer_boundary, inner_boundary)) => BoundaryResponse {
            success: true,
            outer_boundary,
            inner_boundary,
            error: None,
        },
        Err(err) => BoundaryResponse::failure(&err),
    }
}

fn try_extract(path: &Path, config: &TrackConfig) -> TrackResult<(Vec<Point>, Vec<Point>)> {
    let image = load_color_image(path)?;
    let config = TrackConfig {
        extract_centerline: false,
        ..config.clone()
    };
    let outcome = TrackProcessor::new(config).process(&image, &NullSink)?;
    let found = outcome.boundaries?;
    Ok((found.outer, found.inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_is_reported_not_raised() {
        let resp = extract_track_boundaries(Path::new("nope/missing.png"), &TrackConfig::default());
        assert!(!resp.success);
        assert!(resp.outer_boundary.is_empty());
        assert!(resp.error.unwrap().contains("missing.png"));
    }
}
