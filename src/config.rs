//! Calibration file for the whole pipeline.
//!
//! Every section is optional in JSON; missing keys fall back to the defaults
//! of the corresponding stage. A minimal override looks like
//!
//! ```json
//! { "target_points": 900, "boundary": { "primary_filter": { "min_solidity": 0.2 } } }
//! ```
use crate::boundary::BoundaryParams;
use crate::centerline::CenterlineParams;
use crate::classifier::ClassifierParams;
use crate::error::{TrackError, TrackResult};
use crate::mask_refine::RefineParams;
use crate::resample::ResampleParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TARGET_POINTS: usize = 1800;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub classifier: ClassifierParams,
    pub refine: RefineParams,
    pub boundary: BoundaryParams,
    pub resample: ResampleParams,
    pub centerline: CenterlineParams,
    /// Point count of each persisted boundary.
    pub target_points: usize,
    pub extract_centerline: bool,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierParams::default(),
            refine: RefineParams::default(),
            boundary: BoundaryParams::default(),
            resample: ResampleParams::default(),
            centerline: CenterlineParams::default(),
            target_points: DEFAULT_TARGET_POINTS,
            extract_centerline: false,
        }
    }
}

pub fn load_config(path: &Path) -> TrackResult<TrackConfig> {
    let data = fs::read_to_string(path).map_err(|e| TrackError::Config {
        path: path.to_path_buf(),
        reason: format!("failed to read: {e}"),
    })?;
    serde_json::from_str(&data).map_err(|e| TrackError::Config {
        path: path.to_path_buf(),
        reason: format!("failed to parse: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: TrackConfig = serde_json::from_str(
            r#"{ "target_points": 900, "boundary": { "min_half_width": 4.0 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.target_points, 900);
        assert_eq!(cfg.boundary.min_half_width, 4.0);
        assert_eq!(cfg.boundary.max_half_width, 12.0);
        assert_eq!(cfg.centerline.max_components, 1);
        assert!(!cfg.extract_centerline);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_config(Path::new("no/such/config.json")).unwrap_err();
        assert!(matches!(err, TrackError::Config { .. }));
    }
}
