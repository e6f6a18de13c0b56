//! Per-image JSON summary.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An artifact that could not be produced, and why.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkippedArtifact {
    pub artifact: String,
    pub reason: String,
}

/// Contents of `<stem>_summary.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub original_image: PathBuf,
    pub output_directory: PathBuf,
    pub processed_files: Vec<PathBuf>,
    pub processing_successful: bool,
    pub outer_boundary_points: usize,
    pub inner_boundary_points: usize,
    pub centerline_extracted: bool,
    pub centerline_points: usize,
    pub skipped: Vec<SkippedArtifact>,
}

impl ProcessingSummary {
    pub fn new(original_image: PathBuf, output_directory: PathBuf) -> Self {
        Self {
            original_image,
            output_directory,
            ..Default::default()
        }
    }

    pub fn skip(&mut self, artifact: &str, reason: impl ToString) {
        self.skipped.push(SkippedArtifact {
            artifact: artifact.to_string(),
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_snake_case() {
        let mut summary = ProcessingSummary::new("in/track.png".into(), "out/track".into());
        summary.skip("centerline", "skeleton is empty");
        let json = serde_json::to_value(&summary).unwrap();
        for key in [
            "original_image",
            "output_directory",
            "processed_files",
            "processing_successful",
            "outer_boundary_points",
            "inner_boundary_points",
            "centerline_extracted",
            "centerline_points",
            "skipped",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["skipped"][0]["artifact"], "centerline");
    }
}
