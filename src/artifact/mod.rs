//! Output artifacts: binary point files, JSON summary and edge preview.
//!
//! For an image `<stem>.<ext>` the writer produces, inside its output
//! directory:
//!
//! - `<stem>_edge_coords.bin`: outer then inner boundary sequence,
//! - `<stem>_centerline.bin`: the centerline sequence,
//! - `<stem>_summary.json`: [`ProcessingSummary`],
//! - `<stem>_edge_visualization.png`: rendered boundaries.

pub mod binary;
pub mod overlay;
pub mod summary;

pub use summary::{ProcessingSummary, SkippedArtifact};

use crate::error::{TrackError, TrackResult};
use crate::image::io::{ensure_parent_dir, image_write_error, write_json_file};
use crate::types::Point;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outer and inner boundary as persisted in an edge file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeArtifact {
    pub outer_boundary: Vec<Point>,
    pub inner_boundary: Vec<Point>,
}

pub fn write_edge_file(path: &Path, edges: &EdgeArtifact) -> TrackResult<()> {
    write_points_file(
        path,
        &[edges.outer_boundary.as_slice(), edges.inner_boundary.as_slice()],
    )
}

pub fn read_edge_file(path: &Path) -> TrackResult<EdgeArtifact> {
    let mut seqs = read_points_file(path, Some(2))?.into_iter();
    match (seqs.next(), seqs.next()) {
        (Some(outer_boundary), Some(inner_boundary)) => Ok(EdgeArtifact {
            outer_boundary,
            inner_boundary,
        }),
        _ => Err(TrackError::InvalidArtifact(format!(
            "{} does not hold two sequences",
            path.display()
        ))),
    }
}

pub fn write_centerline_file(path: &Path, points: &[Point]) -> TrackResult<()> {
    write_points_file(path, &[points])
}

pub fn read_centerline_file(path: &Path) -> TrackResult<Vec<Point>> {
    read_points_file(path, Some(1))?
        .pop()
        .ok_or_else(|| TrackError::InvalidArtifact(format!("{} is empty", path.display())))
}

fn write_points_file(path: &Path, sequences: &[&[Point]]) -> TrackResult<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| TrackError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    binary::write_sequences(&mut writer, sequences).map_err(|e| TrackError::io(path, e))?;
    writer.flush().map_err(|e| TrackError::io(path, e))
}

fn read_points_file(path: &Path, expected: Option<usize>) -> TrackResult<Vec<Vec<Point>>> {
    let bytes = fs::read(path).map_err(|e| TrackError::io(path, e))?;
    binary::decode(&bytes, expected)
        .map_err(|e| TrackError::InvalidArtifact(format!("{}: {e}", path.display())))
}

/// Output paths for one image.
#[derive(Clone, Debug)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
    stem: String,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            stem: stem.into(),
        }
    }

    /// Writer for `image` inside `<output_root>/<stem>/`.
    pub fn for_image(output_root: &Path, image: &Path) -> Self {
        let stem = image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "track".to_string());
        Self::new(output_root.join(&stem), stem)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn path(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{suffix}", self.stem))
    }

    pub fn edge_path(&self) -> PathBuf {
        self.path("edge_coords.bin")
    }

    pub fn centerline_path(&self) -> PathBuf {
        self.path("centerline.bin")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.path("summary.json")
    }

    pub fn preview_path(&self) -> PathBuf {
        self.path("edge_visualization.png")
    }

    pub fn write_edges(&self, edges: &EdgeArtifact) -> TrackResult<PathBuf> {
        let path = self.edge_path();
        write_edge_file(&path, edges)?;
        Ok(path)
    }

    pub fn write_centerline(&self, points: &[Point]) -> TrackResult<PathBuf> {
        let path = self.centerline_path();
        write_centerline_file(&path, points)?;
        Ok(path)
    }

    /// Render the preview on a canvas of the source image size.
    pub fn write_preview(&self, edges: &EdgeArtifact, size: (u32, u32)) -> TrackResult<PathBuf> {
        let path = self.preview_path();
        ensure_parent_dir(&path)?;
        overlay::render_edges(&edges.outer_boundary, &edges.inner_boundary, Some(size))
            .save(&path)
            .map_err(|e| image_write_error(&path, e))?;
        Ok(path)
    }

    pub fn write_summary(&self, summary: &ProcessingSummary) -> TrackResult<PathBuf> {
        let path = self.summary_path();
        write_json_file(&path, summary)?;
        Ok(path)
    }
}
