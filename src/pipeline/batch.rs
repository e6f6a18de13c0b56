//! Directory batch driver.
//!
//! Images are processed one after another. A failing image is logged and
//! recorded; it never stops the batch.
use super::debug::{DebugSink, NullSink, PngSink};
use super::TrackProcessor;
use crate::artifact::{ArtifactWriter, EdgeArtifact, ProcessingSummary};
use crate::error::{TrackError, TrackResult};
use crate::image::io::{load_color_image, write_json_file};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub summaries: Vec<ProcessingSummary>,
    /// Images that could not be processed at all.
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.summaries
            .iter()
            .filter(|s| s.processing_successful)
            .count()
    }
}

/// Process one image and write its artifacts under `<output_root>/<stem>/`.
///
/// Extraction failures end up in the summary's `skipped` list with
/// `processing_successful` reflecting whether the edge file was written.
/// A load failure is returned directly. A failed edge or centerline write is
/// recorded in the summary, the summary is still written, and then the first
/// write error is returned.
pub fn process_image(
    processor: &TrackProcessor,
    path: &Path,
    output_root: &Path,
    debug: bool,
) -> TrackResult<ProcessingSummary> {
    let image = load_color_image(path)?;
    let writer = ArtifactWriter::for_image(output_root, path);
    let mut summary = ProcessingSummary::new(path.to_path_buf(), writer.output_dir().to_path_buf());
    let mut write_error: Option<TrackError> = None;

    let sink: Box<dyn DebugSink> = if debug {
        Box::new(PngSink::new(writer.output_dir().join("debug"), writer.stem()))
    } else {
        Box::new(NullSink)
    };

    match processor.process(&image, sink.as_ref()) {
        Ok(outcome) => {
            match outcome.boundaries {
                Ok(b) => {
                    let edges = EdgeArtifact {
                        outer_boundary: b.outer,
                        inner_boundary: b.inner,
                    };
                    match writer.write_edges(&edges) {
                        Ok(p) => {
                            summary.processed_files.push(p);
                            summary.outer_boundary_points = edges.outer_boundary.len();
                            summary.inner_boundary_points = edges.inner_boundary.len();
                            summary.processing_successful = true;
                            let size = (image.width() as u32, image.height() as u32);
                            match writer.write_preview(&edges, size) {
                                Ok(p) => summary.processed_files.push(p),
                                Err(err) => summary.skip("edge_visualization", err),
                            }
                        }
                        Err(err) => {
                            summary.skip("edge_coords", &err);
                            write_error.get_or_insert(err);
                        }
                    }
                }
                Err(err) => summary.skip("edge_coords", err),
            }
            match outcome.centerline {
                Some(Ok(centerline)) => match writer.write_centerline(&centerline.points) {
                    Ok(p) => {
                        summary.processed_files.push(p);
                        summary.centerline_extracted = true;
                        summary.centerline_points = centerline.points.len();
                    }
                    Err(err) => {
                        summary.skip("centerline", &err);
                        write_error.get_or_insert(err);
                    }
                },
                Some(Err(err)) => summary.skip("centerline", err),
                None => {}
            }
            if debug {
                let trace_path = writer.path("trace.json");
                if let Err(err) = write_json_file(&trace_path, &outcome.trace) {
                    warn!("failed to write trace: {err}");
                }
            }
        }
        Err(err) => {
            summary.skip("edge_coords", &err);
            if processor.config().extract_centerline {
                summary.skip("centerline", &err);
            }
        }
    }

    let summary_path = writer.summary_path();
    summary.processed_files.push(summary_path);
    writer.write_summary(&summary)?;
    match write_error {
        Some(err) => Err(err),
        None => Ok(summary),
    }
}

/// Process every supported image in `input_dir`, in file-name order.
pub fn run_batch(
    processor: &TrackProcessor,
    input_dir: &Path,
    output_root: &Path,
    debug: bool,
) -> TrackResult<BatchReport> {
    let entries = fs::read_dir(input_dir).map_err(|e| TrackError::io(input_dir, e))?;
    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_supported_image(p))
        .collect();
    images.sort();
    info!("found {} images in {}", images.len(), input_dir.display());

    let mut report = BatchReport::default();
    for (idx, path) in images.iter().enumerate() {
        info!("[{}/{}] {}", idx + 1, images.len(), path.display());
        match process_image(processor, path, output_root, debug) {
            Ok(summary) => {
                if !summary.processing_successful {
                    warn!("{}: no boundaries extracted", path.display());
                }
                report.summaries.push(summary);
            }
            Err(err) => {
                warn!("{}: {err}", path.display());
                report.failures.push((path.clone(), err.to_string()));
            }
        }
    }
    info!(
        "batch done: {} of {} images produced boundaries",
        report.succeeded(),
        images.len()
    );
    Ok(report)
}
