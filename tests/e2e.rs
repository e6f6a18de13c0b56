mod common;

use common::init_logging;
use common::synthetic_image::{scratch_dir, write_png, Ring};
use track_extract::artifact::{read_centerline_file, read_edge_file};
use track_extract::contour::ShapeMetrics;
use track_extract::image::ColorImage;
use track_extract::morphology::label_components;
use track_extract::pipeline::{process_image, NullSink, PngSink};
use track_extract::{
    extract_track_boundaries, Contour, TrackConfig, TrackError, TrackProcessor,
};

const DARK: [u8; 3] = [40, 40, 40];
const WHITE: [u8; 3] = [255, 255, 255];

fn centroid(points: &[track_extract::Point]) -> (f32, f32) {
    let n = points.len() as f32;
    let sx: f32 = points.iter().map(|p| p.x).sum();
    let sy: f32 = points.iter().map(|p| p.y).sum();
    (sx / n, sy / n)
}

#[test]
fn dark_ring_on_white_yields_nested_boundaries() {
    init_logging();
    let image = Ring::standard().image(300, 200, DARK, WHITE);
    let config = TrackConfig {
        extract_centerline: true,
        ..TrackConfig::default()
    };
    let outcome = TrackProcessor::new(config)
        .process(&image, &NullSink)
        .expect("segmentation succeeds");

    let b = outcome.boundaries.expect("boundaries found");
    assert_eq!(b.outer.len(), 1800);
    assert_eq!(b.inner.len(), 1800);

    let outer = Contour::new(b.outer.clone());
    let inner = Contour::new(b.inner.clone());
    assert!(
        outer.area() > inner.area(),
        "outer {} <= inner {}",
        outer.area(),
        inner.area()
    );
    assert!(outer.signed_area() > 0.0 && inner.signed_area() > 0.0);

    for pts in [&b.outer, &b.inner] {
        let (cx, cy) = centroid(pts);
        assert!((cx - 150.0).abs() < 10.0 && (cy - 100.0).abs() < 10.0, "centroid ({cx}, {cy})");
    }
    assert_eq!(outcome.trace.regime, Some("bright"));

    assert_eq!(label_components(&outcome.mask).count(), 1, "refined mask split");
    let metrics = ShapeMetrics::measure(&outer, outcome.mask.count());
    assert!(metrics.aspect_ratio > 1.2, "aspect {}", metrics.aspect_ratio);

    let centerline = outcome
        .centerline
        .expect("centerline requested")
        .expect("ring has a centerline");
    assert!(centerline.closed);
    assert!(centerline.points.len() > 100);
}

#[test]
fn all_white_image_is_degenerate() {
    init_logging();
    let image = ColorImage::filled(120, 80, WHITE);
    let err = TrackProcessor::default()
        .process(&image, &NullSink)
        .unwrap_err();
    assert!(matches!(err, TrackError::SegmentationDegenerate { .. }), "{err}");
}

#[test]
fn programmatic_contract_reports_success_and_failure() {
    init_logging();
    let dir = scratch_dir("contract");
    let ring = write_png(&Ring::standard().image(300, 200, DARK, WHITE), &dir, "ring.png");
    let blank = write_png(&ColorImage::filled(120, 80, WHITE), &dir, "blank.png");

    let config = TrackConfig {
        target_points: 600,
        ..TrackConfig::default()
    };
    let ok = extract_track_boundaries(&ring, &config);
    assert!(ok.success, "{:?}", ok.error);
    assert_eq!(ok.outer_boundary.len(), 600);
    assert_eq!(ok.inner_boundary.len(), 600);
    assert!(ok.error.is_none());

    let failed = extract_track_boundaries(&blank, &config);
    assert!(!failed.success);
    assert!(failed.outer_boundary.is_empty() && failed.inner_boundary.is_empty());
    assert!(failed.error.is_some());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn single_image_writes_all_artifacts() {
    init_logging();
    let dir = scratch_dir("single");
    let input = write_png(&Ring::standard().image(300, 200, DARK, WHITE), &dir, "oval.png");
    let out = dir.join("out");
    let config = TrackConfig {
        extract_centerline: true,
        target_points: 400,
        ..TrackConfig::default()
    };
    let processor = TrackProcessor::new(config);

    let summary = process_image(&processor, &input, &out, false).expect("image loads");
    assert!(summary.processing_successful);
    assert_eq!(summary.outer_boundary_points, 400);
    assert_eq!(summary.inner_boundary_points, 400);

    let stem_dir = out.join("oval");
    let edges = read_edge_file(&stem_dir.join("oval_edge_coords.bin")).unwrap();
    assert_eq!(edges.outer_boundary.len(), 400);
    assert_eq!(edges.inner_boundary.len(), 400);
    assert!(stem_dir.join("oval_edge_visualization.png").is_file());

    assert!(summary.centerline_extracted, "skipped: {:?}", summary.skipped);
    assert!(summary.skipped.is_empty());
    let centerline = read_centerline_file(&stem_dir.join("oval_centerline.bin")).unwrap();
    assert_eq!(centerline.len(), summary.centerline_points);
    let (first, last) = (centerline[0], centerline[centerline.len() - 1]);
    assert!(first.distance(last) <= 10.0, "centerline not closed: {first:?} .. {last:?}");

    let json = std::fs::read_to_string(stem_dir.join("oval_summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["processing_successful"], true);
    assert_eq!(value["outer_boundary_points"], 400);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn failed_edge_write_still_writes_summary() {
    init_logging();
    let dir = scratch_dir("blocked_write");
    let input = write_png(&Ring::standard().image(300, 200, DARK, WHITE), &dir, "oval.png");
    let out = dir.join("out");
    // a directory where the edge file should go
    std::fs::create_dir_all(out.join("oval").join("oval_edge_coords.bin")).unwrap();
    let processor = TrackProcessor::new(TrackConfig::default());

    let err = process_image(&processor, &input, &out, false).unwrap_err();
    assert!(matches!(err, TrackError::Io { .. }), "{err}");

    let json = std::fs::read_to_string(out.join("oval").join("oval_summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["processing_successful"], false);
    assert_eq!(value["skipped"][0]["artifact"], "edge_coords");

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn debug_sink_receives_centerline_overlay() {
    init_logging();
    let dir = scratch_dir("debug_centerline");
    let frame = Ring::standard().image(300, 200, DARK, WHITE);
    let processor = TrackProcessor::new(TrackConfig {
        extract_centerline: true,
        ..TrackConfig::default()
    });
    let sink = PngSink::new(&dir, "ring");
    let outcome = processor.process(&frame, &sink).unwrap();
    assert!(matches!(outcome.centerline, Some(Ok(_))));

    let overlay = image::open(sink.path_for("centerline")).unwrap().to_rgb8();
    assert_eq!(overlay.dimensions(), (300, 200));
    assert!(sink.path_for("skeleton").is_file());

    let _ = std::fs::remove_dir_all(dir);
}
