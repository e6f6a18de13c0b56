mod common;

use common::synthetic_image::scratch_dir;
use track_extract::artifact::binary;
use track_extract::artifact::{
    read_centerline_file, read_edge_file, write_centerline_file, write_edge_file, EdgeArtifact,
};
use track_extract::{Point, TrackError};

fn spiral(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f32 * 0.37;
            Point::new(100.0 + t.cos() * (5.0 + t), 80.5 - t.sin() * (3.25 + t))
        })
        .collect()
}

fn assert_close(a: &[Point], b: &[Point]) {
    assert_eq!(a.len(), b.len());
    for (p, q) in a.iter().zip(b) {
        assert!((p.x - q.x).abs() <= 1e-5 && (p.y - q.y).abs() <= 1e-5, "{p:?} vs {q:?}");
    }
}

#[test]
fn edge_file_round_trip() {
    let dir = scratch_dir("edge_round_trip");
    let path = dir.join("t_edge_coords.bin");
    let edges = EdgeArtifact {
        outer_boundary: spiral(1800),
        inner_boundary: spiral(1800).into_iter().rev().collect(),
    };
    write_edge_file(&path, &edges).unwrap();
    let back = read_edge_file(&path).unwrap();
    assert_close(&back.outer_boundary, &edges.outer_boundary);
    assert_close(&back.inner_boundary, &edges.inner_boundary);

    let len = std::fs::metadata(&path).unwrap().len();
    assert_eq!(len, 2 * (4 + 1800 * 8));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn empty_sequences_round_trip() {
    let dir = scratch_dir("empty_round_trip");
    let edge_path = dir.join("e_edge_coords.bin");
    write_edge_file(&edge_path, &EdgeArtifact::default()).unwrap();
    let back = read_edge_file(&edge_path).unwrap();
    assert!(back.outer_boundary.is_empty() && back.inner_boundary.is_empty());

    let center_path = dir.join("e_centerline.bin");
    write_centerline_file(&center_path, &[]).unwrap();
    assert!(read_centerline_file(&center_path).unwrap().is_empty());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn truncated_file_is_rejected() {
    let dir = scratch_dir("truncated");
    let path = dir.join("c_centerline.bin");
    let points = spiral(10);
    let bytes = binary::encode(&[points.as_slice()]).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
    let err = read_centerline_file(&path).unwrap_err();
    assert!(matches!(err, TrackError::InvalidArtifact(_)), "{err}");

    // an edge file needs two sequences
    let one = dir.join("one_edge_coords.bin");
    let four = spiral(4);
    std::fs::write(&one, binary::encode(&[four.as_slice()]).unwrap()).unwrap();
    assert!(read_edge_file(&one).is_err());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn corrupt_count_header_is_an_error() {
    let dir = scratch_dir("corrupt_header");
    let path = dir.join("bad_centerline.bin");
    // announces u32::MAX points, carries half of one
    std::fs::write(&path, [0xff, 0xff, 0xff, 0xff, 1, 2, 3, 4]).unwrap();
    let err = read_centerline_file(&path).unwrap_err();
    assert!(matches!(err, TrackError::InvalidArtifact(_)), "{err}");
    let _ = std::fs::remove_dir_all(dir);
}
