mod common;

use common::init_logging;
use common::synthetic_image::Ring;
use track_extract::stages::{BoundaryExtractor, MaskRefiner, RefineParams};
use track_extract::BoundaryMethod;

#[test]
fn outer_encloses_more_than_inner_on_rings() {
    init_logging();
    let rings = [
        Ring::standard(),
        Ring {
            center: (160.0, 110.0),
            outer: (140.0, 90.0),
            inner: (110.0, 60.0),
        },
        Ring {
            center: (150.0, 100.0),
            outer: (130.0, 60.0),
            inner: (100.0, 30.0),
        },
    ];
    let extractor = BoundaryExtractor::default();
    for ring in rings {
        let mask = ring.mask(320, 220);
        let found = extractor.extract(&mask).expect("ring has boundaries");
        assert!(
            found.outer.area() > found.inner.area(),
            "{ring:?}: outer {} inner {}",
            found.outer.area(),
            found.inner.area()
        );
        assert!(found.outer.signed_area() > 0.0);
        assert!(found.inner.signed_area() > 0.0);
        assert_eq!(found.method, BoundaryMethod::Morphological);
        let hw = found.half_width.expect("morphological half width");
        assert!((5.0..=12.0).contains(&hw), "half width {hw}");
    }
}

#[test]
fn refined_ring_keeps_its_boundaries() {
    init_logging();
    let mask = Ring::standard().mask(300, 200);
    let refined = MaskRefiner::new(RefineParams::default()).refine(&mask);
    assert!(refined.count() > mask.count() / 2);
    let found = BoundaryExtractor::default().extract(&refined).unwrap();
    assert!(found.outer.area() > found.inner.area());
}

#[test]
fn solid_ring_with_small_hole_uses_edge_fallback() {
    init_logging();
    // too solid for the primary shape filter
    let ring = Ring {
        center: (160.0, 110.0),
        outer: (140.0, 90.0),
        inner: (40.0, 15.0),
    };
    let found = BoundaryExtractor::default()
        .extract(&ring.mask(320, 220))
        .expect("fallback finds both loops");
    assert_eq!(found.method, BoundaryMethod::EdgeFallback);
    assert!(found.half_width.is_none());
    assert!(
        found.outer.area() > found.inner.area(),
        "outer {} inner {}",
        found.outer.area(),
        found.inner.area()
    );
}
