//! Polygon metrics for candidate track loops.
use crate::types::{Contour, Point};
use imageproc::geometry;
use imageproc::point::Point as PixelPoint;
use nalgebra::Vector2;
use serde::Serialize;

/// Oriented rectangle of minimum area enclosing a point set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinAreaRect {
    pub center: Point,
    /// Side length along `angle`.
    pub width: f32,
    pub height: f32,
    /// Orientation of the `width` side in radians.
    pub angle: f32,
}

impl MinAreaRect {
    pub fn long_side(&self) -> f32 {
        self.width.max(self.height)
    }

    pub fn short_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Long over short side; infinite for degenerate (zero-width) rectangles.
    pub fn aspect_ratio(&self) -> f32 {
        let short = self.short_side();
        if short <= f32::EPSILON {
            f32::INFINITY
        } else {
            self.long_side() / short
        }
    }
}

/// Measurements of one traced loop.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeMetrics {
    /// Shoelace area of the border polygon.
    pub enclosed_area: f32,
    pub perimeter: f32,
    pub aspect_ratio: f32,
    pub short_side: f32,
    /// Pixels of the component itself (excludes holes).
    pub region_area: f32,
    pub hull_area: f32,
    /// `region_area / hull_area`.
    pub solidity: f32,
}

impl ShapeMetrics {
    pub fn measure(contour: &Contour, region_pixels: usize) -> Self {
        let hull = convex_hull(&contour.points);
        let hull_area = polygon_area(&hull);
        let rect = min_area_rect(&hull);
        let region_area = region_pixels as f32;
        Self {
            enclosed_area: contour.area(),
            perimeter: contour.perimeter(),
            aspect_ratio: rect.map_or(f32::INFINITY, |r| r.aspect_ratio()),
            short_side: rect.map_or(0.0, |r| r.short_side()),
            region_area,
            hull_area,
            solidity: if hull_area > 0.0 {
                region_area / hull_area
            } else {
                0.0
            },
        }
    }
}

/// Unsigned shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point]) -> f32 {
    Contour::new(points.to_vec()).area()
}

fn to_pixel_points(points: &[Point]) -> Vec<PixelPoint<i32>> {
    points
        .iter()
        .filter(|p| p.is_finite())
        .map(|p| PixelPoint::new(p.x.round() as i32, p.y.round() as i32))
        .collect()
}

fn from_pixel_point(p: PixelPoint<i32>) -> Point {
    Point::new(p.x as f32, p.y as f32)
}

/// Convex hull of the points rounded to the pixel grid.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let pixels = to_pixel_points(points);
    if pixels.is_empty() {
        return Vec::new();
    }
    geometry::convex_hull(pixels.as_slice())
        .into_iter()
        .map(from_pixel_point)
        .collect()
}

/// Minimum-area enclosing rectangle of the points rounded to the pixel grid.
pub fn min_area_rect(points: &[Point]) -> Option<MinAreaRect> {
    let pixels = to_pixel_points(points);
    if pixels.is_empty() {
        return None;
    }
    let corners = geometry::min_area_rect(&pixels).map(|c| from_pixel_point(c).vector());
    let side_a = corners[1] - corners[0];
    let side_b = corners[2] - corners[1];
    let center = corners.iter().fold(Vector2::zeros(), |acc, c| acc + c) / 4.0;
    Some(MinAreaRect {
        center: center.into(),
        width: side_a.norm(),
        height: side_b.norm(),
        angle: side_a.y.atan2(side_a.x),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_of_square_with_interior_points() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(2.0, 0.0),
        ];
        let hull = convex_hull(&pts);
        assert!(!hull.contains(&Point::new(2.0, 2.0)));
        assert!((polygon_area(&hull) - 16.0).abs() < 1e-5);
    }

    #[test]
    fn rotated_rectangle_is_recovered() {
        // 50 x 10 rectangle along the (3, 4) direction
        let pts = vec![
            Point::new(10.0, 10.0),
            Point::new(40.0, 50.0),
            Point::new(32.0, 56.0),
            Point::new(2.0, 16.0),
            Point::new(21.0, 33.0),
        ];
        let rect = min_area_rect(&convex_hull(&pts)).unwrap();
        assert!((rect.long_side() - 50.0).abs() < 1.0, "{rect:?}");
        assert!((rect.short_side() - 10.0).abs() < 1.0, "{rect:?}");
        assert!((rect.aspect_ratio() - 5.0).abs() < 0.6);
        assert!((rect.center.x - 21.0).abs() < 1.0 && (rect.center.y - 33.0).abs() < 1.0);
    }

    #[test]
    fn empty_input_has_no_rectangle() {
        assert!(min_area_rect(&[]).is_none());
        assert!(convex_hull(&[]).is_empty());
    }

    #[test]
    fn ring_solidity_is_below_one() {
        let outer = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let metrics = ShapeMetrics::measure(&outer, 36);
        assert!((metrics.hull_area - 100.0).abs() < 1e-4);
        assert!((metrics.solidity - 0.36).abs() < 1e-4);
        assert!((metrics.aspect_ratio - 1.0).abs() < 1e-4);
    }
}
