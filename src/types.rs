use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Sub-pixel image coordinate, x to the right and y down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn vector(self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (self.vector() - other.vector()).norm()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vector2<f32>> for Point {
    fn from(v: Vector2<f32>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<(usize, usize)> for Point {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x as f32, y as f32)
    }
}

/// Closed polyline; the last point connects back to the first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area; positive for clockwise order on screen (y down).
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0f64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
        }
        (acc * 0.5) as f32
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// Closed perimeter length.
    pub fn perimeter(&self) -> f32 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| self.points[i].distance(self.points[(i + 1) % n]))
            .sum()
    }

    /// Reverse in place when the winding is counter-clockwise on screen.
    pub fn normalize_winding(&mut self) {
        if self.signed_area() < 0.0 {
            self.points.reverse();
        }
    }
}

/// Ordered centerline polyline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Centerline {
    pub points: Vec<Point>,
    /// End-to-start gap within the configured closing distance.
    pub closed: bool,
}

/// Strategy that produced a boundary pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundaryMethod {
    Morphological,
    EdgeFallback,
}

/// Raw outer/inner boundaries; `outer.area() > inner.area()`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBoundaries {
    pub outer: Contour,
    pub inner: Contour,
    pub method: BoundaryMethod,
    pub half_width: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(clockwise: bool) -> Contour {
        let mut pts = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        if !clockwise {
            pts.reverse();
        }
        Contour::new(pts)
    }

    #[test]
    fn screen_clockwise_is_positive() {
        assert_eq!(square(true).signed_area(), 4.0);
        let mut ccw = square(false);
        assert_eq!(ccw.signed_area(), -4.0);
        ccw.normalize_winding();
        assert_eq!(ccw.signed_area(), 4.0);
        assert_eq!(ccw.perimeter(), 8.0);
    }
}
