//! Outer borders of mask components.
//!
//! Border following is `imageproc`'s Suzuki-Abe tracer; hole borders are
//! dropped and every returned loop runs clockwise on screen (positive
//! shoelace area with y down).
use crate::image::Mask;
use crate::morphology::{label_components, Components};
use crate::types::{Contour, Point};
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};

/// Border of one connected component.
#[derive(Clone, Debug)]
pub struct TracedLoop {
    pub contour: Contour,
    /// Component label in the labelling the loop was traced from.
    pub label: u32,
    /// Number of pixels in the component.
    pub pixel_area: usize,
}

/// Trace the outer border of every 8-connected component, in label order.
pub fn trace_outer_borders(mask: &Mask) -> Vec<TracedLoop> {
    trace_components(&label_components(mask))
}

/// Trace every component of an existing labelling.
pub fn trace_components(comps: &Components) -> Vec<TracedLoop> {
    if comps.labels.is_empty() {
        return Vec::new();
    }
    let width = comps.width;
    let foreground = GrayImage::from_fn(width as u32, comps.height as u32, |x, y| {
        Luma([if comps.labels[y as usize * width + x as usize] != 0 { 255 } else { 0 }])
    });

    let mut loops: Vec<TracedLoop> = find_contours::<i32>(&foreground)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .filter_map(|c| {
            let first = c.points.first()?;
            let label = comps.labels[first.y as usize * width + first.x as usize];
            if label == 0 {
                return None;
            }
            let mut contour = Contour::new(
                c.points
                    .iter()
                    .map(|p| Point::new(p.x as f32, p.y as f32))
                    .collect(),
            );
            contour.normalize_winding();
            Some(TracedLoop {
                contour,
                label,
                pixel_area: comps.sizes[label as usize],
            })
        })
        .collect();
    loops.sort_by_key(|l| l.label);
    loops
}

/// Outer border of the largest component, if any.
pub fn trace_outer_border(mask: &Mask) -> Option<TracedLoop> {
    trace_outer_borders(mask)
        .into_iter()
        .fold(None, |best: Option<TracedLoop>, l| match best {
            Some(b) if b.pixel_area >= l.pixel_area => Some(b),
            _ => Some(l),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_border_is_clockwise() {
        let mask = Mask::from_fn(8, 8, |x, y| (2..=5).contains(&x) && (2..=5).contains(&y));
        let loops = trace_outer_borders(&mask);
        assert_eq!(loops.len(), 1);
        let c = &loops[0].contour;
        assert_eq!(c.len(), 12);
        assert!(c.points.contains(&Point::new(2.0, 2.0)));
        assert_eq!(c.signed_area(), 9.0);
        assert_eq!(loops[0].pixel_area, 16);
    }

    #[test]
    fn single_pixel_and_line() {
        let dot = Mask::from_fn(5, 5, |x, y| x == 2 && y == 2);
        let loops = trace_outer_borders(&dot);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].contour.points[0], Point::new(2.0, 2.0));

        let line = Mask::from_fn(6, 3, |x, y| y == 1 && (1..=4).contains(&x));
        let traced = &trace_outer_borders(&line)[0];
        assert_eq!(traced.pixel_area, 4);
        assert!(traced.contour.points.contains(&Point::new(1.0, 1.0)));
        assert!(traced.contour.points.contains(&Point::new(4.0, 1.0)));
    }

    #[test]
    fn ring_traces_only_outer_border() {
        let ring = Mask::from_fn(10, 10, |x, y| {
            let outer = (1..=8).contains(&x) && (1..=8).contains(&y);
            let hole = (3..=6).contains(&x) && (3..=6).contains(&y);
            outer && !hole
        });
        let loops = trace_outer_borders(&ring);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].contour.signed_area(), 49.0);
    }

    #[test]
    fn blob_inside_a_hole_gets_its_own_loop() {
        let mask = Mask::from_fn(12, 12, |x, y| {
            let frame = (1..=10).contains(&x) && (1..=10).contains(&y);
            let hole = (3..=8).contains(&x) && (3..=8).contains(&y);
            let island = (5..=6).contains(&x) && (5..=6).contains(&y);
            (frame && !hole) || island
        });
        let loops = trace_outer_borders(&mask);
        assert_eq!(loops.len(), 2);
        let areas: Vec<usize> = loops.iter().map(|l| l.pixel_area).collect();
        assert!(areas.contains(&4));
        assert!(areas.contains(&(100 - 36)));
    }
}
