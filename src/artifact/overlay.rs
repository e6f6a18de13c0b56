//! Edge and centerline preview rendering.
use crate::types::{Centerline, Point};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

pub const OUTER_COLOR: Rgb<u8> = Rgb([0, 160, 0]);
pub const INNER_COLOR: Rgb<u8> = Rgb([220, 0, 0]);
pub const CENTERLINE_COLOR: Rgb<u8> = Rgb([0, 0, 220]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Canvas covering all points plus `margin`, with a minimum of 1×1.
pub fn canvas_size(sequences: &[&[Point]], margin: u32) -> (u32, u32) {
    let (mut max_x, mut max_y) = (0.0f32, 0.0f32);
    for p in sequences.iter().flat_map(|s| s.iter()).filter(|p| p.is_finite()) {
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    (
        (max_x.ceil() as u32).saturating_add(margin).max(1),
        (max_y.ceil() as u32).saturating_add(margin).max(1),
    )
}

/// Draw a polyline, joining the last point back to the first when `closed`.
pub fn draw_polyline(canvas: &mut RgbImage, points: &[Point], closed: bool, color: Rgb<u8>) {
    if points.len() < 2 {
        if let Some(p) = points.first() {
            if p.x >= 0.0 && p.y >= 0.0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height() {
                canvas.put_pixel(p.x as u32, p.y as u32, color);
            }
        }
        return;
    }
    for pair in points.windows(2) {
        draw_line_segment_mut(canvas, (pair[0].x, pair[0].y), (pair[1].x, pair[1].y), color);
    }
    if closed {
        let (a, b) = (points[points.len() - 1], points[0]);
        draw_line_segment_mut(canvas, (a.x, a.y), (b.x, b.y), color);
    }
}

pub fn draw_closed_polyline(canvas: &mut RgbImage, points: &[Point], color: Rgb<u8>) {
    draw_polyline(canvas, points, true, color);
}

/// Outer (green) and inner (red) boundaries on white.
pub fn render_edges(outer: &[Point], inner: &[Point], size: Option<(u32, u32)>) -> RgbImage {
    let (w, h) = size.unwrap_or_else(|| canvas_size(&[outer, inner], 10));
    let mut canvas = RgbImage::from_pixel(w, h, BACKGROUND);
    draw_closed_polyline(&mut canvas, outer, OUTER_COLOR);
    draw_closed_polyline(&mut canvas, inner, INNER_COLOR);
    canvas
}

/// Centerline (blue) on white; open centerlines are not joined end to start.
pub fn render_centerline(centerline: &Centerline, size: Option<(u32, u32)>) -> RgbImage {
    let (w, h) = size.unwrap_or_else(|| canvas_size(&[centerline.points.as_slice()], 10));
    let mut canvas = RgbImage::from_pixel(w, h, BACKGROUND);
    draw_polyline(&mut canvas, &centerline.points, centerline.closed, CENTERLINE_COLOR);
    canvas
}
