//! Curvature-weighted arc-length resampling of closed contours.
//!
//! Points are redistributed so that the sampling density along the contour
//! is `base_density + curvature_gain * normalized_turn_angle`: sharp corners
//! receive more samples than straights while the output always has exactly
//! the requested number of points.
use crate::filters::{smooth_cyclic, GaussianKernel};
use crate::types::{Contour, Point};
use log::warn;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleParams {
    /// Neighbour offset used for the turn angle.
    pub curvature_window: usize,
    /// Sigma of the wrap-around Gaussian applied to turn angles.
    pub curvature_sigma: f32,
    pub base_density: f32,
    pub curvature_gain: f32,
    /// Base parameter grid is `oversample * n` samples.
    pub oversample: usize,
    pub min_points_floor: usize,
    /// Minimum input size as a fraction of the target count.
    pub min_point_fraction: f32,
}

impl Default for ResampleParams {
    fn default() -> Self {
        Self {
            curvature_window: 5,
            curvature_sigma: 2.0,
            base_density: 0.2,
            curvature_gain: 0.8,
            oversample: 2,
            min_points_floor: 50,
            min_point_fraction: 1.0 / 36.0,
        }
    }
}

impl ResampleParams {
    /// Smallest input contour accepted for a target of `n` points.
    pub fn required_points(&self, n: usize) -> usize {
        self.min_points_floor
            .max((self.min_point_fraction * n as f32).ceil() as usize)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResampleMode {
    Adaptive,
    /// Adaptive sampling failed numerically, plain arc-length spacing used.
    Uniform,
    /// Input too short; returned unchanged.
    Passthrough,
}

#[derive(Clone, Debug)]
pub struct ResampleOutcome {
    pub points: Vec<Point>,
    pub mode: ResampleMode,
}

/// Resample `contour` to exactly `n` points (unless passed through).
pub fn resample(contour: &Contour, n: usize, params: &ResampleParams) -> ResampleOutcome {
    let required = params.required_points(n);
    if contour.len() < required {
        warn!(
            "contour has {} points (< {required}); returned unchanged",
            contour.len()
        );
        return ResampleOutcome {
            points: contour.points.clone(),
            mode: ResampleMode::Passthrough,
        };
    }

    match adaptive(contour, n, params) {
        Some(points) => ResampleOutcome {
            points,
            mode: ResampleMode::Adaptive,
        },
        None => {
            warn!("adaptive resampling degenerate; using uniform arc-length spacing");
            ResampleOutcome {
                points: uniform_resample(contour, n),
                mode: ResampleMode::Uniform,
            }
        }
    }
}

/// Evenly spaced points along the closed contour, starting at its first point.
pub fn uniform_resample(contour: &Contour, n: usize) -> Vec<Point> {
    let closed = close(&contour.points);
    if closed.is_empty() || n == 0 {
        return Vec::new();
    }
    let (arc, total) = arc_lengths(&closed);
    (0..n)
        .map(|k| {
            let s = if total > 0.0 { k as f32 / n as f32 } else { 0.0 };
            interp_point(&arc, &closed, s)
        })
        .collect()
}

/// `π − angle(back, forward)` at each point, with cyclic neighbours
/// `window` steps away. Straight runs give 0, hairpins approach π.
pub fn turn_angles(points: &[Point], window: usize) -> Vec<f32> {
    let n = points.len();
    if n < 3 {
        return vec![0.0; n];
    }
    let w = window.max(1) % n;
    let w = if w == 0 { 1 } else { w };
    (0..n)
        .map(|i| {
            let p = points[i].vector();
            let back = points[(i + n - w) % n].vector() - p;
            let fwd = points[(i + w) % n].vector() - p;
            let denom = back.norm() * fwd.norm();
            if denom <= f32::EPSILON {
                return 0.0;
            }
            let cos = (back.dot(&fwd) / denom).clamp(-1.0, 1.0);
            PI - cos.acos()
        })
        .collect()
}

fn adaptive(contour: &Contour, n: usize, params: &ResampleParams) -> Option<Vec<Point>> {
    if n == 0 {
        return Some(Vec::new());
    }
    let unique = open(&contour.points);
    let closed = close(&unique);
    let (arc, total) = arc_lengths(&closed);
    if total <= f32::EPSILON || !total.is_finite() {
        return None;
    }

    let angles = turn_angles(&unique, params.curvature_window);
    let mut curvature = smooth_cyclic(&GaussianKernel::truncated(params.curvature_sigma), &angles);
    curvature.push(curvature[0]);

    let samples = (params.oversample.max(1) * n).max(2);
    let base: Vec<f32> = (0..samples)
        .map(|j| j as f32 / (samples - 1) as f32)
        .collect();
    let sampled: Vec<f32> = base.iter().map(|&t| interp(&arc, &curvature, t)).collect();

    let lo = sampled.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = sampled.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = hi - lo;
    let density: Vec<f32> = sampled
        .iter()
        .map(|&c| {
            if range > 1e-6 {
                params.base_density + params.curvature_gain * (c - lo) / range
            } else {
                1.0
            }
        })
        .collect();

    let mut cumulative = Vec::with_capacity(samples);
    let mut acc = 0.0f32;
    for d in &density {
        acc += d;
        cumulative.push(acc);
    }
    let (first, last) = (cumulative[0], cumulative[samples - 1]);
    if last - first <= f32::EPSILON {
        return None;
    }
    for c in &mut cumulative {
        *c = (*c - first) / (last - first);
    }

    let points: Vec<Point> = (0..n)
        .map(|k| {
            let q = k as f32 / n as f32;
            let t = interp(&cumulative, &base, q);
            interp_point(&arc, &closed, t)
        })
        .collect();
    points.iter().all(|p| p.is_finite()).then_some(points)
}

/// Drop a repeated closing point.
fn open(points: &[Point]) -> Vec<Point> {
    let mut out = points.to_vec();
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

/// Append the first point unless already closed.
fn close(points: &[Point]) -> Vec<Point> {
    let mut out = points.to_vec();
    if let (Some(&first), Some(&last)) = (out.first(), out.last()) {
        if out.len() > 1 && first != last {
            out.push(first);
        }
    }
    out
}

/// Normalized cumulative arc length and total length.
fn arc_lengths(points: &[Point]) -> (Vec<f32>, f32) {
    let mut arc = Vec::with_capacity(points.len());
    let mut acc = 0.0f32;
    arc.push(0.0);
    for pair in points.windows(2) {
        acc += pair[0].distance(pair[1]);
        arc.push(acc);
    }
    if acc > 0.0 {
        for a in &mut arc {
            *a /= acc;
        }
    }
    (arc, acc)
}

/// Piecewise-linear interpolation on increasing `xs`, clamped at the ends.
fn interp(xs: &[f32], ys: &[f32], x: f32) -> f32 {
    let i = segment_index(xs, x);
    if i + 1 >= xs.len() {
        return ys[xs.len() - 1];
    }
    let span = xs[i + 1] - xs[i];
    if span <= 0.0 {
        return ys[i];
    }
    let t = ((x - xs[i]) / span).clamp(0.0, 1.0);
    ys[i] + t * (ys[i + 1] - ys[i])
}

fn interp_point(xs: &[f32], pts: &[Point], x: f32) -> Point {
    let i = segment_index(xs, x);
    if i + 1 >= xs.len() {
        return pts[xs.len() - 1];
    }
    let span = xs[i + 1] - xs[i];
    if span <= 0.0 {
        return pts[i];
    }
    let t = ((x - xs[i]) / span).clamp(0.0, 1.0);
    Point::from(pts[i].vector().lerp(&pts[i + 1].vector(), t))
}

/// Last index `i` with `xs[i] <= x` (0 when `x` precedes all samples).
fn segment_index(xs: &[f32], x: f32) -> usize {
    xs.partition_point(|&v| v <= x).saturating_sub(1)
}
