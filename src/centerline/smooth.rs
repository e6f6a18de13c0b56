//! Natural cubic spline smoothing of an ordered polyline.
use crate::types::Point;

/// Fit one natural cubic spline per coordinate over the point index and
/// sample it at `samples` evenly spaced parameters on `[0, n - 1]`.
pub fn spline_resample(points: &[Point], samples: usize) -> Vec<Point> {
    let n = points.len();
    if n < 3 || samples == 0 {
        return points.to_vec();
    }
    let xs: Vec<f32> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f32> = points.iter().map(|p| p.y).collect();
    let mx = second_derivatives(&xs);
    let my = second_derivatives(&ys);
    let last = (n - 1) as f32;
    (0..samples)
        .map(|j| {
            let t = if samples == 1 {
                0.0
            } else {
                j as f32 * last / (samples - 1) as f32
            };
            Point::new(evaluate(&xs, &mx, t), evaluate(&ys, &my, t))
        })
        .collect()
}

/// Second derivatives of the natural spline through `y` at unit spacing
/// (Thomas algorithm on the tridiagonal system, zero at both ends).
fn second_derivatives(y: &[f32]) -> Vec<f32> {
    let n = y.len();
    let mut m = vec![0.0f32; n];
    if n < 3 {
        return m;
    }
    let inner = n - 2;
    let mut c_prime = vec![0.0f32; inner];
    let mut d_prime = vec![0.0f32; inner];
    for i in 0..inner {
        let k = i + 1;
        let rhs = 6.0 * (y[k + 1] - 2.0 * y[k] + y[k - 1]);
        if i == 0 {
            c_prime[0] = 1.0 / 4.0;
            d_prime[0] = rhs / 4.0;
        } else {
            let denom = 4.0 - c_prime[i - 1];
            c_prime[i] = 1.0 / denom;
            d_prime[i] = (rhs - d_prime[i - 1]) / denom;
        }
    }
    for i in (0..inner).rev() {
        let next = if i + 1 < inner { m[i + 2] } else { 0.0 };
        m[i + 1] = d_prime[i] - c_prime[i] * next;
    }
    m
}

fn evaluate(y: &[f32], m: &[f32], t: f32) -> f32 {
    let n = y.len();
    let i = (t.floor() as usize).min(n - 2);
    let u = t - i as f32;
    let v = 1.0 - u;
    v * y[i] + u * y[i + 1] + ((v * v * v - v) * m[i] + (u * u * u - u) * m[i + 1]) / 6.0
}
