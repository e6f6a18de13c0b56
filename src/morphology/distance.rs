//! Exact Euclidean distance transform (Felzenszwalb & Huttenlocher).
//!
//! Each set pixel receives its distance to the nearest unset pixel; unset
//! pixels are 0. Pixels outside the image do not count as background, so a
//! mask with no unset pixel yields `f32::INFINITY` everywhere.
use crate::image::{ImageF32, Mask};

const INF: f64 = f64::INFINITY;

pub fn distance_transform(mask: &Mask) -> ImageF32 {
    let (w, h) = (mask.width(), mask.height());
    let mut sq: Vec<f64> = (0..w * h)
        .map(|i| if mask.is_set_idx(i) { INF } else { 0.0 })
        .collect();

    let n = w.max(h);
    let mut f = vec![0f64; n];
    let mut d = vec![0f64; n];
    let mut v = vec![0usize; n];
    let mut z = vec![0f64; n + 1];

    for x in 0..w {
        for y in 0..h {
            f[y] = sq[y * w + x];
        }
        edt_1d(&f[..h], &mut d[..h], &mut v, &mut z);
        for y in 0..h {
            sq[y * w + x] = d[y];
        }
    }
    for y in 0..h {
        f[..w].copy_from_slice(&sq[y * w..(y + 1) * w]);
        edt_1d(&f[..w], &mut d[..w], &mut v, &mut z);
        sq[y * w..(y + 1) * w].copy_from_slice(&d[..w]);
    }

    let data = sq.into_iter().map(|s| s.sqrt() as f32).collect();
    ImageF32::from_vec(w, h, data)
}

/// Lower envelope of parabolas rooted at the finite samples `(q, f[q])`.
fn edt_1d(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let Some(first) = f.iter().position(|x| x.is_finite()) else {
        d.fill(INF);
        return;
    };
    let intersect = |q: usize, p: usize| {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
    };

    let mut k = 0usize;
    v[0] = first;
    z[0] = f64::NEG_INFINITY;
    z[1] = INF;
    for q in first + 1..f.len() {
        if !f[q].is_finite() {
            continue;
        }
        let mut s = intersect(q, v[k]);
        while s <= z[k] {
            k -= 1;
            s = intersect(q, v[k]);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = INF;
    }

    let mut k = 0usize;
    for (q, out) in d.iter_mut().enumerate() {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let dq = q as f64 - v[k] as f64;
        *out = dq * dq + f[v[k]];
    }
}
