//! Deterministic k-means colour clustering.
//!
//! Seeds are the pixels at evenly spaced luminance quantiles, so repeated
//! runs on the same image give the same clusters. Assignment runs in
//! parallel; ties go to the lowest cluster index.
use crate::image::color::{luma, rgb_to_hsv};
use crate::image::{ColorImage, Mask};
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansParams {
    pub clusters: usize,
    pub max_iterations: usize,
    /// Stop once no centre moves further than this (RGB units).
    pub epsilon: f32,
    /// Clusters whose HSV values all lie within this spread mean "no contrast".
    pub min_value_spread: f32,
    /// Track-like clusters are darker than `mean - std_factor * std`.
    pub std_factor: f32,
    pub max_saturation: f32,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            clusters: 4,
            max_iterations: 30,
            epsilon: 1.0,
            min_value_spread: 10.0,
            std_factor: 0.3,
            max_saturation: 100.0,
        }
    }
}

/// Converged clustering of an image.
#[derive(Clone, Debug)]
pub struct Clustering {
    pub centers: Vec<Vector3<f32>>,
    pub sizes: Vec<usize>,
    pub labels: Vec<u32>,
    pub iterations: usize,
}

fn nearest(centers: &[Vector3<f32>], p: &Vector3<f32>) -> u32 {
    let mut best = (f32::INFINITY, 0u32);
    for (i, c) in centers.iter().enumerate() {
        let d = (c - p).norm_squared();
        if d < best.0 {
            best = (d, i as u32);
        }
    }
    best.1
}

pub fn cluster(image: &ColorImage, params: &KMeansParams) -> Clustering {
    let pixels: Vec<Vector3<f32>> = image
        .pixels()
        .map(|[r, g, b]| Vector3::new(r as f32, g as f32, b as f32))
        .collect();
    let k = params.clusters.max(1);
    if pixels.is_empty() {
        return Clustering {
            centers: Vec::new(),
            sizes: Vec::new(),
            labels: Vec::new(),
            iterations: 0,
        };
    }

    let mut order: Vec<(u8, usize)> = image.pixels().map(luma).zip(0..).collect();
    order.sort_unstable();
    let mut centers: Vec<Vector3<f32>> = (0..k)
        .map(|i| {
            let rank = ((i as f32 + 0.5) / k as f32 * order.len() as f32) as usize;
            pixels[order[rank.min(order.len() - 1)].1]
        })
        .collect();

    let mut labels = vec![0u32; pixels.len()];
    let mut sizes = vec![0usize; k];
    let mut iterations = 0;
    while iterations < params.max_iterations.max(1) {
        iterations += 1;
        labels = pixels.par_iter().map(|p| nearest(&centers, p)).collect();

        let mut sums = vec![Vector3::<f64>::zeros(); k];
        sizes = vec![0usize; k];
        for (p, &l) in pixels.iter().zip(&labels) {
            sums[l as usize] += p.cast::<f64>();
            sizes[l as usize] += 1;
        }
        let mut shift = 0.0f32;
        for i in 0..k {
            if sizes[i] == 0 {
                continue;
            }
            let updated = (sums[i] / sizes[i] as f64).cast::<f32>();
            shift = shift.max((updated - centers[i]).norm());
            centers[i] = updated;
        }
        if shift <= params.epsilon {
            break;
        }
    }

    Clustering {
        centers,
        sizes,
        labels,
        iterations,
    }
}

/// Pixels of the dark, low-saturation clusters.
pub fn kmeans_mask(image: &ColorImage, params: &KMeansParams) -> Mask {
    let (w, h) = (image.width(), image.height());
    let clustering = cluster(image, params);

    // (cluster index, hsv value, saturation) of the non-empty clusters
    let described: Vec<(usize, f32, f32)> = clustering
        .centers
        .iter()
        .zip(&clustering.sizes)
        .enumerate()
        .filter(|(_, (_, size))| **size > 0)
        .map(|(i, (c, _))| {
            let rgb = [c.x, c.y, c.z].map(|v| v.round().clamp(0.0, 255.0) as u8);
            let [_, s, v] = rgb_to_hsv(rgb);
            (i, v as f32, s as f32)
        })
        .collect();
    if described.is_empty() {
        return Mask::new(w, h);
    }

    let values: Vec<f32> = described.iter().map(|d| d.1).collect();
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    if max - min < params.min_value_spread {
        return Mask::new(w, h);
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32).sqrt();
    let cutoff = mean - params.std_factor * std;

    let mut track: Vec<usize> = described
        .iter()
        .filter(|(_, v, s)| *v < cutoff && *s < params.max_saturation)
        .map(|d| d.0)
        .collect();
    if track.is_empty() {
        let mut by_value = described.clone();
        by_value.sort_by(|a, b| a.1.total_cmp(&b.1));
        let take = (params.clusters / 2).max(1);
        track = by_value.iter().take(take).map(|d| d.0).collect();
    }

    let mut is_track = vec![false; clustering.centers.len()];
    for i in track {
        is_track[i] = true;
    }
    Mask::from_fn(w, h, |x, y| is_track[clustering.labels[y * w + x] as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone() -> ColorImage {
        let mut img = ColorImage::filled(20, 10, [250, 250, 250]);
        for y in 0..10 {
            for x in 0..6 {
                img.put_pixel(x, y, [40, 40, 40]);
            }
        }
        img
    }

    #[test]
    fn dark_cluster_is_track() {
        let mask = kmeans_mask(&two_tone(), &KMeansParams::default());
        assert_eq!(mask.count(), 60);
        assert!(mask.get(0, 0));
        assert!(!mask.get(19, 9));
    }

    #[test]
    fn clustering_is_deterministic() {
        let a = cluster(&two_tone(), &KMeansParams::default());
        let b = cluster(&two_tone(), &KMeansParams::default());
        assert_eq!(a.labels, b.labels);
        assert!(a.iterations <= 30);
    }

    #[test]
    fn uniform_image_is_empty() {
        let img = ColorImage::filled(8, 8, [255, 255, 255]);
        assert!(kmeans_mask(&img, &KMeansParams::default()).is_empty());
    }
}
