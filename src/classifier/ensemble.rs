//! Weighted vote over candidate masks.
use super::regime::EnsembleWeights;
use crate::image::Mask;

/// Candidate masks in the order of [`EnsembleWeights`]' fields.
#[derive(Clone, Debug)]
pub struct Candidates {
    pub range: Mask,
    pub otsu: Mask,
    pub adaptive: Mask,
    pub texture: Mask,
    pub kmeans: Mask,
}

impl Candidates {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Mask)> {
        [
            ("range", &self.range),
            ("otsu", &self.otsu),
            ("adaptive", &self.adaptive),
            ("texture", &self.texture),
            ("kmeans", &self.kmeans),
        ]
        .into_iter()
    }
}

/// Pixel is set when the normalized weighted sum strictly exceeds `cutoff`.
pub fn vote(candidates: &Candidates, weights: &EnsembleWeights, cutoff: f32) -> Mask {
    let w = weights.normalized();
    let pairs = [
        (&candidates.range, w.range),
        (&candidates.otsu, w.otsu),
        (&candidates.adaptive, w.adaptive),
        (&candidates.texture, w.texture),
        (&candidates.kmeans, w.kmeans),
    ];
    let (width, height) = (candidates.range.width(), candidates.range.height());
    Mask::from_fn(width, height, |x, y| {
        let idx = y * width + x;
        let score: f32 = pairs
            .iter()
            .filter(|(m, _)| m.is_set_idx(idx))
            .map(|(_, weight)| weight)
            .sum();
        score > cutoff
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_strict() {
        let on = Mask::from_fn(2, 1, |_, _| true);
        let off = Mask::new(2, 1);
        let candidates = Candidates {
            range: on.clone(),
            otsu: on.clone(),
            adaptive: off.clone(),
            texture: off.clone(),
            kmeans: off,
        };
        let weights = EnsembleWeights {
            range: 1.0,
            otsu: 1.0,
            adaptive: 1.0,
            texture: 1.0,
            kmeans: 1.0,
        };
        assert!(vote(&candidates, &weights, 0.4).is_empty());
        assert_eq!(vote(&candidates, &weights, 0.39).count(), 2);
    }
}
