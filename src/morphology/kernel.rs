/// Symmetric structuring element stored as pixel offsets from its centre.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    offsets: Vec<(isize, isize)>,
    radius: usize,
}

impl StructuringElement {
    /// Discrete disk: offsets with `dx² + dy² ≤ (radius + 0.5)²`.
    pub fn disk(radius: usize) -> Self {
        let r = radius as isize;
        let limit = (radius as f32 + 0.5).powi(2);
        let mut offsets = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if ((dx * dx + dy * dy) as f32) <= limit {
                    offsets.push((dx, dy));
                }
            }
        }
        Self { offsets, radius }
    }

    /// Elliptical element with the given diameter (rounded down to odd).
    pub fn ellipse(diameter: usize) -> Self {
        Self::disk(diameter.max(1).saturating_sub(1) / 2)
    }

    /// Full `size × size` square (rounded down to odd).
    pub fn square(size: usize) -> Self {
        let radius = size.max(1).saturating_sub(1) / 2;
        let r = radius as isize;
        let offsets = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .collect();
        Self { offsets, radius }
    }

    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    pub fn radius(&self) -> usize {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_shapes() {
        assert_eq!(StructuringElement::ellipse(3).offsets().len(), 9);
        assert_eq!(StructuringElement::ellipse(1).offsets(), &[(0, 0)]);
        assert_eq!(StructuringElement::square(7).offsets().len(), 49);
        // radius 2 disk drops the four corners
        assert_eq!(StructuringElement::disk(2).offsets().len(), 21);
    }
}
