//! Connected components of binary masks (8-connectivity for foreground).
use crate::image::Mask;
use image::Luma;
use imageproc::region_labelling::{connected_components, Connectivity};

/// Component labelling. `labels[i] == 0` is background, labels start at 1.
#[derive(Clone, Debug)]
pub struct Components {
    pub width: usize,
    pub height: usize,
    pub labels: Vec<u32>,
    /// Pixel count per label; index 0 is unused.
    pub sizes: Vec<usize>,
}

impl Components {
    pub fn count(&self) -> usize {
        self.sizes.len() - 1
    }

    /// Mask of a single label.
    pub fn mask_of(&self, label: u32) -> Mask {
        let data = self
            .labels
            .iter()
            .map(|&l| if l == label { 255 } else { 0 })
            .collect();
        Mask::from_raw(self.width, self.height, data).unwrap_or_else(|| Mask::new(self.width, self.height))
    }

    /// Label of the biggest component; ties keep the lowest label.
    pub fn largest(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for (label, &size) in self.sizes.iter().enumerate().skip(1) {
            if best.map_or(true, |(_, s)| size > s) {
                best = Some((label as u32, size));
            }
        }
        best.map(|(l, _)| l)
    }
}

const NEIGHBOURS_4: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Label 8-connected foreground components; labels are consecutive from 1.
pub fn label_components(mask: &Mask) -> Components {
    if mask.area() == 0 {
        return Components {
            width: mask.width(),
            height: mask.height(),
            labels: Vec::new(),
            sizes: vec![0],
        };
    }
    let labelled = connected_components(&mask.to_gray_image(), Connectivity::Eight, Luma([0u8]));
    let labels = labelled.into_raw();
    let count = labels.iter().copied().max().unwrap_or(0) as usize;
    let mut sizes = vec![0usize; count + 1];
    for &l in labels.iter().filter(|&&l| l != 0) {
        sizes[l as usize] += 1;
    }
    Components {
        width: mask.width(),
        height: mask.height(),
        labels,
        sizes,
    }
}

/// Drop components with fewer than `min_pixels` pixels.
pub fn remove_small_components(mask: &Mask, min_pixels: usize) -> Mask {
    let comps = label_components(mask);
    let data = comps
        .labels
        .iter()
        .map(|&l| {
            if l != 0 && comps.sizes[l as usize] >= min_pixels {
                255
            } else {
                0
            }
        })
        .collect();
    Mask::from_raw(mask.width(), mask.height(), data).unwrap_or_else(|| mask.clone())
}

/// Largest 8-connected component, or an empty mask.
pub fn largest_component(mask: &Mask) -> Mask {
    let comps = label_components(mask);
    match comps.largest() {
        Some(label) => comps.mask_of(label),
        None => Mask::new(mask.width(), mask.height()),
    }
}

/// Set every background pixel that is not 4-connected to the image frame.
pub fn fill_holes(mask: &Mask) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    let mut outside = vec![false; w * h];
    let mut stack = Vec::new();
    let seed = |idx: usize, outside: &mut Vec<bool>, stack: &mut Vec<usize>| {
        if !mask.is_set_idx(idx) && !outside[idx] {
            outside[idx] = true;
            stack.push(idx);
        }
    };
    for x in 0..w {
        seed(x, &mut outside, &mut stack);
        if h > 0 {
            seed((h - 1) * w + x, &mut outside, &mut stack);
        }
    }
    for y in 0..h {
        seed(y * w, &mut outside, &mut stack);
        if w > 0 {
            seed(y * w + w - 1, &mut outside, &mut stack);
        }
    }
    while let Some(idx) = stack.pop() {
        let x = (idx % w) as isize;
        let y = (idx / w) as isize;
        for (dx, dy) in NEIGHBOURS_4 {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                continue;
            }
            seed(ny as usize * w + nx as usize, &mut outside, &mut stack);
        }
    }
    Mask::from_fn(w, h, |x, y| !outside[y * w + x])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Mask {
        Mask::from_fn(12, 12, |x, y| {
            let on_frame = (2..=9).contains(&x) && (2..=9).contains(&y);
            let inside = (4..=7).contains(&x) && (4..=7).contains(&y);
            on_frame && !inside
        })
    }

    #[test]
    fn labels_and_sizes() {
        let mut mask = ring();
        mask.set(0, 11, true);
        let comps = label_components(&mask);
        assert_eq!(comps.count(), 2);
        let big = comps.largest().unwrap();
        assert_eq!(comps.sizes[big as usize], 64 - 16);
        assert!(comps.mask_of(big).get(2, 2));
        assert_eq!(remove_small_components(&mask, 2), ring());
    }

    #[test]
    fn holes_are_filled() {
        let filled = fill_holes(&ring());
        assert_eq!(filled.count(), 64);
        assert!(filled.get(5, 5));
        assert!(!filled.get(0, 0));
    }

    #[test]
    fn diagonal_pixels_are_one_component() {
        let mask = Mask::from_fn(4, 4, |x, y| x == y);
        assert_eq!(label_components(&mask).count(), 1);
    }
}
