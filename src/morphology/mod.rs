//! Binary morphology on [`Mask`]s.
//!
//! Erosion reads pixels outside the image as foreground and dilation reads
//! them as background. With a symmetric structuring element the two are
//! adjoint, so opening and closing are idempotent.
//!
//! [`Mask`]: crate::image::Mask

pub mod components;
pub mod distance;
pub mod kernel;

pub use components::{fill_holes, label_components, largest_component, remove_small_components, Components};
pub use distance::distance_transform;
pub use kernel::StructuringElement;

use crate::image::Mask;

/// Pixel stays set only when every in-bounds neighbour under `se` is set.
pub fn erode(mask: &Mask, se: &StructuringElement) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    let mut out = Mask::new(w, h);
    for y in 0..h {
        for x in 0..w {
            if !mask.get(x, y) {
                continue;
            }
            let keep = se.offsets().iter().all(|&(dx, dy)| {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    return true;
                }
                mask.get(nx as usize, ny as usize)
            });
            if keep {
                out.set(x, y, true);
            }
        }
    }
    out
}

/// Every set pixel stamps `se` into the output.
pub fn dilate(mask: &Mask, se: &StructuringElement) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    let mut out = Mask::new(w, h);
    for y in 0..h {
        for x in 0..w {
            if !mask.get(x, y) {
                continue;
            }
            for &(dx, dy) in se.offsets() {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx >= 0 && ny >= 0 && nx < w as isize && ny < h as isize {
                    out.set(nx as usize, ny as usize, true);
                }
            }
        }
    }
    out
}

pub fn erode_n(mask: &Mask, se: &StructuringElement, iterations: usize) -> Mask {
    (0..iterations).fold(mask.clone(), |m, _| erode(&m, se))
}

pub fn dilate_n(mask: &Mask, se: &StructuringElement, iterations: usize) -> Mask {
    (0..iterations).fold(mask.clone(), |m, _| dilate(&m, se))
}

/// Dilate then erode, `iterations` times each.
pub fn close(mask: &Mask, se: &StructuringElement, iterations: usize) -> Mask {
    erode_n(&dilate_n(mask, se, iterations), se, iterations)
}

/// Erode then dilate, `iterations` times each.
pub fn open(mask: &Mask, se: &StructuringElement, iterations: usize) -> Mask {
    dilate_n(&erode_n(mask, se, iterations), se, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> Mask {
        Mask::from_fn(20, 20, |x, y| {
            let dx = x as f32 - 9.5;
            let dy = y as f32 - 9.5;
            dx * dx + dy * dy < 36.0 || (x == 2 && y == 2)
        })
    }

    #[test]
    fn opening_removes_specks_and_is_idempotent() {
        let se = StructuringElement::ellipse(3);
        let once = open(&blob(), &se, 1);
        assert!(!once.get(2, 2));
        assert_eq!(open(&once, &se, 1), once);
    }

    #[test]
    fn closing_is_idempotent() {
        let se = StructuringElement::ellipse(5);
        let once = close(&blob(), &se, 1);
        assert_eq!(close(&once, &se, 1), once);
    }

    #[test]
    fn erosion_treats_border_as_foreground() {
        let full = Mask::from_fn(5, 5, |_, _| true);
        assert_eq!(erode(&full, &StructuringElement::ellipse(3)), full);
    }
}
