//! Zhang–Suen thinning.
use crate::image::Mask;

/// Neighbours P2..P9, clockwise from north.
const RING: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Thin `mask` to a one-pixel-wide skeleton. Pixels outside are background.
pub fn thin(mask: &Mask) -> Mask {
    let mut current = mask.clone();
    let (w, h) = (mask.width(), mask.height());
    let mut marked = Vec::new();
    loop {
        let mut changed = false;
        for step in 0..2 {
            marked.clear();
            for y in 0..h {
                for x in 0..w {
                    if current.get(x, y) && deletable(&current, x, y, step) {
                        marked.push((x, y));
                    }
                }
            }
            for &(x, y) in &marked {
                current.set(x, y, false);
            }
            changed |= !marked.is_empty();
        }
        if !changed {
            return current;
        }
    }
}

fn deletable(mask: &Mask, x: usize, y: usize, step: usize) -> bool {
    let mut p = [false; 8];
    for (slot, (dx, dy)) in p.iter_mut().zip(RING) {
        *slot = mask.get_signed(x as isize + dx, y as isize + dy);
    }
    let b = p.iter().filter(|&&v| v).count();
    if !(2..=6).contains(&b) {
        return false;
    }
    let a = (0..8).filter(|&i| !p[i] && p[(i + 1) % 8]).count();
    if a != 1 {
        return false;
    }
    // p[0]=P2 (N), p[2]=P4 (E), p[4]=P6 (S), p[6]=P8 (W)
    if step == 0 {
        !(p[0] && p[2] && p[4]) && !(p[2] && p[4] && p[6])
    } else {
        !(p[0] && p[2] && p[6]) && !(p[0] && p[4] && p[6])
    }
}

/// Set pixels with exactly one 8-neighbour.
pub fn is_endpoint(mask: &Mask, x: usize, y: usize) -> bool {
    RING.iter()
        .filter(|(dx, dy)| mask.get_signed(x as isize + dx, y as isize + dy))
        .count()
        == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thick_bar_thins_to_a_line() {
        let bar = Mask::from_fn(40, 15, |x, y| (5..35).contains(&x) && (4..11).contains(&y));
        let skel = thin(&bar);
        assert!(skel.count() > 15);
        for x in 10..30 {
            let column = (0..15).filter(|&y| skel.get(x, y)).count();
            assert_eq!(column, 1, "column {x} should be one pixel thick");
        }
    }

    #[test]
    fn one_pixel_line_is_kept() {
        let line = Mask::from_fn(60, 5, |x, y| y == 2 && (5..55).contains(&x));
        let skel = thin(&line);
        assert_eq!(skel, line);
        assert!(is_endpoint(&skel, 5, 2));
        assert!(!is_endpoint(&skel, 20, 2));
    }
}
