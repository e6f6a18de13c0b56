//! Greedy nearest-neighbour linearization of an unordered pixel set.
//!
//! From the seed, repeatedly move to the closest unvisited pixel (squared
//! Euclidean distance, ties to the lowest input index). Candidates are found
//! through a uniform grid: rings of cells around the current cell are
//! scanned until no unscanned cell can hold a closer pixel.

/// Visit order of `pixels` starting at `seed`; every index appears once.
pub fn greedy_order(pixels: &[(usize, usize)], seed: usize, cell_size: usize) -> Vec<usize> {
    let n = pixels.len();
    if n == 0 {
        return Vec::new();
    }
    let mut grid = Grid::new(pixels, cell_size.max(1));
    let mut order = Vec::with_capacity(n);
    let mut current = seed.min(n - 1);
    grid.remove(pixels, current);
    order.push(current);

    while order.len() < n {
        let Some(next) = grid.nearest(pixels, pixels[current]) else {
            break;
        };
        grid.remove(pixels, next);
        order.push(next);
        current = next;
    }
    order
}

struct Grid {
    cell: usize,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
}

impl Grid {
    fn new(pixels: &[(usize, usize)], cell: usize) -> Self {
        let max_x = pixels.iter().map(|p| p.0).max().unwrap_or(0);
        let max_y = pixels.iter().map(|p| p.1).max().unwrap_or(0);
        let cols = max_x / cell + 1;
        let rows = max_y / cell + 1;
        let mut buckets = vec![Vec::new(); cols * rows];
        for (i, &(x, y)) in pixels.iter().enumerate() {
            buckets[(y / cell) * cols + x / cell].push(i);
        }
        Self {
            cell,
            cols,
            rows,
            buckets,
        }
    }

    fn remove(&mut self, pixels: &[(usize, usize)], idx: usize) {
        let (x, y) = pixels[idx];
        let bucket = &mut self.buckets[(y / self.cell) * self.cols + x / self.cell];
        if let Some(pos) = bucket.iter().position(|&i| i == idx) {
            bucket.swap_remove(pos);
        }
    }

    fn nearest(&self, pixels: &[(usize, usize)], from: (usize, usize)) -> Option<usize> {
        let cx = (from.0 / self.cell) as isize;
        let cy = (from.1 / self.cell) as isize;
        let max_ring = self.cols.max(self.rows) as isize;
        let mut best: Option<(u64, usize)> = None;

        for r in 0..=max_ring {
            for gy in cy - r..=cy + r {
                if gy < 0 || gy >= self.rows as isize {
                    continue;
                }
                for gx in cx - r..=cx + r {
                    if gx < 0 || gx >= self.cols as isize {
                        continue;
                    }
                    // only the ring's border cells are new
                    if (gy - cy).abs() != r && (gx - cx).abs() != r {
                        continue;
                    }
                    for &i in &self.buckets[gy as usize * self.cols + gx as usize] {
                        let d = squared_distance(from, pixels[i]);
                        let better = match best {
                            None => true,
                            Some((bd, bi)) => d < bd || (d == bd && i < bi),
                        };
                        if better {
                            best = Some((d, i));
                        }
                    }
                }
            }
            if let Some((d, _)) = best {
                let reach = (r as u64) * self.cell as u64;
                if d <= reach * reach {
                    break;
                }
            }
        }
        best.map(|(_, i)| i)
    }
}

fn squared_distance(a: (usize, usize), b: (usize, usize)) -> u64 {
    let dx = a.0 as i64 - b.0 as i64;
    let dy = a.1 as i64 - b.1 as i64;
    (dx * dx + dy * dy) as u64
}
