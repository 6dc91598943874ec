use crate::foundation::math::Rng64;

/// Pixel partition of a `width` x `height` image into nearest-seed cells.
#[derive(Clone, Debug, PartialEq)]
pub struct VoronoiPartition {
    pub width: u32,
    pub height: u32,
    pub seeds: Vec<(i32, i32)>,
    /// Owning seed of every pixel, row-major.
    pub owner: Vec<u32>,
    /// Row-major pixel indices of every cell, one list per seed.
    pub cells: Vec<Vec<usize>>,
}

impl VoronoiPartition {
    /// Assigns every pixel to its nearest seed by squared Euclidean distance;
    /// ties go to the lower seed index. An empty seed list gets one seed at the origin.
    pub fn compute(width: u32, height: u32, mut seeds: Vec<(i32, i32)>) -> Self {
        if seeds.is_empty() {
            seeds.push((0, 0));
        }
        let mut owner = Vec::with_capacity((width as usize) * (height as usize));
        let mut cells = vec![Vec::new(); seeds.len()];
        for y in 0..height as i64 {
            for x in 0..width as i64 {
                let mut best = 0usize;
                let mut best_d = i64::MAX;
                for (i, &(sx, sy)) in seeds.iter().enumerate() {
                    let dx = x - i64::from(sx);
                    let dy = y - i64::from(sy);
                    let d = dx * dx + dy * dy;
                    if d < best_d {
                        best_d = d;
                        best = i;
                    }
                }
                cells[best].push(owner.len());
                owner.push(best as u32);
            }
        }
        Self {
            width,
            height,
            seeds,
            owner,
            cells,
        }
    }

    /// Scatters `count` (at least one) seeds uniformly over the image.
    pub fn random(width: u32, height: u32, count: usize, rng: &mut Rng64) -> Self {
        let seeds = (0..count.max(1))
            .map(|_| (rng.below(width) as i32, rng.below(height) as i32))
            .collect();
        Self::compute(width, height, seeds)
    }

    /// 1-based erosion rank of every cell: the cell whose seed lies closest to
    /// `target` gets rank 1, unless `reverse` flips the order.
    pub fn ranks_from(&self, target: (f64, f64), reverse: bool) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.seeds.len()).collect();
        let dist = |i: usize| {
            let (sx, sy) = self.seeds[i];
            let dx = f64::from(sx) - target.0;
            let dy = f64::from(sy) - target.1;
            dx * dx + dy * dy
        };
        order.sort_by(|&a, &b| dist(a).total_cmp(&dist(b)).then(a.cmp(&b)));
        if reverse {
            order.reverse();
        }
        let mut ranks = vec![0; self.seeds.len()];
        for (r, cell) in order.into_iter().enumerate() {
            ranks[cell] = r + 1;
        }
        ranks
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/voronoi.rs"]
mod tests;
