//! Uniform spatial index for neighbor queries.
//!
//! Buckets particle indices by `floor(pos / cell_size)` into a cell-keyed
//! hash map and answers 3x3-block neighborhood queries. The index carries
//! no state across ticks: it is rebuilt from scratch for each snapshot it
//! serves, once on pre-solve predicted positions for the overlap pass and
//! once on post-solve predictions for the damping neighbor count.

use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::particle::Particles;

/// Uniform grid over unbounded 2D space.
pub struct SpatialGrid {
    /// Cell size in simulated space, independent of the viewport.
    cell_size: f32,
    cells: FxHashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    /// Create an empty index with the given cell size.
    pub fn new(cell_size: f32) -> Self {
        assert!(
            cell_size > 0.0,
            "cell_size must be positive, got {}",
            cell_size
        );
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    #[inline]
    fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Drop all buckets.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Bucket `index` by `pos`. An entity lands in exactly one cell.
    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let key = self.cell_of(pos);
        self.cells.entry(key).or_default().push(index);
    }

    /// Clear, then bucket every particle at its predicted position.
    pub fn rebuild_predicted(&mut self, particles: &Particles) {
        self.clear();
        for (i, p) in particles.list.iter().enumerate() {
            let key = self.cell_of(p.predicted);
            self.cells.entry(key).or_default().push(i);
        }
    }

    /// Collect the indices bucketed in the 3x3 cell block centered on
    /// `pos`, the center cell included. Callers skip self-comparison.
    pub fn neighbors_of(&self, pos: Vec2, out: &mut Vec<usize>) {
        out.clear();
        let (cx, cy) = self.cell_of(pos);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
    }
}
