//! Scene management: overlap-free insertion, random removal, and
//! repositioning.
//!
//! Placement is rejection-sampled against the live population. Budgets
//! are deliberate: exhausting one is an accepted outcome (fewer particles
//! placed, or a clamped fallback position), never a failure.

use glam::Vec2;
use rand::{rngs::StdRng, Rng};

use crate::particle::Particles;
use crate::physics::{BURST_SPAWN_ATTEMPTS, INITIAL_SPAWN_ATTEMPTS, REPOSITION_ATTEMPTS};
use crate::SimParams;

/// Record of one `swap_remove`: index `removed` now holds the element
/// previously at `moved_from` (`None` when the removed element was last).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovedSwap {
    pub removed: usize,
    pub moved_from: Option<usize>,
}

/// Rejection-sample `count` non-overlapping particles over the full
/// interior. Returns how many were actually placed.
pub fn spawn_initial(
    particles: &mut Particles,
    count: usize,
    width: f32,
    height: f32,
    params: &SimParams,
    rng: &mut StdRng,
) -> usize {
    let r = params.base_radius;
    if width <= 2.0 * r || height <= 2.0 * r {
        return 0;
    }

    let mut placed = 0;
    let mut attempts = 0;
    while placed < count && attempts < INITIAL_SPAWN_ATTEMPTS {
        let candidate = Vec2::new(rng.gen_range(r..width - r), rng.gen_range(r..height - r));
        if !particles.overlaps_any(candidate, r) {
            particles.spawn_at(candidate);
            placed += 1;
        }
        attempts += 1;
    }
    if placed < count {
        log::debug!("initial spawn budget exhausted: {}/{} placed", placed, count);
    }
    placed
}

/// Rejection-sample up to `count` new particles into the top band.
/// Returns how many were actually placed; the attempt budget makes fewer
/// than `count` the expected outcome in a crowded band.
pub fn add_burst(
    particles: &mut Particles,
    count: usize,
    width: f32,
    params: &SimParams,
    rng: &mut StdRng,
) -> usize {
    let r = params.base_radius;
    if width <= 2.0 * r {
        return 0;
    }

    let mut placed = 0;
    let mut attempts = 0;
    while placed < count && attempts < BURST_SPAWN_ATTEMPTS {
        let candidate = Vec2::new(
            rng.gen_range(r..width - r),
            rng.gen_range(r..r + params.spawn_region_height),
        );
        if !particles.overlaps_any(candidate, r) {
            particles.spawn_at(candidate);
            placed += 1;
        }
        attempts += 1;
    }
    if placed < count {
        log::debug!("burst spawn budget exhausted: {}/{} placed", placed, count);
    }
    placed
}

/// Remove an unordered random subset of `count` particles (everything
/// when `count` reaches the population). Returns the performed swaps in
/// order, so callers holding indices can remap through them.
pub fn remove_random(
    particles: &mut Particles,
    count: usize,
    rng: &mut StdRng,
) -> Vec<RemovedSwap> {
    let n = count.min(particles.len());
    let mut swaps = Vec::with_capacity(n);
    for _ in 0..n {
        let i = rng.gen_range(0..particles.len());
        let last = particles.len() - 1;
        particles.list.swap_remove(i);
        swaps.push(RemovedSwap {
            removed: i,
            moved_from: (i != last).then_some(last),
        });
    }
    swaps
}

/// Rejection-sample a fresh top-band position for one particle, keeping
/// it clear of every other particle. When the attempt budget runs out the
/// particle is clamped into bounds where it stands.
pub fn reposition(
    particles: &mut Particles,
    index: usize,
    width: f32,
    height: f32,
    params: &SimParams,
    rng: &mut StdRng,
) {
    let radius = particles.list[index].radius;

    if width > 2.0 * radius {
        for _ in 0..REPOSITION_ATTEMPTS {
            let candidate = Vec2::new(
                rng.gen_range(radius..width - radius),
                rng.gen_range(radius..radius + params.spawn_region_height),
            );
            let clear = particles.iter().enumerate().all(|(j, other)| {
                j == index || candidate.distance(other.position) >= radius + other.radius
            });
            if clear {
                let p = &mut particles.list[index];
                p.position = candidate;
                p.predicted = candidate;
                return;
            }
        }
    }

    // Budget exhausted: keep the particle, just pull it into bounds
    let p = &mut particles.list[index];
    p.position.x = p.position.x.clamp(radius, (width - radius).max(radius));
    p.position.y = p.position.y.clamp(radius, (height - radius).max(radius));
    p.predicted = p.position;
}
