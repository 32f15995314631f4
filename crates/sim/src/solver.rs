//! Constraint projection: boundary confinement and overlap relaxation.
//!
//! Corrections operate on predicted positions. One relaxation sweep may
//! leave residual overlap; the sweep count is a tuning knob
//! ([`crate::SimParams::solver_iterations`]). The contained settle pass
//! is the exception: it operates on current positions, because contained
//! particles are placed directly by the interaction layer each frame.

use crate::grid::SpatialGrid;
use crate::interaction::Container;
use crate::particle::{Mobility, Particles};

/// Correction weights for a pair, as a pure function of the two mobility
/// tags. `None` means the pair exchanges no correction.
#[inline]
fn correction_weights(a: Mobility, b: Mobility) -> Option<(f32, f32)> {
    match (a.is_static(), b.is_static()) {
        (false, false) => Some((0.5, 0.5)),
        (false, true) => Some((1.0, 0.0)),
        (true, false) => Some((0.0, 1.0)),
        (true, true) => None,
    }
}

/// Clamp every predicted position so the full circle stays inside
/// `[0, width] x [0, height]`.
pub fn enforce_bounds(particles: &mut Particles, width: f32, height: f32) {
    for p in particles.iter_mut() {
        if p.predicted.x - p.radius < 0.0 {
            p.predicted.x = p.radius;
        }
        if p.predicted.x + p.radius > width {
            p.predicted.x = width - p.radius;
        }
        if p.predicted.y - p.radius < 0.0 {
            p.predicted.y = p.radius;
        }
        if p.predicted.y + p.radius > height {
            p.predicted.y = height - p.radius;
        }
    }
}

/// Run `iterations` relaxation sweeps over every pair surfaced by the
/// grid, plus the container circle when one is live.
pub fn relax_overlaps(
    particles: &mut Particles,
    grid: &SpatialGrid,
    container: Option<&Container>,
    iterations: usize,
) {
    let mut neighbors = Vec::new();
    for _ in 0..iterations {
        for i in 0..particles.len() {
            grid.neighbors_of(particles.list[i].predicted, &mut neighbors);
            for &j in &neighbors {
                if j != i {
                    separate_pair(particles, i, j);
                }
            }
            if let Some(c) = container {
                separate_from_container(particles, i, c);
            }
        }
    }
}

/// Resolve one overlapping pair on predicted positions.
fn separate_pair(particles: &mut Particles, i: usize, j: usize) {
    let a = particles.list[i];
    let b = particles.list[j];
    let Some((wa, wb)) = correction_weights(a.mobility, b.mobility) else {
        return;
    };

    let delta = b.predicted - a.predicted;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist {
        return;
    }
    // Coincident centers have no separation axis; leave the pair alone.
    if dist == 0.0 {
        return;
    }

    let overlap = min_dist - dist;
    let axis = delta / dist;
    particles.list[i].predicted -= axis * (overlap * wa);
    particles.list[j].predicted += axis * (overlap * wb);
}

/// Push a particle out of the container wall. Contained particles live
/// inside it and are owned by the settle pass instead.
fn separate_from_container(particles: &mut Particles, i: usize, container: &Container) {
    let p = particles.list[i];
    if p.mobility == Mobility::Contained {
        return;
    }
    let Some((wp, _)) = correction_weights(p.mobility, container.mobility) else {
        return;
    };

    let delta = p.predicted - container.position;
    let dist = delta.length();
    let min_dist = p.radius + container.radius;
    if dist >= min_dist || dist == 0.0 {
        return;
    }

    particles.list[i].predicted += delta / dist * ((min_dist - dist) * wp);
}

/// Settle contained particles against each other and the container wall.
///
/// Pairwise relaxation runs on current positions with a half/half split;
/// the captured set is small, so the quadratic sweep stays cheaper than a
/// grid rebuild on current positions. A radial clamp then pulls any
/// particle past the admissible disc back onto its boundary.
pub fn settle_contained(particles: &mut Particles, container: &Container) {
    let contained: Vec<usize> = particles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.mobility == Mobility::Contained)
        .map(|(i, _)| i)
        .collect();

    for a in 0..contained.len() {
        for b in (a + 1)..contained.len() {
            let (i, j) = (contained[a], contained[b]);
            let pa = particles.list[i];
            let pb = particles.list[j];

            let delta = pb.position - pa.position;
            let dist = delta.length();
            let min_dist = pa.radius + pb.radius;
            if dist >= min_dist || dist == 0.0 {
                continue;
            }

            let push = delta / dist * ((min_dist - dist) * 0.5);
            particles.list[i].position -= push;
            particles.list[j].position += push;
        }
    }

    for &i in &contained {
        let p = &mut particles.list[i];
        let max_offset = (container.radius - p.radius).max(0.0);
        let offset = p.position - container.position;
        let dist = offset.length();
        if dist > max_offset && dist > 0.0 {
            p.position = container.position + offset / dist * max_offset;
        }
        // Jitter continues from the settled offset next frame
        p.container_offset = p.position - container.position;
        p.predicted = p.position;
    }
}
