//! Pointer-driven interaction: pick-up and throw, container capture, and
//! the scatter command.
//!
//! All mobility transitions happen here; the physics phases only ever
//! read the tags. Held and contained particles get their positions
//! written directly each tick, with velocity reintroduced on release.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::{rngs::StdRng, Rng};

use crate::particle::{Mobility, Particles};
use crate::scene::RemovedSwap;
use crate::SimParams;

/// The capture bubble. At most one live instance; always immovable in
/// pairwise resolution.
#[derive(Clone, Copy, Debug)]
pub struct Container {
    pub position: Vec2,
    pub radius: f32,
    pub mobility: Mobility,
}

impl Container {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            mobility: Mobility::Immovable,
        }
    }
}

/// Sliding-window pointer velocity estimate.
///
/// One timestamped sample per tick; entries older than the window are
/// dropped. With fewer than two samples (or a zero time span) the
/// estimate is zero - a policy, not an error.
#[derive(Debug, Default)]
pub struct PointerTracker {
    samples: VecDeque<(f64, Vec2)>,
}

impl PointerTracker {
    /// Record a sample and expire everything older than `window` seconds.
    pub fn push(&mut self, time: f64, position: Vec2, window: f32) {
        self.samples.push_back((time, position));
        let cutoff = time - window as f64;
        while let Some(&(t, _)) = self.samples.front() {
            if t < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Velocity from the oldest retained sample to the newest.
    pub fn velocity(&self) -> Vec2 {
        let (Some(&(t0, p0)), Some(&(t1, p1))) = (self.samples.front(), self.samples.back())
        else {
            return Vec2::ZERO;
        };
        let span = (t1 - t0) as f32;
        if span <= f32::EPSILON || self.samples.len() < 2 {
            return Vec2::ZERO;
        }
        (p1 - p0) / span
    }
}

/// Interaction state: the held particle, the live container, and the
/// pointer history feeding throw velocities.
#[derive(Default)]
pub struct InteractionState {
    /// Last reported pointer position, simulation coordinates.
    pub pointer: Vec2,
    /// Index of the held particle, if any.
    pub held: Option<usize>,
    /// The live capture container, if any.
    pub container: Option<Container>,
    tracker: PointerTracker,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this tick's pointer position for the velocity estimate.
    pub fn sample_pointer(&mut self, clock: f64, window: f32) {
        let pointer = self.pointer;
        self.tracker.push(clock, pointer, window);
    }

    /// The current throw velocity: pointer estimate times the multiplier.
    pub fn throw_velocity(&self, params: &SimParams) -> Vec2 {
        self.tracker.velocity() * params.throw_multiplier
    }

    /// Primary press: hit test in storage order, first free particle
    /// whose circle covers the pointer becomes held.
    pub fn press_primary(&mut self, particles: &mut Particles, params: &SimParams) {
        if self.held.is_some() {
            return;
        }
        let pointer = self.pointer;
        let hit = particles
            .iter()
            .position(|p| p.mobility.is_free() && p.position.distance(pointer) < p.radius);

        if let Some(i) = hit {
            let p = &mut particles.list[i];
            p.mobility = Mobility::Held;
            p.velocity = Vec2::ZERO;
            p.release_elapsed = -1.0;
            // Re-picking a still-shrinking particle resumes growth from
            // its current radius instead of snapping back to base
            let span = params.enlarged_radius - params.base_radius;
            p.pickup_elapsed = if span > 0.0 {
                params.pickup_grow_duration * (p.radius - params.base_radius) / span
            } else {
                0.0
            };
            self.held = Some(i);
        }
    }

    /// Primary release: the held particle becomes a throw.
    pub fn release_primary(&mut self, particles: &mut Particles, params: &SimParams) {
        let Some(i) = self.held.take() else {
            return;
        };
        let p = &mut particles.list[i];
        p.mobility = Mobility::Free;
        p.velocity = self.throw_velocity(params);
        p.release_start_radius = p.radius;
        p.release_elapsed = 0.0;
        p.predicted = p.position;
    }

    /// Secondary press: create the container at the pointer and capture
    /// every free particle within the capture radius of the press
    /// location.
    pub fn press_secondary(&mut self, particles: &mut Particles, params: &SimParams) {
        if self.container.is_some() {
            return;
        }
        let container = Container::new(self.pointer, params.container_radius);

        let mut captured = 0usize;
        for p in particles.iter_mut() {
            if !p.mobility.is_free() {
                continue;
            }
            if p.position.distance(container.position) < params.capture_radius {
                p.mobility = Mobility::Contained;
                p.velocity = Vec2::ZERO;
                p.container_offset = p.position - container.position;
                captured += 1;
            }
        }
        log::debug!(
            "container opened at ({:.0}, {:.0}), captured {}",
            container.position.x,
            container.position.y,
            captured
        );
        self.container = Some(container);
    }

    /// Secondary release: destroy the container; every contained particle
    /// reverts to free with the current throw velocity.
    pub fn release_secondary(&mut self, particles: &mut Particles, params: &SimParams) {
        if self.container.take().is_none() {
            return;
        }
        let exit = self.throw_velocity(params);

        let mut released = 0usize;
        for p in particles.iter_mut() {
            if p.mobility != Mobility::Contained {
                continue;
            }
            p.mobility = Mobility::Free;
            p.velocity = exit;
            p.container_offset = Vec2::ZERO;
            p.predicted = p.position;
            // Opens the throw-cap window; the radius is already at base,
            // so no visible shrink happens
            p.release_start_radius = p.radius;
            p.release_elapsed = 0.0;
            released += 1;
        }
        log::debug!("container released {} particles", released);
    }

    /// Per-tick drive: radius easing, held-particle pinning, container
    /// tracking with contained jitter and spring.
    pub fn drive(
        &mut self,
        particles: &mut Particles,
        params: &SimParams,
        rng: &mut StdRng,
        dt: f32,
    ) {
        self.advance_easing(particles, params, dt);

        if let Some(i) = self.held {
            let p = &mut particles.list[i];
            p.position = self.pointer;
            p.predicted = self.pointer;
            p.velocity = Vec2::ZERO;
        }

        if let Some(container) = self.container.as_mut() {
            container.position = self.pointer;

            for p in particles.iter_mut() {
                if p.mobility != Mobility::Contained {
                    continue;
                }
                // Wiggle inside the bubble, reined in by a spring once the
                // offset wanders past the leash
                let angle = rng.gen_range(0.0..TAU);
                let step = rng.gen_range(0.0..params.jitter_amplitude);
                p.container_offset += Vec2::new(angle.cos(), angle.sin()) * step;

                let max_offset = (container.radius - p.radius).max(0.0);
                let leash = params.spring_fraction * max_offset;
                let dist = p.container_offset.length();
                if dist > leash && dist > 0.0 {
                    let pull = ((dist - leash) * params.spring_stiffness * dt).min(dist);
                    p.container_offset -= p.container_offset / dist * pull;
                }

                p.position = container.position + p.container_offset;
                p.predicted = p.position;
                p.velocity = Vec2::ZERO;
            }
        }
    }

    /// Advance the pick-up growth and post-release shrink timers.
    fn advance_easing(&self, particles: &mut Particles, params: &SimParams, dt: f32) {
        for p in particles.iter_mut() {
            if p.mobility == Mobility::Held {
                p.pickup_elapsed += dt;
                let t = (p.pickup_elapsed / params.pickup_grow_duration).min(1.0);
                p.radius =
                    params.base_radius + (params.enlarged_radius - params.base_radius) * t;
            } else if p.in_release_transition() {
                p.release_elapsed += dt;
                let t = (p.release_elapsed / params.release_shrink_duration).min(1.0);
                p.radius =
                    p.release_start_radius + (params.base_radius - p.release_start_radius) * t;
                if t >= 1.0 {
                    p.radius = params.base_radius;
                    p.release_elapsed = -1.0;
                }
            }
        }
    }

    /// Fix up the held reference after `swap_remove`-based removals,
    /// replaying the swaps in the order they were performed.
    pub fn apply_removals(&mut self, swaps: &[RemovedSwap]) {
        for swap in swaps {
            match self.held {
                Some(h) if h == swap.removed => self.held = None,
                Some(h) if Some(h) == swap.moved_from => self.held = Some(swap.removed),
                _ => {}
            }
        }
    }
}

/// Kick every free particle with a randomly directed impulse of
/// randomized magnitude. Pure velocity side effect.
pub fn scatter(particles: &mut Particles, params: &SimParams, rng: &mut StdRng) {
    for p in particles.iter_mut() {
        if !p.mobility.is_free() {
            continue;
        }
        let angle = rng.gen_range(0.0..TAU);
        let magnitude = rng.gen_range(0.5..1.5) * params.scatter_force;
        p.velocity += Vec2::new(angle.cos(), angle.sin()) * magnitude;
    }
}
