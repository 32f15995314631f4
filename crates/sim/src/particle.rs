//! Circular bodies tracked by the simulation.
//!
//! Each particle carries both a committed position and a predicted
//! position. Prediction happens in [`crate::integrate`], corrections in
//! [`crate::solver`], and the corrected prediction is committed back by
//! [`crate::velocity`].

use glam::Vec2;

use crate::physics::BASE_RADIUS;

/// Who drives an entity's position this frame.
///
/// Pairwise overlap resolution is a pure function of two of these tags: a
/// mobile side absorbs correction, a static side never moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mobility {
    /// Driven by physics integration.
    #[default]
    Free,
    /// Pinned to the pointer by the primary gesture.
    Held,
    /// Carried inside the container.
    Contained,
    /// Never moved by the solver (the container itself).
    Immovable,
}

impl Mobility {
    /// Integration and velocity reconciliation apply only to free bodies.
    #[inline]
    pub fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }

    /// Static entities absorb no correction in pairwise resolution.
    #[inline]
    pub fn is_static(self) -> bool {
        !self.is_free()
    }
}

/// A single circular body.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Committed position (circle center)
    pub position: Vec2,
    /// Predicted next position, corrected by the solver before commit
    pub predicted: Vec2,
    /// Current velocity
    pub velocity: Vec2,
    /// Collision radius; eased between base and enlarged around pick-up
    pub radius: f32,
    /// Who drives this particle's position this frame
    pub mobility: Mobility,
    /// Seconds since pick-up, drives radius growth
    pub pickup_elapsed: f32,
    /// Seconds since release; negative when no shrink transition is active
    pub release_elapsed: f32,
    /// Radius at the moment of release (shrink starting point)
    pub release_start_radius: f32,
    /// Offset from the container center while contained
    pub container_offset: Vec2,
}

impl Particle {
    /// Create a free, resting particle at the given position.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            predicted: position,
            velocity: Vec2::ZERO,
            radius: BASE_RADIUS,
            mobility: Mobility::Free,
            pickup_elapsed: 0.0,
            release_elapsed: -1.0,
            release_start_radius: BASE_RADIUS,
            container_offset: Vec2::ZERO,
        }
    }

    /// Current speed in pixels/s.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Whether the post-release shrink timer is still running. While it
    /// is, the higher throw speed cap applies.
    #[inline]
    pub fn in_release_transition(&self) -> bool {
        self.release_elapsed >= 0.0
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

/// Collection of particles. Identity is the index into `list`; removal
/// uses `swap_remove`, and callers holding indices remap through the
/// swaps reported by [`crate::scene::remove_random`].
pub struct Particles {
    pub list: Vec<Particle>,
}

impl Particles {
    /// Create an empty particle collection.
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    /// Create with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: Vec::with_capacity(capacity),
        }
    }

    /// Add a free, resting particle at the given position.
    pub fn spawn_at(&mut self, position: Vec2) {
        self.list.push(Particle::new(position));
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterate over particles.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.list.iter()
    }

    /// Iterate mutably over particles.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.list.iter_mut()
    }

    /// Whether a circle at `position` with `radius` overlaps any existing
    /// particle. Used by rejection-sampled placement.
    pub fn overlaps_any(&self, position: Vec2, radius: f32) -> bool {
        self.list
            .iter()
            .any(|p| p.position.distance(position) < p.radius + radius)
    }
}

impl Default for Particles {
    fn default() -> Self {
        Self::new()
    }
}
