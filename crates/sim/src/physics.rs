//! Unified tuning constants for the ball pit simulation.
//!
//! All simulation modules should use these constants instead of defining
//! their own. This prevents drift between subsystems and makes tuning
//! easier. Runtime-tunable copies live in [`crate::SimParams`], which
//! defaults to the values here.

/// Downward gravity in pixels/s².
///
/// Used by:
/// - Free-particle prediction (integrate)
/// - The rest-on-floor scenario tests
pub const GRAVITY: f32 = 500.0;

/// Resting particle radius in pixels.
pub const BASE_RADIUS: f32 = 15.0;

/// Radius a held particle grows toward.
pub const ENLARGED_RADIUS: f32 = 100.0;

/// Seconds for the base-to-enlarged growth while freshly held.
pub const PICKUP_GROW_DURATION: f32 = 0.2;

/// Seconds for the shrink back to base after release.
///
/// Deliberately longer than the growth; the same timer doubles as the
/// window during which the higher throw speed cap applies.
pub const RELEASE_SHRINK_DURATION: f32 = 0.5;

/// Spatial index cell size in pixels.
///
/// A property of the simulated space, not the viewport: it stays fixed
/// across viewport resizes.
pub const CELL_SIZE: f32 = 80.0;

/// Maximum free-particle speed in pixels/s.
pub const VELOCITY_CAP: f32 = 300.0;

/// Speed cap while a release transition is active, so thrown particles
/// can briefly exceed the normal cap.
pub const THROW_VELOCITY_CAP: f32 = 900.0;

/// Scalar applied to the estimated pointer velocity at release.
pub const THROW_MULTIPLIER: f32 = 1.5;

/// Base magnitude of the scatter impulse in pixels/s; each particle draws
/// uniformly from 0.5x to 1.5x of this.
pub const SCATTER_FORCE: f32 = 500.0;

/// Blend weight of the neighbor-density damping term (0 disables it).
pub const VISCOSITY: f32 = 0.5;

/// Per-neighbor damping base; raised to the touching-neighbor count.
pub const DAMPING_BASE: f32 = 0.98;

/// Touching-neighbor count at which damping saturates.
pub const MAX_DAMPING_NEIGHBORS: u32 = 6;

/// Slack added to summed radii when counting touching neighbors, in pixels.
pub const TOUCH_SLACK: f32 = 1.0;

/// Bottom-edge distance within which the floor-rest snap can fire, pixels.
pub const FLOOR_SNAP_TOLERANCE: f32 = 1.0;

/// Vertical speed below which a floor-adjacent particle is snapped, px/s.
pub const FLOOR_SNAP_VY_THRESHOLD: f32 = 5.0;

/// Seconds of pointer history retained for the velocity estimate.
pub const POINTER_WINDOW: f32 = 0.1;

/// Radius of the capture container in pixels.
pub const CONTAINER_RADIUS: f32 = 120.0;

/// Capture distance from the secondary press location, pixels.
pub const CAPTURE_RADIUS: f32 = 120.0;

/// Maximum per-tick jitter step of a contained particle, pixels.
pub const JITTER_AMPLITUDE: f32 = 2.0;

/// Fraction of the admissible offset at which the containment spring
/// starts pulling a contained particle back toward the center.
pub const SPRING_FRACTION: f32 = 0.8;

/// Proportional gain of the containment spring, 1/s.
pub const SPRING_STIFFNESS: f32 = 12.0;

/// Height of the top band used for burst spawns and repositioning, pixels.
pub const SPAWN_REGION_HEIGHT: f32 = 100.0;

/// Particles closer than this to the bottom edge after a viewport resize
/// get repositioned into the top band.
pub const LOW_EDGE_MARGIN: f32 = 150.0;

/// Rejection-sampling attempt budget for the initial population.
pub const INITIAL_SPAWN_ATTEMPTS: usize = 10_000;

/// Rejection-sampling attempt budget per burst spawn.
pub const BURST_SPAWN_ATTEMPTS: usize = 1_000;

/// Rejection-sampling attempt budget per single-particle reposition.
pub const REPOSITION_ATTEMPTS: usize = 100;
