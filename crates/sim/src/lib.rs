//! Ball Pit - Interactive Particle Simulation
//!
//! A prediction-based 2D particle simulation: circular bodies under
//! gravity, confined to the viewport, kept apart by single-pass constraint
//! relaxation over a uniform spatial index, and perturbed by pointer
//! gestures (pick-up and throw, container capture, scatter).
//!
//! This crate is framework-agnostic - it handles simulation only. The
//! windowing layer supplies `dt` and gesture-level [`InputEvent`]s and
//! renders from [`PitSimulation::render_view`].
//!
//! # Example
//!
//! ```
//! use sim::{InputEvent, PitSimulation, PointerButton};
//! use glam::Vec2;
//!
//! let mut sim = PitSimulation::new(800.0, 800.0, 100);
//!
//! // Grab whatever sits at the pointer and drag it for a few ticks
//! sim.update(
//!     1.0 / 60.0,
//!     &[
//!         InputEvent::PointerMoved(Vec2::new(400.0, 400.0)),
//!         InputEvent::ButtonPressed(PointerButton::Primary),
//!     ],
//! );
//! for _ in 0..10 {
//!     sim.update(1.0 / 60.0, &[]);
//! }
//!
//! assert_eq!(sim.particle_count(), 100);
//! ```

pub mod grid;
pub mod input;
pub mod integrate;
pub mod interaction;
pub mod particle;
pub mod physics;
pub mod scene;
pub mod solver;
pub mod velocity;

pub use glam::Vec2;
pub use grid::SpatialGrid;
pub use input::{InputEvent, PointerButton};
pub use interaction::{Container, InteractionState, PointerTracker};
pub use particle::{Mobility, Particle, Particles};
pub use scene::RemovedSwap;

use rand::{rngs::StdRng, SeedableRng};

use crate::physics as ph;

/// Seed for [`PitSimulation::new`]; pick your own with
/// [`PitSimulation::with_seed`].
const DEFAULT_SEED: u64 = 0xBA11;

/// Runtime-tunable simulation parameters.
///
/// Defaults mirror the constants in [`physics`]; every field can be
/// adjusted on a live simulation between ticks.
#[derive(Clone, Copy, Debug)]
pub struct SimParams {
    /// External acceleration in pixels/s².
    pub gravity: Vec2,
    /// Spatial index cell size (fixed property of the simulated space).
    pub cell_size: f32,
    /// Relaxation sweeps per tick. One is enough for a ball pit; more
    /// sweeps converge tighter at linear cost.
    pub solver_iterations: usize,
    /// Blend weight of the neighbor-density damping term (0 disables).
    pub viscosity: f32,
    /// Per-neighbor damping base, raised to the touching count.
    pub damping_base: f32,
    /// Touching-neighbor count at which damping saturates.
    pub max_damping_neighbors: u32,
    /// Normal speed cap, px/s.
    pub velocity_cap: f32,
    /// Speed cap while a release transition is active, px/s.
    pub throw_velocity_cap: f32,
    /// Scalar applied to the pointer velocity estimate on release.
    pub throw_multiplier: f32,
    /// Base scatter impulse magnitude, px/s.
    pub scatter_force: f32,
    /// Bottom-edge distance within which the floor snap can fire, px.
    pub floor_snap_tolerance: f32,
    /// Vertical speed under which the floor snap fires, px/s.
    pub floor_snap_vy_threshold: f32,
    /// Resting particle radius, px.
    pub base_radius: f32,
    /// Radius a held particle grows toward, px.
    pub enlarged_radius: f32,
    /// Seconds for the base-to-enlarged growth after pick-up.
    pub pickup_grow_duration: f32,
    /// Seconds for the shrink back to base after release.
    pub release_shrink_duration: f32,
    /// Seconds of pointer history kept for the velocity estimate.
    pub pointer_window: f32,
    /// Container radius, px.
    pub container_radius: f32,
    /// Capture distance from the secondary press location, px.
    pub capture_radius: f32,
    /// Maximum per-tick jitter step of a contained particle, px.
    pub jitter_amplitude: f32,
    /// Fraction of the admissible offset where the spring leash starts.
    pub spring_fraction: f32,
    /// Proportional gain of the containment spring, 1/s.
    pub spring_stiffness: f32,
    /// Height of the top band used for spawning, px.
    pub spawn_region_height: f32,
    /// Particles closer than this to the bottom edge after a resize get
    /// repositioned, px.
    pub low_edge_margin: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, ph::GRAVITY),
            cell_size: ph::CELL_SIZE,
            solver_iterations: 1,
            viscosity: ph::VISCOSITY,
            damping_base: ph::DAMPING_BASE,
            max_damping_neighbors: ph::MAX_DAMPING_NEIGHBORS,
            velocity_cap: ph::VELOCITY_CAP,
            throw_velocity_cap: ph::THROW_VELOCITY_CAP,
            throw_multiplier: ph::THROW_MULTIPLIER,
            scatter_force: ph::SCATTER_FORCE,
            floor_snap_tolerance: ph::FLOOR_SNAP_TOLERANCE,
            floor_snap_vy_threshold: ph::FLOOR_SNAP_VY_THRESHOLD,
            base_radius: ph::BASE_RADIUS,
            enlarged_radius: ph::ENLARGED_RADIUS,
            pickup_grow_duration: ph::PICKUP_GROW_DURATION,
            release_shrink_duration: ph::RELEASE_SHRINK_DURATION,
            pointer_window: ph::POINTER_WINDOW,
            container_radius: ph::CONTAINER_RADIUS,
            capture_radius: ph::CAPTURE_RADIUS,
            jitter_amplitude: ph::JITTER_AMPLITUDE,
            spring_fraction: ph::SPRING_FRACTION,
            spring_stiffness: ph::SPRING_STIFFNESS,
            spawn_region_height: ph::SPAWN_REGION_HEIGHT,
            low_edge_margin: ph::LOW_EDGE_MARGIN,
        }
    }
}

/// Snapshot of one particle for the presentation layer. Mobility and
/// speed are exposed so color mapping stays a presentation concern.
#[derive(Clone, Copy, Debug)]
pub struct ParticleView {
    pub position: Vec2,
    pub radius: f32,
    pub mobility: Mobility,
    pub speed: f32,
}

/// The simulation context: all particle state, the spatial index, the
/// interaction state machine, and the RNG live here. Constructed once,
/// mutated only inside [`update`](Self::update).
pub struct PitSimulation {
    /// Simulation bounds, pixels.
    pub width: f32,
    pub height: f32,
    /// Tunable parameters.
    pub params: SimParams,
    /// All particles in the simulation.
    pub particles: Particles,
    /// Pointer interaction state (held particle, container, history).
    pub interaction: InteractionState,
    grid: SpatialGrid,
    rng: StdRng,
    /// Accumulated simulation time in seconds.
    clock: f64,
    /// Current simulation frame.
    frame: u64,
}

impl PitSimulation {
    /// Create a simulation with `initial_count` rejection-sampled
    /// particles and the default seed.
    pub fn new(width: f32, height: f32, initial_count: usize) -> Self {
        Self::with_seed(width, height, initial_count, DEFAULT_SEED)
    }

    /// Create a simulation with an explicit RNG seed. Same seed, same
    /// event stream, same trajectory.
    pub fn with_seed(width: f32, height: f32, initial_count: usize, seed: u64) -> Self {
        let params = SimParams::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut particles = Particles::with_capacity(initial_count);
        scene::spawn_initial(&mut particles, initial_count, width, height, &params, &mut rng);

        Self {
            width,
            height,
            params,
            particles,
            interaction: InteractionState::new(),
            grid: SpatialGrid::new(params.cell_size),
            rng,
            clock: 0.0,
            frame: 0,
        }
    }

    /// Run one simulation tick.
    pub fn update(&mut self, dt: f32, events: &[InputEvent]) {
        if dt <= 0.0 {
            return;
        }
        self.clock += dt as f64;

        // 1. External events: gestures, commands, viewport changes
        self.process_events(events);
        self.interaction
            .sample_pointer(self.clock, self.params.pointer_window);

        // 2. Direct manipulation: held/contained placement, radius easing
        self.interaction
            .drive(&mut self.particles, &self.params, &mut self.rng, dt);

        // 3. Integrate free particles to predicted positions
        integrate::predict(&mut self.particles, self.params.gravity, dt);

        // 4. First snapshot: the index reflects pre-solve predictions
        self.grid.rebuild_predicted(&self.particles);

        // 5. Constraint projection: bounds, pairwise overlaps, container
        solver::enforce_bounds(&mut self.particles, self.width, self.height);
        solver::relax_overlaps(
            &mut self.particles,
            &self.grid,
            self.interaction.container.as_ref(),
            self.params.solver_iterations,
        );
        if let Some(container) = self.interaction.container {
            solver::settle_contained(&mut self.particles, &container);
        }
        // Relaxation can push predictions back over a wall; close the
        // solve with a second clamp so the boundary invariant holds
        solver::enforce_bounds(&mut self.particles, self.width, self.height);

        // 6. Second snapshot: damping neighbor counts query post-solve
        //    predictions
        self.grid.rebuild_predicted(&self.particles);

        // 7. Velocity reconciliation and position commit
        velocity::reconcile(
            &mut self.particles,
            &self.grid,
            &self.params,
            self.height,
            dt,
        );

        self.frame = self.frame.wrapping_add(1);
    }

    fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            match *event {
                InputEvent::PointerMoved(pos) => self.interaction.pointer = pos,
                InputEvent::ButtonPressed(PointerButton::Primary) => {
                    self.interaction.press_primary(&mut self.particles, &self.params);
                }
                InputEvent::ButtonReleased(PointerButton::Primary) => {
                    self.interaction.release_primary(&mut self.particles, &self.params);
                }
                InputEvent::ButtonPressed(PointerButton::Secondary) => {
                    self.interaction.press_secondary(&mut self.particles, &self.params);
                }
                InputEvent::ButtonReleased(PointerButton::Secondary) => {
                    self.interaction.release_secondary(&mut self.particles, &self.params);
                }
                InputEvent::Scatter => {
                    interaction::scatter(&mut self.particles, &self.params, &mut self.rng);
                }
                InputEvent::SpawnBurst(count) => {
                    scene::add_burst(
                        &mut self.particles,
                        count,
                        self.width,
                        &self.params,
                        &mut self.rng,
                    );
                }
                InputEvent::DespawnBurst(count) => {
                    let swaps = scene::remove_random(&mut self.particles, count, &mut self.rng);
                    self.interaction.apply_removals(&swaps);
                }
                InputEvent::ViewportResized { width, height } => {
                    self.apply_resize(width, height);
                }
            }
        }
    }

    /// Adopt new bounds; free particles left outside them or too close to
    /// the new lower edge get repositioned into the top band, the held
    /// particle and the container are clamped inside.
    fn apply_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;

        for i in 0..self.particles.len() {
            let p = &self.particles.list[i];
            if !p.mobility.is_free() {
                continue;
            }
            let out = p.position.x - p.radius < 0.0
                || p.position.x + p.radius > width
                || p.position.y - p.radius < 0.0
                || p.position.y + p.radius > height
                || p.position.y > height - self.params.low_edge_margin;
            if out {
                scene::reposition(
                    &mut self.particles,
                    i,
                    width,
                    height,
                    &self.params,
                    &mut self.rng,
                );
            }
        }

        if let Some(i) = self.interaction.held {
            let p = &mut self.particles.list[i];
            p.position.x = p.position.x.clamp(p.radius, (width - p.radius).max(p.radius));
            p.position.y = p.position.y.clamp(p.radius, (height - p.radius).max(p.radius));
            p.predicted = p.position;
        }
        if let Some(c) = self.interaction.container.as_mut() {
            c.position.x = c.position.x.clamp(c.radius, (width - c.radius).max(c.radius));
            c.position.y = c.position.y.clamp(c.radius, (height - c.radius).max(c.radius));
        }
    }

    /// Total particle count.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Current simulation frame.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Accumulated simulation time in seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Per-particle snapshots for drawing.
    pub fn render_view(&self) -> Vec<ParticleView> {
        self.particles
            .iter()
            .map(|p| ParticleView {
                position: p.position,
                radius: p.radius,
                mobility: p.mobility,
                speed: p.speed(),
            })
            .collect()
    }

    /// The live container, if any.
    pub fn container_view(&self) -> Option<Container> {
        self.interaction.container
    }
}
