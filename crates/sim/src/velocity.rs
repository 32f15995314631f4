//! Velocity reconciliation: derive post-solve velocities, damp, cap, and
//! commit predicted positions.
//!
//! Runs after constraint projection, against the post-solve grid snapshot
//! (the damping neighbor count depends on which snapshot is queried, so
//! the two-rebuild contract matters here).

use glam::Vec2;

use crate::grid::SpatialGrid;
use crate::particle::Particles;
use crate::physics::TOUCH_SLACK;
use crate::SimParams;

/// Rebuild velocities from the solved predictions and commit positions.
///
/// Free particles get `(predicted - position) / dt`, scaled by the local
/// density damping factor, then capped; the throw cap applies while a
/// release transition is active. Driven particles commit with zero
/// velocity. Finally the floor-rest snap pins low-energy particles
/// sitting on the bottom bound.
pub fn reconcile(
    particles: &mut Particles,
    grid: &SpatialGrid,
    params: &SimParams,
    height: f32,
    dt: f32,
) {
    let touching = touching_counts(particles, grid, params.max_damping_neighbors);

    for (p, &contacts) in particles.list.iter_mut().zip(&touching) {
        if !p.mobility.is_free() {
            p.velocity = Vec2::ZERO;
            p.position = p.predicted;
            continue;
        }

        let mut velocity = (p.predicted - p.position) / dt;

        // Crowded particles bleed energy faster
        let damping = (1.0 - params.viscosity)
            + params.viscosity * params.damping_base.powi(contacts as i32);
        velocity *= damping;

        let cap = if p.in_release_transition() {
            params.throw_velocity_cap
        } else {
            params.velocity_cap
        };
        let speed = velocity.length();
        if speed > cap {
            velocity *= cap / speed;
        }

        p.velocity = velocity;
        p.position = p.predicted;

        // Floor-rest snap: kill low-amplitude jitter at the bottom bound
        if p.position.y + p.radius >= height - params.floor_snap_tolerance
            && p.velocity.y.abs() < params.floor_snap_vy_threshold
        {
            p.position.y = height - p.radius;
            p.velocity.y = 0.0;
            p.predicted = p.position;
        }
    }
}

/// Touching-neighbor count per free particle, saturated at `max`.
/// "Touching" means predicted-distance under the summed radii plus slack.
fn touching_counts(particles: &Particles, grid: &SpatialGrid, max: u32) -> Vec<u32> {
    let mut counts = vec![0u32; particles.len()];
    let mut neighbors = Vec::new();

    for (i, p) in particles.iter().enumerate() {
        if !p.mobility.is_free() {
            continue;
        }
        grid.neighbors_of(p.predicted, &mut neighbors);
        let mut n = 0u32;
        for &j in &neighbors {
            if j == i {
                continue;
            }
            let other = &particles.list[j];
            if p.predicted.distance(other.predicted) < p.radius + other.radius + TOUCH_SLACK {
                n += 1;
            }
        }
        counts[i] = n.min(max);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Mobility;

    const DT: f32 = 1.0 / 60.0;

    fn lone_particle(position: Vec2, predicted: Vec2) -> Particles {
        let mut particles = Particles::new();
        particles.spawn_at(position);
        particles.list[0].predicted = predicted;
        particles
    }

    fn snapshot(particles: &Particles) -> SpatialGrid {
        let mut grid = SpatialGrid::new(80.0);
        grid.rebuild_predicted(particles);
        grid
    }

    #[test]
    fn test_velocity_rebuilt_from_prediction_delta() {
        let params = SimParams::default();
        let mut particles =
            lone_particle(Vec2::new(400.0, 400.0), Vec2::new(401.0, 400.0));
        let grid = snapshot(&particles);

        reconcile(&mut particles, &grid, &params, 800.0, DT);

        let p = &particles.list[0];
        // 1px over one tick at 60Hz = 60 px/s, under the cap, no
        // neighbors so the damping factor is exactly 1
        assert!((p.velocity.x - 60.0).abs() < 1e-3, "vx = {}", p.velocity.x);
        assert_eq!(p.position, Vec2::new(401.0, 400.0));
    }

    #[test]
    fn test_speed_capped_for_free_particles() {
        let params = SimParams::default();
        // 10px in one tick = 600 px/s, over the 300 cap
        let mut particles =
            lone_particle(Vec2::new(400.0, 400.0), Vec2::new(410.0, 400.0));
        let grid = snapshot(&particles);

        reconcile(&mut particles, &grid, &params, 800.0, DT);

        let speed = particles.list[0].speed();
        assert!(
            (speed - params.velocity_cap).abs() < 1e-2,
            "speed = {}",
            speed
        );
    }

    #[test]
    fn test_release_transition_uses_throw_cap() {
        let params = SimParams::default();
        let mut particles =
            lone_particle(Vec2::new(400.0, 400.0), Vec2::new(410.0, 400.0));
        particles.list[0].release_elapsed = 0.0;
        let grid = snapshot(&particles);

        reconcile(&mut particles, &grid, &params, 800.0, DT);

        let speed = particles.list[0].speed();
        assert!(
            (speed - 600.0).abs() < 1e-2,
            "600 px/s is under the throw cap and must survive, got {}",
            speed
        );
    }

    #[test]
    fn test_crowded_particle_is_damped() {
        let params = SimParams::default();
        let mut particles = Particles::new();
        particles.spawn_at(Vec2::new(400.0, 400.0));
        particles.spawn_at(Vec2::new(420.0, 400.0));
        particles.list[0].predicted = Vec2::new(401.0, 400.0);
        particles.list[1].predicted = Vec2::new(420.0, 400.0);
        let grid = snapshot(&particles);

        reconcile(&mut particles, &grid, &params, 800.0, DT);

        let expected =
            60.0 * ((1.0 - params.viscosity) + params.viscosity * params.damping_base);
        let vx = particles.list[0].velocity.x;
        assert!((vx - expected).abs() < 1e-2, "vx = {}, want {}", vx, expected);
    }

    #[test]
    fn test_driven_particle_commits_with_zero_velocity() {
        let params = SimParams::default();
        let mut particles =
            lone_particle(Vec2::new(400.0, 400.0), Vec2::new(410.0, 400.0));
        particles.list[0].mobility = Mobility::Held;
        let grid = snapshot(&particles);

        reconcile(&mut particles, &grid, &params, 800.0, DT);

        let p = &particles.list[0];
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.position, Vec2::new(410.0, 400.0));
    }

    #[test]
    fn test_floor_snap_pins_resting_particle() {
        let params = SimParams::default();
        let height = 800.0;
        let mut particles = Particles::new();
        particles.spawn_at(Vec2::new(400.0, height - 15.0));
        // Drifting up by a sub-tolerance amount, still within snap reach
        particles.list[0].predicted = Vec2::new(400.0, height - 15.04);
        let grid = snapshot(&particles);

        reconcile(&mut particles, &grid, &params, height, DT);

        let p = &particles.list[0];
        assert_eq!(p.position.y, height - p.radius);
        assert_eq!(p.velocity.y, 0.0);
    }
}
