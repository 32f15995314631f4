//! Prediction step: external acceleration and tentative positions.

use glam::Vec2;

use crate::particle::Particles;

/// Apply gravity and compute predicted positions for free particles.
///
/// Held and contained particles are skipped; the interaction layer has
/// already written their position and prediction for this frame.
pub fn predict(particles: &mut Particles, gravity: Vec2, dt: f32) {
    for p in particles.iter_mut() {
        if !p.mobility.is_free() {
            continue;
        }
        p.velocity += gravity * dt;
        p.predicted = p.position + p.velocity * dt;
    }
}
