//! Input events consumed by the simulation.
//!
//! The windowing layer owns raw event polling and translates whatever it
//! sees (mouse, touch, key bindings) into these gesture-level events
//! before each tick. The simulation never talks to a window.

use glam::Vec2;

/// Which control gesture a pointer transition belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Pick-up / drag / throw.
    Primary,
    /// Container capture.
    Secondary,
}

/// One externally sourced event, applied at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// The pointer moved, in simulation coordinates.
    PointerMoved(Vec2),
    ButtonPressed(PointerButton),
    ButtonReleased(PointerButton),
    /// Kick every free particle with a random impulse.
    Scatter,
    /// Rejection-sample up to this many new particles into the top band.
    SpawnBurst(usize),
    /// Remove up to this many random particles.
    DespawnBurst(usize),
    /// The viewport changed; particles left outside the new bounds or too
    /// close to the new lower edge get repositioned.
    ViewportResized { width: f32, height: f32 },
}
