//! Per-frame simulation step
//!
//! Runs the passes in their fixed order: integrate, arena boundaries, sphere
//! pairs, viewer obstacle. Allocation-free; everything happens in the store.

use glam::Vec3;

use super::collision::{resolve_boundaries, resolve_obstacle, resolve_pairs};
use super::integrate::integrate;
use super::state::SphereStore;
use crate::settings::Settings;

/// Inputs for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame (already clamped by the caller)
    pub dt: f32,
    /// Viewer position, used as the obstacle center
    pub obstacle: Vec3,
}

/// Advance the store by one frame
pub fn step(store: &mut SphereStore, input: &FrameInput, settings: &Settings) {
    debug_assert!(input.dt >= 0.0, "negative dt {}", input.dt);

    let spheres = store.active_mut();

    integrate(spheres, settings.gravity, input.dt);
    resolve_boundaries(spheres, settings);
    resolve_pairs(spheres, settings.restitution);
    resolve_obstacle(
        spheres,
        input.obstacle,
        settings.obstacle_radius,
        settings.restitution,
        settings.obstacle_damping,
    );
}
