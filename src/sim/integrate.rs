//! Explicit Euler integration under constant gravity

use glam::Vec3;

use super::state::{Sphere, mass_for_radius};

/// Advance every sphere by `dt` seconds
///
/// Velocity is updated before position (semi-implicit Euler), so a sphere
/// released from rest moves on the very first step.
pub fn integrate(spheres: &mut [Sphere], gravity: Vec3, dt: f32) {
    for sphere in spheres.iter_mut() {
        sphere.acceleration = Vec3::ZERO;
        sphere.acceleration += gravity;

        sphere.mass = mass_for_radius(sphere.radius);

        sphere.velocity += sphere.acceleration * dt;
        sphere.position += sphere.velocity * dt;
    }
}
