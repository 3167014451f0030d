//! Orbiting viewer
//!
//! The camera circles a target at a fixed height and always looks at it. Its
//! position doubles as the obstacle spheres bounce off.

use glam::Vec3;

/// Helicopter-style orbit around a target point
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitViewer {
    pub target: Vec3,
    /// Horizontal distance from the target
    pub orbit_radius: f32,
    /// Height above the target
    pub orbit_height: f32,
    /// Radians per second
    pub orbit_speed: f32,
    position: Vec3,
    direction: Vec3,
}

impl Default for OrbitViewer {
    fn default() -> Self {
        let mut viewer = Self {
            target: Vec3::ZERO,
            orbit_radius: 1.0,
            orbit_height: 0.5,
            orbit_speed: 0.025,
            position: Vec3::ZERO,
            direction: Vec3::Z,
        };
        viewer.update(0.0);
        viewer
    }
}

impl OrbitViewer {
    /// Place the viewer for `elapsed` seconds since start
    pub fn update(&mut self, elapsed: f32) {
        let angle = elapsed * self.orbit_speed;
        self.position = self.target
            + Vec3::new(
                self.orbit_radius * angle.cos(),
                self.orbit_height,
                self.orbit_radius * angle.sin(),
            );
        self.direction = (self.target - self.position).normalize_or(self.direction);
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit look direction toward the target
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}
