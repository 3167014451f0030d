//! Sphere Sim - real-time rigid sphere physics for a ray-traced scene
//!
//! Core modules:
//! - `sim`: Deterministic simulation (store, integration, collisions)
//! - `export`: Fixed-stride sphere buffer handed to the renderer
//! - `viewer`: Orbiting viewer that doubles as the moving obstacle
//! - `engine`: Per-frame driver tying the pieces together
//! - `settings`: Data-driven world parameters

pub mod engine;
pub mod export;
pub mod settings;
pub mod sim;
pub mod viewer;

pub use engine::{Engine, FrameClock};
pub use export::{FrameUniforms, SphereBuffer, SphereRecord};
pub use settings::{SetupError, Settings};

/// Simulation configuration constants
pub mod consts {
    /// Capacity of the sphere store (fixed at compile time)
    pub const MAX_SPHERES: usize = 16;
    /// Floats per exported sphere record (renderer layout contract)
    pub const RECORD_STRIDE: usize = 16;

    /// Radius range drawn by the seeded initializer
    pub const MIN_SEED_RADIUS: f32 = 0.1;
    pub const MAX_SEED_RADIUS: f32 = 0.6;

    /// Default world seed
    pub const DEFAULT_SEED: u64 = 1234;
    /// Default number of live spheres
    pub const DEFAULT_ACTIVE_COUNT: usize = 8;

    /// Gravity along -Y (m/s²)
    pub const GRAVITY_Y: f32 = -9.81;
    /// Fraction of normal speed kept after a bounce
    pub const RESTITUTION: f32 = 0.9;
    /// Tangential damping applied on wall contact
    pub const FRICTION: f32 = 0.99;

    /// Floor and ceiling heights
    pub const MIN_Y: f32 = -0.5;
    pub const MAX_Y: f32 = 4.0;
    /// Radius of the containing cylinder around the Y axis
    pub const CYLINDER_RADIUS: f32 = 4.0;

    /// Viewer obstacle
    pub const OBSTACLE_RADIUS: f32 = 0.5;
    pub const OBSTACLE_DAMPING: f32 = 0.9;

    /// Largest dt the frame clock will hand to the simulation (stall guard)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Separations at or below this are treated as coincident
    pub const CONTACT_EPSILON: f32 = 1e-6;
}
