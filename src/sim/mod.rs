//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Seeded RNG only (at startup)
//! - Stable iteration order (by slot index)
//! - No allocation after the store is built
//! - No rendering or platform dependencies

pub mod collision;
pub mod integrate;
pub mod state;
pub mod tick;

pub use collision::{
    Contact, resolve_boundaries, resolve_cylinder_wall, resolve_floor_ceiling, resolve_obstacle,
    resolve_pair, resolve_pairs, sphere_contact,
};
pub use integrate::integrate;
pub use state::{Sphere, SphereStore, mass_for_radius};
pub use tick::{FrameInput, step};
