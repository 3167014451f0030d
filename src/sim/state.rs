//! Sphere records and the fixed-capacity store
//!
//! The store is sized once at compile time and filled once at startup. Slots
//! past `active_count` are never read by the simulation or the exporter.

use glam::{Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::SetupError;

/// Mass of a unit-density sphere of the given radius
#[inline]
pub fn mass_for_radius(radius: f32) -> f32 {
    radius * radius * radius
}

/// A single rigid sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Accumulated acceleration for the current step
    pub acceleration: Vec3,
    pub radius: f32,
    /// Cached `radius³`, refreshed every integration step
    pub mass: f32,
    // Render-only attributes, carried through untouched
    pub color: Vec4,
    pub roughness: f32,
    pub metallic: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }
}

impl Sphere {
    /// A resting white sphere
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            radius,
            mass: mass_for_radius(radius),
            color: Vec4::ONE,
            roughness: 0.0,
            metallic: 0.95,
        }
    }

    /// Builder-style velocity override
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Draw a sphere from the layout distribution
    ///
    /// Draw order is part of the determinism contract: radius, position
    /// x/y/z, velocity x/y/z, roughness.
    fn random(rng: &mut Pcg32) -> Self {
        let radius = MIN_SEED_RADIUS + rng.random::<f32>() * (MAX_SEED_RADIUS - MIN_SEED_RADIUS);
        let position = Vec3::new(
            rng.random::<f32>() * 8.0 - 4.0, // spread X
            rng.random::<f32>() * 2.0,       // drop height
            rng.random::<f32>() * 8.0 - 4.0, // spread Z
        );
        let velocity = Vec3::new(
            rng.random::<f32>() - 0.5,
            rng.random::<f32>() - 0.5,
            rng.random::<f32>() - 0.5,
        );
        let roughness = rng.random::<f32>() * 0.01;

        Self {
            velocity,
            roughness,
            metallic: 0.95,
            ..Self::new(position, radius)
        }
    }
}

/// Fixed-capacity arena of spheres, addressed by slot index
///
/// Serializes as the list of live spheres. Deserializing goes through
/// [`SphereStore::from_spheres`], so capacity and radius checks still apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sphere>", into = "Vec<Sphere>")]
pub struct SphereStore {
    spheres: [Sphere; MAX_SPHERES],
    active_count: usize,
}

impl SphereStore {
    /// Seed `active_count` spheres from `seed` using PCG32
    pub fn seeded(seed: u64, active_count: usize) -> Result<Self, SetupError> {
        check_capacity(active_count)?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut spheres = [Sphere::default(); MAX_SPHERES];
        for sphere in spheres.iter_mut().take(active_count) {
            *sphere = Sphere::random(&mut rng);
        }

        log::info!("Seeded {} spheres with seed {}", active_count, seed);
        Ok(Self {
            spheres,
            active_count,
        })
    }

    /// Build a store from explicit spheres (scenes, tests)
    pub fn from_spheres(initial: &[Sphere]) -> Result<Self, SetupError> {
        check_capacity(initial.len())?;

        let mut spheres = [Sphere::default(); MAX_SPHERES];
        for (index, (slot, sphere)) in spheres.iter_mut().zip(initial).enumerate() {
            if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                return Err(SetupError::InvalidRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            *slot = Sphere {
                mass: mass_for_radius(sphere.radius),
                ..*sphere
            };
        }

        Ok(Self {
            spheres,
            active_count: initial.len(),
        })
    }

    /// Number of live spheres
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Live spheres, in slot order
    #[inline]
    pub fn active(&self) -> &[Sphere] {
        &self.spheres[..self.active_count]
    }

    /// Live spheres, mutable, in slot order
    #[inline]
    pub(crate) fn active_mut(&mut self) -> &mut [Sphere] {
        &mut self.spheres[..self.active_count]
    }
}

impl TryFrom<Vec<Sphere>> for SphereStore {
    type Error = SetupError;

    fn try_from(spheres: Vec<Sphere>) -> Result<Self, Self::Error> {
        Self::from_spheres(&spheres)
    }
}

impl From<SphereStore> for Vec<Sphere> {
    fn from(store: SphereStore) -> Self {
        store.active().to_vec()
    }
}

fn check_capacity(requested: usize) -> Result<(), SetupError> {
    if requested > MAX_SPHERES {
        return Err(SetupError::TooManySpheres {
            requested,
            capacity: MAX_SPHERES,
        });
    }
    Ok(())
}
