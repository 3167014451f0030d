//! GPU-side sphere layout
//!
//! Record layout is shared with the ray tracing shader's `SpheresUBO` block
//! and must not be reordered on one side only.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::consts::*;
use crate::sim::{Sphere, SphereStore};

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

/// One exported sphere, `RECORD_STRIDE` floats
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SphereRecord {
    pub center: [f32; 3], // offset 0
    pub radius: f32,      // offset 12
    pub color: [f32; 4],  // offset 16
    _reserved: [f32; 5],  // offset 32 - always zero
    pub roughness: f32,   // offset 52
    pub metallic: f32,    // offset 56
    _pad: f32,            // offset 60 - pad to 64 bytes
}

const _: () = assert!(std::mem::size_of::<SphereRecord>() == RECORD_STRIDE * 4);

impl From<&Sphere> for SphereRecord {
    fn from(sphere: &Sphere) -> Self {
        Self {
            center: sphere.position.to_array(),
            radius: sphere.radius,
            color: sphere.color.to_array(),
            _reserved: [0.0; 5],
            roughness: sphere.roughness,
            metallic: sphere.metallic,
            _pad: 0.0,
        }
    }
}

/// Pre-allocated export buffer covering every store slot
///
/// Only the first `active_count` records are refreshed by [`SphereBuffer::export`];
/// the rest keep whatever they held before.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereBuffer {
    records: [SphereRecord; MAX_SPHERES],
    active_count: usize,
}

impl Default for SphereBuffer {
    fn default() -> Self {
        Self {
            records: [SphereRecord::zeroed(); MAX_SPHERES],
            active_count: 0,
        }
    }
}

impl SphereBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the leading records with the store's live spheres
    pub fn export(&mut self, store: &SphereStore) {
        for (record, sphere) in self.records.iter_mut().zip(store.active()) {
            *record = SphereRecord::from(sphere);
        }
        self.active_count = store.active_count();
    }

    /// How many leading records are valid
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// All records, valid and stale
    #[inline]
    pub fn records(&self) -> &[SphereRecord; MAX_SPHERES] {
        &self.records
    }

    /// `MAX_SPHERES * RECORD_STRIDE` floats, ready for a uniform buffer upload
    #[inline]
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.records)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }
}

/// Per-frame scalars uploaded beside the sphere buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub camera_pos: [f32; 3], // offset 0
    pub num_spheres: u32,     // offset 12
    pub camera_dir: [f32; 3], // offset 16
    pub frame_seed: u32,      // offset 28 - fresh noise seed for the path tracer
}

impl FrameUniforms {
    pub fn new(camera_pos: Vec3, camera_dir: Vec3, num_spheres: usize, frame_seed: u32) -> Self {
        Self {
            camera_pos: camera_pos.to_array(),
            num_spheres: num_spheres as u32,
            camera_dir: camera_dir.to_array(),
            frame_seed,
        }
    }
}
