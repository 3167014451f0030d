//! Renderer hand-off
//!
//! Flattens the live spheres into a fixed-stride float buffer and packs the
//! per-frame scalars the ray tracer reads next to it.

pub mod sphere_buffer;

pub use sphere_buffer::{FrameUniforms, SphereBuffer, SphereRecord};
