//! World settings
//!
//! Loaded once at startup (optionally from JSON) and validated before the
//! sphere store is seeded. Nothing here is consulted for errors per frame.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors surfaced while setting up a simulation
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// More live spheres were requested than the store can hold.
    #[error("requested {requested} spheres but the store holds at most {capacity}")]
    TooManySpheres { requested: usize, capacity: usize },
    /// A sphere handed to the store has a non-positive or non-finite radius.
    #[error("sphere {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },
    /// A world parameter is out of its allowed range.
    #[error("setting `{name}` has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f32 },
    /// The settings file could not be read.
    #[error("failed to read settings file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid JSON for [`Settings`].
    #[error("failed to parse settings")]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
}

/// World parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the initial sphere layout
    pub seed: u64,
    /// Number of live spheres (at most `MAX_SPHERES`)
    pub active_count: usize,

    // === Forces ===
    pub gravity: Vec3,

    // === Contact response ===
    /// Normal speed kept after any bounce (0.0 - 1.0)
    pub restitution: f32,
    /// Tangential velocity kept after a wall contact (0.0 - 1.0)
    pub friction: f32,

    // === Arena ===
    pub min_y: f32,
    pub max_y: f32,
    pub cylinder_radius: f32,

    // === Viewer obstacle ===
    pub obstacle_radius: f32,
    /// Velocity kept after bouncing off the viewer (0.0 - 1.0)
    pub obstacle_damping: f32,

    /// Longest frame the clock will report, in seconds
    pub max_frame_dt: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            active_count: DEFAULT_ACTIVE_COUNT,

            gravity: Vec3::new(0.0, GRAVITY_Y, 0.0),

            restitution: RESTITUTION,
            friction: FRICTION,

            min_y: MIN_Y,
            max_y: MAX_Y,
            cylinder_radius: CYLINDER_RADIUS,

            obstacle_radius: OBSTACLE_RADIUS,
            obstacle_damping: OBSTACLE_DAMPING,

            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, SetupError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|source| SetupError::Parse { path: None, source })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&contents).map_err(|source| SetupError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check every parameter against its allowed range
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.active_count > MAX_SPHERES {
            return Err(SetupError::TooManySpheres {
                requested: self.active_count,
                capacity: MAX_SPHERES,
            });
        }

        for (name, value) in [
            ("restitution", self.restitution),
            ("friction", self.friction),
            ("obstacle_damping", self.obstacle_damping),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SetupError::InvalidParameter { name, value });
            }
        }

        for (name, value) in [
            ("cylinder_radius", self.cylinder_radius),
            ("obstacle_radius", self.obstacle_radius),
            ("max_frame_dt", self.max_frame_dt),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SetupError::InvalidParameter { name, value });
            }
        }

        if !self.gravity.is_finite() {
            return Err(SetupError::InvalidParameter {
                name: "gravity",
                value: self.gravity.y,
            });
        }
        if !self.min_y.is_finite() {
            return Err(SetupError::InvalidParameter {
                name: "min_y",
                value: self.min_y,
            });
        }
        // Every seeded sphere must fit between the walls and between floor and ceiling
        if !(self.cylinder_radius > MAX_SEED_RADIUS) {
            return Err(SetupError::InvalidParameter {
                name: "cylinder_radius",
                value: self.cylinder_radius,
            });
        }
        if !(self.max_y.is_finite() && self.max_y - self.min_y > 2.0 * MAX_SEED_RADIUS) {
            return Err(SetupError::InvalidParameter {
                name: "max_y",
                value: self.max_y,
            });
        }

        Ok(())
    }
}
