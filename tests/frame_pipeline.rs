//! End-to-end frame pipeline tests
//!
//! Drives the full engine (clock, viewer, step, export) the way a host render
//! loop would, without any GPU.

use glam::{Vec2, Vec3};
use sphere_sim::consts::*;
use sphere_sim::sim::Sphere;
use sphere_sim::{Engine, Settings};

/// Runs an engine at a fixed frame rate and records every exported buffer
struct FrameHarness {
    engine: Engine,
    frame_rate: f64,
    exports: Vec<Vec<f32>>,
}

impl FrameHarness {
    fn new(settings: Settings, frame_rate: f64) -> Self {
        Self {
            engine: Engine::new(settings).expect("valid settings"),
            frame_rate,
            exports: Vec::new(),
        }
    }

    /// Full frames: clock, orbiting viewer, step, export
    fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            let now = self.exports.len() as f64 / self.frame_rate;
            self.engine.frame(now);
            self.exports.push(self.engine.buffer().as_floats().to_vec());
        }
    }

    /// Fixed-dt frames with the obstacle parked somewhere else
    fn run_with_obstacle(&mut self, frames: u64, obstacle: Vec3) {
        let dt = (1.0 / self.frame_rate) as f32;
        for _ in 0..frames {
            let floats = self.engine.advance(dt, obstacle).as_floats().to_vec();
            self.exports.push(floats);
        }
    }

    fn live_spheres(&self) -> &[Sphere] {
        self.engine.store().active()
    }
}

#[test]
fn test_many_frames_stay_finite() {
    let mut harness = FrameHarness::new(Settings::default(), 60.0);
    harness.run(1800);

    for s in harness.live_spheres() {
        assert!(s.position.is_finite(), "position went non-finite: {:?}", s);
        assert!(s.velocity.is_finite(), "velocity went non-finite: {:?}", s);
    }
    for export in &harness.exports {
        assert_eq!(export.len(), MAX_SPHERES * RECORD_STRIDE);
        assert!(export.iter().all(|f| f.is_finite()));
    }
}

#[test]
fn test_spheres_settle_inside_arena() {
    let settings = Settings {
        active_count: MAX_SPHERES,
        ..Default::default()
    };
    let mut harness = FrameHarness::new(settings.clone(), 60.0);
    harness.run_with_obstacle(1200, Vec3::new(0.0, 100.0, 0.0));

    // The pair pass runs after the walls and may leave small overlaps, never large ones
    let slack = 0.5;
    for s in harness.live_spheres() {
        let horizontal = Vec2::new(s.position.x, s.position.z).length();
        assert!(horizontal <= settings.cylinder_radius - s.radius + slack);
        assert!(s.position.y - s.radius >= settings.min_y - slack);
        assert!(s.position.y + s.radius <= settings.max_y + slack);
    }
}

#[test]
fn test_same_seed_same_trajectory() {
    let mut a = FrameHarness::new(Settings::default(), 60.0);
    let mut b = FrameHarness::new(Settings::default(), 60.0);
    a.run(300);
    b.run(300);
    assert_eq!(a.exports, b.exports);
}

#[test]
fn test_different_seed_different_layout() {
    let mut a = FrameHarness::new(Settings::default(), 60.0);
    let mut b = FrameHarness::new(
        Settings {
            seed: 4321,
            ..Default::default()
        },
        60.0,
    );
    a.run(1);
    b.run(1);
    assert_ne!(a.exports[0], b.exports[0]);
}

#[test]
fn test_export_tracks_store() {
    let mut harness = FrameHarness::new(Settings::default(), 60.0);
    harness.run(90);

    let export = harness.exports.last().unwrap();
    for (i, s) in harness.live_spheres().iter().enumerate() {
        let record = &export[i * RECORD_STRIDE..(i + 1) * RECORD_STRIDE];
        assert_eq!(&record[0..3], &s.position.to_array());
        assert_eq!(record[3], s.radius);
        assert_eq!(&record[4..8], &s.color.to_array());
        assert!(record[8..13].iter().all(|&f| f == 0.0));
        assert_eq!(record[13], s.roughness);
        assert_eq!(record[14], s.metallic);
        assert_eq!(record[15], 0.0);
    }
}

#[test]
fn test_empty_store_exports_nothing() {
    let mut engine = Engine::new(Settings {
        active_count: 0,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(engine.buffer().active_count(), 0);

    // With no spheres the step is a no-op but still exports
    let obstacle = Vec3::new(0.0, 0.5, 0.0);
    let buffer = engine.advance(1.0 / 60.0, obstacle);
    assert!(buffer.as_floats().iter().all(|&f| f == 0.0));
}
