//! Frame driver
//!
//! Owns the store, the export buffer and the viewer. Hosts call
//! [`Engine::frame`] once per rendered frame with a wall-clock timestamp, or
//! [`Engine::advance`] when they run their own clock and camera.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::export::{FrameUniforms, SphereBuffer};
use crate::settings::{SetupError, Settings};
use crate::sim::{FrameInput, SphereStore, step};
use crate::viewer::OrbitViewer;

/// PCG stream for per-frame shader noise, kept apart from the layout stream
const NOISE_STREAM: u64 = 0xa02b_dbf7_bb3c_0a7;

/// Turns host timestamps into clamped frame deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Seconds since the previous call, clamped to `[0, max_dt]`
    ///
    /// The first call returns 0. Non-finite timestamps return 0 and are not
    /// remembered.
    pub fn tick(&mut self, now: f64) -> f32 {
        if !now.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", now);
            return 0.0;
        }

        let Some(last) = self.last.replace(now) else {
            return 0.0;
        };

        let raw = (now - last) as f32;
        if !(raw >= 0.0) {
            log::warn!("Clock went backwards ({} -> {}), skipping frame", last, now);
            return 0.0;
        }
        if raw > self.max_dt {
            log::warn!("Frame took {:.3}s, clamping dt to {}", raw, self.max_dt);
            return self.max_dt;
        }
        raw
    }
}

/// Simulation instance holding all per-run state
#[derive(Debug, Clone)]
pub struct Engine {
    settings: Settings,
    store: SphereStore,
    buffer: SphereBuffer,
    viewer: OrbitViewer,
    clock: FrameClock,
    noise_rng: Pcg32,
    start_time: Option<f64>,
    frame_count: u64,
}

impl Engine {
    /// Validate settings, seed the store and pre-fill the export buffer
    pub fn new(settings: Settings) -> Result<Self, SetupError> {
        settings.validate()?;

        let store = SphereStore::seeded(settings.seed, settings.active_count)?;
        let mut buffer = SphereBuffer::new();
        buffer.export(&store);

        Ok(Self {
            clock: FrameClock::new(settings.max_frame_dt),
            noise_rng: Pcg32::new(settings.seed, NOISE_STREAM),
            settings,
            store,
            buffer,
            viewer: OrbitViewer::default(),
            start_time: None,
            frame_count: 0,
        })
    }

    /// Run one frame at host time `now` (seconds)
    ///
    /// Moves the viewer, steps the simulation with the viewer as obstacle, and
    /// returns the uniforms to upload with [`Engine::buffer`].
    pub fn frame(&mut self, now: f64) -> FrameUniforms {
        let dt = self.clock.tick(now);
        if now.is_finite() {
            let start = *self.start_time.get_or_insert(now);
            self.viewer.update((now - start) as f32);
        }

        self.advance(dt, self.viewer.position());

        FrameUniforms::new(
            self.viewer.position(),
            self.viewer.direction(),
            self.buffer.active_count(),
            self.noise_rng.random(),
        )
    }

    /// Step with an explicit dt and obstacle, then export
    ///
    /// Out-of-range or non-finite `dt` is clamped into `[0, max_frame_dt]`.
    pub fn advance(&mut self, dt: f32, obstacle: Vec3) -> &SphereBuffer {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.settings.max_frame_dt)
        } else {
            0.0
        };

        step(&mut self.store, &FrameInput { dt, obstacle }, &self.settings);
        self.buffer.export(&self.store);
        self.frame_count += 1;

        &self.buffer
    }

    #[inline]
    pub fn store(&self) -> &SphereStore {
        &self.store
    }

    /// Latest export, valid until the next frame
    #[inline]
    pub fn buffer(&self) -> &SphereBuffer {
        &self.buffer
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn viewer(&self) -> &OrbitViewer {
        &self.viewer
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_clock_first_tick_zero() {
        let mut clock = FrameClock::new(0.1);
        assert_eq!(clock.tick(12.5), 0.0);
        assert!((clock.tick(12.52) - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_clock_clamps_stall() {
        let mut clock = FrameClock::new(0.1);
        clock.tick(0.0);
        assert_eq!(clock.tick(3.0), 0.1);
        // Next delta is measured from the stalled frame, not the one before it
        assert!((clock.tick(3.01) - 0.01).abs() < 1e-5);
    }

    #[test]
    fn test_clock_backwards_is_zero() {
        let mut clock = FrameClock::new(0.1);
        clock.tick(5.0);
        assert_eq!(clock.tick(4.0), 0.0);
    }

    #[test]
    fn test_clock_ignores_non_finite() {
        let mut clock = FrameClock::new(0.1);
        clock.tick(1.0);
        assert_eq!(clock.tick(f64::NAN), 0.0);
        assert_eq!(clock.tick(f64::INFINITY), 0.0);
        assert!((clock.tick(1.02) - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_frame_with_nan_time_keeps_viewer_finite() {
        let mut engine = Engine::new(Settings::default()).unwrap();
        engine.frame(f64::NAN);
        let uniforms = engine.frame(2.0);
        engine.frame(2.016);

        assert!(engine.viewer().position().is_finite());
        assert!(uniforms.camera_pos.iter().all(|f| f.is_finite()));
        for s in engine.store().active() {
            assert!(s.position.is_finite() && s.velocity.is_finite());
        }
    }

    #[test]
    fn test_engine_rejects_over_capacity() {
        let settings = Settings {
            active_count: MAX_SPHERES + 4,
            ..Default::default()
        };
        assert!(matches!(
            Engine::new(settings),
            Err(SetupError::TooManySpheres { .. })
        ));
    }

    #[test]
    fn test_engine_initial_export() {
        let engine = Engine::new(Settings::default()).unwrap();
        assert_eq!(engine.buffer().active_count(), DEFAULT_ACTIVE_COUNT);
        assert_eq!(engine.frame_count(), 0);

        let first = engine.store().active()[0];
        assert_eq!(engine.buffer().records()[0].center, first.position.to_array());
    }

    #[test]
    fn test_engine_frame_uniforms() {
        let mut engine = Engine::new(Settings::default()).unwrap();
        let uniforms = engine.frame(100.0);

        assert_eq!(uniforms.num_spheres, DEFAULT_ACTIVE_COUNT as u32);
        assert_eq!(uniforms.camera_pos, engine.viewer().position().to_array());
        assert_eq!(engine.frame_count(), 1);

        let next = engine.frame(100.016);
        assert_ne!(uniforms.frame_seed, next.frame_seed);
    }

    #[test]
    fn test_advance_sanitizes_dt() {
        let mut engine = Engine::new(Settings::default()).unwrap();
        let before = engine.store().clone();

        engine.advance(f32::NAN, Vec3::new(0.0, 100.0, 0.0));
        engine.advance(-1.0, Vec3::new(0.0, 100.0, 0.0));
        engine.advance(1000.0, Vec3::new(0.0, 100.0, 0.0));

        for s in engine.store().active() {
            assert!(s.position.is_finite() && s.velocity.is_finite());
        }
        assert_ne!(engine.store(), &before);
        assert_eq!(engine.frame_count(), 3);
    }

    #[test]
    fn test_engines_with_same_seed_agree() {
        let mut a = Engine::new(Settings::default()).unwrap();
        let mut b = Engine::new(Settings::default()).unwrap();
        for i in 0..120 {
            let now = i as f64 / 60.0;
            assert_eq!(a.frame(now), b.frame(now));
        }
        assert_eq!(a.buffer(), b.buffer());
    }
}
