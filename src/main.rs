//! Sphere Sim headless driver
//!
//! Runs the simulation at a fixed 60 Hz without a renderer, logging a summary
//! once per simulated second and printing the final store as JSON.
//!
//! Usage: `sphere-sim [settings.json] [frames]`

use std::process::ExitCode;

use sphere_sim::{Engine, Settings};

/// Frames to run when none are given on the command line
const DEFAULT_FRAMES: u64 = 600;
const FRAME_RATE: f64 = 60.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Sphere Sim (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::from_json_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::error!("Invalid frame count: {}", e);
            return ExitCode::FAILURE;
        }
        None => DEFAULT_FRAMES,
    };

    let mut engine = match Engine::new(settings) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Running {} frames with {} spheres (seed {})",
        frames,
        engine.store().active_count(),
        engine.settings().seed
    );

    for frame in 0..frames {
        let now = frame as f64 / FRAME_RATE;
        let uniforms = engine.frame(now);

        if frame % FRAME_RATE as u64 == 0 {
            let spheres = engine.store().active();
            let lowest = spheres
                .iter()
                .map(|s| s.position.y - s.radius)
                .fold(f32::INFINITY, f32::min);
            let energy: f32 = spheres
                .iter()
                .map(|s| 0.5 * s.mass * s.velocity.length_squared())
                .sum();
            log::debug!(
                "t={:.1}s viewer={:?} lowest={:.3} kinetic={:.5}",
                now,
                uniforms.camera_pos,
                lowest,
                energy
            );
        }
    }

    match serde_json::to_string_pretty(engine.store().active()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize final state: {}", e);
            return ExitCode::FAILURE;
        }
    }

    log::info!("Done after {} frames", engine.frame_count());
    ExitCode::SUCCESS
}
