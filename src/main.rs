use belousov_zhabotinsky::{Simulation, SimulationConfig};
use circular_queue::CircularQueue;
use log::{debug, info};
use std::error::Error;
use std::time::{Duration, Instant};

/// Frames averaged into the reported step time.
const TIMING_WINDOW: usize = 32;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulationConfig::from_env()?;
    info!(
        "running {} on a {}x{} grid for {} frames",
        config.model, config.height, config.width, config.frames
    );
    debug!("{config:?}");

    let mut simulation = Simulation::from_config(&config)?;
    let mut frame_times: CircularQueue<Duration> = CircularQueue::with_capacity(TIMING_WINDOW);

    for frame in 1..=config.frames {
        let started = Instant::now();
        let grid = simulation.advance_frame();
        frame_times.push(started.elapsed());

        let (min, max) = grid.min_max(0).unwrap_or_default();
        let average = frame_times.iter().sum::<Duration>() / frame_times.len() as u32;
        info!(
            "frame {frame}: step {} min {min:.4} mean {:.4} max {max:.4} ({average:?}/frame)",
            simulation.steps_taken(),
            grid.mean(0),
        );
    }

    Ok(())
}
