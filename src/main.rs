//! Slope Runner entry point
//!
//! Headless demo: generates a track, then lets the autopilot ride it at a
//! fixed frame rate while logging progress.
//!
//! Usage: `slope-runner [seed] [random-walk|falling-stack]`

use rand::SeedableRng;
use rand_pcg::Pcg32;

use slope_runner::TitleBanner;
use slope_runner::Tuning;
use slope_runner::renderer::MeshVertex;
use slope_runner::sim::{FallingStack, Level, Player, RandomWalk, TickOutcome, autopilot_input};

/// 60 Hz frame in milliseconds
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after this many frames (one minute of play)
const MAX_FRAMES: u32 = 60 * 60;

/// Turns frame timestamps into deltas; the first frame has `dt == 0`
#[derive(Debug, Default)]
struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    fn delta(&mut self, now: f64) -> f32 {
        let last = self.last.unwrap_or(now);
        self.last = Some(now);
        (now - last) as f32
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    let source = args.next().unwrap_or_else(|| "random-walk".to_string());

    log::info!("Slope Runner (headless) starting, seed={seed}, source={source}");

    let mut rng = Pcg32::seed_from_u64(seed);
    let pixels = match source.as_str() {
        "falling-stack" => FallingStack::default().generate(&mut rng),
        _ => RandomWalk::default().generate(&mut rng),
    };
    let pixels = match pixels {
        Ok(pixels) => pixels,
        Err(e) => {
            log::error!("Failed to generate track: {e}");
            std::process::exit(1);
        }
    };

    let tuning = Tuning::default();
    let title = format!("Seed {seed}");
    let level = match pixels.into_grid() {
        Ok(grid) => Level::new(title, grid, &tuning),
        Err(e) => {
            log::error!("Failed to build level: {e}");
            std::process::exit(1);
        }
    };

    let vertices = MeshVertex::interleave(level.mesh());
    log::info!(
        "Track mesh: {} vertices, {} triangles, {} bytes",
        vertices.len(),
        level.mesh().triangle_count(),
        std::mem::size_of_val(vertices.as_slice())
    );

    let mut player = Player::new(tuning);
    let mut banner = TitleBanner::new();
    player.spawn(&level, &mut banner);

    let mut clock = FrameClock::default();
    let mut respawns = 0u32;

    for frame in 0..MAX_FRAMES {
        let dt = clock.delta(frame as f64 * FRAME_MS);
        let input = autopilot_input(&level, &player);

        if player.update(dt, &level, &input, &mut banner) == TickOutcome::Respawned {
            respawns += 1;
        }

        if frame % 60 == 0 {
            log::info!(
                "t={:>4.1}s pos=({:.2}, {:.2}, {:.2}) speed={} '{}'",
                frame as f64 * FRAME_MS / 1000.0,
                player.position.x,
                player.position.y,
                player.position.z,
                banner.speed,
                banner.text
            );
        }

        if player.is_finished() {
            log::info!(
                "{} after {:.1}s ({} respawns)",
                banner.text,
                frame as f64 * FRAME_MS / 1000.0,
                respawns
            );
            return;
        }
    }

    log::warn!("Gave up after {MAX_FRAMES} frames ({respawns} respawns)");
}
