//! Player state
//!
//! The ball's kinematic state plus the throttle. Per-tick behavior lives in
//! `tick.rs`.

use glam::Vec3;

use super::level::Level;
use crate::tuning::Tuning;
use crate::ui::PlayerObserver;

/// The rolling ball
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Throttle level in `[0, tuning.max_speed]`
    pub speed: u32,
    /// Fractional throttle in `[-1, 1]`; whole crossings change `speed`
    pub(crate) speed_accumulator: f32,
    /// Set on the first grounded tick past the finish line; cleared by `spawn`
    pub completed: bool,
    pub(crate) tuning: Tuning,
}

impl Player {
    /// A player at the origin; call `spawn` before the first tick
    pub fn new(tuning: Tuning) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            speed: 0,
            speed_accumulator: 0.0,
            completed: false,
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn speed_accumulator(&self) -> f32 {
        self.speed_accumulator
    }

    /// Reset everything to the level's start
    pub fn spawn(&mut self, level: &Level, observer: &mut impl PlayerObserver) {
        self.position = level.spawn_position();
        self.velocity = Vec3::ZERO;
        self.speed = 0;
        self.speed_accumulator = 0.0;
        self.completed = false;

        log::debug!("Spawned on '{}' at {:?}", level.title(), self.position);
        observer.on_spawn(level.title());
    }

    /// Whether the finish line has been reached since the last spawn
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.completed
    }
}
