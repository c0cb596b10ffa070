//! Slope Runner - a downhill block track and the ball that rolls down it
//!
//! Core modules:
//! - `sim`: Deterministic simulation (block grid, track mesh, level, player physics)
//! - `renderer`: Vertex layout handed to whatever draws the track
//! - `tuning`: Data-driven physics and block dimensions
//! - `ui`: Observer hooks for speed readout and title banner

pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use tuning::{BlockDims, Tuning, TuningError};
pub use ui::{PlayerObserver, TitleBanner};

/// Default tuning constants
///
/// Time is measured in milliseconds (the host's frame delta), distances in
/// world units.
pub mod consts {
    /// Longitudinal velocity per speed level (units/ms)
    pub const BASE_SPEED: f32 = 0.01;
    /// Highest speed level
    pub const MAX_SPEED: u32 = 8;
    /// Throttle accumulator gain per ms of held input
    pub const ACCEL: f32 = 0.006;
    /// Lateral velocity while steering (units/ms)
    pub const SIDE_SPEED: f32 = 0.008;
    /// Vertical impulse when jumping off the ground (units/ms)
    pub const JUMP_SPEED: f32 = 0.02;
    /// Ball radius; also the resting height above the track surface
    pub const PLAYER_RADIUS: f32 = 0.4;
    /// Vertical acceleration (units/ms²)
    pub const GRAVITY: f32 = -0.0001;
    /// Half-size of the square sampled for ground contact
    pub const COLLISION_FUDGE: f32 = 0.3;
    /// Below this height the ball can no longer land
    pub const FALL_NO_RETURN: f32 = -0.4;
    /// Below this height the ball respawns
    pub const FALL_END: f32 = -40.0;
    /// Spawn height above the track surface
    pub const SPAWN_HEIGHT: f32 = 5.0;

    /// Block dimensions in world units
    pub const BLOCK_WIDTH: f32 = 1.0;
    pub const BLOCK_HEIGHT: f32 = 0.5;
    pub const BLOCK_LENGTH: f32 = 2.0;

    /// Banner text shown once the finish line is crossed
    pub const LEVEL_COMPLETE_TEXT: &str = "Level Complete!";
}
