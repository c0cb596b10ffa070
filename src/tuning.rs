//! Data-driven tuning
//!
//! Every physics constant and the block dimensions live in one immutable
//! struct handed to `Level` and `Player` at construction, so alternate
//! tunings can be loaded from JSON or built in tests.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Failed to parse tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// World-space size of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockDims {
    /// X extent per column
    pub width: f32,
    /// Y extent of a wall (top surface to wall bottom)
    pub height: f32,
    /// Z extent per row
    pub length: f32,
}

impl Default for BlockDims {
    fn default() -> Self {
        Self {
            width: BLOCK_WIDTH,
            height: BLOCK_HEIGHT,
            length: BLOCK_LENGTH,
        }
    }
}

impl BlockDims {
    /// Per-axis scale taking mesh-local coordinates to world space
    pub fn scale(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.length)
    }
}

/// Physics and level-layout tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub base_speed: f32,
    pub max_speed: u32,
    pub accel: f32,
    pub side_speed: f32,
    pub jump_speed: f32,
    pub player_radius: f32,
    pub gravity: f32,
    pub collision_fudge: f32,
    pub fall_no_return: f32,
    pub fall_end: f32,
    pub spawn_height: f32,
    pub block: BlockDims,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            max_speed: MAX_SPEED,
            accel: ACCEL,
            side_speed: SIDE_SPEED,
            jump_speed: JUMP_SPEED,
            player_radius: PLAYER_RADIUS,
            gravity: GRAVITY,
            collision_fudge: COLLISION_FUDGE,
            fall_no_return: FALL_NO_RETURN,
            fall_end: FALL_END,
            spawn_height: SPAWN_HEIGHT,
            block: BlockDims::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the active tuning)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let b = &self.block;
        if !(b.width > 0.0 && b.height > 0.0 && b.length > 0.0) {
            return Err(TuningError::Invalid(format!(
                "block dimensions must be positive, got {}x{}x{}",
                b.width, b.height, b.length
            )));
        }
        if self.max_speed == 0 {
            return Err(TuningError::Invalid("max_speed must be at least 1".into()));
        }
        if self.player_radius <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "player_radius must be positive, got {}",
                self.player_radius
            )));
        }
        if self.gravity >= 0.0 {
            return Err(TuningError::Invalid(format!(
                "gravity must pull downward, got {}",
                self.gravity
            )));
        }
        if !(self.fall_end < self.fall_no_return && self.fall_no_return < self.player_radius) {
            return Err(TuningError::Invalid(format!(
                "expected fall_end < fall_no_return < player_radius, got {} / {} / {}",
                self.fall_end, self.fall_no_return, self.player_radius
            )));
        }
        Ok(())
    }
}
