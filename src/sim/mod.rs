//! Deterministic simulation module
//!
//! All track and gameplay logic lives here. This module must be pure and
//! deterministic:
//! - Seeded RNG only (generators take the caller's RNG)
//! - Levels are immutable once built
//! - No rendering or platform dependencies

pub mod collision;
pub mod generate;
pub mod grid;
pub mod level;
pub mod mesher;
pub mod player;
pub mod tick;

pub use collision::{in_ground_band, touches_ground};
pub use generate::{FallingStack, GenerateError, PixelBuffer, RandomWalk, Stamp, hsl_to_rgb};
pub use grid::{BlockGrid, GridError, Rgb};
pub use level::Level;
pub use mesher::{Face, Mesh, build_mesh, visible_faces};
pub use player::Player;
pub use tick::{Control, TickInput, TickOutcome, autopilot_input};
