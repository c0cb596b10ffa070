//! HUD hooks
//!
//! The simulation never touches a display. It reports plain values through
//! `PlayerObserver`; hosts decide how to show them.

use crate::consts::LEVEL_COMPLETE_TEXT;

/// Receives player-facing outputs from the simulation
///
/// All methods default to no-ops so observers only implement what they show.
pub trait PlayerObserver {
    /// The player was (re)spawned on a level with this title
    fn on_spawn(&mut self, _title: &str) {}

    /// Current speed level, reported once per tick
    fn on_speed(&mut self, _speed: u32) {}

    /// The player is grounded past the finish line (reported every such tick)
    fn on_level_complete(&mut self) {}
}

/// Headless runs and tests
impl PlayerObserver for () {}

/// Speed readout plus the single-line title banner
///
/// The banner shows the level title after spawning, clears as soon as the
/// ball starts moving and reads "Level Complete!" while resting past the
/// finish line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleBanner {
    pub speed: u32,
    pub text: String,
}

impl TitleBanner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlayerObserver for TitleBanner {
    fn on_spawn(&mut self, title: &str) {
        self.text = title.to_string();
    }

    fn on_speed(&mut self, speed: u32) {
        self.speed = speed;
        if speed > 0 {
            self.text.clear();
        }
    }

    fn on_level_complete(&mut self) {
        self.text = LEVEL_COMPLETE_TEXT.to_string();
    }
}
