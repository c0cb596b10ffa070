//! Per-frame player update
//!
//! Advances the ball by one host frame: steering, gravity, throttle,
//! explicit Euler integration, then ground contact against the level.
//! `dt` is taken as-is; a stalled frame produces one large step.

use super::collision::{in_ground_band, touches_ground};
use super::level::Level;
use super::player::Player;
use crate::ui::PlayerObserver;

/// Logical controls the host maps its input devices onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    SteerLeft,
    SteerRight,
    Accelerate,
    Decelerate,
    Jump,
}

impl Control {
    /// Default keyboard mapping (DOM `KeyboardEvent.key` names)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Control::SteerLeft),
            "ArrowRight" => Some(Control::SteerRight),
            "ArrowUp" => Some(Control::Accelerate),
            "ArrowDown" => Some(Control::Decelerate),
            " " => Some(Control::Jump),
            _ => None,
        }
    }
}

/// Controls held during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub steer_left: bool,
    pub steer_right: bool,
    pub accelerate: bool,
    pub decelerate: bool,
    pub jump: bool,
}

impl TickInput {
    /// Input from the set of currently pressed key names; unknown keys are ignored
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        keys.into_iter().filter_map(Control::from_key).collect()
    }

    pub fn press(&mut self, control: Control) {
        *self.slot(control) = true;
    }

    pub fn release(&mut self, control: Control) {
        *self.slot(control) = false;
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        match control {
            Control::SteerLeft => self.steer_left,
            Control::SteerRight => self.steer_right,
            Control::Accelerate => self.accelerate,
            Control::Decelerate => self.decelerate,
            Control::Jump => self.jump,
        }
    }

    fn slot(&mut self, control: Control) -> &mut bool {
        match control {
            Control::SteerLeft => &mut self.steer_left,
            Control::SteerRight => &mut self.steer_right,
            Control::Accelerate => &mut self.accelerate,
            Control::Decelerate => &mut self.decelerate,
            Control::Jump => &mut self.jump,
        }
    }
}

impl FromIterator<Control> for TickInput {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        let mut input = TickInput::default();
        for control in iter {
            input.press(control);
        }
        input
    }
}

/// What the ball did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No ground contact
    Airborne,
    /// Resting on (or bouncing off) a block top
    Grounded,
    /// Fell past the point of no return and was reset to the spawn
    Respawned,
}

impl Player {
    /// Advance the player by `dt` milliseconds
    pub fn update(
        &mut self,
        dt: f32,
        level: &Level,
        input: &TickInput,
        observer: &mut impl PlayerObserver,
    ) -> TickOutcome {
        let t = self.tuning;

        // Steering is instantaneous; left wins if both are held
        self.velocity.x = if input.steer_left {
            -t.side_speed
        } else if input.steer_right {
            t.side_speed
        } else {
            0.0
        };

        self.velocity.y += t.gravity * dt;

        self.ratchet_throttle(dt, input);
        self.velocity.z = -t.base_speed * self.speed as f32;
        observer.on_speed(self.speed);

        self.position += self.velocity * dt;

        let grounded = in_ground_band(self.position.y, t.fall_no_return, t.player_radius)
            && touches_ground(level, self.position, t.collision_fudge);

        if grounded {
            self.position.y = t.player_radius;
            self.velocity.y = if input.jump { t.jump_speed } else { 0.0 };

            if !self.completed && level.across_finish_line(self.position.z) {
                log::debug!("Finished '{}' at z={:.2}", level.title(), self.position.z);
                self.completed = true;
                observer.on_level_complete();
            }
            TickOutcome::Grounded
        } else if self.position.y < t.fall_end {
            log::debug!("Fell off '{}' at {:?}, respawning", level.title(), self.position);
            self.spawn(level, observer);
            TickOutcome::Respawned
        } else {
            TickOutcome::Airborne
        }
    }

    /// Convert held accelerate/decelerate into whole speed steps
    ///
    /// A fresh press pre-loads the accumulator to +/-1 so the first tick
    /// already shifts a gear. At most one shift per tick. Releasing both
    /// snaps the accumulator to zero without touching `speed`.
    fn ratchet_throttle(&mut self, dt: f32, input: &TickInput) {
        let step = self.tuning.accel * dt;

        if input.accelerate {
            if self.speed_accumulator == 0.0 {
                self.speed_accumulator = 1.0;
            }
            self.speed_accumulator += step;

            if self.speed_accumulator > 1.0 {
                self.speed = (self.speed + 1).min(self.tuning.max_speed);
                self.speed_accumulator -= 1.0;
            }
        } else if input.decelerate {
            if self.speed_accumulator == 0.0 {
                self.speed_accumulator = -1.0;
            }
            self.speed_accumulator -= step;

            if self.speed_accumulator < -1.0 {
                self.speed = self.speed.saturating_sub(1);
                self.speed_accumulator += 1.0;
            }
        } else {
            self.speed_accumulator = 0.0;
        }
    }
}

/// Demo-mode driver: full throttle, steer toward the nearest solid column a
/// few rows ahead and jump when the track ahead is missing
pub fn autopilot_input(level: &Level, player: &Player) -> TickInput {
    let block = level.block_dims();
    let grid = level.grid();
    let lookahead = player.position.z - 1.5 * block.length;

    let mut input = TickInput {
        accelerate: true,
        ..Default::default()
    };

    if lookahead < 0.0 {
        return input;
    }

    let row = (lookahead / block.length).floor() as usize;
    let target = (0..grid.cols())
        .filter(|&col| grid.is_solid(col, row))
        .map(|col| (col as f32 + 0.5) * block.width)
        .min_by(|a, b| (a - player.position.x).abs().total_cmp(&(b - player.position.x).abs()));

    match target {
        Some(x) => {
            let dx = x - player.position.x;
            if dx < -0.2 {
                input.steer_left = true;
            } else if dx > 0.2 {
                input.steer_right = true;
            }
        }
        None => input.jump = true,
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use crate::ui::{PlayerObserver, TitleBanner};
    use glam::Vec3;
    use proptest::prelude::*;

    const DT: f32 = 16.0;

    fn accel_only() -> TickInput {
        TickInput {
            accelerate: true,
            ..Default::default()
        }
    }

    /// accel * DT == 0.25 exactly, so accumulator sums stay exact
    fn quarter_step_tuning() -> Tuning {
        Tuning {
            accel: 0.25 / DT,
            ..Tuning::default()
        }
    }

    fn flat_level(cols: usize, rows: usize) -> Level {
        let pixels = vec![0xFF40_A040; cols * rows];
        Level::from_pixels("Flat", cols, rows, &pixels, &Tuning::default()).unwrap()
    }

    #[derive(Default)]
    struct CompletionCounter(u32);

    impl PlayerObserver for CompletionCounter {
        fn on_level_complete(&mut self) {
            self.0 += 1;
        }
    }

    fn grounded_player(tuning: Tuning, x: f32, z: f32) -> Player {
        let mut player = Player::new(tuning);
        player.position = Vec3::new(x, tuning.player_radius, z);
        player
    }

    #[test]
    fn test_key_mapping() {
        let input = TickInput::from_keys(["ArrowUp", "ArrowLeft", "Shift", " "]);
        assert!(input.accelerate);
        assert!(input.steer_left);
        assert!(input.jump);
        assert!(!input.steer_right);
        assert!(!input.decelerate);
        assert!(input.is_pressed(Control::Jump));
    }

    #[test]
    fn test_press_release() {
        let mut input = TickInput::default();
        input.press(Control::SteerRight);
        assert!(input.steer_right);
        input.release(Control::SteerRight);
        assert_eq!(input, TickInput::default());
    }

    #[test]
    fn test_throttle_ratchet_schedule() {
        let level = flat_level(3, 40);
        let mut player = grounded_player(quarter_step_tuning(), 1.5, 70.0);

        // Tick 1 pre-loads and shifts; then one shift per 4 further ticks
        // (an accumulator of exactly 1.0 has not crossed yet)
        let mut speeds = Vec::new();
        for _ in 0..9 {
            player.update(DT, &level, &accel_only(), &mut ());
            speeds.push(player.speed);
        }
        assert_eq!(speeds, vec![1, 1, 1, 1, 2, 2, 2, 2, 3]);
    }

    #[test]
    fn test_throttle_clamps_at_max() {
        let tuning = Tuning {
            max_speed: 2,
            ..quarter_step_tuning()
        };
        let level = flat_level(3, 40);
        let mut player = grounded_player(tuning, 1.5, 70.0);
        for _ in 0..40 {
            player.update(DT, &level, &accel_only(), &mut ());
            assert!(player.speed <= 2);
        }
        assert_eq!(player.speed, 2);
    }

    #[test]
    fn test_release_resets_accumulator_only() {
        let level = flat_level(3, 40);
        let mut player = grounded_player(quarter_step_tuning(), 1.5, 70.0);
        for _ in 0..3 {
            player.update(DT, &level, &accel_only(), &mut ());
        }
        assert_eq!(player.speed, 1);
        assert!(player.speed_accumulator() > 0.0);

        player.update(DT, &level, &TickInput::default(), &mut ());
        assert_eq!(player.speed, 1);
        assert_eq!(player.speed_accumulator(), 0.0);
    }

    #[test]
    fn test_decelerate_ratchets_down_to_zero() {
        let level = flat_level(3, 40);
        let mut player = grounded_player(quarter_step_tuning(), 1.5, 70.0);
        player.speed = 2;
        let brake = TickInput {
            decelerate: true,
            ..Default::default()
        };

        player.update(DT, &level, &brake, &mut ());
        assert_eq!(player.speed, 1);
        for _ in 0..4 {
            player.update(DT, &level, &brake, &mut ());
        }
        assert_eq!(player.speed, 0);
        for _ in 0..10 {
            player.update(DT, &level, &brake, &mut ());
        }
        assert_eq!(player.speed, 0);
    }

    #[test]
    fn test_accelerate_wins_over_decelerate() {
        let level = flat_level(3, 40);
        let mut player = grounded_player(quarter_step_tuning(), 1.5, 70.0);
        player.speed = 1;
        let both = TickInput {
            accelerate: true,
            decelerate: true,
            ..Default::default()
        };

        player.update(DT, &level, &both, &mut ());
        assert_eq!(player.speed, 2);
        assert_eq!(player.speed_accumulator(), 0.25);

        for _ in 0..4 {
            player.update(DT, &level, &both, &mut ());
        }
        assert_eq!(player.speed, 3);
    }

    #[test]
    fn test_brake_then_accelerate_keeps_negative_accumulator() {
        let level = flat_level(3, 40);
        let mut player = grounded_player(quarter_step_tuning(), 1.5, 70.0);
        player.speed = 2;
        let brake = TickInput {
            decelerate: true,
            ..Default::default()
        };

        // -1 pre-load, -0.25 step: crossed, one gear down
        player.update(DT, &level, &brake, &mut ());
        assert_eq!(player.speed, 1);
        assert_eq!(player.speed_accumulator(), -0.25);
        player.update(DT, &level, &brake, &mut ());
        assert_eq!(player.speed_accumulator(), -0.5);

        // Straight onto the throttle: no +1 pre-load, the debt is paid off first
        player.update(DT, &level, &accel_only(), &mut ());
        assert_eq!(player.speed, 1);
        assert_eq!(player.speed_accumulator(), -0.25);
    }

    #[test]
    fn test_longitudinal_velocity_follows_speed() {
        let level = flat_level(3, 40);
        let tuning = Tuning::default();
        let mut player = grounded_player(tuning, 1.5, 70.0);
        player.speed = 3;
        player.update(DT, &level, &TickInput::default(), &mut ());
        assert_eq!(player.velocity.z, -tuning.base_speed * 3.0);
        assert!((player.position.z - (70.0 - tuning.base_speed * 3.0 * DT)).abs() < 1e-4);
    }

    #[test]
    fn test_steering_is_instant_and_left_wins() {
        let level = flat_level(3, 40);
        let tuning = Tuning::default();
        let mut player = grounded_player(tuning, 1.5, 70.0);

        let both = TickInput {
            steer_left: true,
            steer_right: true,
            ..Default::default()
        };
        player.update(DT, &level, &both, &mut ());
        assert_eq!(player.velocity.x, -tuning.side_speed);

        let right = TickInput {
            steer_right: true,
            ..Default::default()
        };
        player.update(DT, &level, &right, &mut ());
        assert_eq!(player.velocity.x, tuning.side_speed);

        player.update(DT, &level, &TickInput::default(), &mut ());
        assert_eq!(player.velocity.x, 0.0);
    }

    #[test]
    fn test_grounded_is_stable() {
        let level = flat_level(3, 5);
        let tuning = Tuning::default();
        let mut player = grounded_player(tuning, 1.5, 5.0);

        for _ in 0..10 {
            let outcome = player.update(DT, &level, &TickInput::default(), &mut ());
            assert_eq!(outcome, TickOutcome::Grounded);
            assert_eq!(player.position.y, tuning.player_radius);
            assert_eq!(player.velocity.y, 0.0);
        }
    }

    #[test]
    fn test_jump_leaves_ground() {
        let level = flat_level(3, 5);
        let tuning = Tuning::default();
        let mut player = grounded_player(tuning, 1.5, 5.0);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        player.update(DT, &level, &jump, &mut ());
        assert_eq!(player.velocity.y, tuning.jump_speed);

        let outcome = player.update(DT, &level, &TickInput::default(), &mut ());
        assert_eq!(outcome, TickOutcome::Airborne);
        assert!(player.position.y > tuning.player_radius);
    }

    #[test]
    fn test_no_landing_above_band() {
        let level = flat_level(3, 5);
        let mut player = Player::new(Tuning::default());
        player.position = Vec3::new(1.5, 3.0, 5.0);
        let outcome = player.update(DT, &level, &TickInput::default(), &mut ());
        assert_eq!(outcome, TickOutcome::Airborne);
        assert!(player.position.y < 3.0);
    }

    #[test]
    fn test_no_landing_below_band() {
        let level = flat_level(3, 5);
        let tuning = Tuning::default();
        let mut player = Player::new(tuning);
        // Already under the block tops: keeps falling
        player.position = Vec3::new(1.5, tuning.fall_no_return - 0.1, 5.0);
        let outcome = player.update(DT, &level, &TickInput::default(), &mut ());
        assert_eq!(outcome, TickOutcome::Airborne);
        assert!(player.position.y < tuning.fall_no_return);
    }

    #[test]
    fn test_finish_line_boundary() {
        let level = flat_level(3, 5);
        let tuning = Tuning::default();
        let threshold = level.finish_threshold();

        let mut at_line = grounded_player(tuning, 1.5, threshold);
        at_line.update(DT, &level, &TickInput::default(), &mut ());
        assert!(!at_line.completed);

        let mut banner = TitleBanner::new();
        let mut past_line = grounded_player(tuning, 1.5, threshold - 1.0);
        past_line.update(DT, &level, &TickInput::default(), &mut banner);
        assert!(past_line.completed);
        assert_eq!(banner.text, crate::consts::LEVEL_COMPLETE_TEXT);

        // Stays set while resting past the line
        past_line.update(DT, &level, &TickInput::default(), &mut banner);
        assert!(past_line.is_finished());
    }

    #[test]
    fn test_level_complete_fires_once_per_spawn() {
        let level = flat_level(3, 5);
        let tuning = Tuning::default();
        let mut counter = CompletionCounter::default();
        let mut player = grounded_player(tuning, 1.5, level.finish_threshold() - 1.0);

        for _ in 0..5 {
            let outcome = player.update(DT, &level, &TickInput::default(), &mut counter);
            assert_eq!(outcome, TickOutcome::Grounded);
        }
        assert!(player.completed);
        assert_eq!(counter.0, 1);

        // A new spawn cycle can complete again
        player.spawn(&level, &mut counter);
        player.position = Vec3::new(1.5, tuning.player_radius, level.finish_threshold() - 1.0);
        player.update(DT, &level, &TickInput::default(), &mut counter);
        player.update(DT, &level, &TickInput::default(), &mut counter);
        assert_eq!(counter.0, 2);
    }

    #[test]
    fn test_airborne_past_line_does_not_complete() {
        let level = flat_level(3, 5);
        let mut player = Player::new(Tuning::default());
        player.position = Vec3::new(1.5, 3.0, 0.5);
        player.update(DT, &level, &TickInput::default(), &mut ());
        assert!(!player.completed);
    }

    #[test]
    fn test_falling_off_respawns() {
        let level = flat_level(3, 5);
        let tuning = Tuning::default();
        let mut player = Player::new(tuning);
        player.position = Vec3::new(-10.0, tuning.fall_end + 0.01, 3.0);
        player.velocity = Vec3::new(0.0, -0.05, 0.0);
        player.speed = 4;
        player.completed = true;

        let mut banner = TitleBanner::new();
        let outcome = player.update(DT, &level, &TickInput::default(), &mut banner);
        assert_eq!(outcome, TickOutcome::Respawned);
        assert_eq!(player.position, level.spawn_position());
        assert_eq!(player.velocity, Vec3::ZERO);
        assert_eq!(player.speed, 0);
        assert!(!player.completed);
        assert_eq!(banner.text, "Flat");
    }

    #[test]
    fn test_fall_from_spawn_lands() {
        let level = flat_level(3, 5);
        let tuning = Tuning::default();
        let mut player = Player::new(tuning);
        player.spawn(&level, &mut ());

        let mut landed = false;
        for _ in 0..200 {
            if player.update(DT, &level, &TickInput::default(), &mut ()) == TickOutcome::Grounded {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(player.position.y, tuning.player_radius);
    }

    #[test]
    fn test_autopilot_steers_toward_track() {
        // Only the leftmost column is solid
        let pixels: Vec<u32> = (0..5 * 10).map(|i| if i % 5 == 0 { 0xFFFFFF } else { 0 }).collect();
        let level = Level::from_pixels("Edge", 5, 10, &pixels, &Tuning::default()).unwrap();
        let player = grounded_player(Tuning::default(), 3.5, 15.0);
        let input = autopilot_input(&level, &player);
        assert!(input.accelerate);
        assert!(input.steer_left);
        assert!(!input.steer_right);
    }

    #[test]
    fn test_autopilot_jumps_over_gaps() {
        #[rustfmt::skip]
        let pixels = [
            0xFFFFFF, 0xFFFFFF,
            0,        0,
            0xFFFFFF, 0xFFFFFF,
        ];
        let level = Level::from_pixels("Gap", 2, 3, &pixels, &Tuning::default()).unwrap();
        // Row 1 spans z in [2, 4); looking 3 units ahead of z=6 lands there
        let player = grounded_player(Tuning::default(), 1.0, 6.0);
        assert!(autopilot_input(&level, &player).jump);
    }

    proptest! {
        #[test]
        fn speed_never_exceeds_max(
            presses in proptest::collection::vec(0u8..3, 1..200),
            dt in 1.0f32..100.0,
        ) {
            let level = flat_level(3, 40);
            let tuning = Tuning::default();
            let mut player = grounded_player(tuning, 1.5, 70.0);
            for p in presses {
                let input = TickInput {
                    accelerate: p == 1,
                    decelerate: p == 2,
                    ..Default::default()
                };
                player.update(dt, &level, &input, &mut ());
                prop_assert!(player.speed <= tuning.max_speed);
            }
        }
    }
}
