//! Procedural track sources
//!
//! Both generators paint colored rectangles into a `PixelBuffer` that then
//! goes through the same grid extraction as a decoded image. Walks start at
//! the far row (`height - 1`, where the player spawns) and step toward row 0,
//! the finish line. All randomness comes from the caller's RNG, so a seeded
//! `Pcg32` reproduces a track exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{BlockGrid, GridError};

/// Generator parameters that cannot produce a track
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("Invalid generator parameters: {0}")]
    Invalid(String),
}

fn ensure(ok: bool, msg: &str) -> Result<(), GenerateError> {
    if ok {
        Ok(())
    } else {
        Err(GenerateError::Invalid(msg.to_string()))
    }
}

/// Opaque alpha byte stamped on every generated pixel
const OPAQUE: u32 = 0xFF00_0000;

/// A decoded (or painted) image, one `u32` per pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl PixelBuffer {
    /// A fully transparent buffer
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Fill a rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x.saturating_add(w)).clamp(0, self.width as i32) as usize;
        let y1 = (y.saturating_add(h)).clamp(0, self.height as i32) as usize;

        for row in y0..y1 {
            let start = row * self.width;
            self.pixels[start + x0.min(x1)..start + x1].fill(color);
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[x + y * self.width]
    }

    /// Extract the block grid
    pub fn into_grid(self) -> Result<BlockGrid, GridError> {
        BlockGrid::from_pixels(self.width, self.height, &self.pixels)
    }
}

/// Convert hue/saturation/lightness (all in `[0, 1]`) to `0xRRGGBB`
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> u32 {
    let h = h.rem_euclid(1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h * 6.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |v: f32| (((v + m) * 255.0).round().clamp(0.0, 255.0)) as u32;
    (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
}

/// Opaque pixel for a hue, never pure black
fn block_color(hue: f32, lightness: f32) -> u32 {
    let rgb = hsl_to_rgb(hue, 0.7, lightness.clamp(0.2, 0.8));
    OPAQUE | rgb.max(1)
}

/// Sine-perturbed random walk stamping rectangles down the track
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomWalk {
    pub width: usize,
    pub height: usize,
    /// Rows advanced per stamp
    pub stride: usize,
    /// Columns kept clear of the track center's travel on each side
    pub margin: usize,
    /// Random rectangle width range (inclusive)
    pub min_block_width: usize,
    pub max_block_width: usize,
    /// Random rectangle height range (inclusive)
    pub min_block_height: usize,
    pub max_block_height: usize,
    /// Largest random step of the walk per stamp, in columns
    pub max_drift: f32,
    /// Amplitude (columns) and frequency (radians per stamp) of the sine sway
    pub sway_amplitude: f32,
    pub sway_frequency: f32,
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self {
            width: 21,
            height: 96,
            stride: 2,
            margin: 2,
            min_block_width: 3,
            max_block_width: 7,
            min_block_height: 2,
            max_block_height: 5,
            max_drift: 1.5,
            sway_amplitude: 3.0,
            sway_frequency: 0.2,
        }
    }
}

/// One rectangle laid down by the random walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    /// Track center for this stamp, in columns
    pub center: f32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub color: u32,
}

impl RandomWalk {
    pub fn validate(&self) -> Result<(), GenerateError> {
        ensure(self.width > 0 && self.height > 0, "track dimensions must be positive")?;
        ensure(self.stride > 0, "stride must be positive")?;
        ensure(
            self.max_drift.is_finite() && self.max_drift >= 0.0,
            "max_drift must be finite and non-negative",
        )?;
        ensure(
            self.sway_amplitude.is_finite() && self.sway_frequency.is_finite(),
            "sway must be finite",
        )
    }

    /// Lay out the stamps, spawn end first
    pub fn stamps(&self, rng: &mut impl Rng) -> Result<Vec<Stamp>, GenerateError> {
        self.validate()?;

        let center = self.width as f32 / 2.0;
        let lo = self.margin as f32;
        let hi = (self.width.saturating_sub(self.margin)) as f32;
        let base_hue: f32 = rng.random();

        let mut stamps = Vec::with_capacity(self.height / self.stride + 1);
        let mut walk = 0.0f32;
        let mut y = self.height as i32 - 1;
        let mut step = 0u32;

        while y >= 0 {
            walk += rng.random_range(-self.max_drift..=self.max_drift);
            let sway = (step as f32 * self.sway_frequency).sin() * self.sway_amplitude;
            let x_center = (center + sway + walk).clamp(lo, hi.max(lo));
            // Keep the walk itself from running away past the bounds
            walk = x_center - center - sway;

            let w = rng.random_range(self.min_block_width..=self.max_block_width.max(self.min_block_width));
            let h = rng.random_range(self.min_block_height..=self.max_block_height.max(self.min_block_height));
            let lightness = rng.random_range(0.35..0.65);
            let color = block_color(base_hue + rng.random_range(-0.05..0.05), lightness);

            // Stamps grow upward in image rows so they overlap the previous one
            stamps.push(Stamp {
                center: x_center,
                x: (x_center - w as f32 / 2.0).round() as i32,
                y: y + 1 - h as i32,
                w: w as i32,
                h: h as i32,
                color,
            });

            y -= self.stride as i32;
            step += 1;
        }
        Ok(stamps)
    }

    pub fn generate(&self, rng: &mut impl Rng) -> Result<PixelBuffer, GenerateError> {
        let stamps = self.stamps(rng)?;
        let mut buf = PixelBuffer::new(self.width, self.height);
        for s in &stamps {
            buf.fill_rect(s.x, s.y, s.w, s.h, s.color);
        }

        log::info!(
            "Random walk: {}x{} track, {} stamps",
            self.width,
            self.height,
            stamps.len()
        );
        Ok(buf)
    }
}

/// Stacked rectangles with a steadily rotating hue
///
/// Placement alternates sides of the centerline with a phase offset, and
/// stamps shrink near row 0 so the finish end resolves into fine detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingStack {
    pub width: usize,
    pub height: usize,
    /// Empty rows left between successive stamps
    pub gap: usize,
    pub min_block_width: usize,
    pub max_block_width: usize,
    /// Height cap for a stamp far from the finish
    pub max_block_height: usize,
    /// Hue advance per stamp (fraction of the color wheel)
    pub hue_step: f32,
    /// Horizontal swing (columns) of the alternating placement
    pub swing: f32,
    /// Phase advance per stamp (radians)
    pub phase_step: f32,
}

impl Default for FallingStack {
    fn default() -> Self {
        Self {
            width: 21,
            height: 96,
            gap: 1,
            min_block_width: 4,
            max_block_width: 9,
            max_block_height: 8,
            hue_step: 0.03,
            swing: 3.0,
            phase_step: 0.7,
        }
    }
}

impl FallingStack {
    pub fn validate(&self) -> Result<(), GenerateError> {
        ensure(self.width > 0 && self.height > 0, "track dimensions must be positive")?;
        ensure(
            self.hue_step.is_finite() && self.swing.is_finite() && self.phase_step.is_finite(),
            "hue_step, swing and phase_step must be finite",
        )
    }

    pub fn generate(&self, rng: &mut impl Rng) -> Result<PixelBuffer, GenerateError> {
        self.validate()?;
        let mut buf = PixelBuffer::new(self.width, self.height);

        let center = self.width as f32 / 2.0;
        let mut hue: f32 = rng.random();
        let phase_offset: f32 = rng.random_range(0.0..std::f32::consts::TAU);

        // Exclusive lower edge (in rows) of the next stamp
        let mut top = self.height as i32;
        let mut step = 0u32;

        while top > 0 {
            // Shrink toward the finish end: never taller than a fraction of
            // the rows that remain
            let remaining = top as usize;
            let cap = self.max_block_height.min(remaining / 4 + 1).max(1);
            let h = rng.random_range(1..=cap) as i32;

            let w = rng.random_range(
                self.min_block_width..=self.max_block_width.max(self.min_block_width),
            ) as i32;
            let side = if step % 2 == 0 { 1.0 } else { -1.0 };
            let phase = phase_offset + step as f32 * self.phase_step;
            let offset = side * self.swing * phase.sin().abs();
            let x = (center + offset - w as f32 / 2.0).round() as i32;

            buf.fill_rect(x, top - h, w, h, block_color(hue, 0.5));

            hue = (hue + self.hue_step).rem_euclid(1.0);
            top -= h + self.gap as i32;
            step += 1;
        }

        log::info!(
            "Falling stack: {}x{} track, {} stamps",
            self.width,
            self.height,
            step
        );
        Ok(buf)
    }
}
