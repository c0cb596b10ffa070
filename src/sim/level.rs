//! Level: a block grid, its track mesh and the queries the player runs
//!
//! Built once at load time and read-only afterward.

use glam::{Mat4, Vec3};

use super::grid::{BlockGrid, GridError};
use super::mesher::{Mesh, build_mesh};
use crate::tuning::{BlockDims, Tuning};

/// A playable track
#[derive(Debug, Clone)]
pub struct Level {
    title: String,
    grid: BlockGrid,
    /// Mesh in grid-local units; scale with `model_transform()`
    mesh: Mesh,
    block: BlockDims,
    spawn_position: Vec3,
    finish_threshold: f32,
}

impl Level {
    /// Build a level from an already-extracted grid
    pub fn new(title: impl Into<String>, grid: BlockGrid, tuning: &Tuning) -> Self {
        let title = title.into();
        let block = tuning.block;
        let mesh = build_mesh(&grid);

        let spawn_position = Vec3::new(
            grid.cols() as f32 / 2.0 * block.width,
            tuning.spawn_height,
            (grid.rows() as f32 - 0.5) * block.length,
        );

        log::info!(
            "Level '{}': {}x{} grid, {} solid blocks, {} faces",
            title,
            grid.cols(),
            grid.rows(),
            grid.solid_count(),
            mesh.face_count()
        );

        Self {
            title,
            grid,
            mesh,
            block,
            spawn_position,
            finish_threshold: block.length,
        }
    }

    /// Build a level straight from decoded pixels (`cols * rows` values)
    pub fn from_pixels(
        title: impl Into<String>,
        cols: usize,
        rows: usize,
        pixels: &[u32],
        tuning: &Tuning,
    ) -> Result<Self, GridError> {
        let grid = BlockGrid::from_pixels(cols, rows, pixels)?;
        Ok(Self::new(title, grid, tuning))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn block_dims(&self) -> BlockDims {
        self.block
    }

    pub fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    pub fn finish_threshold(&self) -> f32 {
        self.finish_threshold
    }

    /// Non-uniform scale taking the mesh into world space
    pub fn model_transform(&self) -> Mat4 {
        Mat4::from_scale(self.block.scale())
    }

    /// Whether the column under world `(x, z)` holds a block
    ///
    /// Anything off the grid is empty, which lets the ball fall off the
    /// sides and ends of the track.
    #[inline]
    pub fn is_solid_at(&self, x: f32, z: f32) -> bool {
        let col = (x / self.block.width).floor();
        let row = (z / self.block.length).floor();
        if col < 0.0 || row < 0.0 || col.is_nan() || row.is_nan() {
            return false;
        }
        // Saturating casts; anything past usize::MAX is off-grid anyway
        self.grid.is_solid(col as usize, row as usize)
    }

    /// Whether world `z` lies beyond the finish line
    #[inline]
    pub fn across_finish_line(&self, z: f32) -> bool {
        z < self.finish_threshold
    }
}
