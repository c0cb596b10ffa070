//! Track surface extraction
//!
//! Turns a `BlockGrid` into a flat-shaded quad mesh containing only the faces
//! a viewer looking down the track can see:
//!
//! - a top face for every solid cell
//! - a front (+Z) wall where the next row is empty or the grid ends
//! - side walls only on the outward half of the track: right (+X) walls left
//!   of the centerline, left (-X) walls right of it
//!
//! There is never a back (-Z) or bottom face. Coordinates are mesh-local: one
//! unit per cell on X and Z, top at Y=0 and wall bottoms at Y=-1. `Level`
//! supplies the per-axis scale to world space.

use glam::Vec3;

use super::grid::{BlockGrid, Rgb};

/// Quad orientations the mesher can emit
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Top,
    Front,
    Left,
    Right,
}

impl Face {
    /// Unit normal for this face
    #[inline]
    pub fn normal(self) -> Vec3 {
        match self {
            Face::Top => Vec3::Y,
            Face::Front => Vec3::Z,
            Face::Left => Vec3::NEG_X,
            Face::Right => Vec3::X,
        }
    }

    /// The four corners of this face on cell `(col, row)`
    ///
    /// Corner order fixes winding: triangles `(0, 1, 2)` and `(2, 1, 3)` face
    /// along `normal()`.
    pub fn corners(self, col: usize, row: usize) -> [Vec3; 4] {
        let x = col as f32;
        let z = row as f32;
        match self {
            Face::Top => [
                Vec3::new(x + 1.0, 0.0, z),
                Vec3::new(x, 0.0, z),
                Vec3::new(x + 1.0, 0.0, z + 1.0),
                Vec3::new(x, 0.0, z + 1.0),
            ],
            Face::Front => [
                Vec3::new(x + 1.0, 0.0, z + 1.0),
                Vec3::new(x, 0.0, z + 1.0),
                Vec3::new(x + 1.0, -1.0, z + 1.0),
                Vec3::new(x, -1.0, z + 1.0),
            ],
            Face::Left => [
                Vec3::new(x, 0.0, z + 1.0),
                Vec3::new(x, 0.0, z),
                Vec3::new(x, -1.0, z + 1.0),
                Vec3::new(x, -1.0, z),
            ],
            Face::Right => [
                Vec3::new(x + 1.0, 0.0, z),
                Vec3::new(x + 1.0, 0.0, z + 1.0),
                Vec3::new(x + 1.0, -1.0, z),
                Vec3::new(x + 1.0, -1.0, z + 1.0),
            ],
        }
    }
}

/// Flat-shaded triangle mesh as four parallel arrays
///
/// Four unshared vertices per face. Vertex colors are stored `[b, g, r]`,
/// reversed from the source block color, to keep the track's established
/// palette.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of emitted quads
    #[inline]
    pub fn face_count(&self) -> usize {
        self.positions.len() / 4
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append one quad and its two triangles
    fn push_face(&mut self, face: Face, col: usize, row: usize, color: Rgb) {
        let base = self.positions.len() as u32;
        let normal = face.normal();
        let [r, g, b] = color.to_f32();

        for corner in face.corners(col, row) {
            self.positions.push(corner);
            self.normals.push(normal);
            self.colors.push([b, g, r]);
        }

        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }
}

/// Which faces a solid cell at `(col, row)` contributes
///
/// The centerline sits at `cols / 2` measured as a real number, so an odd
/// width has no exact-center column while an even width leaves column
/// `cols / 2` without side walls.
pub fn visible_faces(grid: &BlockGrid, col: usize, row: usize) -> impl Iterator<Item = Face> {
    // Neighbor lookups below rely on (col, row) being in range
    let emit = if grid.is_solid(col, row) {
        let cols = grid.cols();
        [
            true,
            row + 1 == grid.rows() || !grid.is_solid(col, row + 1),
            2 * col > cols && !grid.is_solid(col - 1, row),
            2 * col < cols && !grid.is_solid(col + 1, row),
        ]
    } else {
        [false; 4]
    };

    [Face::Top, Face::Front, Face::Left, Face::Right]
        .into_iter()
        .zip(emit)
        .filter_map(|(face, emit)| emit.then_some(face))
}

/// Build the track mesh in a single row-major pass
pub fn build_mesh(grid: &BlockGrid) -> Mesh {
    let mut mesh = Mesh::default();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let Some(color) = grid.get(col, row) else {
                continue;
            };
            for face in visible_faces(grid, col, row) {
                mesh.push_face(face, col, row, color);
            }
        }
    }

    mesh
}
