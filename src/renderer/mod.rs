//! Renderer-facing mesh layout
//!
//! Drawing the track is the host's job; this module only packs the mesh the
//! way a vertex-colored, flat-shaded wgpu pipeline expects it.

pub mod vertex;

pub use vertex::{MeshVertex, index_bytes};
