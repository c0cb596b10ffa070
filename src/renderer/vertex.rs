//! Vertex type for the track mesh

use bytemuck::{Pod, Zeroable};

use crate::sim::Mesh;

/// Interleaved track vertex: position, flat normal and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl MeshVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: (2 * std::mem::size_of::<[f32; 3]>()) as wgpu::BufferAddress,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x3,
            },
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    /// Zip the mesh's parallel arrays into upload-ready vertices
    ///
    /// Positions stay mesh-local; the level's model transform scales them.
    pub fn interleave(mesh: &Mesh) -> Vec<MeshVertex> {
        mesh.positions
            .iter()
            .zip(&mesh.normals)
            .zip(&mesh.colors)
            .map(|((p, n), c)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
                color: *c,
            })
            .collect()
    }
}

/// Index buffer bytes for a mesh
pub fn index_bytes(mesh: &Mesh) -> &[u8] {
    bytemuck::cast_slice(&mesh.indices)
}
