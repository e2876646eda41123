//! Procedural geometry: plain vertex/index data, no GPU types.
//!
//! Everything in this module is pure data generation so it can be tested
//! without a graphics context. Upload lives in [`crate::gfx::mesh`].

pub mod primitives;

pub use primitives::{generate_box, generate_plane, generate_sphere};

/// One interleaved vertex: position, normal, texture coordinates.
///
/// `#[repr(C)]` so the slice can be cast straight into a GPU buffer; the
/// stride is 8 floats (32 bytes) with normals at byte 12 and UVs at byte 24.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Vertex buffer layout: position at location 0, normal at 1, UV at 2.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Generated geometry ready for a one-shot GPU upload.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn vertex_is_tightly_interleaved() {
        assert_eq!(mem::size_of::<Vertex>(), 32);
        assert_eq!(mem::offset_of!(Vertex, position), 0);
        assert_eq!(mem::offset_of!(Vertex, normal), 12);
        assert_eq!(mem::offset_of!(Vertex, uv), 24);
    }

    #[test]
    fn layout_matches_struct() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 24);
    }
}
