//! One-shot upload of generated geometry into device buffers.

use log::debug;
use wgpu::util::DeviceExt;

use crate::{
    error::Result,
    gfx::{geometry::MeshData, renderer::GpuContext, Drawable, Releasable},
};

/// Index into the scene's mesh table. Objects refer to meshes by handle so a
/// mesh shared by several objects is still owned (and released) exactly once.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshHandle(pub(crate) usize);

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
}

/// Device-resident mesh: interleaved vertex buffer plus index buffer.
///
/// Buffers are immutable after creation; there is no per-frame re-upload
/// path. `release` drops the handles exactly once.
pub struct GpuMesh {
    label: String,
    buffers: Option<MeshBuffers>,
    index_count: u32,
}

impl GpuMesh {
    /// Uploads `data` into fresh vertex/index buffers.
    ///
    /// Creation runs inside a device validation scope: if either buffer
    /// fails, the error is returned and both handles are dropped, so no
    /// partially uploaded mesh ever escapes.
    pub fn upload(gpu: &GpuContext, label: &str, data: &MeshData) -> Result<GpuMesh> {
        debug_assert!(data.indices.iter().all(|&i| (i as usize) < data.vertex_count()));

        let buffers = gpu.with_validation(label, || {
            let vertex = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} vertices")),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} indices")),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            MeshBuffers { vertex, index }
        })?;

        debug!(
            "uploaded mesh `{label}`: {} vertices, {} triangles",
            data.vertex_count(),
            data.triangle_count()
        );

        Ok(GpuMesh {
            label: label.to_owned(),
            buffers: Some(buffers),
            index_count: data.indices.len() as u32,
        })
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_released(&self) -> bool {
        self.buffers.is_none()
    }
}

impl Drawable for GpuMesh {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(buffers) = &self.buffers else {
            return;
        };
        pass.set_vertex_buffer(0, buffers.vertex.slice(..));
        pass.set_index_buffer(buffers.index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

impl Releasable for GpuMesh {
    fn release(&mut self) {
        if self.buffers.take().is_some() {
            debug!("released mesh `{}`", self.label);
        }
    }
}
