//! Cube-mapped skybox drawn as the scene backdrop.

use std::path::Path;

use cgmath::Matrix4;
use log::debug;
use wgpu::util::DeviceExt;

use crate::{
    error::Result,
    gfx::{
        renderer::GpuContext,
        texture::CubeMap,
        uniform::UniformBuffer,
        Drawable, Releasable,
    },
};

/// Unit cube, 36 position-only vertices; positions double as cube-map
/// sampling directions.
#[rustfmt::skip]
const SKYBOX_VERTS: [f32; 108] = [
    -1.0,  1.0, -1.0,
    -1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,

    -1.0, -1.0,  1.0,
    -1.0, -1.0, -1.0,
    -1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,
    -1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,

     1.0, -1.0, -1.0,
     1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0, -1.0,
     1.0, -1.0, -1.0,

    -1.0, -1.0,  1.0,
    -1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0, -1.0,  1.0,
    -1.0, -1.0,  1.0,

    -1.0,  1.0, -1.0,
     1.0,  1.0, -1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
    -1.0,  1.0,  1.0,
    -1.0,  1.0, -1.0,

    -1.0, -1.0, -1.0,
    -1.0, -1.0,  1.0,
     1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
    -1.0, -1.0,  1.0,
     1.0, -1.0,  1.0,
];

/// Uniform block for the skybox pass: projection and the rotation-only view.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyboxUniform {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

struct SkyboxResources {
    vertex_buffer: wgpu::Buffer,
    uniform: UniformBuffer<SkyboxUniform>,
    bind_group: wgpu::BindGroup,
}

/// The skybox's cube map, vertex buffer and bindings.
pub struct Skybox {
    resources: Option<SkyboxResources>,
}

impl Skybox {
    /// Position-only vertex layout at shader location 0.
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 3) as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }

    /// Bind group layout: uniform + cube texture + sampler.
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Loads the six cube faces and creates the skybox's GPU state.
    pub fn load<P: AsRef<Path>>(
        gpu: &GpuContext,
        faces: &[P; 6],
        layout: &wgpu::BindGroupLayout,
    ) -> Result<Skybox> {
        let cube_map = CubeMap::load(gpu, faces)?;

        let vertex_buffer = gpu.with_validation("skybox vertices", || {
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("skybox vertices"),
                    contents: bytemuck::cast_slice(&SKYBOX_VERTS),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        })?;

        let uniform = UniformBuffer::new_with_data(
            &gpu.device,
            &SkyboxUniform {
                projection: Matrix4::from_scale(1.0f32).into(),
                view: Matrix4::from_scale(1.0f32).into(),
            },
        );

        let bind_group = gpu.with_validation("skybox bind group", || {
            gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("skybox bind group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform.binding_resource(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&cube_map.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&cube_map.sampler),
                    },
                ],
            })
        })?;

        Ok(Skybox {
            resources: Some(SkyboxResources {
                vertex_buffer,
                uniform,
                bind_group,
            }),
        })
    }

    /// Updates the projection and rotation-only view matrices.
    pub fn sync_view(&mut self, queue: &wgpu::Queue, projection: Matrix4<f32>, view: Matrix4<f32>) {
        if let Some(resources) = &mut self.resources {
            resources.uniform.update(
                queue,
                SkyboxUniform {
                    projection: projection.into(),
                    view: view.into(),
                },
            );
        }
    }
}

impl Drawable for Skybox {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(resources) = &self.resources else {
            return;
        };
        pass.set_bind_group(0, &resources.bind_group, &[]);
        pass.set_vertex_buffer(0, resources.vertex_buffer.slice(..));
        pass.draw(0..(SKYBOX_VERTS.len() / 3) as u32, 0..1);
    }
}

impl Releasable for Skybox {
    fn release(&mut self) {
        if self.resources.take().is_some() {
            debug!("released skybox");
        }
    }
}
