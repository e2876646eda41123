//! Graphics: procedural geometry, GPU upload, shader programs, scene.
//!
//! The split mirrors the data flow: [`geometry`] generates plain vertex data,
//! [`mesh`] uploads it, [`shader`] turns GLSL files into render pipelines,
//! and [`scene`] owns everything and records the per-frame draw calls.

pub mod camera;
pub mod geometry;
pub mod light;
pub mod material;
pub mod mesh;
pub mod object;
pub mod renderer;
pub mod scene;
pub mod shader;
pub mod skybox;
pub mod texture;
pub mod uniform;

pub use renderer::{GpuContext, Renderer};
pub use scene::SandboxScene;

/// Records its own draw commands into an already-configured render pass.
pub trait Drawable {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// Holds device resources that are released exactly once.
///
/// Calling `release` again after the resources are gone is a no-op, never an
/// error: every implementation keeps its handles behind an `Option` taken on
/// the first call.
pub trait Releasable {
    fn release(&mut self);
}
