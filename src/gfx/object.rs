//! A positioned object: mesh handle, model transform, per-object uniforms.

use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3};

use crate::{
    error::Result,
    gfx::{mesh::MeshHandle, renderer::GpuContext, uniform::UniformBuffer},
};

/// Per-object uniform block: model matrix plus its inverse-transpose for
/// normal transformation (stored as a full mat4 for std140 alignment).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

/// GPU bindings for one object: its uniform buffer and bind group.
pub struct ObjectBindings {
    buffer: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

/// An object instance in the scene.
pub struct SceneObject {
    pub mesh: MeshHandle,
    transform: Matrix4<f32>,
    bindings: Option<ObjectBindings>,
}

impl SceneObject {
    /// Creates an object translated to `position`.
    pub fn new(mesh: MeshHandle, position: Vector3<f32>) -> SceneObject {
        SceneObject {
            mesh,
            transform: Matrix4::from_translation(position),
            bindings: None,
        }
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.transform.w.x = position.x;
        self.transform.w.y = position.y;
        self.transform.w.z = position.z;
    }

    fn uniform(&self) -> ObjectUniform {
        let normal = self
            .transform
            .invert()
            .map(|inv| inv.transpose())
            .unwrap_or_else(Matrix4::identity);
        ObjectUniform {
            model: self.transform.into(),
            normal: normal.into(),
        }
    }

    /// Creates the object's uniform buffer and bind group.
    pub fn init_bindings(
        &mut self,
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
    ) -> Result<()> {
        let buffer = UniformBuffer::new_with_data(&gpu.device, &self.uniform());
        let bind_group = gpu.with_validation("object bind group", || {
            gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("object bind group"),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.binding_resource(),
                }],
            })
        })?;
        self.bindings = Some(ObjectBindings { buffer, bind_group });
        Ok(())
    }

    /// Rewrites the uniform buffer if the transform changed.
    pub fn sync_transform(&mut self, queue: &wgpu::Queue) {
        let uniform = self.uniform();
        if let Some(bindings) = &mut self.bindings {
            bindings.buffer.update(queue, uniform);
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bindings.as_ref().map(|b| &b.bind_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_lands_in_model_matrix() {
        let object = SceneObject::new(MeshHandle(0), Vector3::new(1.5, 0.5, 2.0));
        let uniform = object.uniform();
        assert_eq!(uniform.model[3][0], 1.5);
        assert_eq!(uniform.model[3][1], 0.5);
        assert_eq!(uniform.model[3][2], 2.0);
    }

    #[test]
    fn normal_matrix_of_translation_is_identity_rotation() {
        let object = SceneObject::new(MeshHandle(1), Vector3::new(3.0, -2.0, 1.0));
        let uniform = object.uniform();
        // Inverse-transpose of a pure translation keeps the 3x3 block identity.
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert!((uniform.normal[row][col] - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn set_position_moves_only_translation() {
        let mut object = SceneObject::new(MeshHandle(0), Vector3::new(0.0, 0.0, 0.0));
        object.set_position(Vector3::new(-3.0, 3.0, 3.0));
        let uniform = object.uniform();
        assert_eq!(uniform.model[3][0], -3.0);
        assert_eq!(uniform.model[0][0], 1.0);
    }
}
