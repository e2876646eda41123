//! The scene's single point light and its lamp mesh.

use cgmath::Vector3;

use crate::{error::Result, gfx::mesh::MeshHandle, util::color::parse_rgb};

/// A point light with precomputed ambient/diffuse/specular terms and a small
/// emissive lamp mesh marking its position.
pub struct PointLight {
    pub color: Vector3<f32>,
    pub position: Vector3<f32>,
    ambient: Vector3<f32>,
    diffuse: Vector3<f32>,
    specular: Vector3<f32>,
    /// Lamp geometry, uploaded at scene init like every other mesh.
    pub lamp_mesh: MeshHandle,
}

impl PointLight {
    pub fn new(
        lamp_mesh: MeshHandle,
        position: Vector3<f32>,
        color: Vector3<f32>,
        ambient: f32,
        diffuse: f32,
        specular: f32,
    ) -> PointLight {
        PointLight {
            ambient: color * ambient,
            diffuse: color * diffuse,
            specular: color * specular,
            color,
            position,
            lamp_mesh,
        }
    }

    pub fn from_hex(
        lamp_mesh: MeshHandle,
        position: Vector3<f32>,
        color: &str,
        ambient: f32,
        diffuse: f32,
        specular: f32,
    ) -> Result<PointLight> {
        Ok(PointLight::new(
            lamp_mesh,
            position,
            parse_rgb(color)?,
            ambient,
            diffuse,
            specular,
        ))
    }

    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn ambient(&self) -> Vector3<f32> {
        self.ambient
    }

    pub fn diffuse(&self) -> Vector3<f32> {
        self.diffuse
    }

    pub fn specular(&self) -> Vector3<f32> {
        self.specular
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_scale_the_color() {
        let light = PointLight::from_hex(
            MeshHandle(0),
            Vector3::new(-3.0, 3.0, 3.0),
            "#FFFFFF",
            0.5,
            1.0,
            1.0,
        )
        .unwrap();
        let full = 255.0 / 256.0;
        assert!((light.ambient().x - full * 0.5).abs() < 1e-6);
        assert!((light.diffuse().y - full).abs() < 1e-6);
        assert!((light.specular().z - full).abs() < 1e-6);
    }
}
