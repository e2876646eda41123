//! Material definitions and their uniform layouts.

use std::sync::Arc;

use cgmath::Vector3;

use crate::{
    error::Result,
    gfx::texture::Texture2d,
    util::color::parse_rgb,
};

/// Phong/Blinn color material: ambient/diffuse/specular terms plus a
/// shininess exponent rounded up to a power of two.
#[derive(Debug, Clone)]
pub struct ColorMaterial {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
    pub use_blinn: bool,
}

impl ColorMaterial {
    pub fn new(
        ambient: Vector3<f32>,
        diffuse: Vector3<f32>,
        specular: Vector3<f32>,
        shininess: u32,
        use_blinn: bool,
    ) -> ColorMaterial {
        ColorMaterial {
            ambient,
            diffuse,
            specular,
            shininess: nearest_pow2(shininess) as f32,
            use_blinn,
        }
    }

    /// Builds the material from `#RRGGBB` color strings.
    pub fn from_hex(
        ambient: &str,
        diffuse: &str,
        specular: &str,
        shininess: u32,
        use_blinn: bool,
    ) -> Result<ColorMaterial> {
        Ok(ColorMaterial::new(
            parse_rgb(ambient)?,
            parse_rgb(diffuse)?,
            parse_rgb(specular)?,
            shininess,
            use_blinn,
        ))
    }

    pub fn uniform(&self) -> ColorMaterialUniform {
        ColorMaterialUniform {
            ambient: extend(self.ambient),
            diffuse: extend(self.diffuse),
            specular: extend(self.specular),
            params: [self.shininess, self.use_blinn as u32 as f32, 0.0, 0.0],
        }
    }
}

/// std140 layout of [`ColorMaterial`]; params.x = shininess, params.y =
/// blinn flag.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorMaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub params: [f32; 4],
}

/// Textured material: diffuse and specular maps sharing one sampler.
pub struct TexturedMaterial {
    pub diffuse: Arc<Texture2d>,
    pub specular: Arc<Texture2d>,
    pub shininess: f32,
}

impl TexturedMaterial {
    pub fn new(diffuse: Arc<Texture2d>, specular: Arc<Texture2d>, shininess: f32) -> Self {
        TexturedMaterial {
            diffuse,
            specular,
            shininess,
        }
    }

    pub fn uniform(&self) -> TexturedMaterialUniform {
        TexturedMaterialUniform {
            params: [self.shininess, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexturedMaterialUniform {
    pub params: [f32; 4],
}

fn extend(v: Vector3<f32>) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

fn nearest_pow2(value: u32) -> u32 {
    value.max(1).next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shininess_rounds_up_to_pow2() {
        assert_eq!(nearest_pow2(1), 1);
        assert_eq!(nearest_pow2(33), 64);
        assert_eq!(nearest_pow2(100), 128);
        assert_eq!(nearest_pow2(128), 128);
    }

    #[test]
    fn uniform_packs_blinn_flag() {
        let material = ColorMaterial::new(
            Vector3::new(0.1, 0.2, 0.3),
            Vector3::new(0.4, 0.5, 0.6),
            Vector3::new(1.0, 1.0, 1.0),
            100,
            true,
        );
        let uniform = material.uniform();
        assert_eq!(uniform.params[0], 128.0);
        assert_eq!(uniform.params[1], 1.0);
        assert_eq!(uniform.ambient, [0.1, 0.2, 0.3, 0.0]);
    }

    #[test]
    fn from_hex_propagates_color_errors() {
        assert!(ColorMaterial::from_hex("#00FF00", "nope", "#FFFFFF", 32, false).is_err());
        assert!(ColorMaterial::from_hex("#0F004D", "#3300FF", "#FFFFFF", 128, true).is_ok());
    }
}
