//! Sampled textures, cube maps, and the path-keyed texture cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::{
    error::{Error, Result},
    gfx::renderer::GpuContext,
    util::image::{load_image, ImageData},
};

/// A 2D color texture with its view and sampler.
pub struct Texture2d {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture2d {
    /// Decodes `path` and uploads it as an RGBA texture with linear
    /// filtering and repeat wrapping.
    pub fn from_file(gpu: &GpuContext, path: &Path) -> Result<Texture2d> {
        let data = load_image(path)?;
        Self::from_image(gpu, &path.display().to_string(), &data)
    }

    pub fn from_image(gpu: &GpuContext, label: &str, data: &ImageData) -> Result<Texture2d> {
        let texture = gpu.with_validation(label, || {
            let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: data.width,
                    height: data.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            write_layer(gpu, &texture, data, 0);
            texture
        })?;

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Texture2d { view, sampler })
    }
}

/// A six-faced cube map used by the skybox.
pub struct CubeMap {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl CubeMap {
    /// Loads the six faces (+x, -x, +y, -y, +z, -z) into one cube texture.
    ///
    /// Every face must share the same dimensions.
    pub fn load<P: AsRef<Path>>(gpu: &GpuContext, faces: &[P; 6]) -> Result<CubeMap> {
        let images = faces
            .iter()
            .map(|face| load_image(face.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let (width, height) = (images[0].width, images[0].height);
        for (face, image) in faces.iter().zip(&images) {
            if image.width != width || image.height != height {
                return Err(Error::invalid(format!(
                    "cube map face {} is {}x{}, expected {}x{}",
                    face.as_ref().display(),
                    image.width,
                    image.height,
                    width,
                    height
                )));
            }
        }

        let texture = gpu.with_validation("skybox cube map", || {
            let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("skybox cube map"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 6,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            for (layer, image) in images.iter().enumerate() {
                write_layer(gpu, &texture, image, layer as u32);
            }
            texture
        })?;

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("skybox sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(CubeMap { view, sampler })
    }
}

fn write_layer(gpu: &GpuContext, texture: &wgpu::Texture, data: &ImageData, layer: u32) {
    let rgba = data.to_rgba();
    gpu.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        &rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * data.width),
            rows_per_image: Some(data.height),
        },
        wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        },
    );
}

/// Path-keyed cache with explicit insert/lookup/evict.
///
/// The scene owns one instance and passes it by reference to whatever
/// resolves textures; there is no process-global state.
pub struct PathCache<T> {
    entries: HashMap<PathBuf, T>,
}

/// The cache as used by the scene: shared texture handles keyed by file path.
pub type TextureCache = PathCache<Arc<Texture2d>>;

impl<T> PathCache<T> {
    pub fn new() -> Self {
        PathCache {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, path: &Path) -> Option<&T> {
        self.entries.get(path)
    }

    pub fn insert(&mut self, path: PathBuf, value: T) -> &T {
        self.entries.entry(path).or_insert(value)
    }

    /// Removes an entry; returns whether it was present. Evicting the same
    /// path twice is a no-op, not an error.
    pub fn evict(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PathCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCache {
    /// Returns the cached texture for `path`, loading and inserting it on
    /// first use.
    pub fn load(&mut self, gpu: &GpuContext, path: &Path) -> Result<Arc<Texture2d>> {
        if let Some(cached) = self.entries.get(path) {
            return Ok(cached.clone());
        }
        let texture = Arc::new(Texture2d::from_file(gpu, path)?);
        debug!("cached texture {}", path.display());
        self.entries.insert(path.to_path_buf(), texture.clone());
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut cache: PathCache<u32> = PathCache::new();
        assert!(cache.is_empty());
        cache.insert(PathBuf::from("a.png"), 1);
        cache.insert(PathBuf::from("b.png"), 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(Path::new("a.png")), Some(&1));
        assert_eq!(cache.get(Path::new("missing.png")), None);
    }

    #[test]
    fn insert_keeps_first_entry() {
        let mut cache: PathCache<u32> = PathCache::new();
        cache.insert(PathBuf::from("a.png"), 1);
        cache.insert(PathBuf::from("a.png"), 9);
        assert_eq!(cache.get(Path::new("a.png")), Some(&1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evict_twice_is_noop() {
        let mut cache: PathCache<u32> = PathCache::new();
        cache.insert(PathBuf::from("a.png"), 1);
        assert!(cache.evict(Path::new("a.png")));
        assert!(!cache.evict(Path::new("a.png")));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache: PathCache<u32> = PathCache::new();
        cache.insert(PathBuf::from("a.png"), 1);
        cache.insert(PathBuf::from("b.png"), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.evict(Path::new("a.png")));
    }
}
