//! Image decoding for texture upload.
//!
//! Decoded pixels are kept as plain data so the GPU upload path can stay
//! separate from file I/O. Images with an alpha channel are kept as RGBA;
//! everything else (RGB, grayscale, palettes) is decoded to 3-component RGB.

use std::path::Path;

use image::{ColorType, DynamicImage};
use log::debug;

use crate::error::{Error, Result};

/// Channel layout of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> u32 {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// A decoded image: dimensions, channel layout and tightly packed bytes.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub bytes: Vec<u8>,
}

impl ImageData {
    /// Returns the pixel bytes as 4-component RGBA, expanding RGB with an
    /// opaque alpha. The device has no 3-channel sampled texture format, so
    /// every upload goes through this.
    pub fn to_rgba(&self) -> Vec<u8> {
        match self.format {
            PixelFormat::Rgba => self.bytes.clone(),
            PixelFormat::Rgb => {
                let mut rgba = Vec::with_capacity(self.bytes.len() / 3 * 4);
                for px in self.bytes.chunks_exact(3) {
                    rgba.extend_from_slice(px);
                    rgba.push(0xFF);
                }
                rgba
            }
        }
    }
}

/// Decodes an image file into [`ImageData`].
pub fn load_image(path: &Path) -> Result<ImageData> {
    if !path.is_file() {
        return Err(Error::ResourceNotFound(path.to_path_buf()));
    }
    let decoded = image::open(path)
        .map_err(|err| Error::invalid(format!("cannot decode image {}: {err}", path.display())))?;

    let data = from_dynamic(decoded);
    debug!(
        "loaded image {} ({}x{}, {} channels)",
        path.display(),
        data.width,
        data.height,
        data.format.channels()
    );
    Ok(data)
}

fn from_dynamic(decoded: DynamicImage) -> ImageData {
    match decoded.color() {
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F | ColorType::La8
        | ColorType::La16 => {
            let img = decoded.to_rgba8();
            ImageData {
                width: img.width(),
                height: img.height(),
                format: PixelFormat::Rgba,
                bytes: img.into_raw(),
            }
        }
        _ => {
            let img = decoded.to_rgb8();
            ImageData {
                width: img.width(),
                height: img.height(),
                format: PixelFormat::Rgb,
                bytes: img.into_raw(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_expands_to_opaque_rgba() {
        let data = ImageData {
            width: 2,
            height: 1,
            format: PixelFormat::Rgb,
            bytes: vec![10, 20, 30, 40, 50, 60],
        };
        assert_eq!(data.to_rgba(), vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn rgba_passes_through() {
        let data = ImageData {
            width: 1,
            height: 1,
            format: PixelFormat::Rgba,
            bytes: vec![1, 2, 3, 4],
        };
        assert_eq!(data.to_rgba(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn missing_file_is_resource_not_found() {
        let err = load_image(Path::new("no/such/image.png")).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }

    #[test]
    fn channel_counts() {
        assert_eq!(PixelFormat::Rgb.channels(), 3);
        assert_eq!(PixelFormat::Rgba.channels(), 4);
    }
}
