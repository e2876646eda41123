//! wgpu device/surface management and the per-frame render pass.

use std::sync::Arc;

use log::{debug, info};
use winit::window::Window;

use crate::{
    config::WindowConfig,
    error::{Error, Result},
    gfx::{scene::SandboxScene, Drawable},
};

/// Depth buffer format used by every pipeline in the sandbox.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Handle to the graphics device and its submission queue.
#[derive(Clone)]
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Runs `f` inside a validation error scope, turning any captured device
    /// error into [`Error::DeviceState`]. Resources created by a failed `f`
    /// are dropped with its return value, so callers never observe partially
    /// created state.
    pub fn with_validation<T>(&self, label: &str, f: impl FnOnce() -> T) -> Result<T> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f();
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(err) => Err(Error::device(format!("{label}: {err}"))),
            None => Ok(value),
        }
    }
}

/// Color/depth target parameters a render pipeline must match.
#[derive(Clone, Copy, Debug)]
pub struct RenderTargetInfo {
    pub format: wgpu::TextureFormat,
    pub samples: u32,
}

/// Owns the surface, device and frame attachments; records one render pass
/// per frame and hands the acquired surface texture back to the caller for
/// presentation.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    gpu: GpuContext,
    config: wgpu::SurfaceConfiguration,
    samples: u32,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, window_config: &WindowConfig) -> Result<Renderer> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|err| Error::device(format!("failed to create surface: {err}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| Error::device(format!("no suitable adapter: {err}")))?;
        info!("rendering on {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sandbox device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|err| Error::device(format!("failed to request device: {err}")))?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: window_config.width,
            height: window_config.height,
            // Swap interval 0: frames present as fast as they render.
            present_mode: wgpu::PresentMode::Immediate,
            alpha_mode: capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let gpu = GpuContext { device, queue };
        let samples = window_config.samples;
        let depth_view = create_depth_view(&gpu.device, &config, samples);
        let msaa_view = create_msaa_view(&gpu.device, &config, samples);

        Ok(Renderer {
            surface,
            gpu,
            config,
            samples,
            depth_view,
            msaa_view,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn target_info(&self) -> RenderTargetInfo {
        RenderTargetInfo {
            format: self.config.format,
            samples: self.samples,
        }
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigures the surface and frame attachments after a size change.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        debug!("resizing surface to {width}x{height}");
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.gpu.device, &self.config);
        self.depth_view = create_depth_view(&self.gpu.device, &self.config, self.samples);
        self.msaa_view = create_msaa_view(&self.gpu.device, &self.config, self.samples);
    }

    /// Clears, draws the scene and submits the command buffer.
    ///
    /// The acquired surface texture is returned so the caller can present it
    /// under the window lock.
    pub fn render_frame(&mut self, scene: &SandboxScene) -> Result<wgpu::SurfaceTexture> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reacquire once with a freshly configured swapchain.
                self.surface.configure(&self.gpu.device, &self.config);
                self.surface
                    .get_current_texture()
                    .map_err(|err| Error::device(format!("failed to reacquire frame: {err}")))?
            }
            Err(err) => {
                return Err(Error::device(format!("failed to acquire frame: {err}")));
            }
        };

        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        {
            // With MSAA the pass renders into the multisampled target and
            // resolves into the swapchain texture.
            let (view, resolve_target) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(&frame_view)),
                None => (&frame_view, None),
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.3,
                            g: 0.3,
                            b: 0.3,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            scene.draw(&mut pass);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        Ok(frame)
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    samples: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: samples,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_msaa_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    samples: u32,
) -> Option<wgpu::TextureView> {
    if samples <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("msaa color target"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: samples,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}
