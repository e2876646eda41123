//! GLSL shader loading, compilation and program linking.
//!
//! Shader stages are plain GLSL files whose stage is derived from the file
//! extension (`.vert`, `.frag`, `.geom`, `.tesc`, `.tese`). Sources are
//! compiled to SPIR-V with shaderc (Vulkan semantics) and linked into a
//! render pipeline; compiler diagnostics are surfaced verbatim.

use std::borrow::Cow;
use std::path::Path;

use log::{debug, info};

use crate::{
    error::{Error, Result},
    gfx::{
        renderer::{GpuContext, RenderTargetInfo, DEPTH_FORMAT},
        Releasable,
    },
};

/// Pipeline stage of a shader source file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEvaluation,
}

impl ShaderStage {
    /// Derives the stage from a file extension.
    pub fn from_path(path: &Path) -> Result<ShaderStage> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                Error::invalid(format!(
                    "cannot determine shader stage of {} (no extension)",
                    path.display()
                ))
            })?;
        match ext.to_ascii_lowercase().as_str() {
            "vert" => Ok(ShaderStage::Vertex),
            "frag" => Ok(ShaderStage::Fragment),
            "geom" => Ok(ShaderStage::Geometry),
            "tesc" => Ok(ShaderStage::TessControl),
            "tese" => Ok(ShaderStage::TessEvaluation),
            other => Err(Error::invalid(format!(
                "cannot determine shader stage of {}: unknown extension `{other}`",
                path.display()
            ))),
        }
    }

    fn shaderc_kind(self) -> shaderc::ShaderKind {
        match self {
            ShaderStage::Vertex => shaderc::ShaderKind::Vertex,
            ShaderStage::Fragment => shaderc::ShaderKind::Fragment,
            ShaderStage::Geometry => shaderc::ShaderKind::Geometry,
            ShaderStage::TessControl => shaderc::ShaderKind::TessControl,
            ShaderStage::TessEvaluation => shaderc::ShaderKind::TessEvaluation,
        }
    }
}

/// A loaded (not yet compiled) shader stage.
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub label: String,
    pub text: String,
}

impl ShaderSource {
    /// Reads a shader source file, deriving the stage from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<ShaderSource> {
        let path = path.as_ref();
        let stage = ShaderStage::from_path(path)?;
        let text = std::fs::read_to_string(path)
            .map_err(|_| Error::ResourceNotFound(path.to_path_buf()))?;
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("loaded shader source `{label}` ({stage:?})");
        Ok(ShaderSource { stage, label, text })
    }
}

/// Fixed-function state a program's pipeline is linked against.
pub struct ProgramConfig<'a> {
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
    pub targets: RenderTargetInfo,
    /// The skybox links with depth writes disabled; everything else writes.
    pub depth_write: bool,
}

/// A linked pair of vertex + fragment stages, i.e. one render pipeline.
///
/// Mirrors the lifecycle of a GL program object: created from sources,
/// linked once against the device, released exactly once.
pub struct ShaderProgram {
    label: String,
    sources: Vec<ShaderSource>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl ShaderProgram {
    pub fn new(label: &str, sources: Vec<ShaderSource>) -> ShaderProgram {
        ShaderProgram {
            label: label.to_owned(),
            sources,
            pipeline: None,
        }
    }

    /// Loads all given source files and wraps them into an unlinked program.
    pub fn from_files<P: AsRef<Path>>(label: &str, paths: &[P]) -> Result<ShaderProgram> {
        let sources = paths
            .iter()
            .map(ShaderSource::load)
            .collect::<Result<Vec<_>>>()?;
        Ok(ShaderProgram::new(label, sources))
    }

    /// Compiles the stages and builds the render pipeline.
    ///
    /// Fails with [`Error::DeviceState`] when the program is already linked
    /// or contains a stage the device cannot consume, and with
    /// [`Error::CompileLink`] on any compiler or pipeline diagnostic.
    pub fn link(&mut self, gpu: &GpuContext, config: &ProgramConfig<'_>) -> Result<()> {
        if self.pipeline.is_some() {
            return Err(Error::device(format!(
                "program `{}` is already linked",
                self.label
            )));
        }

        let mut vertex = None;
        let mut fragment = None;
        for source in &self.sources {
            match source.stage {
                ShaderStage::Vertex if vertex.is_none() => vertex = Some(source),
                ShaderStage::Fragment if fragment.is_none() => fragment = Some(source),
                ShaderStage::Vertex | ShaderStage::Fragment => {
                    return Err(Error::device(format!(
                        "program `{}` has a duplicate {:?} stage",
                        self.label, source.stage
                    )));
                }
                other => {
                    return Err(Error::device(format!(
                        "program `{}`: {other:?} stages are not supported by the device",
                        self.label
                    )));
                }
            }
        }
        let (vertex, fragment) = match (vertex, fragment) {
            (Some(v), Some(f)) => (v, f),
            _ => {
                return Err(Error::device(format!(
                    "program `{}` needs exactly one vertex and one fragment stage",
                    self.label
                )));
            }
        };

        let vertex_module = compile_module(gpu, vertex)?;
        let fragment_module = compile_module(gpu, fragment)?;

        let layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{} layout", self.label)),
                bind_group_layouts: config.bind_group_layouts,
                push_constant_ranges: &[],
            });

        let pipeline = gpu.with_validation(&self.label, || {
            gpu.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(&self.label),
                    layout: Some(&layout),
                    vertex: wgpu::VertexState {
                        module: &vertex_module,
                        entry_point: Some("main"),
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                        buffers: &[config.vertex_layout.clone()],
                    },
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Ccw,
                        // No face culling; the skybox is viewed from inside.
                        cull_mode: None,
                        unclipped_depth: false,
                        polygon_mode: wgpu::PolygonMode::Fill,
                        conservative: false,
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: config.depth_write,
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: wgpu::MultisampleState {
                        count: config.targets.samples,
                        mask: !0,
                        alpha_to_coverage_enabled: false,
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &fragment_module,
                        entry_point: Some("main"),
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: config.targets.format,
                            blend: None,
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    multiview: None,
                    cache: None,
                })
        });

        let pipeline = pipeline.map_err(|err| Error::CompileLink {
            label: self.label.clone(),
            log: err.to_string(),
        })?;

        info!("linked program `{}`", self.label);
        self.pipeline = Some(pipeline);
        Ok(())
    }

    /// The linked pipeline, if `link` succeeded and `release` was not called.
    pub fn pipeline(&self) -> Option<&wgpu::RenderPipeline> {
        self.pipeline.as_ref()
    }

    pub fn is_linked(&self) -> bool {
        self.pipeline.is_some()
    }
}

impl Releasable for ShaderProgram {
    fn release(&mut self) {
        if self.pipeline.take().is_some() {
            debug!("released program `{}`", self.label);
        }
    }
}

/// Compiles one stage to SPIR-V and wraps it into a shader module.
fn compile_module(gpu: &GpuContext, source: &ShaderSource) -> Result<wgpu::ShaderModule> {
    let compiler = shaderc::Compiler::new()
        .ok_or_else(|| Error::device("shader compiler unavailable".to_string()))?;
    let mut options = shaderc::CompileOptions::new()
        .ok_or_else(|| Error::device("shader compiler options unavailable".to_string()))?;
    options.set_target_env(
        shaderc::TargetEnv::Vulkan,
        shaderc::EnvVersion::Vulkan1_0 as u32,
    );

    let artifact = compiler
        .compile_into_spirv(
            &source.text,
            source.stage.shaderc_kind(),
            &source.label,
            "main",
            Some(&options),
        )
        .map_err(|err| Error::CompileLink {
            label: source.label.clone(),
            log: err.to_string(),
        })?;

    let module = gpu
        .with_validation(&source.label, || {
            gpu.device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(&source.label),
                    source: wgpu::ShaderSource::SpirV(Cow::Owned(artifact.as_binary().to_vec())),
                })
        })
        .map_err(|err| Error::CompileLink {
            label: source.label.clone(),
            log: err.to_string(),
        })?;

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_from_extension() {
        let cases = [
            ("shaders/a.vert", ShaderStage::Vertex),
            ("shaders/a.frag", ShaderStage::Fragment),
            ("a.geom", ShaderStage::Geometry),
            ("a.tesc", ShaderStage::TessControl),
            ("a.tese", ShaderStage::TessEvaluation),
            ("UPPER.VERT", ShaderStage::Vertex),
        ];
        for (path, expected) in cases {
            assert_eq!(ShaderStage::from_path(Path::new(path)).unwrap(), expected);
        }
    }

    #[test]
    fn stage_rejects_unknown_extension() {
        assert!(matches!(
            ShaderStage::from_path(Path::new("shader.glsl")),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            ShaderStage::from_path(Path::new("shader")),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn missing_source_is_resource_not_found() {
        let err = ShaderSource::load("no/such/shader.vert").unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }

    #[test]
    fn release_is_idempotent() {
        let mut program = ShaderProgram::new("test", Vec::new());
        assert!(!program.is_linked());
        program.release();
        program.release();
        assert!(program.pipeline().is_none());
    }
}
