//! The sandbox scene: five lit cubes, a textured ground plane, a sphere, an
//! animated point light and a skybox.
//!
//! The scene owns every GPU resource it draws: meshes, materials, textures
//! (through the [`TextureCache`]), the skybox and the shader programs. It
//! releases them in a stable order before the device goes away.

use std::path::Path;

use cgmath::{Point3, Vector3};
use log::info;
use wgpu::util::DeviceExt;

use crate::{
    error::Result,
    gfx::{
        camera::Camera,
        geometry::{generate_box, generate_plane, generate_sphere, Vertex},
        light::PointLight,
        material::{ColorMaterial, TexturedMaterial},
        mesh::{GpuMesh, MeshHandle},
        object::SceneObject,
        renderer::{GpuContext, RenderTargetInfo},
        shader::{ProgramConfig, ShaderProgram},
        skybox::Skybox,
        texture::TextureCache,
        uniform::UniformBuffer,
        Drawable, Releasable,
    },
    input::InputState,
    util::color::parse_rgb,
};

const SHADER_DIR: &str = "shaders";
const TEXTURE_DIR: &str = "assets/textures";

/// Cube placement and diffuse color.
const CUBES: [([f32; 3], &str); 5] = [
    ([1.5, 0.5, 2.0], "#00ffff"),
    ([-1.5, -0.5, 1.0], "#ff00ff"),
    ([-1.0, 1.0, 0.0], "#6600cc"),
    ([1.0, -1.0, -1.0], "#66ff33"),
    ([1.0, 1.0, 1.0], "#663300"),
];

/// Global uniform block shared by the object programs: camera matrices and
/// the point light's terms. Must match `Globals` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
}

struct DrawItem {
    object: SceneObject,
    material_group: wgpu::BindGroup,
}

pub struct SandboxScene {
    camera: Camera,
    meshes: Vec<GpuMesh>,

    skybox: Skybox,
    skybox_program: ShaderProgram,
    light_program: ShaderProgram,
    color_program: ShaderProgram,
    textured_program: ShaderProgram,

    light: PointLight,
    lamp: SceneObject,
    cubes: Vec<DrawItem>,
    sphere: DrawItem,
    plane: DrawItem,

    globals: UniformBuffer<GlobalUniform>,
    globals_group: wgpu::BindGroup,

    textures: TextureCache,
}

impl SandboxScene {
    /// Builds the whole scene. Any missing file, bad parameter or device
    /// failure aborts initialization with the error; nothing is retried.
    pub fn new(gpu: &GpuContext, targets: RenderTargetInfo, width: u32, height: u32) -> Result<Self> {
        info!("initializing scene ({width}x{height})");

        let camera = Camera::new(
            45.0,
            width as f32 / height as f32,
            0.1,
            100.0,
            Point3::new(0.0, 0.0, 5.0),
            Vector3::unit_y(),
            -Vector3::unit_z(),
        );

        // Bind group layouts shared by the pipelines.
        let globals_layout = globals_layout(&gpu.device);
        let object_layout = object_layout(&gpu.device);
        let color_material_layout = color_material_layout(&gpu.device);
        let textured_material_layout = textured_material_layout(&gpu.device);
        let skybox_layout = Skybox::bind_group_layout(&gpu.device);

        // Shader programs, one per distinct look.
        let shaders = Path::new(SHADER_DIR);
        let mut skybox_program =
            ShaderProgram::from_files("skybox", &[shaders.join("skybox.vert"), shaders.join("skybox.frag")])?;
        skybox_program.link(
            gpu,
            &ProgramConfig {
                bind_group_layouts: &[&skybox_layout],
                vertex_layout: Skybox::vertex_layout(),
                targets,
                depth_write: false,
            },
        )?;

        let mut light_program = ShaderProgram::from_files(
            "light",
            &[shaders.join("object.vert"), shaders.join("light.frag")],
        )?;
        light_program.link(
            gpu,
            &ProgramConfig {
                bind_group_layouts: &[&globals_layout, &object_layout],
                vertex_layout: Vertex::layout(),
                targets,
                depth_write: true,
            },
        )?;

        let mut color_program = ShaderProgram::from_files(
            "object-color",
            &[shaders.join("object.vert"), shaders.join("object_color.frag")],
        )?;
        color_program.link(
            gpu,
            &ProgramConfig {
                bind_group_layouts: &[&globals_layout, &object_layout, &color_material_layout],
                vertex_layout: Vertex::layout(),
                targets,
                depth_write: true,
            },
        )?;

        let mut textured_program = ShaderProgram::from_files(
            "object-textured",
            &[shaders.join("object.vert"), shaders.join("object_tex.frag")],
        )?;
        textured_program.link(
            gpu,
            &ProgramConfig {
                bind_group_layouts: &[&globals_layout, &object_layout, &textured_material_layout],
                vertex_layout: Vertex::layout(),
                targets,
                depth_write: true,
            },
        )?;

        // Skybox cube map.
        let sky = Path::new(TEXTURE_DIR).join("skybox");
        let skybox = Skybox::load(
            gpu,
            &[
                sky.join("px.png"),
                sky.join("nx.png"),
                sky.join("py.png"),
                sky.join("ny.png"),
                sky.join("pz.png"),
                sky.join("nz.png"),
            ],
            &skybox_layout,
        )?;

        // Procedural meshes, uploaded once.
        let mut meshes = Vec::new();
        let plane_mesh = push_mesh(gpu, &mut meshes, "plane", generate_plane(20.0, 15.0)?)?;
        let cube_mesh = push_mesh(gpu, &mut meshes, "cube", generate_box(1.0, 1.0, 1.0)?)?;
        let sphere_mesh = push_mesh(gpu, &mut meshes, "sphere", generate_sphere(0.5, 30, 30)?)?;
        let lamp_mesh = push_mesh(gpu, &mut meshes, "lamp", generate_sphere(0.1, 20, 20)?)?;

        // Ground plane with diffuse + specular maps.
        let mut textures = TextureCache::new();
        let floor = TexturedMaterial::new(
            textures.load(gpu, &Path::new(TEXTURE_DIR).join("floor_diffuse.png"))?,
            textures.load(gpu, &Path::new(TEXTURE_DIR).join("floor_specular.png"))?,
            64.0,
        );
        let mut plane_object = SceneObject::new(plane_mesh, Vector3::new(0.0, -2.0, 0.0));
        plane_object.init_bindings(gpu, &object_layout)?;
        let plane = DrawItem {
            object: plane_object,
            material_group: textured_material_group(gpu, &textured_material_layout, &floor)?,
        };

        // Five colored cubes; odd indices use the Blinn specular model.
        let white = Vector3::new(1.0, 1.0, 1.0);
        let mut cubes = Vec::with_capacity(CUBES.len());
        for (index, (position, color)) in CUBES.iter().enumerate() {
            let diffuse = parse_rgb(color)?;
            let material =
                ColorMaterial::new(diffuse * 0.3, diffuse, white, 128, index % 2 != 0);
            let mut object = SceneObject::new(cube_mesh, Vector3::from(*position));
            object.init_bindings(gpu, &object_layout)?;
            cubes.push(DrawItem {
                object,
                material_group: color_material_group(gpu, &color_material_layout, &material)?,
            });
        }

        // Center sphere.
        let sphere_material = ColorMaterial::from_hex("#0F004D", "#3300FF", "#FFFFFF", 128, true)?;
        let mut sphere_object = SceneObject::new(sphere_mesh, Vector3::new(0.0, 0.0, 0.0));
        sphere_object.init_bindings(gpu, &object_layout)?;
        let sphere = DrawItem {
            object: sphere_object,
            material_group: color_material_group(gpu, &color_material_layout, &sphere_material)?,
        };

        // Point light plus its lamp marker.
        let light = PointLight::from_hex(
            lamp_mesh,
            Vector3::new(-3.0, 3.0, 3.0),
            "#FFFFFF",
            0.5,
            1.0,
            1.0,
        )?;
        let mut lamp = SceneObject::new(lamp_mesh, light.position);
        lamp.init_bindings(gpu, &object_layout)?;

        // Global uniforms.
        let globals = UniformBuffer::new_with_data(
            &gpu.device,
            &build_globals(&camera, &light),
        );
        let globals_group = gpu.with_validation("globals bind group", || {
            gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("globals bind group"),
                layout: &globals_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals.binding_resource(),
                }],
            })
        })?;

        info!("scene initialized: {} meshes, {} textures", meshes.len(), textures.len());

        Ok(SandboxScene {
            camera,
            meshes,
            skybox,
            skybox_program,
            light_program,
            color_program,
            textured_program,
            light,
            lamp,
            cubes,
            sphere,
            plane,
            globals,
            globals_group,
            textures,
        })
    }

    /// Applies the latest input, advances the light animation and rewrites
    /// the per-frame uniform buffers.
    pub fn update(&mut self, queue: &wgpu::Queue, input: &InputState, delta: f32, run_time: f32) {
        input.apply_movement(&mut self.camera, delta);
        input.apply_rotation(&mut self.camera);

        self.light.set_x(-3.0 - run_time.sin() * 3.0);
        self.lamp.set_position(self.light.position);
        self.lamp.sync_transform(queue);

        self.globals.update(queue, build_globals(&self.camera, &self.light));
        self.skybox.sync_view(
            queue,
            self.camera.projection_matrix(),
            self.camera.skybox_view_matrix(),
        );
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    fn mesh(&self, handle: MeshHandle) -> &GpuMesh {
        &self.meshes[handle.0]
    }

    fn draw_item(&self, pass: &mut wgpu::RenderPass<'_>, item: &DrawItem) {
        let Some(object_group) = item.object.bind_group() else {
            return;
        };
        pass.set_bind_group(1, object_group, &[]);
        pass.set_bind_group(2, &item.material_group, &[]);
        self.mesh(item.object.mesh).draw(pass);
    }
}

impl Drawable for SandboxScene {
    /// Records the frame: skybox first (its pipeline leaves depth writes
    /// off), then the opaque objects program by program.
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(pipeline) = self.skybox_program.pipeline() {
            pass.set_pipeline(pipeline);
            self.skybox.draw(pass);
        }

        if let Some(pipeline) = self.light_program.pipeline() {
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.globals_group, &[]);
            if let Some(lamp_group) = self.lamp.bind_group() {
                pass.set_bind_group(1, lamp_group, &[]);
                self.mesh(self.lamp.mesh).draw(pass);
            }
        }

        if let Some(pipeline) = self.color_program.pipeline() {
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.globals_group, &[]);
            for cube in &self.cubes {
                self.draw_item(pass, cube);
            }
            self.draw_item(pass, &self.sphere);
        }

        if let Some(pipeline) = self.textured_program.pipeline() {
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.globals_group, &[]);
            self.draw_item(pass, &self.plane);
        }
    }
}

impl Releasable for SandboxScene {
    /// Tears the scene down in a stable order: meshes, textures, skybox,
    /// then the shader programs. Each release is idempotent.
    fn release(&mut self) {
        for mesh in &mut self.meshes {
            mesh.release();
        }
        self.textures.clear();
        self.skybox.release();
        self.skybox_program.release();
        self.light_program.release();
        self.color_program.release();
        self.textured_program.release();
        info!("scene released");
    }
}

fn build_globals(camera: &Camera, light: &PointLight) -> GlobalUniform {
    let position = camera.position();
    GlobalUniform {
        projection: camera.projection_matrix().into(),
        view: camera.view_matrix().into(),
        view_pos: [position.x, position.y, position.z, 1.0],
        light_position: extend(light.position),
        light_color: extend(light.color),
        light_ambient: extend(light.ambient()),
        light_diffuse: extend(light.diffuse()),
        light_specular: extend(light.specular()),
    }
}

fn extend(v: Vector3<f32>) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

fn push_mesh(
    gpu: &GpuContext,
    meshes: &mut Vec<GpuMesh>,
    label: &str,
    data: crate::gfx::geometry::MeshData,
) -> Result<MeshHandle> {
    let mesh = GpuMesh::upload(gpu, label, &data)?;
    meshes.push(mesh);
    Ok(MeshHandle(meshes.len() - 1))
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn globals_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("globals layout"),
        entries: &[uniform_entry(
            0,
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        )],
    })
}

fn object_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("object layout"),
        entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
    })
}

fn color_material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("color material layout"),
        entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
    })
}

fn textured_material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("textured material layout"),
        entries: &[
            texture_entry(0),
            texture_entry(1),
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            uniform_entry(3, wgpu::ShaderStages::FRAGMENT),
        ],
    })
}

fn color_material_group(
    gpu: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    material: &ColorMaterial,
) -> Result<wgpu::BindGroup> {
    let buffer = gpu
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("color material"),
            contents: bytemuck::bytes_of(&material.uniform()),
            usage: wgpu::BufferUsages::UNIFORM,
        });
    gpu.with_validation("color material bind group", || {
        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("color material bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    })
}

fn textured_material_group(
    gpu: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    material: &TexturedMaterial,
) -> Result<wgpu::BindGroup> {
    let buffer = gpu
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("textured material"),
            contents: bytemuck::bytes_of(&material.uniform()),
            usage: wgpu::BufferUsages::UNIFORM,
        });
    gpu.with_validation("textured material bind group", || {
        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("textured material bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&material.diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&material.specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&material.diffuse.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: buffer.as_entire_binding(),
                },
            ],
        })
    })
}
