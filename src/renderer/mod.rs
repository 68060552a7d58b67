mod instanced;
mod mesh;
mod render_target;

use std::mem::size_of;

use anyhow::{Context, Result};
use bytemuck::{bytes_of, Pod, Zeroable};
use glam::{vec4, Mat4, Vec4};
use log::{debug, info, warn};
use tinsel::tree::{GroupKind, TreeBuffers};

use crate::{
    entity::Scene,
    window::{Size, Window},
};

use instanced::{InstancedMeshRenderer, InstancedMeshRendererBuilder};
use mesh::Mesh;
use render_target::{RenderTarget, DEPTH_TEXTURE_FORMAT};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.004,
    g: 0.012,
    b: 0.02,
    a: 1.0,
};

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct Uniforms {
    view_proj: Mat4,
    pivot: Mat4,
    light_dir: Vec4,
}

impl Uniforms {
    fn new(scene: &Scene) -> Self {
        Self {
            view_proj: scene.camera.view_projection(),
            pivot: scene.tree.pivot_matrix(),
            light_dir: vec4(0.4, -0.8, 0.5, 0.0),
        }
    }
}

struct TreeMeshes {
    needles: InstancedMeshRenderer,
    ornament_spheres: InstancedMeshRenderer,
    ornament_diamonds: InstancedMeshRenderer,
    lights: InstancedMeshRenderer,
    topper: InstancedMeshRenderer,
}

impl TreeMeshes {
    fn new(
        device: &wgpu::Device,
        uniform_buffer: &wgpu::Buffer,
        color_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let build = |label: &str, mesh: &Mesh, count: usize| {
            InstancedMeshRendererBuilder::new(label, mesh, count)
                .uniform_buffer(uniform_buffer, size_of::<Uniforms>() as _)
                .color_target_format(color_format)
                .depth_format(DEPTH_TEXTURE_FORMAT)
                .build(device)
                .with_context(|| format!("Failed to build {} renderer", label))
        };

        let sphere = Mesh::uv_sphere(14, 10);
        Ok(Self {
            needles: build("Needles", &Mesh::needle(), GroupKind::Needles.count())?,
            ornament_spheres: build(
                "Ornament Spheres",
                &sphere,
                GroupKind::OrnamentSpheres.count(),
            )?,
            ornament_diamonds: build(
                "Ornament Diamonds",
                &Mesh::octahedron(),
                GroupKind::OrnamentDiamonds.count(),
            )?,
            lights: build("Lights", &sphere, GroupKind::Lights.count())?,
            topper: build("Topper", &Mesh::star(5, 1.0, 0.45, 0.3), 1)?,
        })
    }

    fn update(&self, queue: &wgpu::Queue, buffers: &mut TreeBuffers) {
        self.needles.update(queue, &mut buffers.needles);
        self.ornament_spheres.update(queue, &mut buffers.ornament_spheres);
        self.ornament_diamonds.update(queue, &mut buffers.ornament_diamonds);
        self.lights.update(queue, &mut buffers.lights);
        self.topper.update(queue, &mut buffers.topper);
    }

    fn draw<'rpass>(&'rpass self, rpass: &mut wgpu::RenderPass<'rpass>) {
        self.needles.draw(rpass);
        self.ornament_spheres.draw(rpass);
        self.ornament_diamonds.draw(rpass);
        self.lights.draw(rpass);
        self.topper.draw(rpass);
    }
}

pub struct Renderer {
    surface: wgpu::Surface,
    surface_format: wgpu::TextureFormat,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: Size,
    depth: RenderTarget,
    uniform_buffer: wgpu::Buffer,
    meshes: TreeMeshes,
}

impl Renderer {
    pub async fn new(window: &impl Window) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No adapter found")?;
        info!("Using adapter {:?}", adapter.get_info());

        let surface_format = surface
            .get_preferred_format(&adapter)
            .context("No preferred format found")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .context("No device found")?;

        let size = window.size();
        Self::configure_surface(&surface, &device, surface_format, size);

        let depth = RenderTarget::depth(&device, size);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Tree Uniform Buffer"),
            size: size_of::<Uniforms>() as _,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let meshes = TreeMeshes::new(&device, &uniform_buffer, surface_format)?;

        Ok(Self {
            surface,
            surface_format,
            device,
            queue,
            size,
            depth,
            uniform_buffer,
            meshes,
        })
    }

    fn configure_surface(
        surface: &wgpu::Surface,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Size,
    ) {
        if size.is_empty() {
            return;
        }
        surface.configure(
            device,
            &wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width,
                height: size.height,
                present_mode: wgpu::PresentMode::Fifo,
            },
        )
    }

    pub fn resize(&mut self, size: Size) {
        debug!("Resizing surface to {:?}", size);
        self.size = size;
        Self::configure_surface(&self.surface, &self.device, self.surface_format, size);
        self.depth = RenderTarget::depth(&self.device, size);
    }

    pub fn render(&mut self, scene: &mut Scene) -> Result<()> {
        if self.size.is_empty() {
            return Ok(());
        }

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytes_of(&Uniforms::new(scene)));

        // Nothing to draw until the tree has buffers.
        let mounted = match scene.tree.buffers_mut() {
            Some(buffers) => {
                self.meshes.update(&self.queue, buffers);
                true
            }
            None => false,
        };

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.resize(self.size);
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to get next surface texture"),
        };
        let surface_texture_view = surface_texture.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Tree Command Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Tree Render Pass"),
                color_attachments: &[wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: true,
                    },
                }],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: false,
                    }),
                    stencil_ops: None,
                }),
            });
            if mounted {
                self.meshes.draw(&mut rpass);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        surface_texture.present();

        Ok(())
    }
}
