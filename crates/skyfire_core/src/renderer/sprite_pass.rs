// crates/skyfire_core/src/renderer/sprite_pass.rs
use std::num::NonZeroU64;

use skyfire_shared::{Camera, DrawCall, Shading, Topology, Viewport};
use tracing::warn;
use wgpu::util::{DeviceExt, StagingBelt};

use super::context::GraphicsContext;
use super::store::GpuStore;
use super::types::{vertex_layout, CameraUniform, InstanceRaw};

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

pub struct SpritePass {
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    staging_belt: StagingBelt,
}

fn create_pipeline(
    ctx: &GraphicsContext,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    topology: wgpu::PrimitiveTopology,
    strip_index_format: Option<wgpu::IndexFormat>,
    label: &str,
) -> wgpu::RenderPipeline {
    ctx.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[vertex_layout(), InstanceRaw::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
}

impl SpritePass {
    pub fn new(ctx: &GraphicsContext, store: &GpuStore) -> Self {
        let camera_uniform = CameraUniform::default();
        let camera_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let camera_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                    label: Some("camera_bind_group_layout"),
                });

        let camera_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let shader = ctx
            .device
            .create_shader_module(wgpu::include_wgsl!("sprite.wgsl"));

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sprite Pipeline Layout"),
                bind_group_layouts: &[&camera_bind_group_layout, &store.texture_layout],
                push_constant_ranges: &[],
            });

        let triangle_pipeline = create_pipeline(
            ctx,
            &layout,
            &shader,
            wgpu::PrimitiveTopology::TriangleList,
            None,
            "Sprite Pipeline",
        );
        let line_pipeline = create_pipeline(
            ctx,
            &layout,
            &shader,
            wgpu::PrimitiveTopology::LineStrip,
            Some(wgpu::IndexFormat::Uint16),
            "Outline Pipeline",
        );

        let instance_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (std::mem::size_of::<InstanceRaw>() * 64) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let staging_belt = StagingBelt::new(1024);

        Self {
            triangle_pipeline,
            line_pipeline,
            instance_buffer,
            camera_buffer,
            camera_bind_group,
            staging_belt,
        }
    }

    /// Records one frame of mesh draws, in call order.
    pub fn draw(
        &mut self,
        ctx: &GraphicsContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        store: &GpuStore,
        camera: &Camera,
        viewport: Option<Viewport>,
        calls: &[DrawCall],
    ) {
        let camera_data = CameraUniform {
            view_proj: camera.view_proj().to_cols_array_2d(),
        };
        ctx.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_data]));

        let instances: Vec<InstanceRaw> = calls
            .iter()
            .map(|call| InstanceRaw::new(&call.model, matches!(call.shading, Shading::Textured { .. })))
            .collect();

        let instance_bytes = bytemuck::cast_slice(&instances);
        let required_size = instance_bytes.len() as wgpu::BufferAddress;

        if required_size > self.instance_buffer.size() {
            let old_size = self.instance_buffer.size().max(256);
            self.instance_buffer.destroy();

            let mut new_size = (required_size * 2).max(old_size);
            new_size = wgpu::util::align_to(new_size, 4);

            self.instance_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Instance Buffer"),
                size: new_size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }

        if let Some(size) = NonZeroU64::new(required_size) {
            let mut buffer_view = self.staging_belt.write_buffer(
                encoder,
                &self.instance_buffer,
                0,
                size,
                &ctx.device,
            );
            buffer_view.copy_from_slice(instance_bytes);
        }

        self.staging_belt.finish();

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sprite Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if let Some(viewport) = viewport {
            render_pass.set_viewport(
                viewport.offset.x,
                viewport.offset.y,
                viewport.size.x,
                viewport.size.y,
                0.0,
                1.0,
            );
        }
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        for (i, call) in calls.iter().enumerate() {
            let Some(mesh) = store.mesh(call.drawable) else {
                warn!(drawable = ?call.drawable, "Draw of an unknown drawable skipped");
                continue;
            };

            let (texture, indices) = match &call.shading {
                Shading::Textured { texture, indices } => (
                    store.texture(*texture).unwrap_or(&store.blank),
                    indices.clone().unwrap_or(0..mesh.index_count),
                ),
                _ => (&store.blank, 0..mesh.index_count),
            };

            render_pass.set_pipeline(match mesh.topology {
                Topology::Triangles => &self.triangle_pipeline,
                Topology::LineLoop => &self.line_pipeline,
            });
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            let instance = i as u32;
            render_pass.draw_indexed(indices, 0, instance..instance + 1);
        }
    }

    /// Staging memory can only be reclaimed after the queue submission.
    pub fn cleanup(&mut self) {
        self.staging_belt.recall();
    }
}
