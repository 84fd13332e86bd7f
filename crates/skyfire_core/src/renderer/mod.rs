// crates/skyfire_core/src/renderer/mod.rs
pub mod context;
pub mod sprite_pass;
pub mod store;
pub mod text;
pub mod types;

use std::sync::Arc;

use skyfire_shared::{Camera, DrawCall, Viewport};
use winit::window::Window;

use self::context::GraphicsContext;
use self::sprite_pass::SpritePass;
use self::store::GpuStore;
use crate::PlatformError;

/// Egui output for one frame, painted over the sprites.
pub struct GuiFrame<'a> {
    pub pixels_per_point: f32,
    pub primitives: &'a [egui::ClippedPrimitive],
    pub textures_delta: &'a egui::TexturesDelta,
}

pub struct Renderer {
    pub ctx: GraphicsContext,
    pub store: GpuStore,
    sprite_pass: SpritePass,
    gui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Result<Self, PlatformError> {
        let ctx = GraphicsContext::new(window).await?;
        let store = GpuStore::new(&ctx);
        let sprite_pass = SpritePass::new(&ctx, &store);
        let gui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Ok(Self {
            ctx,
            store,
            sprite_pass,
            gui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        viewport: Option<Viewport>,
        calls: &[DrawCall],
        gui: GuiFrame<'_>,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // 1. Meshes
        self.sprite_pass.draw(
            &self.ctx,
            &mut encoder,
            &view,
            &self.store,
            camera,
            viewport,
            calls,
        );

        // 2. Text
        for (id, image_delta) in &gui.textures_delta.set {
            self.gui_renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.config.width, self.ctx.config.height],
            pixels_per_point: gui.pixels_per_point,
        };

        self.gui_renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            gui.primitives,
            &screen_descriptor,
        );

        {
            let mut gui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Gui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.gui_renderer
                .render(&mut gui_pass, gui.primitives, &screen_descriptor);
        }

        for id in &gui.textures_delta.free {
            self.gui_renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.sprite_pass.cleanup();

        output.present();
        Ok(())
    }
}
