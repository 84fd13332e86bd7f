// crates/skyfire_core/src/device.rs
//! The windowed device: wgpu for meshes and textures, egui for text, cpal
//! for sound. Draw calls are collected per frame and submitted by `present`.

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use skyfire_shared::{
    AssetError, AudioDevice, BufferUsage, Camera, DrawCall, DrawableId, FontDevice, FontId,
    FontInfo, GraphicsDevice, Mesh, Shading, SoundBufferId, SoundSourceId, TextLayout,
    TextureFilter, TextureId, Viewport,
};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::audio::AudioSystem;
use crate::gui::GuiSystem;
use crate::renderer::text::TextOverlay;
use crate::renderer::{GuiFrame, Renderer};
use crate::PlatformError;

pub struct PlatformDevice {
    window: Arc<Window>,
    renderer: Renderer,
    gui: GuiSystem,
    text: TextOverlay,
    audio: AudioSystem,
    next_id: u32,
    camera: Camera,
    viewport: Option<Viewport>,
    frame: Vec<DrawCall>,
}

impl PlatformDevice {
    pub fn new(window: Arc<Window>) -> Result<Self, PlatformError> {
        let renderer = pollster::block_on(Renderer::new(window.clone()))?;
        let gui = GuiSystem::new(&window);
        Ok(Self {
            window,
            renderer,
            gui,
            text: TextOverlay::new(),
            audio: AudioSystem::new(),
            next_id: 0,
            camera: Camera::orthographic(1.0),
            viewport: None,
            frame: Vec::new(),
        })
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Refresh rate of the monitor the window is on, in Hz.
    pub fn refresh_rate(&self) -> Option<f64> {
        let millihertz = self.window.current_monitor()?.refresh_rate_millihertz()?;
        Some(f64::from(millihertz) / 1000.0)
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        self.gui.handle_event(&self.window, event);
    }

    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(size);
    }

    /// Submits the draw calls recorded since `begin_frame`: meshes first,
    /// then text on top.
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let (text_calls, mesh_calls): (Vec<DrawCall>, Vec<DrawCall>) = self
            .frame
            .drain(..)
            .partition(|call| matches!(call.shading, Shading::Text(_)));

        let size = self.window.inner_size();
        let viewport = self.viewport.unwrap_or(Viewport {
            offset: Vec2::ZERO,
            size: Vec2::new(size.width as f32, size.height as f32),
        });

        let text = &self.text;
        let camera = &self.camera;
        let (primitives, textures_delta, pixels_per_point) = self
            .gui
            .draw(&self.window, |ctx| text.paint(ctx, &text_calls, camera, &viewport));

        self.renderer.render(
            &self.camera,
            self.viewport,
            &mesh_calls,
            GuiFrame {
                pixels_per_point,
                primitives: &primitives,
                textures_delta: &textures_delta,
            },
        )
    }
}

impl GraphicsDevice for PlatformDevice {
    fn upload(&mut self, mesh: &Mesh, _usage: BufferUsage) -> DrawableId {
        let id = DrawableId(self.next());
        let renderer = &mut self.renderer;
        renderer.store.upload(&renderer.ctx, id, mesh);
        id
    }

    fn update(&mut self, drawable: DrawableId, mesh: &Mesh, _usage: BufferUsage) {
        let renderer = &mut self.renderer;
        renderer.store.update(&renderer.ctx, drawable, mesh);
    }

    fn upload_text(&mut self, font: FontId, text: &str) -> DrawableId {
        let id = DrawableId(self.next());
        self.text.set_text(id, font, text);
        id
    }

    fn update_text(&mut self, drawable: DrawableId, text: &str) {
        self.text.update_text(drawable, text);
    }

    fn load_texture(&mut self, path: &Path, filter: TextureFilter) -> Result<TextureId, AssetError> {
        let id = TextureId(self.next());
        let renderer = &mut self.renderer;
        renderer.store.load_texture(&renderer.ctx, id, path, filter)?;
        Ok(id)
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn begin_frame(&mut self, camera: &Camera) {
        self.camera = *camera;
        self.frame.clear();
    }

    fn draw(&mut self, call: DrawCall) {
        self.frame.push(call);
    }
}

impl FontDevice for PlatformDevice {
    fn load_font(&mut self, path: &Path, pixel_height: f32) -> Result<FontInfo, AssetError> {
        let id = FontId(self.next());
        self.text.load_font(&self.gui.ctx, id, path, pixel_height)
    }

    fn layout_text(&self, font: FontId, text: &str) -> TextLayout {
        self.text.layout(font, text)
    }
}

impl AudioDevice for PlatformDevice {
    fn decode(&mut self, path: &Path) -> Result<SoundBufferId, AssetError> {
        self.audio.decode(path)
    }

    fn create_source(&mut self, gain: f32) -> SoundSourceId {
        self.audio.create_source(gain)
    }

    fn bind(&mut self, source: SoundSourceId, buffer: SoundBufferId) {
        self.audio.bind(source, buffer);
    }

    fn play(&mut self, source: SoundSourceId) {
        self.audio.play(source);
    }

    fn is_playing(&self, source: SoundSourceId) -> bool {
        self.audio.is_playing(source)
    }

    fn release_source(&mut self, source: SoundSourceId) {
        self.audio.release_source(source);
    }
}
