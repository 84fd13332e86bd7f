// crates/skyfire_game/src/headless.rs
//! A device with no window, GPU or sound card. It hands out handles, keeps
//! what it was given and records each frame's draw calls. Used by the
//! `--headless` run mode and by the tests.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use skyfire_shared::{
    AssetError, AudioDevice, BufferUsage, Camera, DrawCall, DrawableId, FontDevice, FontId,
    FontInfo, GraphicsDevice, Mesh, SoundBufferId, SoundSourceId, TextLayout, TextureFilter,
    TextureId, Viewport,
};

#[derive(Debug)]
pub struct HeadlessSource {
    pub gain: f32,
    pub buffer: Option<SoundBufferId>,
    pub plays: u32,
    remaining_polls: Cell<u32>,
}

#[derive(Debug, Default)]
pub struct HeadlessDevice {
    next_id: u32,
    /// How many `is_playing` queries a started sound answers `true` to.
    pub sound_polls: u32,

    pub meshes: HashMap<DrawableId, Mesh>,
    pub texts: HashMap<DrawableId, String>,
    pub textures: HashMap<TextureId, (PathBuf, TextureFilter)>,
    pub fonts: HashMap<FontId, (PathBuf, f32)>,
    pub sound_buffers: HashMap<SoundBufferId, PathBuf>,
    pub sources: HashMap<SoundSourceId, HeadlessSource>,
    pub released_sources: Vec<SoundSourceId>,
    pub sounds_started: u32,

    pub viewport: Option<Viewport>,
    pub camera: Option<Camera>,
    /// Draw calls since the last `begin_frame`.
    pub frame: Vec<DrawCall>,
    pub frames_begun: u64,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sounds keep playing for `polls` queries after `play`.
    pub fn with_sound_polls(polls: u32) -> Self {
        Self {
            sound_polls: polls,
            ..Self::default()
        }
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn text(&self, drawable: DrawableId) -> Option<&str> {
        self.texts.get(&drawable).map(String::as_str)
    }

    /// Sources created and not yet released.
    pub fn live_sources(&self) -> usize {
        self.sources.len()
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn upload(&mut self, mesh: &Mesh, _usage: BufferUsage) -> DrawableId {
        let id = DrawableId(self.next());
        self.meshes.insert(id, mesh.clone());
        id
    }

    fn update(&mut self, drawable: DrawableId, mesh: &Mesh, _usage: BufferUsage) {
        self.meshes.insert(drawable, mesh.clone());
    }

    fn upload_text(&mut self, _font: FontId, text: &str) -> DrawableId {
        let id = DrawableId(self.next());
        self.texts.insert(id, text.to_owned());
        id
    }

    fn update_text(&mut self, drawable: DrawableId, text: &str) {
        self.texts.insert(drawable, text.to_owned());
    }

    fn load_texture(&mut self, path: &Path, filter: TextureFilter) -> Result<TextureId, AssetError> {
        let id = TextureId(self.next());
        self.textures.insert(id, (path.to_path_buf(), filter));
        Ok(id)
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn begin_frame(&mut self, camera: &Camera) {
        self.camera = Some(*camera);
        self.frame.clear();
        self.frames_begun += 1;
    }

    fn draw(&mut self, call: DrawCall) {
        self.frame.push(call);
    }
}

impl FontDevice for HeadlessDevice {
    fn load_font(&mut self, path: &Path, pixel_height: f32) -> Result<FontInfo, AssetError> {
        let id = FontId(self.next());
        self.fonts.insert(id, (path.to_path_buf(), pixel_height));
        Ok(FontInfo { id, pixel_height })
    }

    /// Monospaced: every glyph is half as wide as it is tall.
    fn layout_text(&self, font: FontId, text: &str) -> TextLayout {
        let pixel_height = self.fonts.get(&font).map_or(0.0, |(_, height)| *height);
        TextLayout {
            width: text.chars().count() as f32 * pixel_height * 0.5,
            height: pixel_height,
        }
    }
}

impl AudioDevice for HeadlessDevice {
    fn decode(&mut self, path: &Path) -> Result<SoundBufferId, AssetError> {
        let id = SoundBufferId(self.next());
        self.sound_buffers.insert(id, path.to_path_buf());
        Ok(id)
    }

    fn create_source(&mut self, gain: f32) -> SoundSourceId {
        let id = SoundSourceId(self.next());
        self.sources.insert(
            id,
            HeadlessSource {
                gain,
                buffer: None,
                plays: 0,
                remaining_polls: Cell::new(0),
            },
        );
        id
    }

    fn bind(&mut self, source: SoundSourceId, buffer: SoundBufferId) {
        if let Some(source) = self.sources.get_mut(&source) {
            source.buffer = Some(buffer);
        }
    }

    fn play(&mut self, source: SoundSourceId) {
        let polls = self.sound_polls;
        if let Some(source) = self.sources.get_mut(&source) {
            self.sounds_started += 1;
            source.plays += 1;
            source.remaining_polls.set(polls);
        }
    }

    fn is_playing(&self, source: SoundSourceId) -> bool {
        let Some(source) = self.sources.get(&source) else {
            return false;
        };
        let remaining = source.remaining_polls.get();
        if remaining == 0 {
            return false;
        }
        source.remaining_polls.set(remaining - 1);
        true
    }

    fn release_source(&mut self, source: SoundSourceId) {
        if self.sources.remove(&source).is_some() {
            self.released_sources.push(source);
        }
    }
}
