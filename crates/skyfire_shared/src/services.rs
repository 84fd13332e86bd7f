// crates/skyfire_shared/src/services.rs
//! Contracts between the game and the platform devices (GPU, fonts, audio).
//!
//! The game only ever holds opaque handles; the device that issued a handle
//! owns the underlying resource.

use std::ops::Range;
use std::path::Path;

use glam::{Mat4, Vec2, Vec4};

use crate::error::AssetError;
use crate::mesh::{BufferUsage, Mesh};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);
    };
}

handle!(
    /// Uploaded geometry (mesh or text run).
    DrawableId
);
handle!(TextureId);
handle!(FontId);
handle!(SoundBufferId);
handle!(
    /// A playback voice. Released explicitly once its owner leaves the scene.
    SoundSourceId
);

pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
pub const BLACK: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);
pub const YELLOW: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Vec4,
    pub outline_color: Vec4,
    /// Outline width in pixels; 0 disables it.
    pub outline_thickness: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: WHITE,
            outline_color: BLACK,
            outline_thickness: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shading {
    /// Sampled texture; `indices` restricts the draw to one sprite frame.
    Textured {
        texture: TextureId,
        indices: Option<Range<u32>>,
    },
    Text(TextStyle),
    /// Vertex colors only.
    Colored,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub drawable: DrawableId,
    pub model: Mat4,
    pub shading: Shading,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub projection: Mat4,
    pub view: Mat4,
}

impl Camera {
    /// World spans [-aspect, aspect] horizontally and [-1, 1] vertically.
    pub fn orthographic(aspect: f32) -> Self {
        Self {
            projection: Mat4::orthographic_rh(-aspect, aspect, -1.0, 1.0, -1.0, 1.0),
            view: Mat4::IDENTITY,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Region of the framebuffer the world is drawn into, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub offset: Vec2,
    pub size: Vec2,
}

impl Viewport {
    /// Largest centered region of `aspect` that fits the framebuffer.
    pub fn letterbox(width: u32, height: u32, aspect: f32) -> Self {
        let (width, height) = (width as f32, height as f32);
        let mut rest = Vec2::ZERO;
        if width / height < aspect {
            rest.y = height - width / aspect;
        } else {
            rest.x = width - height * aspect;
        }
        Self {
            offset: rest / 2.0,
            size: Vec2::new(width, height) - rest,
        }
    }

    /// Window-pixel cursor position to world coordinates.
    pub fn normalized_cursor(&self, cursor: Vec2, aspect: f32) -> Vec2 {
        let x = ((cursor.x - self.offset.x) * 2.0 * aspect) / self.size.x - aspect;
        let y = ((cursor.y - self.offset.y) * -2.0) / self.size.y + 1.0;
        Vec2::new(x, y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontInfo {
    pub id: FontId,
    /// Glyph rasterization height; text geometry is measured in these pixels.
    pub pixel_height: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextLayout {
    pub width: f32,
    pub height: f32,
}

pub trait GraphicsDevice {
    fn upload(&mut self, mesh: &Mesh, usage: BufferUsage) -> DrawableId;
    /// Replaces the data in place when the vertex and index counts are unchanged,
    /// otherwise reallocates behind the same handle.
    fn update(&mut self, drawable: DrawableId, mesh: &Mesh, usage: BufferUsage);
    fn upload_text(&mut self, font: FontId, text: &str) -> DrawableId;
    fn update_text(&mut self, drawable: DrawableId, text: &str);
    fn load_texture(&mut self, path: &Path, filter: TextureFilter) -> Result<TextureId, AssetError>;
    fn set_viewport(&mut self, viewport: Viewport);
    /// Starts recording a frame; previous draws are discarded.
    fn begin_frame(&mut self, camera: &Camera);
    fn draw(&mut self, call: DrawCall);
}

pub trait FontDevice {
    fn load_font(&mut self, path: &Path, pixel_height: f32) -> Result<FontInfo, AssetError>;
    fn layout_text(&self, font: FontId, text: &str) -> TextLayout;
}

pub trait AudioDevice {
    fn decode(&mut self, path: &Path) -> Result<SoundBufferId, AssetError>;
    fn create_source(&mut self, gain: f32) -> SoundSourceId;
    fn bind(&mut self, source: SoundSourceId, buffer: SoundBufferId);
    fn play(&mut self, source: SoundSourceId);
    fn is_playing(&self, source: SoundSourceId) -> bool;
    fn release_source(&mut self, source: SoundSourceId);
}

/// Everything the game needs from the platform.
pub trait Device: GraphicsDevice + FontDevice + AudioDevice {}

impl<T: GraphicsDevice + FontDevice + AudioDevice> Device for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letterbox_pads_the_short_axis() {
        let close = |a: Vec2, b: Vec2| (a - b).length() < 0.01;

        let wide = Viewport::letterbox(2000, 900, 16.0 / 9.0);
        assert!(close(wide.size, Vec2::new(1600.0, 900.0)));
        assert!(close(wide.offset, Vec2::new(200.0, 0.0)));

        let tall = Viewport::letterbox(1600, 1100, 16.0 / 9.0);
        assert!(close(tall.size, Vec2::new(1600.0, 900.0)));
        assert!(close(tall.offset, Vec2::new(0.0, 100.0)));
    }

    #[test]
    fn cursor_corners_map_to_world_corners() {
        let aspect = 16.0 / 9.0;
        let viewport = Viewport::letterbox(1600, 900, aspect);
        let top_left = viewport.normalized_cursor(Vec2::ZERO, aspect);
        assert!((top_left - Vec2::new(-aspect, 1.0)).length() < 1e-4);
        let center = viewport.normalized_cursor(Vec2::new(800.0, 450.0), aspect);
        assert!(center.length() < 1e-4);
    }
}
