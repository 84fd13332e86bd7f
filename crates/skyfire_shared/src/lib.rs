// crates/skyfire_shared/src/lib.rs

pub mod error;
pub mod geometry;
pub mod input_types;
pub mod mesh;
pub mod services;
pub mod sprite;

pub use error::AssetError;
pub use geometry::{collision, Aabb, Motion, Transform};
pub use input_types::{Key, KeyAction, KeyEvent, Modifiers};
pub use mesh::{BufferUsage, Mesh, Topology, Vertex};
pub use services::{
    AudioDevice, Camera, Device, DrawCall, DrawableId, FontDevice, FontId, FontInfo,
    GraphicsDevice, Shading, SoundBufferId, SoundSourceId, TextLayout, TextStyle, TextureFilter,
    TextureId, Viewport,
};
pub use sprite::{SpriteAnimation, SpriteFrame};

use glam::Vec2;

/// What the platform loop drives. The loop owns timing; the game owns state.
pub trait GameLogic {
    type Device;

    fn device_mut(&mut self) -> &mut Self::Device;

    /// One fixed simulation step of `dt` seconds at simulated time `time`.
    fn update(&mut self, dt: f32, time: f32);

    /// `frame_time` is the real time since the previous render; `alpha` is the
    /// fraction of a tick elapsed since the last completed update.
    fn render(&mut self, frame_time: f32, alpha: f32);

    /// Whether renders should be paced to the display refresh rate.
    fn vsync(&self) -> bool;

    fn handle_key(&mut self, event: KeyEvent);

    fn set_focus(&mut self, focused: bool);

    /// Cursor position in window pixels.
    fn set_cursor(&mut self, position: Vec2);

    /// Framebuffer size in pixels.
    fn resize(&mut self, width: u32, height: u32);
}
