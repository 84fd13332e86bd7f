// crates/skyfire_scene/src/lib.rs
//! Game objects and the layered scene that owns them.

pub mod entity;
pub mod scene;
mod storage;

pub use entity::{EraseReason, GameObject, Lifecycle, Tag, TextFormat, UpdateFn, OFFSCREEN};
pub use scene::{LayerKind, Scene};
pub use storage::Layer;
