// crates/skyfire_game/src/lib.rs
//! Gameplay: the level, its rules and how it is drawn. Everything here is
//! written against the device traits, so the same game runs on the GPU
//! backend or on [`headless::HeadlessDevice`].

pub mod headless;
pub mod hud;
pub mod input;
pub mod render;
pub mod resources;
pub mod spawn;
pub mod state;
pub mod systems;

pub use headless::HeadlessDevice;
pub use state::{Game, GameSettings, KeyHandler, RenderOptions, TimedAction, TimedFn};
