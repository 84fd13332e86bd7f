// crates/skyfire_core/src/input/mod.rs
pub mod keymap;

pub use keymap::{map_key_event, map_modifiers};
