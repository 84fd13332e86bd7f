// crates/skyfire_core/src/lib.rs

// Logic Modules
pub mod app;
pub mod config;
pub mod engine_loop;
pub mod input;

// Platform Modules
pub mod audio;
pub mod device;
pub mod gui;
pub mod platform_runner;
mod renderer;

pub use app::App;
pub use config::{ConfigError, EngineConfig, WindowConfig};
pub use device::PlatformDevice;
pub use engine_loop::{EngineLoop, IterationReport};

use skyfire_shared::AssetError;
use thiserror::Error;

/// Failure to bring up the window, GPU or game.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window creation: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("surface creation: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter")]
    NoAdapter,
    #[error("surface reports no supported format")]
    NoSurfaceFormat,
    #[error("graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}
