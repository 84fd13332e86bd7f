// crates/skyfire_core/src/app.rs

use skyfire_shared::{AssetError, GameLogic};

use crate::config::EngineConfig;
use crate::device::PlatformDevice;
use crate::platform_runner::PlatformRunner;
use crate::PlatformError;

/// A windowed run of one game.
pub struct App {
    pub config: EngineConfig,
}

impl App {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn run<G, F>(self, build: F) -> Result<(), PlatformError>
    where
        G: GameLogic<Device = PlatformDevice> + 'static,
        F: FnOnce(PlatformDevice) -> Result<G, AssetError>,
    {
        PlatformRunner::new(self).start(build)
    }
}
