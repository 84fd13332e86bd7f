// crates/skyfire_core/src/platform_runner.rs

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use skyfire_shared::{AssetError, GameLogic, Modifiers};
use tracing::{error, info, warn};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::app::App;
use crate::device::PlatformDevice;
use crate::engine_loop::EngineLoop;
use crate::input::{map_key_event, map_modifiers};
use crate::PlatformError;

/// Owns App and runs the platform (winit) event loop.
/// This isolates OS interaction from the game.
pub struct PlatformRunner {
    app: App,
}

impl PlatformRunner {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    /// Opens the window, lets `build` create the game on the windowed device
    /// and drives it until the window closes.
    pub fn start<G, F>(self, build: F) -> Result<(), PlatformError>
    where
        G: GameLogic<Device = PlatformDevice> + 'static,
        F: FnOnce(PlatformDevice) -> Result<G, AssetError>,
    {
        let config = self.app.config;
        let event_loop = EventLoop::new()?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&config.window.title)
                .with_inner_size(winit::dpi::PhysicalSize::new(
                    config.window.width,
                    config.window.height,
                ))
                .build(&event_loop)?,
        );
        info!(
            width = config.window.width,
            height = config.window.height,
            "Window created"
        );

        let device = PlatformDevice::new(window.clone())?;
        let mut game = build(device)?;

        let mut engine_loop = EngineLoop::new(config.tick_rate);
        if let Some(hz) = game.device_mut().refresh_rate() {
            info!(hz, "Display refresh rate");
            engine_loop.set_refresh_rate(hz);
        }
        let size = window.inner_size();
        game.resize(size.width, size.height);

        let mut modifiers = Modifiers::NONE;

        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent { event: win_event, .. } => {
                game.device_mut().handle_window_event(&win_event);

                match win_event {
                    WindowEvent::CloseRequested => elwt.exit(),

                    WindowEvent::KeyboardInput { event, .. } => {
                        if let Some(key_event) = map_key_event(&event, modifiers) {
                            game.handle_key(key_event);
                        }
                    }

                    WindowEvent::ModifiersChanged(state) => {
                        modifiers = map_modifiers(state.state());
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        game.set_cursor(Vec2::new(position.x as f32, position.y as f32));
                    }

                    WindowEvent::Resized(size) => {
                        game.device_mut().resize_surface(size);
                        game.resize(size.width, size.height);
                    }

                    WindowEvent::Focused(focused) => game.set_focus(focused),

                    _ => {}
                }
            }

            Event::AboutToWait => {
                let frame_dt = engine_loop.tick_timer();
                let report = engine_loop.advance(frame_dt, &mut game);

                if report.rendered.is_some() {
                    match game.device_mut().present() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                            warn!("Surface lost/outdated. Reconfiguring swapchain.");
                            game.device_mut().resize_surface(window.inner_size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("Out of GPU memory. Exiting.");
                            elwt.exit();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            warn!("Surface timeout. Skipping this frame.");
                        }
                    }
                }

                if report.sleep.is_zero() {
                    elwt.set_control_flow(ControlFlow::Poll);
                } else {
                    elwt.set_control_flow(ControlFlow::WaitUntil(Instant::now() + report.sleep));
                }
            }

            Event::LoopExiting => {
                info!(
                    ticks = engine_loop.total_ticks(),
                    frames = engine_loop.frames_rendered(),
                    "Shutting down"
                );
            }

            _ => {}
        })?;

        Ok(())
    }
}
