// crates/skyfire_game/src/state.rs

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use glam::Vec2;
use skyfire_scene::{LayerKind, Scene};
use skyfire_shared::{
    Aabb, AssetError, Camera, Device, FontInfo, GameLogic, Key, KeyAction, KeyEvent, Modifiers,
    Viewport,
};
use tracing::{debug, info};

use crate::hud::Hud;
use crate::resources::{Resources, SpriteAssets};
use crate::{input, render, spawn, systems};

pub type KeyHandler<D> = fn(&mut Game<D>, Key, KeyAction, Modifiers);
pub type TimedFn<D> = fn(&mut Game<D>, f32, f32);

/// Recurring callback, e.g. "fire while the key is held".
pub struct TimedAction<D> {
    pub elapsed: f32,
    pub period: f32,
    pub action: TimedFn<D>,
}

impl<D> TimedAction<D> {
    pub fn new(period: f32, action: TimedFn<D>) -> Self {
        Self {
            elapsed: 0.0,
            period,
            action,
        }
    }

    /// Accumulates `dt`; true when the period elapsed. The overshoot carries over.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.period {
            self.elapsed -= self.period;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone)]
pub struct GameSettings {
    pub assets_dir: PathBuf,
    /// Reference window size; fixes the aspect ratio and HUD text sizes.
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            width: 1600,
            height: 900,
            vsync: true,
        }
    }
}

impl GameSettings {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub debug_info: bool,
    pub aabbs: bool,
}

/// Everything the simulation and the render step touch, owned in one place
/// and passed down by reference.
pub struct Game<D> {
    pub device: D,
    pub aspect: f32,
    pub scene: Scene,
    pub camera: Camera,
    pub screen_aabb: Aabb,
    pub viewport: Viewport,
    /// Window pixels.
    pub cursor: Vec2,
    pub hover: bool,
    pub paused: bool,
    pub vsync: bool,
    pub render_opts: RenderOptions,
    pub resources: Resources,
    pub assets: SpriteAssets,
    pub font: FontInfo,
    pub hud: Hud,
    pub(crate) key_handlers: HashMap<Key, KeyHandler<D>>,
    pub(crate) key_states: BTreeMap<Key, bool>,
    pub(crate) timed_actions: BTreeMap<u32, TimedAction<D>>,
}

impl<D: Device> Game<D> {
    pub fn new(mut device: D, settings: GameSettings) -> Result<Self, AssetError> {
        info!("Initializing game");
        let aspect = settings.aspect();

        let mut resources = Resources::new(settings.assets_dir.clone());
        let font = resources.font(&mut device, "Russo_One/RussoOne-Regular.ttf")?;
        let assets = SpriteAssets::load(&mut device, &mut resources)?;

        debug!("Building scene");
        let mut scene = Scene::new(spawn::player(&assets));
        scene.push(LayerKind::Background, spawn::background(&assets, aspect));
        scene.push(LayerKind::Ship, spawn::enemy(&assets));

        let hud = Hud::new(&mut device, font, aspect, settings.height);

        let viewport = Viewport::letterbox(settings.width, settings.height, aspect);
        device.set_viewport(viewport);

        Ok(Self {
            device,
            aspect,
            scene,
            camera: Camera::orthographic(aspect),
            screen_aabb: Aabb::new(Vec2::new(-aspect, -1.0), Vec2::new(aspect, 1.0)),
            viewport,
            cursor: Vec2::ZERO,
            hover: false,
            paused: false,
            vsync: settings.vsync,
            render_opts: RenderOptions::default(),
            resources,
            assets,
            font,
            hud,
            key_handlers: input::default_key_handlers(),
            key_states: BTreeMap::new(),
            timed_actions: BTreeMap::new(),
        })
    }

    /// Releases every held key through its handler, then pauses. No-op if
    /// already paused.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        info!("Pausing game");

        let held: Vec<Key> = self
            .key_states
            .iter()
            .filter_map(|(key, active)| active.then_some(*key))
            .collect();
        for key in held {
            self.key_states.insert(key, false);
            if let Some(handler) = self.key_handlers.get(&key).copied() {
                handler(self, key, KeyAction::Release, Modifiers::NONE);
            }
        }

        self.paused = true;
    }

    /// Held keys are not replayed.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        info!("Resuming game");
        self.paused = false;
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.key_states.get(&key).copied().unwrap_or(false)
    }

    /// Installs (or replaces) the timer with this id.
    pub fn add_timed_action(&mut self, id: u32, period: f32, action: TimedFn<D>) {
        self.timed_actions.insert(id, TimedAction::new(period, action));
    }

    pub fn remove_timed_action(&mut self, id: u32) {
        self.timed_actions.remove(&id);
    }

    pub fn has_timed_action(&self, id: u32) -> bool {
        self.timed_actions.contains_key(&id)
    }
}

impl<D: Device> GameLogic for Game<D> {
    type Device = D;

    fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    fn update(&mut self, dt: f32, time: f32) {
        systems::game_update(self, dt, time);
    }

    fn render(&mut self, frame_time: f32, alpha: f32) {
        render::game_render(self, frame_time, alpha);
    }

    fn vsync(&self) -> bool {
        self.vsync
    }

    fn handle_key(&mut self, event: KeyEvent) {
        input::dispatch_key(self, event);
    }

    fn set_focus(&mut self, focused: bool) {
        if focused {
            debug!("Window focused");
            self.resume();
        } else {
            debug!("Window unfocused");
            self.pause();
        }
    }

    fn set_cursor(&mut self, position: Vec2) {
        self.cursor = position;
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Viewport::letterbox(width, height, self.aspect);
        self.device.set_viewport(self.viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Game<()>, _: f32, _: f32) {}

    #[test]
    fn timed_action_carries_overshoot() {
        let mut timer = TimedAction::new(0.25, noop);
        assert!(!timer.tick(0.125));
        assert!(timer.tick(0.25));
        assert_eq!(timer.elapsed, 0.125);
        assert!(timer.tick(0.125));
        assert_eq!(timer.elapsed, 0.0);
    }
}
