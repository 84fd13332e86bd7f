// crates/skyfire_game/src/input.rs
//! Key handler table and the default bindings.

use std::collections::HashMap;

use skyfire_scene::LayerKind;
use skyfire_shared::{Device, Key, KeyAction, KeyEvent, Modifiers};
use tracing::{debug, trace};

use crate::spawn;
use crate::state::{Game, KeyHandler};

/// Timer id of the auto-fire action while the fire key is held.
pub const FIRE_TIMER: u32 = 0;
pub const FIRE_PERIOD: f32 = 0.150;

const HORIZONTAL_SPEED: f32 = 0.5;
const HORIZONTAL_ACCEL: f32 = 1.8;
const VERTICAL_SPEED: f32 = 0.5;
const VERTICAL_ACCEL: f32 = 1.2;

pub fn default_key_handlers<D: Device>() -> HashMap<Key, KeyHandler<D>> {
    let mut handlers: HashMap<Key, KeyHandler<D>> = HashMap::new();
    handlers.insert(Key::Left, move_horizontal);
    handlers.insert(Key::Right, move_horizontal);
    handlers.insert(Key::Up, move_vertical);
    handlers.insert(Key::Down, move_vertical);
    handlers.insert(Key::Space, fire);
    handlers.insert(Key::F3, toggle_debug_info);
    handlers.insert(Key::F6, toggle_vsync);
    handlers.insert(Key::F7, toggle_aabbs);
    handlers
}

/// Routes a key event to its handler and records whether the key is held.
/// Repeats are dropped: holding a key is tracked by state, not by events.
pub fn dispatch_key<D: Device>(game: &mut Game<D>, event: KeyEvent) {
    if event.action == KeyAction::Repeat {
        return;
    }
    trace!(key = ?event.key, action = ?event.action, "key");

    if let Some(handler) = game.key_handlers.get(&event.key).copied() {
        handler(game, event.key, event.action, event.modifiers);
    }
    game.key_states
        .insert(event.key, event.action == KeyAction::Press);
}

fn move_horizontal<D: Device>(game: &mut Game<D>, key: Key, action: KeyAction, _mods: Modifiers) {
    let (direction, opposite) = match key {
        Key::Left => (-1.0, Key::Right),
        _ => (1.0, Key::Left),
    };

    if action == KeyAction::Release {
        // Fall back to the other direction if it is still held.
        if game.is_key_held(opposite) {
            move_horizontal(game, opposite, KeyAction::Repeat, Modifiers::NONE);
        } else {
            let motion = &mut game.scene.player_mut().motion;
            motion.velocity.x = 0.0;
            motion.acceleration.x = 0.0;
        }
        return;
    }

    let motion = &mut game.scene.player_mut().motion;
    motion.velocity.x = HORIZONTAL_SPEED * direction;
    motion.acceleration.x = HORIZONTAL_ACCEL * direction;
}

fn move_vertical<D: Device>(game: &mut Game<D>, key: Key, action: KeyAction, _mods: Modifiers) {
    let (direction, opposite) = match key {
        Key::Up => (1.0, Key::Down),
        _ => (-1.0, Key::Up),
    };

    if action == KeyAction::Release {
        if game.is_key_held(opposite) {
            move_vertical(game, opposite, KeyAction::Repeat, Modifiers::NONE);
        } else {
            let motion = &mut game.scene.player_mut().motion;
            motion.velocity.y = 0.0;
            motion.acceleration.y = 0.0;
        }
        return;
    }

    let motion = &mut game.scene.player_mut().motion;
    motion.velocity.y = VERTICAL_SPEED * direction;
    motion.acceleration.y = VERTICAL_ACCEL * direction;
}

fn fire<D: Device>(game: &mut Game<D>, _key: Key, action: KeyAction, _mods: Modifiers) {
    match action {
        KeyAction::Press => {
            spawn_projectiles(game);
            game.add_timed_action(FIRE_TIMER, FIRE_PERIOD, auto_fire);
        }
        KeyAction::Release => game.remove_timed_action(FIRE_TIMER),
        KeyAction::Repeat => {}
    }
}

fn auto_fire<D: Device>(game: &mut Game<D>, _dt: f32, _time: f32) {
    spawn_projectiles(game);
}

/// A pair of shots from the player's guns.
pub fn spawn_projectiles<D: Device>(game: &mut Game<D>) {
    let origin = game.scene.player().transform.position;
    let shots = spawn::projectile_pair(&mut game.device, &game.assets, origin);
    for shot in shots {
        game.scene.push(LayerKind::Projectile, shot);
    }
}

fn toggle_debug_info<D: Device>(game: &mut Game<D>, _key: Key, action: KeyAction, _mods: Modifiers) {
    if action == KeyAction::Press {
        game.render_opts.debug_info = !game.render_opts.debug_info;
        debug!(enabled = game.render_opts.debug_info, "Debug info toggled");
    }
}

fn toggle_vsync<D: Device>(game: &mut Game<D>, _key: Key, action: KeyAction, _mods: Modifiers) {
    if action == KeyAction::Press {
        game.vsync = !game.vsync;
        debug!(enabled = game.vsync, "Vsync toggled");
    }
}

fn toggle_aabbs<D: Device>(game: &mut Game<D>, _key: Key, action: KeyAction, _mods: Modifiers) {
    if action == KeyAction::Press {
        game.render_opts.aabbs = !game.render_opts.aabbs;
        debug!(enabled = game.render_opts.aabbs, "AABB overlay toggled");
    }
}
