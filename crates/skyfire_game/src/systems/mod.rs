// crates/skyfire_game/src/systems/mod.rs
//! The fixed simulation step, split by concern. `game_update` fixes the order.

pub mod combat;
pub mod erasure;
pub mod objects;
pub mod picking;
pub mod timers;

use skyfire_shared::Device;

use crate::state::Game;

/// One fixed tick. The step itself cannot fail: everything it needs was
/// loaded at startup.
pub fn game_update<D: Device>(game: &mut Game<D>, dt: f32, time: f32) {
    timers::run_timed_actions(game, dt, time);
    erasure::erase_pending(&mut game.scene, &mut game.device);

    game.hover = picking::cursor_hovers_ship(&game.scene, &game.viewport, game.cursor, game.aspect);

    objects::update_objects(&mut game.scene, &game.screen_aabb, dt, time);

    combat::projectiles_vs_ships(game);
    // Once paused (e.g. after a kill), the player can no longer be hit.
    if !game.paused {
        combat::player_vs_enemies(game);
    }
}
