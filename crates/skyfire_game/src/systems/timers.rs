// crates/skyfire_game/src/systems/timers.rs

use skyfire_shared::Device;

use crate::state::{Game, TimedFn};

/// Advances every timer by `dt` and runs the ones that came due, in id order.
/// Actions may add or remove timers; that takes effect from the next tick.
pub fn run_timed_actions<D: Device>(game: &mut Game<D>, dt: f32, time: f32) {
    let due: Vec<TimedFn<D>> = game
        .timed_actions
        .values_mut()
        .filter_map(|timer| timer.tick(dt).then_some(timer.action))
        .collect();

    for action in due {
        action(game, dt, time);
    }
}
