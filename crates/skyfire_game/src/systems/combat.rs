// crates/skyfire_game/src/systems/combat.rs
//! Collision-driven gameplay: hits, kills and the player's death.

use glam::Vec2;
use skyfire_scene::{EraseReason, LayerKind};
use skyfire_shared::{collision, Device};
use tracing::{debug, info};

use crate::spawn;
use crate::state::Game;

/// Every projectile against every enemy. A hit spawns an explosion, retires
/// the projectile and costs the enemy one health point; a kill pauses the game.
pub fn projectiles_vs_ships<D: Device>(game: &mut Game<D>) {
    let mut impacts: Vec<Vec2> = Vec::new();
    let mut destroyed = false;

    let (_player, enemies, projectiles) = game.scene.combatants();
    for ship in enemies.iter_mut() {
        for projectile in projectiles.iter_mut() {
            // Retired objects are parked on top of each other off-screen.
            if !ship.is_alive() || !projectile.is_alive() {
                continue;
            }
            let (Some(ship_box), Some(shot_box)) = (ship.world_aabb(), projectile.world_aabb())
            else {
                continue;
            };
            if !collision(&shot_box, &ship_box) {
                continue;
            }

            impacts.push(projectile.transform.position);
            projectile.retire(EraseReason::Hit, true);

            if let Some(health) = ship.health.as_mut() {
                *health -= 1;
                if *health <= 0 && ship.retire(EraseReason::Destroyed, false) {
                    debug!(tag = ship.tag.0, "Ship destroyed");
                    destroyed = true;
                }
            }
        }
    }

    for position in impacts {
        let explosion = spawn::explosion(&mut game.device, &game.assets, position);
        game.scene.push(LayerKind::Explosion, explosion);
    }

    if destroyed {
        game.pause();
    }
}

/// Touching an enemy ends the run: the player vanishes in an explosion and
/// the game pauses.
pub fn player_vs_enemies<D: Device>(game: &mut Game<D>) {
    let (player, enemies) = game.scene.split_ships();
    let Some(player_box) = player.world_aabb() else {
        return;
    };
    let hits = enemies
        .iter()
        .filter(|enemy| enemy.is_alive())
        .filter_map(|enemy| enemy.world_aabb())
        .filter(|enemy_box| collision(&player_box, enemy_box))
        .count();
    if hits == 0 {
        return;
    }

    info!("Player hit");
    let position = player.transform.position;
    player.drawable = None;

    for _ in 0..hits {
        let explosion = spawn::explosion(&mut game.device, &game.assets, position);
        game.scene.push(LayerKind::Explosion, explosion);
    }
    game.pause();
}
