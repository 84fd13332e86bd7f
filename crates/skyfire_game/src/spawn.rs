// crates/skyfire_game/src/spawn.rs
//! Factories for every kind of object in the level. Components that a system
//! relies on (boxes for anything that collides) are always filled in here.

use glam::Vec2;
use skyfire_scene::{GameObject, UpdateFn};
use skyfire_shared::{Aabb, AudioDevice, Motion, SpriteAnimation, SpriteFrame, Transform};

use crate::resources::{SpriteAssets, EXPLOSION_FRAMES, SHIP_FRAMES};

pub const PROJECTILE_SPEED: f32 = 2.6;
pub const ENEMY_HEALTH: i32 = 10;

/// Distance from the player's center to each gun.
const GUN_OFFSET: Vec2 = Vec2::new(0.062, 0.125);
/// The left gun sits slightly off in the sprite.
const LEFT_GUN_CORRECTION: f32 = 0.005;

const BACKGROUND_DRIFT: f32 = 0.03;

pub fn background(assets: &SpriteAssets, aspect: f32) -> GameObject {
    let mut obj = GameObject::new("background");
    obj.place(Transform {
        scale: Vec2::new(aspect + 0.1, 1.1),
        ..Default::default()
    });
    obj.motion.velocity = Vec2::new(0.014, 0.004);
    obj.texture = Some(assets.background);
    obj.drawable = Some(assets.quad);
    obj.update = Some(UpdateFn(background_drift));
    obj
}

/// Bounces the oversized background inside a small window.
fn background_drift(obj: &mut GameObject, _dt: f32, _time: f32) {
    let position = obj.transform.position;
    if position.x < -BACKGROUND_DRIFT || position.x >= BACKGROUND_DRIFT {
        obj.motion.velocity.x = -obj.motion.velocity.x;
    }
    if position.y < -BACKGROUND_DRIFT || position.y >= BACKGROUND_DRIFT {
        obj.motion.velocity.y = -obj.motion.velocity.y;
    }
}

pub fn player(assets: &SpriteAssets) -> GameObject {
    let mut obj = GameObject::new("player");
    obj.place(Transform {
        position: Vec2::new(0.0, -0.7),
        scale: Vec2::splat(0.1),
        rotation: 0.0,
    });
    obj.texture = Some(assets.player);
    obj.drawable = Some(assets.ship_sheet);
    obj.sprite_animation = Some(SpriteAnimation::uniform(SHIP_FRAMES, 0.15, 0));
    obj.aabb = Some(Aabb::new(Vec2::new(-0.80, -0.70), Vec2::new(0.82, 0.70)));
    obj.screen_bound = true;
    obj
}

pub fn enemy(assets: &SpriteAssets) -> GameObject {
    let mut obj = GameObject::new("enemy");
    obj.place(Transform {
        position: Vec2::new(0.0, 0.5),
        // Flipped vertically: the sheet faces up.
        scale: Vec2::new(0.08, -0.08),
        rotation: 0.0,
    });
    obj.texture = Some(assets.enemy);
    obj.drawable = Some(assets.ship_sheet);
    obj.sprite_animation = Some(SpriteAnimation::uniform(SHIP_FRAMES, 0.15, 0));
    obj.update = Some(UpdateFn(enemy_sway));
    obj.aabb = Some(Aabb::new(Vec2::new(-0.55, -0.5), Vec2::new(0.55, 0.5)));
    obj.health = Some(ENEMY_HEALTH);
    obj
}

fn enemy_sway(obj: &mut GameObject, _dt: f32, time: f32) {
    obj.transform.position.x = time.sin() * 0.4;
}

pub fn projectile<A: AudioDevice>(audio: &mut A, assets: &SpriteAssets) -> GameObject {
    let mut obj = GameObject::new("projectile");
    obj.place(Transform {
        scale: Vec2::splat(0.15),
        ..Default::default()
    });
    obj.motion = Motion {
        velocity: Vec2::new(0.0, PROJECTILE_SPEED),
        acceleration: Vec2::ZERO,
    };
    obj.texture = Some(assets.projectile);
    obj.drawable = Some(assets.quad);
    obj.aabb = Some(Aabb::new(Vec2::new(-0.11, -0.38), Vec2::new(0.07, 0.30)));
    obj.offscreen_destroy = true;
    let source = audio.create_source(0.8);
    audio.bind(source, assets.laser_sound);
    obj.sound = Some(source);
    obj
}

/// Left and right projectiles fired from the guns of a ship at `origin`.
/// Only the right one carries the laser sound into playback.
pub fn projectile_pair<A: AudioDevice>(
    audio: &mut A,
    assets: &SpriteAssets,
    origin: Vec2,
) -> [GameObject; 2] {
    let mut left = projectile(audio, assets);
    left.teleport(Vec2::new(
        origin.x - GUN_OFFSET.x + LEFT_GUN_CORRECTION,
        origin.y + GUN_OFFSET.y,
    ));

    let mut right = projectile(audio, assets);
    right.teleport(origin + GUN_OFFSET);
    if let Some(source) = right.sound {
        audio.play(source);
    }
    [left, right]
}

/// One-shot explosion at `position`; its sound starts immediately.
pub fn explosion<A: AudioDevice>(audio: &mut A, assets: &SpriteAssets, position: Vec2) -> GameObject {
    let mut obj = GameObject::new("explosion");
    obj.place(Transform {
        position,
        scale: Vec2::splat(0.1),
        rotation: 0.0,
    });
    obj.texture = Some(assets.explosion);
    obj.drawable = Some(assets.explosion_sheet);
    let mut frames: Vec<SpriteFrame> = (0..EXPLOSION_FRAMES - 1)
        .map(|n| SpriteFrame::sheet(n, 0.04))
        .collect();
    frames.push(SpriteFrame::sheet(EXPLOSION_FRAMES - 1, 0.06));
    obj.sprite_animation = Some(SpriteAnimation::new(frames, 1));
    let source = audio.create_source(1.0);
    audio.bind(source, assets.explosion_sound);
    audio.play(source);
    obj.sound = Some(source);
    obj
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drift(position: Vec2) -> Vec2 {
        let mut obj = GameObject::new("background");
        obj.transform.position = position;
        obj.motion.velocity = Vec2::new(0.014, 0.004);
        background_drift(&mut obj, 0.01, 0.0);
        obj.motion.velocity
    }

    #[test]
    fn background_bounces_at_the_drift_edge() {
        assert_eq!(drift(Vec2::ZERO), Vec2::new(0.014, 0.004));
        assert_eq!(drift(Vec2::new(0.03, 0.0)), Vec2::new(-0.014, 0.004));
        assert_eq!(drift(Vec2::new(0.0, -0.031)), Vec2::new(0.014, -0.004));
    }

    #[test]
    fn enemy_sways_with_simulated_time() {
        let mut obj = GameObject::new("enemy");
        enemy_sway(&mut obj, 0.01, std::f32::consts::FRAC_PI_2);
        assert!((obj.transform.position.x - 0.4).abs() < 1e-6);
    }
}
