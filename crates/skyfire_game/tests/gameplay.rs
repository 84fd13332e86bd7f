// crates/skyfire_game/tests/gameplay.rs
//! Whole-game scenarios on the headless device.

use glam::Vec2;
use skyfire_game::{spawn, Game, GameSettings, HeadlessDevice};
use skyfire_scene::{EraseReason, GameObject, LayerKind, Lifecycle};
use skyfire_shared::{
    Aabb, AudioDevice, GameLogic, Key, KeyEvent, Shading, Transform, Viewport,
};

const TICK: f32 = 0.01;

fn new_game(device: HeadlessDevice) -> Game<HeadlessDevice> {
    Game::new(device, GameSettings::default()).expect("headless assets always load")
}

fn run_ticks(game: &mut Game<HeadlessDevice>, from: u32, count: u32) {
    for tick in from..from + count {
        game.update(TICK, (tick + 1) as f32 * TICK);
    }
}

#[test]
fn new_game_builds_the_level() {
    let game = new_game(HeadlessDevice::new());
    assert_eq!(game.scene.layer(LayerKind::Background).len(), 1);
    assert_eq!(game.scene.layer(LayerKind::Ship).len(), 2);
    assert_eq!(game.scene.player().tag.0, "player");
    assert!(!game.paused);
    assert_eq!(
        game.device.viewport,
        Some(Viewport::letterbox(1600, 900, 16.0 / 9.0))
    );
    // Five sprite textures and two sounds, each loaded once.
    assert_eq!(game.device.textures.len(), 5);
    assert_eq!(game.device.sound_buffers.len(), 2);
}

#[test]
fn projectile_flies_at_constant_speed() {
    let mut game = new_game(HeadlessDevice::new());
    let mut shot = spawn::projectile(&mut game.device, &game.assets);
    // Well clear of the swaying enemy, and tracked past the screen edge.
    shot.place(Transform {
        position: Vec2::new(1.5, 0.0),
        ..shot.transform
    });
    shot.offscreen_destroy = false;
    game.scene.push(LayerKind::Projectile, shot);

    run_ticks(&mut game, 0, 30);
    let shot = game.scene.layer(LayerKind::Projectile).front().unwrap();
    assert!((shot.transform.position.y - 0.78).abs() < 1e-4);

    run_ticks(&mut game, 30, 70);
    let shot = game.scene.layer(LayerKind::Projectile).front().unwrap();
    assert!((shot.transform.position.y - 2.6).abs() < 1e-3);
    assert!(shot.is_alive());
}

#[test]
fn shots_leaving_the_screen_do_not_wait_for_their_sound() {
    let mut game = new_game(HeadlessDevice::with_sound_polls(1_000));
    let mut shot = spawn::projectile(&mut game.device, &game.assets);
    shot.place(Transform {
        position: Vec2::new(1.5, 0.9),
        ..shot.transform
    });
    let source = shot.sound.expect("projectiles carry a sound");
    game.device.play(source);
    game.scene.push(LayerKind::Projectile, shot);

    run_ticks(&mut game, 0, 30);
    assert!(game.scene.layer(LayerKind::Projectile).is_empty());
    assert_eq!(game.device.released_sources, vec![source]);
}

#[test]
fn last_hit_destroys_the_ship_and_pauses() {
    let mut game = new_game(HeadlessDevice::new());

    let mut target = GameObject::new("target");
    target.place(Transform {
        position: Vec2::new(1.2, 0.0),
        scale: Vec2::splat(0.1),
        rotation: 0.0,
    });
    target.aabb = Some(Aabb::new(Vec2::splat(-0.5), Vec2::splat(0.5)));
    target.health = Some(1);
    game.scene.push(LayerKind::Ship, target);

    let mut shot = spawn::projectile(&mut game.device, &game.assets);
    shot.place(Transform {
        position: Vec2::new(1.2, -0.02),
        ..shot.transform
    });
    game.scene.push(LayerKind::Projectile, shot);

    run_ticks(&mut game, 0, 1);

    let target = game.scene.layer(LayerKind::Ship).get(2).unwrap();
    assert_eq!(target.health, Some(0));
    assert!(matches!(
        target.lifecycle,
        Lifecycle::PendingErase {
            reason: EraseReason::Destroyed,
            ..
        }
    ));
    let shot = game.scene.layer(LayerKind::Projectile).front().unwrap();
    assert!(matches!(
        shot.lifecycle,
        Lifecycle::PendingErase {
            reason: EraseReason::Hit,
            ..
        }
    ));
    assert_eq!(game.scene.layer(LayerKind::Explosion).len(), 1);
    assert!(game.paused);

    // Nothing holds them back: both leave on the next tick.
    run_ticks(&mut game, 1, 1);
    assert_eq!(game.scene.layer(LayerKind::Ship).len(), 2);
    assert!(game.scene.layer(LayerKind::Projectile).is_empty());
}

#[test]
fn destroyed_ship_leaves_while_its_sound_plays() {
    let mut game = new_game(HeadlessDevice::with_sound_polls(1_000));
    let source = spawn::projectile(&mut game.device, &game.assets)
        .sound
        .expect("projectiles carry a sound");
    game.device.play(source);

    let mut target = GameObject::new("target");
    target.place(Transform {
        position: Vec2::new(1.2, 0.0),
        scale: Vec2::splat(0.1),
        rotation: 0.0,
    });
    target.aabb = Some(Aabb::new(Vec2::splat(-0.5), Vec2::splat(0.5)));
    target.health = Some(1);
    target.sound = Some(source);
    game.scene.push(LayerKind::Ship, target);

    let mut shot = spawn::projectile(&mut game.device, &game.assets);
    shot.place(Transform {
        position: Vec2::new(1.2, -0.02),
        ..shot.transform
    });
    game.scene.push(LayerKind::Projectile, shot);

    run_ticks(&mut game, 0, 1);
    assert!(game.paused);
    assert_eq!(game.scene.layer(LayerKind::Ship).len(), 3);

    run_ticks(&mut game, 1, 1);
    assert_eq!(game.scene.layer(LayerKind::Ship).len(), 2);
    assert!(game.device.released_sources.contains(&source));
}

#[test]
fn retired_objects_take_no_part_in_collisions() {
    let mut game = new_game(HeadlessDevice::with_sound_polls(1_000));

    // A wreck still waiting on its sound, parked off-screen.
    let mut wreck = GameObject::new("wreck");
    wreck.place(Transform {
        position: Vec2::new(1.2, 0.0),
        scale: Vec2::splat(0.1),
        rotation: 0.0,
    });
    wreck.aabb = Some(Aabb::new(Vec2::splat(-0.5), Vec2::splat(0.5)));
    wreck.health = Some(1);
    let wreck_sound = spawn::projectile(&mut game.device, &game.assets)
        .sound
        .expect("projectiles carry a sound");
    game.device.play(wreck_sound);
    wreck.sound = Some(wreck_sound);
    wreck.retire(EraseReason::Destroyed, true);
    game.scene.push(LayerKind::Ship, wreck);

    // A spent shot parked at the same spot.
    let mut spent = spawn::projectile(&mut game.device, &game.assets);
    game.device.play(spent.sound.expect("projectiles carry a sound"));
    spent.retire(EraseReason::Hit, true);
    game.scene.push(LayerKind::Projectile, spent);

    // A second wreck lying on the player, not yet relocated.
    let mut hulk = GameObject::new("hulk");
    hulk.place(Transform {
        position: game.scene.player().transform.position,
        scale: Vec2::splat(0.1),
        rotation: 0.0,
    });
    hulk.aabb = Some(Aabb::new(Vec2::splat(-0.5), Vec2::splat(0.5)));
    let hulk_sound = spawn::projectile(&mut game.device, &game.assets)
        .sound
        .expect("projectiles carry a sound");
    game.device.play(hulk_sound);
    hulk.sound = Some(hulk_sound);
    hulk.mark_for_erase(EraseReason::Destroyed, true);
    game.scene.push(LayerKind::Ship, hulk);

    run_ticks(&mut game, 0, 1);

    assert!(game.scene.layer(LayerKind::Explosion).is_empty());
    assert!(!game.paused);
    assert!(game.scene.player().drawable.is_some());
    let wreck = game.scene.layer(LayerKind::Ship).get(2).unwrap();
    assert_eq!(wreck.health, Some(1));
}

#[test]
fn erasure_waits_for_the_sound() {
    let mut game = new_game(HeadlessDevice::with_sound_polls(3));
    let mut shot = spawn::projectile(&mut game.device, &game.assets);
    let source = shot.sound.unwrap();
    game.device.play(source);
    shot.retire(EraseReason::Hit, true);
    game.scene.push(LayerKind::Projectile, shot);

    run_ticks(&mut game, 0, 3);
    assert_eq!(game.scene.layer(LayerKind::Projectile).len(), 1);
    assert!(game.device.released_sources.is_empty());

    run_ticks(&mut game, 3, 1);
    assert!(game.scene.layer(LayerKind::Projectile).is_empty());
    assert_eq!(game.device.released_sources, vec![source]);
}

#[test]
fn player_touching_an_enemy_ends_the_run() {
    let mut game = new_game(HeadlessDevice::new());
    game.scene.player_mut().teleport(Vec2::new(0.0, 0.5));

    run_ticks(&mut game, 0, 1);

    assert!(game.paused);
    assert!(game.scene.player().drawable.is_none());
    assert_eq!(game.scene.layer(LayerKind::Explosion).len(), 1);
    assert_eq!(
        game.scene.layer(LayerKind::Explosion).front().unwrap().transform.position,
        Vec2::new(0.0, 0.5)
    );
}

#[test]
fn pausing_releases_opposite_held_keys() {
    let mut game = new_game(HeadlessDevice::new());
    game.handle_key(KeyEvent::press(Key::Left));
    game.handle_key(KeyEvent::press(Key::Right));
    assert_eq!(game.scene.player().motion.velocity.x, 0.5);

    game.set_focus(false);
    assert!(game.paused);
    assert!(!game.is_key_held(Key::Left));
    assert!(!game.is_key_held(Key::Right));
    assert_eq!(game.scene.player().motion.velocity, Vec2::ZERO);
    assert_eq!(game.scene.player().motion.acceleration, Vec2::ZERO);

    game.set_focus(true);
    assert!(!game.paused);
    let before = game.scene.player().transform.position;
    run_ticks(&mut game, 0, 10);
    assert_eq!(game.scene.player().transform.position, before);
}

#[test]
fn releasing_one_key_falls_back_to_the_other() {
    let mut game = new_game(HeadlessDevice::new());
    game.handle_key(KeyEvent::press(Key::Up));
    game.handle_key(KeyEvent::press(Key::Down));
    assert_eq!(game.scene.player().motion.velocity.y, -0.5);

    game.handle_key(KeyEvent::release(Key::Down));
    assert_eq!(game.scene.player().motion.velocity.y, 0.5);
    assert_eq!(game.scene.player().motion.acceleration.y, 1.2);

    game.handle_key(KeyEvent::release(Key::Up));
    assert_eq!(game.scene.player().motion.velocity.y, 0.0);
}

#[test]
fn holding_fire_spawns_on_a_timer() {
    let mut game = new_game(HeadlessDevice::new());
    game.handle_key(KeyEvent::press(Key::Space));
    assert_eq!(game.scene.layer(LayerKind::Projectile).len(), 2);
    assert_eq!(game.device.sounds_started, 1);

    run_ticks(&mut game, 0, 20);
    assert_eq!(game.scene.layer(LayerKind::Projectile).len(), 4);

    game.handle_key(KeyEvent::release(Key::Space));
    assert!(!game.has_timed_action(0));
    run_ticks(&mut game, 20, 10);
    assert_eq!(game.device.sounds_started, 2);
}

#[test]
fn alpha_zero_renders_the_previous_tick() {
    let mut game = new_game(HeadlessDevice::new());
    game.handle_key(KeyEvent::press(Key::Right));
    run_ticks(&mut game, 0, 1);

    let player_texture = game.assets.player;
    let is_player = |shading: &Shading| {
        matches!(shading, Shading::Textured { texture, .. } if *texture == player_texture)
    };

    game.render(TICK, 0.0);
    let call = game.device.frame.iter().find(|c| is_player(&c.shading)).unwrap();
    assert_eq!(call.model, game.scene.player().prev_transform.matrix());

    game.render(TICK, 0.999);
    let call = game.device.frame.iter().find(|c| is_player(&c.shading)).unwrap();
    let current = game.scene.player().transform.matrix();
    assert!(call.model.abs_diff_eq(current, 1e-4));
}

#[test]
fn debug_overlay_and_pause_banner() {
    let mut game = new_game(HeadlessDevice::new());
    game.handle_key(KeyEvent::press(Key::F3));
    game.render(TICK, 0.0);

    assert_eq!(game.device.text(game.hud.objects.drawable), Some("OBJ 003"));
    assert_eq!(
        game.device.text(game.hud.fps.drawable),
        Some("FPS 100 ms 10.000")
    );
    let banner = game.hud.paused.drawable;
    assert!(game.device.frame.iter().all(|c| c.drawable != banner));

    game.set_focus(false);
    game.render(TICK, 0.0);
    assert_eq!(game.device.frame.last().unwrap().drawable, banner);
}

#[test]
fn resize_letterboxes_the_viewport() {
    let mut game = new_game(HeadlessDevice::new());
    game.resize(2000, 900);
    assert_eq!(game.viewport, Viewport::letterbox(2000, 900, game.aspect));
    assert_eq!(game.device.viewport, Some(game.viewport));

    game.resize(0, 0);
    assert_eq!(game.viewport, Viewport::letterbox(2000, 900, game.aspect));
}
