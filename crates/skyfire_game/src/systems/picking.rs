// crates/skyfire_game/src/systems/picking.rs

use glam::Vec2;
use skyfire_scene::{LayerKind, Scene};
use skyfire_shared::{collision, Aabb, Viewport};

/// True if the cursor (window pixels) lies over any ship's box.
pub fn cursor_hovers_ship(scene: &Scene, viewport: &Viewport, cursor: Vec2, aspect: f32) -> bool {
    let point = viewport.normalized_cursor(cursor, aspect);
    // One pixel, in world units.
    let pixel = Vec2::new(2.0 * aspect / viewport.size.x, 2.0 / viewport.size.y);
    let cursor_box = Aabb::new(point, point + pixel);

    scene
        .layer(LayerKind::Ship)
        .iter()
        .filter_map(|ship| ship.world_aabb())
        .any(|aabb| collision(&cursor_box, &aabb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfire_scene::GameObject;
    use skyfire_shared::Transform;

    fn scene_with_box_at(position: Vec2) -> Scene {
        let mut player = GameObject::new("player");
        player.place(Transform {
            position,
            scale: Vec2::splat(0.25),
            rotation: 0.0,
        });
        player.aabb = Some(Aabb::new(Vec2::splat(-1.0), Vec2::splat(1.0)));
        Scene::new(player)
    }

    #[test]
    fn hover_follows_the_cursor() {
        let aspect = 2.0;
        let viewport = Viewport::letterbox(800, 400, aspect);
        let scene = scene_with_box_at(Vec2::ZERO);

        assert!(cursor_hovers_ship(&scene, &viewport, Vec2::new(400.0, 200.0), aspect));
        assert!(!cursor_hovers_ship(&scene, &viewport, Vec2::new(10.0, 10.0), aspect));
    }

    #[test]
    fn objects_without_boxes_are_not_pickable() {
        let aspect = 2.0;
        let viewport = Viewport::letterbox(800, 400, aspect);
        let scene = Scene::new(GameObject::new("player"));
        assert!(!cursor_hovers_ship(&scene, &viewport, Vec2::new(400.0, 200.0), aspect));
    }
}
