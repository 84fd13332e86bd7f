// crates/skyfire_game/src/systems/objects.rs

use skyfire_scene::{EraseReason, GameObject, Scene};
use skyfire_shared::{collision, Aabb};

pub fn update_objects(scene: &mut Scene, screen: &Aabb, dt: f32, time: f32) {
    for layer in scene.layers_mut() {
        for obj in layer.iter_mut() {
            update_object(obj, screen, dt, time);
        }
    }
}

/// Motion, animation, scripted behavior, then the bounds checks.
pub fn update_object(obj: &mut GameObject, screen: &Aabb, dt: f32, time: f32) {
    obj.prev_transform = obj.transform;
    obj.motion.integrate(&mut obj.transform.position, dt);

    let expired = obj.sprite_animation.as_mut().is_some_and(|animation| {
        animation.update_frame(dt);
        animation.expired()
    });
    if expired {
        obj.retire(EraseReason::AnimationEnded, true);
    }

    if let Some(update) = obj.update {
        (update.0)(obj, dt, time);
    }

    if obj.offscreen_destroy {
        let outside = obj
            .world_aabb()
            .is_some_and(|aabb| !collision(&aabb, screen));
        if outside {
            obj.mark_for_erase(EraseReason::OffScreen, false);
        }
    }

    if obj.screen_bound {
        obj.transform.position = screen.clamp(obj.transform.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use skyfire_scene::{Lifecycle, UpdateFn, OFFSCREEN};
    use skyfire_shared::{SpriteAnimation, Transform};

    fn screen() -> Aabb {
        Aabb::new(Vec2::new(-2.0, -1.0), Vec2::new(2.0, 1.0))
    }

    #[test]
    fn previous_transform_is_saved_before_motion() {
        let mut obj = GameObject::new("ship");
        obj.motion.velocity = Vec2::new(1.0, 0.0);
        update_object(&mut obj, &screen(), 0.25, 0.0);
        assert_eq!(obj.prev_transform.position, Vec2::ZERO);
        assert_eq!(obj.transform.position, Vec2::new(0.25, 0.0));
    }

    #[test]
    fn expired_animation_retires_the_object() {
        let mut obj = GameObject::new("explosion");
        obj.sprite_animation = Some(SpriteAnimation::uniform(2, 0.25, 1));
        update_object(&mut obj, &screen(), 0.25, 0.0);
        assert!(obj.is_alive());
        update_object(&mut obj, &screen(), 0.25, 0.0);
        assert_eq!(
            obj.lifecycle,
            Lifecycle::PendingErase {
                reason: EraseReason::AnimationEnded,
                wait_for_sound: true
            }
        );
        assert_eq!(obj.transform.position, OFFSCREEN);
    }

    #[test]
    fn update_fn_runs_after_motion_and_before_clamp() {
        fn jump(obj: &mut GameObject, _dt: f32, time: f32) {
            obj.transform.position.x += time;
        }
        let mut obj = GameObject::new("player");
        obj.place(Transform::at(Vec2::new(1.5, 0.0)));
        obj.motion.velocity = Vec2::new(1.0, 0.0);
        obj.update = Some(UpdateFn(jump));
        obj.screen_bound = true;
        update_object(&mut obj, &screen(), 0.25, 10.0);
        assert_eq!(obj.transform.position, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn leaving_the_screen_marks_for_erasure() {
        let mut obj = GameObject::new("projectile");
        obj.aabb = Some(Aabb::new(Vec2::splat(-0.5), Vec2::splat(0.5)));
        obj.offscreen_destroy = true;
        obj.place(Transform::at(Vec2::new(0.0, 1.25)));
        update_object(&mut obj, &screen(), 0.01, 0.0);
        assert!(obj.is_alive());

        obj.place(Transform::at(Vec2::new(0.0, 1.75)));
        update_object(&mut obj, &screen(), 0.01, 0.0);
        assert!(matches!(
            obj.lifecycle,
            Lifecycle::PendingErase {
                reason: EraseReason::OffScreen,
                wait_for_sound: false
            }
        ));
        // Not relocated.
        assert_eq!(obj.transform.position, Vec2::new(0.0, 1.75));
    }
}
