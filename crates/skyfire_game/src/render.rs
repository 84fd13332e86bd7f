// crates/skyfire_game/src/render.rs
//! Builds one frame of draw calls from the scene, interpolated by `alpha`.

use glam::{Mat4, Vec3};
use skyfire_scene::GameObject;
use skyfire_shared::{Device, DrawCall, DrawableId, Shading};

use crate::state::Game;

pub fn game_render<D: Device>(game: &mut Game<D>, frame_time: f32, alpha: f32) {
    game.device.begin_frame(&game.camera);

    for layer in game.scene.layers() {
        // Front-most first; objects without geometry trail the list.
        for obj in layer.iter().rev() {
            let Some(call) = object_draw_call(obj, alpha) else {
                break;
            };
            game.device.draw(call);
        }
    }

    if game.render_opts.aabbs && game.hover {
        for layer in game.scene.layers() {
            for obj in layer.iter() {
                if let Some(call) = aabb_draw_call(obj, game.assets.outline) {
                    game.device.draw(call);
                }
            }
        }
    }

    if game.render_opts.debug_info {
        game.hud.update_fps(&mut game.device, frame_time);
        game.hud
            .update_object_count(&mut game.device, game.scene.object_count());
        game.device.draw(game.hud.fps.draw_call());
        game.device.draw(game.hud.objects.draw_call());
    }

    if game.paused {
        game.device.draw(game.hud.paused.draw_call());
    }
}

/// Texture beats text beats flat color. None if the object has no geometry.
pub fn object_draw_call(obj: &GameObject, alpha: f32) -> Option<DrawCall> {
    let drawable = obj.drawable?;
    let shading = if let Some(texture) = obj.texture {
        Shading::Textured {
            texture,
            indices: obj
                .sprite_animation
                .as_ref()
                .map(|animation| animation.curr_frame().indices()),
        }
    } else if let Some(format) = obj.text_fmt {
        Shading::Text(format.style)
    } else {
        Shading::Colored
    };

    Some(DrawCall {
        drawable,
        model: obj.display_transform(alpha).matrix(),
        shading,
    })
}

/// Outline of the object's local box, drawn at its current transform.
pub fn aabb_draw_call(obj: &GameObject, outline: DrawableId) -> Option<DrawCall> {
    let aabb = obj.aabb?;
    let center = aabb.center();
    let half = aabb.size() / 2.0;
    let model = obj.transform.matrix()
        * Mat4::from_translation(center.extend(0.0))
        * Mat4::from_scale(Vec3::new(half.x, half.y, 1.0));
    Some(DrawCall {
        drawable: outline,
        model,
        shading: Shading::Colored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use skyfire_scene::TextFormat;
    use skyfire_shared::{Aabb, FontId, SpriteAnimation, TextStyle, TextureId, Transform};

    #[test]
    fn objects_without_geometry_are_skipped() {
        assert!(object_draw_call(&GameObject::new("ghost"), 0.5).is_none());
    }

    #[test]
    fn texture_takes_precedence_and_uses_the_current_frame() {
        let mut obj = GameObject::new("ship");
        obj.drawable = Some(DrawableId(1));
        obj.texture = Some(TextureId(2));
        obj.text_fmt = Some(TextFormat {
            font: FontId(0),
            style: TextStyle::default(),
        });
        let mut animation = SpriteAnimation::uniform(4, 0.25, 0);
        animation.update_frame(0.25);
        obj.sprite_animation = Some(animation);

        let call = object_draw_call(&obj, 1.0).unwrap();
        assert_eq!(
            call.shading,
            Shading::Textured {
                texture: TextureId(2),
                indices: Some(6..12)
            }
        );
    }

    #[test]
    fn text_then_color_fallback() {
        let mut obj = GameObject::new("label");
        obj.drawable = Some(DrawableId(1));
        assert_eq!(object_draw_call(&obj, 0.0).unwrap().shading, Shading::Colored);

        let style = TextStyle::default();
        obj.text_fmt = Some(TextFormat {
            font: FontId(0),
            style,
        });
        assert_eq!(object_draw_call(&obj, 0.0).unwrap().shading, Shading::Text(style));
    }

    #[test]
    fn model_is_interpolated() {
        let mut obj = GameObject::new("ship");
        obj.drawable = Some(DrawableId(1));
        obj.prev_transform = Transform::at(Vec2::new(0.0, 0.0));
        obj.transform = Transform::at(Vec2::new(1.0, 0.5));

        let at_prev = object_draw_call(&obj, 0.0).unwrap().model;
        assert_eq!(at_prev, obj.prev_transform.matrix());
        let halfway = object_draw_call(&obj, 0.5).unwrap().model;
        assert_eq!(halfway, Transform::at(Vec2::new(0.5, 0.25)).matrix());
    }

    #[test]
    fn outline_covers_the_box() {
        let mut obj = GameObject::new("ship");
        obj.place(Transform::at(Vec2::new(1.0, 0.0)));
        obj.aabb = Some(Aabb::new(Vec2::new(-0.5, -0.25), Vec2::new(1.5, 0.25)));
        let call = aabb_draw_call(&obj, DrawableId(9)).unwrap();
        let corner = call.model.transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(corner, Vec3::new(2.5, 0.25, 0.0));
        assert!(aabb_draw_call(&GameObject::new("ghost"), DrawableId(9)).is_none());
    }
}
