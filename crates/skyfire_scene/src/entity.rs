// crates/skyfire_scene/src/entity.rs

use std::fmt;

use glam::Vec2;
use skyfire_shared::{
    Aabb, DrawableId, FontId, Motion, SoundSourceId, SpriteAnimation, TextStyle, TextureId,
    Transform,
};

/// Where dead objects are parked until they are erased. Far outside the
/// screen box, so they neither render nor collide.
pub const OFFSCREEN: Vec2 = Vec2::new(1000.0, 1000.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag(pub &'static str);

impl Default for Tag {
    fn default() -> Self {
        Tag("?")
    }
}

/// Per-tick scripted behavior: `(object, dt, simulated_time)`.
/// Runs after motion and animation, before the bounds checks.
#[derive(Clone, Copy)]
pub struct UpdateFn(pub fn(&mut GameObject, f32, f32));

impl fmt::Debug for UpdateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UpdateFn(..)")
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextFormat {
    pub font: FontId,
    pub style: TextStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EraseReason {
    AnimationEnded,
    OffScreen,
    Hit,
    Destroyed,
}

/// Alive -> PendingErase -> Erased. Only the erase pass moves an object to
/// `Erased`, and it removes it from its layer in the same step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Alive,
    PendingErase {
        reason: EraseReason,
        /// Keep the object while its sound is still playing.
        wait_for_sound: bool,
    },
    Erased,
}

/// A game object: fixed shape, optional capabilities. Systems check which
/// components are present and skip the object otherwise.
#[derive(Clone, Debug, Default)]
pub struct GameObject {
    pub tag: Tag,
    pub transform: Transform,
    pub prev_transform: Transform,
    pub motion: Motion,
    pub drawable: Option<DrawableId>,
    pub texture: Option<TextureId>,
    pub sprite_animation: Option<SpriteAnimation>,
    pub text_fmt: Option<TextFormat>,
    pub update: Option<UpdateFn>,
    pub aabb: Option<Aabb>,
    pub offscreen_destroy: bool,
    pub screen_bound: bool,
    pub sound: Option<SoundSourceId>,
    pub lifecycle: Lifecycle,
    pub health: Option<i32>,
}

impl GameObject {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag: Tag(tag),
            ..Default::default()
        }
    }

    /// Sets both current and previous transform so the first render does not
    /// interpolate from the origin.
    pub fn place(&mut self, transform: Transform) {
        self.transform = transform;
        self.prev_transform = transform;
    }

    /// Moves the object without interpolation.
    pub fn teleport(&mut self, position: Vec2) {
        self.transform.position = position;
        self.prev_transform = self.transform;
    }

    pub fn world_aabb(&self) -> Option<Aabb> {
        self.aabb.map(|aabb| aabb.transform(&self.transform.matrix()))
    }

    pub fn display_transform(&self, alpha: f32) -> Transform {
        self.prev_transform.lerp(&self.transform, alpha)
    }

    pub fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }

    /// Returns false if the object was already on its way out.
    pub fn mark_for_erase(&mut self, reason: EraseReason, wait_for_sound: bool) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.lifecycle = Lifecycle::PendingErase {
            reason,
            wait_for_sound,
        };
        true
    }

    /// Marks the object and parks it off-screen.
    pub fn retire(&mut self, reason: EraseReason, wait_for_sound: bool) -> bool {
        if !self.mark_for_erase(reason, wait_for_sound) {
            return false;
        }
        self.teleport(OFFSCREEN);
        true
    }

    /// Decides whether a pending object can go now. `is_playing` is only
    /// consulted for objects gated on a sound they actually own.
    pub fn poll_erase(&mut self, is_playing: impl FnOnce(SoundSourceId) -> bool) -> bool {
        match self.lifecycle {
            Lifecycle::Alive => false,
            Lifecycle::Erased => true,
            Lifecycle::PendingErase { wait_for_sound, .. } => {
                if wait_for_sound {
                    if let Some(source) = self.sound {
                        if is_playing(source) {
                            return false;
                        }
                    }
                }
                self.lifecycle = Lifecycle::Erased;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alive_objects_are_never_erased() {
        let mut obj = GameObject::new("ship");
        assert!(!obj.poll_erase(|_| panic!("no sound query for live objects")));
        assert!(obj.is_alive());
    }

    #[test]
    fn sound_gate_defers_until_playback_ends() {
        let mut obj = GameObject::new("projectile");
        obj.sound = Some(SoundSourceId(7));
        assert!(obj.mark_for_erase(EraseReason::Hit, true));

        assert!(!obj.poll_erase(|_| true));
        assert!(matches!(obj.lifecycle, Lifecycle::PendingErase { .. }));
        assert!(obj.poll_erase(|_| false));
        assert_eq!(obj.lifecycle, Lifecycle::Erased);
    }

    #[test]
    fn ungated_or_silent_objects_go_immediately() {
        let mut silent = GameObject::new("ship");
        silent.mark_for_erase(EraseReason::Destroyed, true);
        assert!(silent.poll_erase(|_| true));

        let mut ungated = GameObject::new("projectile");
        ungated.sound = Some(SoundSourceId(1));
        ungated.mark_for_erase(EraseReason::OffScreen, false);
        assert!(ungated.poll_erase(|_| true));
    }

    #[test]
    fn first_mark_wins() {
        let mut obj = GameObject::new("explosion");
        assert!(obj.retire(EraseReason::AnimationEnded, true));
        assert!(!obj.mark_for_erase(EraseReason::OffScreen, false));
        assert_eq!(
            obj.lifecycle,
            Lifecycle::PendingErase {
                reason: EraseReason::AnimationEnded,
                wait_for_sound: true
            }
        );
        assert_eq!(obj.transform.position, OFFSCREEN);
        assert_eq!(obj.prev_transform, obj.transform);
    }

    #[test]
    fn retired_without_gate_ignores_its_sound() {
        let mut obj = GameObject::new("ship");
        obj.sound = Some(SoundSourceId(3));
        assert!(obj.retire(EraseReason::Destroyed, false));
        assert_eq!(obj.transform.position, OFFSCREEN);
        assert!(obj.poll_erase(|_| true));
    }
}
