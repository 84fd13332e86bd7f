// crates/skyfire_shared/src/geometry.rs
//! Transforms, motion and axis-aligned boxes. Pure math, no state.

use glam::{Mat4, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Local-to-world matrix: translate * rotate * scale. Recomputed on every call.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position.extend(0.0))
            * Mat4::from_rotation_z(self.rotation.to_radians())
            * Mat4::from_scale(Vec3::new(self.scale.x, self.scale.y, 1.0))
    }

    /// Component-wise linear interpolation from `self` (alpha = 0) to `next` (alpha = 1).
    pub fn lerp(&self, next: &Transform, alpha: f32) -> Transform {
        Transform {
            position: self.position.lerp(next.position, alpha),
            scale: self.scale.lerp(next.scale, alpha),
            rotation: self.rotation + (next.rotation - self.rotation) * alpha,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Motion {
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

impl Motion {
    /// Semi-implicit Euler step.
    pub fn integrate(&mut self, position: &mut Vec2, dt: f32) {
        self.velocity += self.acceleration * dt;
        *position += self.velocity * dt;
    }
}

/// Axis-aligned box. Rotation is not tracked: a rotated object keeps its unrotated box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Maps both corners through `m` and re-normalizes, so negative scales
    /// still produce `min <= max`.
    pub fn transform(&self, m: &Mat4) -> Aabb {
        let a = m.transform_point3(self.min.extend(0.0)).truncate();
        let b = m.transform_point3(self.max.extend(0.0)).truncate();
        Aabb {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Strict interval overlap on both axes; touching edges do not collide.
pub fn collision(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}
