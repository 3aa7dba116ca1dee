//! A minimal rigid body shared by the per-game actors
//!
//! One integration pipeline for every game: control accel, passive forces,
//! multiplicative friction, speed clamp, position integration. Collision
//! response stays game-side because each prototype resolves differently.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::geom::Aabb;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Full extents of the collision box
    pub size: Vec2,
    pub on_ground: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            on_ground: false,
        }
    }

    /// Additive gravity on the vertical component
    #[inline]
    pub fn apply_gravity(&mut self, gravity: f32) {
        self.vel.y += gravity;
    }

    /// Multiplicative velocity decay
    #[inline]
    pub fn apply_friction(&mut self, friction: f32) {
        self.vel *= friction;
    }

    /// Clamp velocity magnitude; never exceeds `max_speed` afterward
    pub fn clamp_speed(&mut self, max_speed: f32) {
        let speed = self.vel.length();
        if speed > max_speed {
            self.vel *= max_speed / speed;
        }
    }

    /// Integrate position by one tick of velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Collision box centered on the body position
    pub fn aabb(&self) -> Aabb {
        Aabb::centered(self.pos, self.size)
    }

    /// Current speed
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
