//! Damage-scaled knockback
//!
//! Launch speed grows with accumulated damage and the strength of the hit,
//! scaled down by the target's weight:
//!
//! ```text
//! speed = ((damage/10 + damage*power/20) * 200/(weight+100) + 5) * power * 0.5
//! ```
//!
//! At zero damage the formula collapses to `5 * power * 0.5`, so a fresh
//! target with weight 100 hit at power 10 launches at exactly 25.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Base term added before power scaling
const KNOCKBACK_BASE: f32 = 5.0;
/// Upward pop added to every launch
const LAUNCH_POP: f32 = 5.0;

/// Inputs to the launch-speed formula
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KnockbackParams {
    /// Accumulated damage percent on the target
    pub damage: f32,
    /// Target weight; heavier targets fly slower
    pub weight: f32,
    /// Strength of the incoming attack
    pub attack_power: f32,
}

/// Launch speed for a hit; strictly increasing in damage for fixed
/// weight and power
pub fn launch_speed(params: KnockbackParams) -> f32 {
    let KnockbackParams {
        damage,
        weight,
        attack_power,
    } = params;
    let scaling =
        (damage / 10.0 + damage * attack_power / 20.0) * (200.0 / (weight + 100.0)) + KNOCKBACK_BASE;
    scaling * attack_power * 0.5
}

/// Velocity for a launch away from the hit point, with a small upward pop
pub fn launch_velocity(target: Vec2, hit_point: Vec2, speed: f32) -> Vec2 {
    let away = target - hit_point;
    let angle = away.y.atan2(away.x);
    Vec2::new(angle.cos() * speed, angle.sin() * speed - LAUNCH_POP)
}
