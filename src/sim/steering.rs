//! Separation/arrival steering for follower flocks
//!
//! Each follower accumulates a repulsion vector from neighbors inside a fixed
//! radius plus an attraction vector toward a per-actor offset goal; the sum is
//! damped by the caller. Stateless: positions in, acceleration out.

use glam::Vec2;

/// Repulsion away from all neighbors closer than `radius`
///
/// Matches the prototype tuning: the push is proportional to the offset from
/// each close neighbor, not normalized, so tight clumps push harder.
pub fn separation(own: Vec2, neighbors: &[Vec2], radius: f32, gain: f32) -> Vec2 {
    let mut accel = Vec2::ZERO;
    for &other in neighbors {
        let away = own - other;
        let d = away.length();
        if d > 0.0 && d < radius {
            accel += away * gain;
        }
    }
    accel
}

/// Attraction toward a goal point, proportional to distance
#[inline]
pub fn arrival(own: Vec2, goal: Vec2, gain: f32) -> Vec2 {
    (goal - own) * gain
}
