//! Stateless geometric tests shared across games
//!
//! Every test here is a pure function: given inputs, deterministic output,
//! no side effects. Games own the response (bounce, snap, slowdown).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// An axis-aligned ellipse used for track rings and radial gauges
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EllipseBounds {
    pub center: Vec2,
    pub rx: f32,
    pub ry: f32,
}

impl EllipseBounds {
    /// Construct, rejecting degenerate radii (the divisors of [`Self::value`])
    pub fn new(center: Vec2, rx: f32, ry: f32) -> Result<Self, SessionError> {
        if rx <= 0.0 || ry <= 0.0 || !rx.is_finite() || !ry.is_finite() {
            return Err(SessionError::DegenerateGeometry(format!(
                "ellipse radii must be positive finite, got rx={rx} ry={ry}"
            )));
        }
        Ok(Self { center, rx, ry })
    }

    /// Normalized quadratic: < 1 inside, 1 on the boundary, > 1 outside
    #[inline]
    pub fn value(&self, p: Vec2) -> f32 {
        let d = p - self.center;
        (d.x / self.rx) * (d.x / self.rx) + (d.y / self.ry) * (d.y / self.ry)
    }

    /// Strict interior test; the boundary itself counts as outside
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.value(p) < 1.0
    }

    /// Radial direction from the ellipse center through `p`
    pub fn radial_dir(&self, p: Vec2) -> Vec2 {
        (p - self.center).normalize_or_zero()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box centered at `center` with the given full size
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Overlap test used for all projectile/enemy hit detection
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Point membership (inclusive of edges)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Grow the box by `margin` on every side (blast zones use a negative-side grow)
    pub fn inflated(&self, margin: f32) -> Aabb {
        Aabb {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }
}

/// Minimum distance from a point to the segment `a`-`b`
///
/// Projection parameter clamped to [0, 1]; degenerate segments collapse to
/// point distance.
pub fn dist_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Whether `p` lies within `half_width` of any segment of the polyline
pub fn on_path(p: Vec2, points: &[Vec2], half_width: f32) -> bool {
    points
        .windows(2)
        .any(|seg| dist_to_segment(p, seg[0], seg[1]) < half_width)
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(vel: Vec2, normal: Vec2) -> Vec2 {
    vel - 2.0 * vel.dot(normal) * normal
}
