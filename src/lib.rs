//! Microcade - shared simulation core for a series of daily arcade prototypes
//!
//! Core modules:
//! - `sim`: Deterministic simulation primitives (geometry, steering, grids, particles)
//! - `games`: Per-game sessions built on the shared primitives
//! - `render`: Abstract draw-command frames (no GPU/platform dependency)
//! - `storage`: Best-time persistence behind a key-value store
//! - `config`: Data-driven per-game physics constants

pub mod combo;
pub mod config;
pub mod error;
pub mod games;
pub mod input;
pub mod render;
pub mod score;
pub mod sim;
pub mod storage;

pub use combo::ComboTracker;
pub use config::PhysicsConfig;
pub use error::SessionError;
pub use input::{InputSnapshot, Key};

use glam::Vec2;

/// Shared loop constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the prototypes' frame loops)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Unit heading vector for an angle
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_polar_roundtrip() {
        let p = polar_to_cartesian(100.0, PI / 4.0);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 100.0).abs() < 1e-3);
        assert!((theta - PI / 4.0).abs() < 1e-5);
    }
}
