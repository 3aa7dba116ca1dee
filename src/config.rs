//! Data-driven per-game physics constants
//!
//! Every prototype shares the same integration pipeline; only the constants
//! differ. Each game gets a named preset here instead of ad hoc globals.
//!
//! Units are per-tick (60 Hz): velocities in px/tick, friction as a
//! multiplicative decay applied once per tick, matching the prototypes'
//! frame-loop tuning.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Shared physics constants for one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Downward acceleration added to vy each tick (0 for top-down games)
    pub gravity: f32,
    /// Multiplicative velocity decay per tick while airborne / coasting
    pub friction: f32,
    /// Multiplicative decay applied on ground contact (platformer/smash)
    pub ground_friction: f32,
    /// Acceleration added per tick while a movement key is held
    pub accel: f32,
    /// Velocity magnitude cap
    pub max_speed: f32,
    /// Steering rate in radians per tick at full speed
    pub steer_rate: f32,
    /// Jump impulse (negative = up in screen coordinates)
    pub jump_force: f32,
    /// Combo chain window in milliseconds
    pub combo_timeout_ms: u64,
}

impl PhysicsConfig {
    /// Day10 platformer: tile grid, gravity, snappy ground friction
    pub fn platformer() -> Self {
        Self {
            gravity: 0.6,
            friction: 1.0,
            ground_friction: 0.85,
            accel: 0.5,
            max_speed: 5.0,
            steer_rate: 0.0,
            jump_force: -12.0,
            combo_timeout_ms: 1000,
        }
    }

    /// Day15 kart: directional speed with coasting decay
    pub fn kart() -> Self {
        Self {
            gravity: 0.0,
            friction: 0.98,
            ground_friction: 0.98,
            accel: 0.2,
            max_speed: 8.0,
            steer_rate: 0.05,
            jump_force: 0.0,
            combo_timeout_ms: 1000,
        }
    }

    /// Day7 ice track: near-frictionless drift around an ellipse ring
    pub fn ice_race() -> Self {
        Self {
            gravity: 0.0,
            friction: 0.985,
            ground_friction: 0.985,
            accel: 0.15,
            max_speed: 8.0,
            steer_rate: 0.08,
            jump_force: 0.0,
            combo_timeout_ms: 1000,
        }
    }

    /// Day8 winding path: speed-scaled turning, hard slowdown off the path
    pub fn winding() -> Self {
        Self {
            gravity: 0.0,
            friction: 0.98,
            ground_friction: 0.8,
            accel: 0.2,
            max_speed: 10.0,
            steer_rate: 0.05,
            jump_force: 0.0,
            combo_timeout_ms: 1000,
        }
    }

    /// Day13 knockback toy: floaty gravity, strong air drag
    pub fn smash() -> Self {
        Self {
            gravity: 0.35,
            friction: 0.985,
            ground_friction: 0.8,
            accel: 0.0,
            max_speed: 60.0,
            steer_rate: 0.0,
            jump_force: 0.0,
            combo_timeout_ms: 1000,
        }
    }

    /// Day3 breakout: constant-speed ball, direct paddle control
    pub fn breakout() -> Self {
        Self {
            gravity: 0.0,
            friction: 1.0,
            ground_friction: 1.0,
            accel: 8.0,
            max_speed: 12.0,
            steer_rate: 0.0,
            jump_force: 0.0,
            combo_timeout_ms: 1000,
        }
    }

    /// Day9 near-pin: single-axis roll under friction
    pub fn near_pin() -> Self {
        Self {
            gravity: 0.0,
            friction: 0.985,
            ground_friction: 0.985,
            accel: 0.0,
            max_speed: 30.0,
            steer_rate: 0.0,
            jump_force: 0.0,
            combo_timeout_ms: 1000,
        }
    }

    /// Reject values that would corrupt the integration step
    pub fn validate(&self) -> Result<(), SessionError> {
        let checks = [
            ("gravity", self.gravity),
            ("friction", self.friction),
            ("ground_friction", self.ground_friction),
            ("accel", self.accel),
            ("max_speed", self.max_speed),
            ("steer_rate", self.steer_rate),
            ("jump_force", self.jump_force),
        ];
        for (field, value) in checks {
            if !value.is_finite() {
                return Err(SessionError::InvalidConfig { field, value });
            }
        }
        if self.max_speed <= 0.0 {
            return Err(SessionError::InvalidConfig {
                field: "max_speed",
                value: self.max_speed,
            });
        }
        if !(0.0..=1.0).contains(&self.friction) || !(0.0..=1.0).contains(&self.ground_friction) {
            return Err(SessionError::InvalidConfig {
                field: "friction",
                value: self.friction,
            });
        }
        Ok(())
    }
}

/// Drift/boost tuning (kart only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Minimum speed before drift engages
    pub min_speed: f32,
    /// Steering multiplier while drifting
    pub steer_mult: f32,
    /// Charge gained per drifting tick (gauge 0-100)
    pub charge_rate: f32,
    /// Minimum charge that converts to boost on release
    pub min_charge: f32,
    /// Boost ticks granted per point of charge
    pub boost_ticks_per_charge: f32,
    /// Speed cap multiplier while boosting
    pub boost_speed_mult: f32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            min_speed: 2.0,
            steer_mult: 1.5,
            charge_rate: 0.8,
            min_charge: 30.0,
            boost_ticks_per_charge: 1.5,
            boost_speed_mult: 1.8,
        }
    }
}

/// Swarm/whistle tuning (follower AI only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Leader movement speed per tick
    pub leader_speed: f32,
    /// Whistle radius growth per tick while held
    pub whistle_growth: f32,
    /// Whistle radius cap
    pub whistle_max: f32,
    /// Neighbor repulsion radius
    pub separation_radius: f32,
    /// Repulsion gain
    pub separation_gain: f32,
    /// Attraction gain toward the offset goal
    pub arrival_gain: f32,
    /// Velocity damping while following
    pub follow_damping: f32,
    /// Velocity damping while idle
    pub idle_damping: f32,
    /// Throw launch speed
    pub throw_power: f32,
    /// Ticks a thrown unit stays airborne before returning to idle
    pub throw_ticks: u32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            leader_speed: 4.0,
            whistle_growth: 5.0,
            whistle_max: 100.0,
            separation_radius: 15.0,
            separation_gain: 0.1,
            arrival_gain: 0.05,
            follow_damping: 0.8,
            idle_damping: 0.95,
            throw_power: 15.0,
            throw_ticks: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in [
            PhysicsConfig::platformer(),
            PhysicsConfig::kart(),
            PhysicsConfig::ice_race(),
            PhysicsConfig::winding(),
            PhysicsConfig::smash(),
            PhysicsConfig::breakout(),
            PhysicsConfig::near_pin(),
        ] {
            preset.validate().unwrap();
        }
    }

    #[test]
    fn test_invalid_max_speed_rejected() {
        let mut config = PhysicsConfig::kart();
        config.max_speed = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let mut config = PhysicsConfig::kart();
        config.gravity = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PhysicsConfig::ice_race();
        let json = serde_json::to_string(&config).unwrap();
        let back: PhysicsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.accel, config.accel);
        assert_eq!(back.combo_timeout_ms, 1000);
    }
}
