//! Day9 near-pin: charge a gauge, release, roll out under friction
//!
//! The ball moves on one axis only. Launch speed maps linearly from the
//! oscillating charge gauge; friction decays the roll until it stalls, then
//! the distance from the pin maps to a result tier.

use glam::Vec2;

use crate::config::PhysicsConfig;
use crate::error::SessionError;
use crate::games::Session;
use crate::input::{InputSnapshot, Key};
use crate::render::{self, DrawCmd, Frame};
use crate::score::RankTable;

const PIN_Y: f32 = 150.0;
const START_Y: f32 = 700.0;
const LANE_X: f32 = 300.0;
/// Gauge sweep per tick while charging
const CHARGE_RATE: f32 = 1.5;
/// Full charge launch speed
const MAX_LAUNCH: f32 = 30.0;
/// Roll stalls below this speed
const STALL_SPEED: f32 = 0.1;
/// Pixels per scored meter
const PX_PER_METER: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPhase {
    /// Waiting for the charge key, gauge sweeping while held
    Aiming,
    /// Ball rolling out under friction
    Rolling,
    /// Ball stalled or hit the far wall; result available
    Stopped,
}

pub struct NearPinSession {
    config: PhysicsConfig,
    ball_y: f32,
    vel_y: f32,
    charge: f32,
    charge_dir: f32,
    charging: bool,
    phase: PinPhase,
    ranks: RankTable,
}

impl NearPinSession {
    pub fn new() -> Result<Self, SessionError> {
        let config = PhysicsConfig::near_pin();
        config.validate()?;
        Ok(Self {
            config,
            ball_y: START_Y,
            vel_y: 0.0,
            charge: 0.0,
            charge_dir: 1.0,
            charging: false,
            phase: PinPhase::Aiming,
            ranks: RankTable::pin_distance(),
        })
    }

    pub fn phase(&self) -> PinPhase {
        self.phase
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn ball_y(&self) -> f32 {
        self.ball_y
    }

    /// Final distance from the pin in meters, once stopped
    pub fn distance_m(&self) -> Option<f32> {
        (self.phase == PinPhase::Stopped).then(|| (self.ball_y - PIN_Y).abs() / PX_PER_METER)
    }

    /// Result tier for the stopped ball
    pub fn result(&self) -> Option<&'static str> {
        self.distance_m().map(|d| self.ranks.rank(d))
    }

    pub fn reset(&mut self) {
        self.ball_y = START_Y;
        self.vel_y = 0.0;
        self.charge = 0.0;
        self.charge_dir = 1.0;
        self.charging = false;
        self.phase = PinPhase::Aiming;
    }
}

impl Session for NearPinSession {
    fn tick(&mut self, input: &InputSnapshot) {
        match self.phase {
            PinPhase::Aiming => {
                if input.held(Key::Charge) {
                    self.charging = true;
                    // Gauge sweeps up and back down until release
                    self.charge += CHARGE_RATE * self.charge_dir;
                    if self.charge >= 100.0 || self.charge <= 0.0 {
                        self.charge_dir = -self.charge_dir;
                        self.charge = self.charge.clamp(0.0, 100.0);
                    }
                } else if self.charging {
                    self.vel_y = -(self.charge / 100.0) * MAX_LAUNCH;
                    self.phase = PinPhase::Rolling;
                }
            }
            PinPhase::Rolling => {
                self.ball_y += self.vel_y;
                self.vel_y *= self.config.friction;
                if self.vel_y.abs() < STALL_SPEED || self.ball_y < 0.0 {
                    self.vel_y = 0.0;
                    self.ball_y = self.ball_y.max(0.0);
                    self.phase = PinPhase::Stopped;
                    log::info!(
                        "stopped {:.2}m from the pin",
                        (self.ball_y - PIN_Y).abs() / PX_PER_METER
                    );
                }
            }
            PinPhase::Stopped => {
                if input.held(Key::Reset) {
                    self.reset();
                }
            }
        }
    }

    fn render(&self) -> Frame {
        let mut frame: Frame = vec![DrawCmd::Clear {
            color: render::WHITE,
        }];
        // Target rings, widest first
        for r in (1..=3).rev() {
            frame.push(DrawCmd::Ring {
                center: Vec2::new(LANE_X, PIN_Y),
                radius: r as f32 * 40.0,
                color: 0xd9e2ecff,
            });
        }
        frame.push(DrawCmd::Circle {
            center: Vec2::new(LANE_X, PIN_Y),
            radius: 10.0,
            color: render::RED,
        });
        frame.push(DrawCmd::Circle {
            center: Vec2::new(LANE_X, self.ball_y),
            radius: 15.0,
            color: if self.phase == PinPhase::Rolling {
                0x102a43ff
            } else {
                0x627d98ff
            },
        });
        let hud = match self.result() {
            Some(tier) => format!(
                "{tier}  {:.2}m from center",
                self.distance_m().unwrap_or(0.0)
            ),
            None => format!("power {:.0}%", self.charge),
        };
        frame.push(DrawCmd::Text {
            pos: Vec2::new(10.0, 20.0),
            text: hud,
            color: render::BLACK,
        });
        frame
    }

    fn over(&self) -> bool {
        self.phase == PinPhase::Stopped
    }

    fn summary(&self) -> String {
        match (self.result(), self.distance_m()) {
            (Some(tier), Some(d)) => format!("near-pin: {tier} at {d:.2}m"),
            _ => format!("near-pin: charge {:.0}%", self.charge),
        }
    }
}
