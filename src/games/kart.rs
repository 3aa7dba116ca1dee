//! Day15 kart: directional speed, drift charging into a boost release

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{DriftConfig, PhysicsConfig};
use crate::error::SessionError;
use crate::games::Session;
use crate::heading;
use crate::input::{InputSnapshot, Key};
use crate::render::{self, DrawCmd, Frame};
use crate::sim::particle::{self, Particle};

const ARENA_WIDTH: f32 = 800.0;
const ARENA_HEIGHT: f32 = 600.0;
/// Coasting decay when neither accelerating nor braking
const COAST_DECAY: f32 = 0.98;

pub struct KartSession {
    config: PhysicsConfig,
    drift: DriftConfig,
    pos: Vec2,
    angle: f32,
    speed: f32,
    is_drifting: bool,
    boost_charge: f32,
    boost_ticks: f32,
    particles: Vec<Particle>,
    rng: Pcg32,
}

impl KartSession {
    pub fn new(seed: u64) -> Result<Self, SessionError> {
        let config = PhysicsConfig::kart();
        config.validate()?;
        Ok(Self {
            config,
            drift: DriftConfig::default(),
            pos: Vec2::new(400.0, 300.0),
            angle: -std::f32::consts::FRAC_PI_2,
            speed: 0.0,
            is_drifting: false,
            boost_charge: 0.0,
            boost_ticks: 0.0,
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn boost_charge(&self) -> f32 {
        self.boost_charge
    }

    pub fn boosting(&self) -> bool {
        self.boost_ticks > 0.0
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    fn spawn_drift_sparks(&mut self) {
        let tail = self.pos - heading(self.angle) * 20.0;
        let color = if self.boost_charge > 70.0 {
            0xff4400ff
        } else {
            render::YELLOW
        };
        particle::spawn_burst(&mut self.particles, &mut self.rng, tail, 2, 5.0, 15, color);
    }
}

impl Session for KartSession {
    fn tick(&mut self, input: &InputSnapshot) {
        let c = &self.config;
        let d = &self.drift;

        // Throttle / brake / coast
        if input.held(Key::Up) {
            self.speed += c.accel;
        } else if input.held(Key::Down) {
            self.speed -= c.accel;
        } else {
            self.speed *= COAST_DECAY;
        }

        // Boost raises the cap while it lasts
        let mut current_max = c.max_speed;
        if self.boost_ticks > 0.0 {
            current_max *= d.boost_speed_mult;
            self.boost_ticks -= 1.0;
        }
        self.speed = self.speed.clamp(-c.max_speed / 2.0, current_max);

        // Steering, full rate only at speed
        let move_factor = self.speed.abs() / c.max_speed;
        let turn = input.steer_axis();

        if input.held(Key::Drift) && self.speed.abs() > d.min_speed {
            self.is_drifting = true;
            self.angle += turn * c.steer_rate * d.steer_mult;
            if turn != 0.0 {
                self.boost_charge = (self.boost_charge + d.charge_rate).min(100.0);
                self.spawn_drift_sparks();
            }
        } else {
            if self.is_drifting {
                // Release converts charge into boost ticks
                if self.boost_charge > d.min_charge {
                    self.boost_ticks = self.boost_charge * d.boost_ticks_per_charge;
                    log::debug!("boost released: {:.0} ticks", self.boost_ticks);
                }
                self.boost_charge = 0.0;
                self.is_drifting = false;
            }
            self.angle += turn * c.steer_rate * move_factor;
        }

        // Integrate along the heading, wrapping at arena bounds
        self.pos += heading(self.angle) * self.speed;
        if self.pos.x < 0.0 {
            self.pos.x = ARENA_WIDTH;
        } else if self.pos.x > ARENA_WIDTH {
            self.pos.x = 0.0;
        }
        if self.pos.y < 0.0 {
            self.pos.y = ARENA_HEIGHT;
        } else if self.pos.y > ARENA_HEIGHT {
            self.pos.y = 0.0;
        }

        particle::age_particles(&mut self.particles);
    }

    fn render(&self) -> Frame {
        let mut frame: Frame = vec![DrawCmd::Clear {
            color: render::BLACK,
        }];
        let body_color = if self.boosting() {
            render::CYAN
        } else {
            render::RED
        };
        frame.push(DrawCmd::Rect {
            min: self.pos - Vec2::new(25.0, 15.0),
            size: Vec2::new(50.0, 30.0),
            color: body_color,
        });
        for p in &self.particles {
            frame.push(DrawCmd::Rect {
                min: p.pos,
                size: Vec2::splat(3.0),
                color: p.color,
            });
        }
        frame.push(DrawCmd::Text {
            pos: Vec2::new(10.0, 20.0),
            text: format!(
                "{} km/h  boost {:.0}%",
                (self.speed.abs() * 20.0).round(),
                self.boost_charge
            ),
            color: render::WHITE,
        });
        frame
    }

    fn over(&self) -> bool {
        false
    }

    fn summary(&self) -> String {
        format!(
            "kart: speed {:.2}, boost charge {:.0}, {} particles live",
            self.speed,
            self.boost_charge,
            self.particles.len()
        )
    }
}
