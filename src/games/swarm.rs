//! Day14 swarm: whistle-recruited followers with separation/arrival steering
//!
//! Follower state machine: `Idle → Following` when the growing whistle radius
//! reaches the unit, `Following → Thrown` on a throw action, and a fixed
//! countdown returns a thrown unit to `Idle`. One transition per tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::SwarmConfig;
use crate::error::SessionError;
use crate::games::Session;
use crate::input::{InputSnapshot, Key};
use crate::render::{self, DrawCmd, Frame};
use crate::sim::steering::{arrival, separation};

const ARENA: Vec2 = Vec2::new(800.0, 600.0);
const UNIT_COUNT: usize = 50;
/// Per-tick chance a follower picks a new formation offset
const OFFSET_JITTER_CHANCE: f32 = 0.01;
/// Spread of the random formation offset around the leader
const OFFSET_SPREAD: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerState {
    Idle,
    Following,
    Thrown { ticks_left: u32 },
}

#[derive(Debug, Clone)]
pub struct Follower {
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: FollowerState,
    /// Per-unit goal offset from the leader, re-rolled occasionally
    offset: Vec2,
    pub size: f32,
}

pub struct SwarmSession {
    config: SwarmConfig,
    leader: Vec2,
    whistle_radius: f32,
    units: Vec<Follower>,
    rng: Pcg32,
}

impl SwarmSession {
    pub fn new(seed: u64) -> Result<Self, SessionError> {
        let config = SwarmConfig::default();
        if config.whistle_max <= 0.0 || config.separation_radius <= 0.0 {
            return Err(SessionError::DegenerateGeometry(
                "swarm radii must be positive".into(),
            ));
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        let units = (0..UNIT_COUNT)
            .map(|_| Follower {
                pos: Vec2::new(
                    rng.random::<f32>() * ARENA.x,
                    rng.random::<f32>() * ARENA.y,
                ),
                vel: Vec2::ZERO,
                state: FollowerState::Idle,
                offset: Vec2::ZERO,
                size: 4.0 + rng.random::<f32>() * 2.0,
            })
            .collect();
        Ok(Self {
            config,
            leader: Vec2::new(400.0, 300.0),
            whistle_radius: 0.0,
            units,
            rng,
        })
    }

    pub fn leader(&self) -> Vec2 {
        self.leader
    }

    pub fn units(&self) -> &[Follower] {
        &self.units
    }

    pub fn whistle_radius(&self) -> f32 {
        self.whistle_radius
    }

    /// Followers currently in the squad
    pub fn squad_count(&self) -> usize {
        self.units
            .iter()
            .filter(|u| u.state == FollowerState::Following)
            .count()
    }

    /// Launch the first following unit toward `target`
    fn throw_one(&mut self, target: Vec2) {
        let power = self.config.throw_power;
        let ticks = self.config.throw_ticks;
        if let Some(unit) = self
            .units
            .iter_mut()
            .find(|u| u.state == FollowerState::Following)
        {
            let dir = (target - unit.pos).normalize_or_zero();
            unit.vel = dir * power;
            unit.state = FollowerState::Thrown { ticks_left: ticks };
        }
    }
}

impl Session for SwarmSession {
    fn tick(&mut self, input: &InputSnapshot) {
        let c = self.config.clone();

        // Leader movement, clamped to the arena
        let step = Vec2::new(input.steer_axis(), input.thrust_axis()) * c.leader_speed;
        self.leader = (self.leader + step).clamp(Vec2::ZERO, ARENA);

        // Whistle radius grows while held, collapses on release
        let whistling = input.held(Key::Whistle);
        self.whistle_radius = if whistling {
            (self.whistle_radius + c.whistle_growth).min(c.whistle_max)
        } else {
            0.0
        };

        if input.pointer_pressed {
            self.throw_one(input.pointer);
        }

        // Snapshot positions for neighbor queries before mutating
        let positions: Vec<Vec2> = self.units.iter().map(|u| u.pos).collect();

        for unit in &mut self.units {
            // Recruitment: proximity to the whistle signal
            if whistling
                && unit.state == FollowerState::Idle
                && (unit.pos - self.leader).length() < self.whistle_radius
            {
                unit.state = FollowerState::Following;
            }

            match unit.state {
                FollowerState::Following => {
                    // The snapshot includes the unit itself; separation skips
                    // the zero-distance entry
                    let mut accel =
                        separation(unit.pos, &positions, c.separation_radius, c.separation_gain);
                    accel += arrival(unit.pos, self.leader + unit.offset, c.arrival_gain);
                    unit.vel += accel;
                    unit.vel *= c.follow_damping;

                    if self.rng.random::<f32>() < OFFSET_JITTER_CHANCE {
                        unit.offset = Vec2::new(
                            (self.rng.random::<f32>() - 0.5) * OFFSET_SPREAD,
                            (self.rng.random::<f32>() - 0.5) * OFFSET_SPREAD,
                        );
                    }
                }
                FollowerState::Thrown { ticks_left } => {
                    if ticks_left <= 1 {
                        unit.state = FollowerState::Idle;
                        unit.vel = Vec2::ZERO;
                    } else {
                        unit.state = FollowerState::Thrown {
                            ticks_left: ticks_left - 1,
                        };
                    }
                }
                FollowerState::Idle => {
                    unit.vel *= c.idle_damping;
                }
            }

            unit.pos += unit.vel;
        }
    }

    fn render(&self) -> Frame {
        let mut frame: Frame = vec![DrawCmd::Clear {
            color: render::BLACK,
        }];
        if self.whistle_radius > 0.0 {
            frame.push(DrawCmd::Ring {
                center: self.leader,
                radius: self.whistle_radius,
                color: 0xffffff66,
            });
        }
        for unit in &self.units {
            frame.push(DrawCmd::Circle {
                center: unit.pos,
                radius: unit.size,
                color: match unit.state {
                    FollowerState::Following => render::YELLOW,
                    FollowerState::Thrown { .. } => render::RED,
                    FollowerState::Idle => 0x4d9effff,
                },
            });
        }
        frame.push(DrawCmd::Circle {
            center: self.leader,
            radius: 12.0,
            color: render::WHITE,
        });
        frame.push(DrawCmd::Text {
            pos: Vec2::new(10.0, 20.0),
            text: format!("squad {}/{}", self.squad_count(), UNIT_COUNT),
            color: render::WHITE,
        });
        frame
    }

    fn over(&self) -> bool {
        false
    }

    fn summary(&self) -> String {
        format!("swarm: {}/{} following", self.squad_count(), UNIT_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whistle_everyone(session: &mut SwarmSession, ticks: usize) {
        let mut input = InputSnapshot::new();
        input.set_key(Key::Whistle, true);
        for _ in 0..ticks {
            session.tick(&input);
        }
    }

    #[test]
    fn test_whistle_radius_grows_to_cap_then_collapses() {
        let mut session = SwarmSession::new(1).unwrap();
        let mut input = InputSnapshot::new();
        input.set_key(Key::Whistle, true);
        for _ in 0..40 {
            session.tick(&input);
        }
        assert_eq!(session.whistle_radius(), 100.0);
        input.set_key(Key::Whistle, false);
        session.tick(&input);
        assert_eq!(session.whistle_radius(), 0.0);
    }

    /// Pin the first `n` units near the leader so recruitment is not at the
    /// mercy of the seeded scatter
    fn place_near_leader(session: &mut SwarmSession, n: usize) {
        let leader = session.leader;
        for (i, unit) in session.units.iter_mut().take(n).enumerate() {
            unit.pos = leader + Vec2::new(30.0 + i as f32 * 10.0, 0.0);
        }
    }

    #[test]
    fn test_whistle_recruits_only_nearby_units() {
        let mut session = SwarmSession::new(2).unwrap();
        place_near_leader(&mut session, 5);
        // Park one unit far outside any possible whistle radius
        session.units[5].pos = Vec2::new(790.0, 590.0);
        assert_eq!(session.squad_count(), 0);
        whistle_everyone(&mut session, 60);
        assert!(session.squad_count() >= 5);
        assert_ne!(session.units[5].state, FollowerState::Following);
    }

    #[test]
    fn test_followers_converge_on_leader() {
        let mut session = SwarmSession::new(3).unwrap();
        // Ring of units at 90px, just inside the max whistle radius
        let leader = session.leader;
        for (i, unit) in session.units.iter_mut().take(8).enumerate() {
            let theta = i as f32 * std::f32::consts::TAU / 8.0;
            unit.pos = leader + Vec2::new(theta.cos(), theta.sin()) * 90.0;
        }
        whistle_everyone(&mut session, 30);
        let idle = InputSnapshot::new();
        for _ in 0..240 {
            session.tick(&idle);
        }
        // Arrival steering pulls every recruit well inside the formation
        // spread (offsets are at most ~42px from the leader)
        for unit in session.units.iter().take(8) {
            assert_eq!(unit.state, FollowerState::Following);
            assert!((unit.pos - session.leader()).length() < 60.0);
        }
    }

    #[test]
    fn test_throw_cycle_returns_to_idle() {
        let mut session = SwarmSession::new(4).unwrap();
        place_near_leader(&mut session, 3);
        whistle_everyone(&mut session, 60);
        assert!(session.squad_count() > 0);
        let squad_before = session.squad_count();

        let mut input = InputSnapshot::new();
        input.pointer = Vec2::new(700.0, 100.0);
        input.pointer_pressed = true;
        session.tick(&input);
        assert_eq!(session.squad_count(), squad_before - 1);
        let thrown = session
            .units()
            .iter()
            .filter(|u| matches!(u.state, FollowerState::Thrown { .. }))
            .count();
        assert_eq!(thrown, 1);

        input.pointer_pressed = false;
        for _ in 0..40 {
            session.tick(&input);
        }
        let thrown_after = session
            .units()
            .iter()
            .filter(|u| matches!(u.state, FollowerState::Thrown { .. }))
            .count();
        assert_eq!(thrown_after, 0);
    }

    #[test]
    fn test_leader_clamped_to_arena() {
        let mut session = SwarmSession::new(5).unwrap();
        let mut input = InputSnapshot::new();
        input.set_key(Key::Left, true);
        input.set_key(Key::Up, true);
        for _ in 0..300 {
            session.tick(&input);
        }
        assert_eq!(session.leader(), Vec2::ZERO);
    }
}
