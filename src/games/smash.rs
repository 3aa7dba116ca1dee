//! Day13 knockback toy: click the target, launch it by accumulated damage
//!
//! The target is a single rigid body over a floating stage. Hits apply the
//! damage-scaled knockback impulse; leaving the blast zone KOs the target,
//! which respawns after a short countdown.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::combo::ComboTracker;
use crate::config::PhysicsConfig;
use crate::error::SessionError;
use crate::games::Session;
use crate::input::InputSnapshot;
use crate::render::{self, DrawCmd, Frame};
use crate::score::ticks_to_ms;
use crate::sim::geom::Aabb;
use crate::sim::knockback::{KnockbackParams, launch_speed, launch_velocity};
use crate::sim::particle::{self, Particle};
use crate::sim::Body;

const ARENA: Aabb = Aabb {
    min: Vec2::ZERO,
    max: Vec2::new(800.0, 600.0),
};
/// Margin past the arena edge before a KO triggers
const BLAST_MARGIN: f32 = 100.0;
const STAGE_Y: f32 = 400.0;
const STAGE_X: f32 = 200.0;
const STAGE_WIDTH: f32 = 400.0;
const TARGET_WEIGHT: f32 = 100.0;
const SPAWN: Vec2 = Vec2::new(400.0, 276.0);
/// Ticks from KO back to a fresh target
const KO_RESET_TICKS: u32 = 90;

pub struct SmashSession {
    config: PhysicsConfig,
    target: Body,
    damage: f32,
    combo: ComboTracker,
    ko: bool,
    ko_timer: u32,
    ko_count: u32,
    particles: Vec<Particle>,
    rng: Pcg32,
    ticks: u64,
}

impl SmashSession {
    pub fn new(seed: u64) -> Result<Self, SessionError> {
        let config = PhysicsConfig::smash();
        config.validate()?;
        let combo = ComboTracker::new(config.combo_timeout_ms);
        Ok(Self {
            config,
            target: Body::new(SPAWN, Vec2::new(32.0, 48.0)),
            damage: 0.0,
            combo,
            ko: false,
            ko_timer: 0,
            ko_count: 0,
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            ticks: 0,
        })
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn is_ko(&self) -> bool {
        self.ko
    }

    pub fn ko_count(&self) -> u32 {
        self.ko_count
    }

    /// Current hit-chain length
    pub fn combo_count(&self) -> u32 {
        self.combo.count()
    }

    pub fn target(&self) -> &Body {
        &self.target
    }

    fn respawn(&mut self) {
        self.target = Body::new(SPAWN, self.target.size);
        self.damage = 0.0;
        self.combo.reset();
        self.ko = false;
    }

    fn handle_attack(&mut self, hit: Vec2) {
        if !self.target.aabb().contains(hit) {
            return;
        }
        let power = 10.0 + self.rng.random::<f32>() * 5.0;
        let speed = launch_speed(KnockbackParams {
            damage: self.damage,
            weight: TARGET_WEIGHT,
            attack_power: power,
        });
        self.target.vel = launch_velocity(self.target.pos, hit, speed);
        self.damage += power;
        let chain = self.combo.trigger(ticks_to_ms(self.ticks));
        log::debug!(
            "hit for {power:.1}, damage now {:.0}%, combo x{chain}",
            self.damage
        );
        particle::spawn_burst(
            &mut self.particles,
            &mut self.rng,
            hit,
            10,
            15.0,
            20,
            render::WHITE,
        );
    }
}

impl Session for SmashSession {
    fn tick(&mut self, input: &InputSnapshot) {
        self.ticks += 1;
        particle::age_particles(&mut self.particles);

        if self.ko {
            self.ko_timer = self.ko_timer.saturating_sub(1);
            if self.ko_timer == 0 {
                self.respawn();
            }
            return;
        }

        if input.pointer_pressed {
            self.handle_attack(input.pointer);
        }

        let c = &self.config;
        self.target.apply_gravity(c.gravity);
        self.target.apply_friction(c.friction);
        self.target.clamp_speed(c.max_speed);

        // One-way stage floor: only a downward crossing of the stage top lands
        let feet_before = self.target.pos.y + self.target.size.y / 2.0;
        self.target.integrate();
        let feet_after = self.target.pos.y + self.target.size.y / 2.0;
        let over_stage =
            self.target.pos.x >= STAGE_X && self.target.pos.x <= STAGE_X + STAGE_WIDTH;
        if over_stage && feet_before <= STAGE_Y && feet_after >= STAGE_Y && self.target.vel.y > 0.0
        {
            self.target.pos.y = STAGE_Y - self.target.size.y / 2.0;
            self.target.vel.y = 0.0;
            self.target.vel.x *= c.ground_friction;
            self.target.on_ground = true;
        } else {
            self.target.on_ground = false;
        }

        // Blast zones
        if !ARENA.inflated(BLAST_MARGIN).contains(self.target.pos) {
            self.ko = true;
            self.ko_timer = KO_RESET_TICKS;
            self.ko_count += 1;
            log::info!("KO #{} at {:.0}% damage", self.ko_count, self.damage);
        }
    }

    fn render(&self) -> Frame {
        let mut frame: Frame = vec![DrawCmd::Clear {
            color: render::BLACK,
        }];
        frame.push(DrawCmd::Rect {
            min: Vec2::new(STAGE_X, STAGE_Y),
            size: Vec2::new(STAGE_WIDTH, 20.0),
            color: render::SLATE,
        });
        let aabb = self.target.aabb();
        frame.push(DrawCmd::Rect {
            min: aabb.min,
            size: self.target.size,
            color: if self.ko { render::RED } else { 0x60a5faff },
        });
        for p in &self.particles {
            frame.push(DrawCmd::Rect {
                min: p.pos,
                size: Vec2::splat(3.0),
                color: p.color,
            });
        }
        let hud = if self.combo.count() > 1 {
            format!("{:.0}%  combo x{}", self.damage, self.combo.count())
        } else {
            format!("{:.0}%", self.damage)
        };
        frame.push(DrawCmd::Text {
            pos: Vec2::new(10.0, 20.0),
            text: hud,
            color: render::WHITE,
        });
        frame
    }

    fn over(&self) -> bool {
        false
    }

    fn summary(&self) -> String {
        format!(
            "smash: {:.0}% damage, {} KOs",
            self.damage, self.ko_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(session: &mut SmashSession, point: Vec2) {
        let mut input = InputSnapshot::new();
        input.pointer = point;
        input.pointer_pressed = true;
        session.tick(&input);
    }

    #[test]
    fn test_target_settles_on_stage() {
        let mut session = SmashSession::new(1).unwrap();
        let idle = InputSnapshot::new();
        for _ in 0..300 {
            session.tick(&idle);
        }
        assert!(session.target().on_ground);
        assert!((session.target().pos.y + 24.0 - STAGE_Y).abs() < 1e-2);
    }

    #[test]
    fn test_hit_accumulates_damage_and_launches() {
        let mut session = SmashSession::new(2).unwrap();
        let idle = InputSnapshot::new();
        for _ in 0..300 {
            session.tick(&idle);
        }
        let pos = session.target().pos;
        hit(&mut session, pos + Vec2::new(-5.0, 0.0));
        assert!(session.damage() >= 10.0);
        // Launched to the right, away from the hit
        assert!(session.target().vel.x > 0.0);
        assert!(!session.particles.is_empty());
    }

    #[test]
    fn test_miss_does_nothing() {
        let mut session = SmashSession::new(3).unwrap();
        let idle = InputSnapshot::new();
        for _ in 0..300 {
            session.tick(&idle);
        }
        hit(&mut session, Vec2::new(50.0, 50.0));
        assert_eq!(session.damage(), 0.0);
    }

    #[test]
    fn test_quick_hits_chain_a_combo() {
        let mut session = SmashSession::new(5).unwrap();
        let idle = InputSnapshot::new();
        for _ in 0..300 {
            session.tick(&idle);
        }
        let pos = session.target().pos;
        hit(&mut session, pos);
        assert_eq!(session.combo_count(), 1);
        // ~83ms later, well inside the window
        for _ in 0..5 {
            session.tick(&idle);
        }
        let pos = session.target().pos;
        hit(&mut session, pos);
        assert_eq!(session.combo_count(), 2);
    }

    #[test]
    fn test_ko_and_respawn_cycle() {
        let mut session = SmashSession::new(4).unwrap();
        let idle = InputSnapshot::new();
        for _ in 0..300 {
            session.tick(&idle);
        }
        // Pile on damage until a launch clears the blast zone
        for _ in 0..200 {
            if session.is_ko() {
                break;
            }
            let pos = session.target().pos;
            hit(&mut session, pos + Vec2::new(2.0, 10.0));
            for _ in 0..30 {
                if session.is_ko() {
                    break;
                }
                session.tick(&idle);
            }
        }
        assert!(session.is_ko());
        assert_eq!(session.ko_count(), 1);
        for _ in 0..KO_RESET_TICKS as usize + 1 {
            session.tick(&idle);
        }
        assert!(!session.is_ko());
        assert_eq!(session.damage(), 0.0);
        assert_eq!(session.combo_count(), 0);
    }
}
