//! Day3 breakout: paddle, ball, brick wall
//!
//! Ball/brick and ball/paddle hits go through the shared AABB overlap test;
//! bounces reflect the velocity off an axis normal, except the paddle, which
//! re-aims the ball by where it struck.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::PhysicsConfig;
use crate::error::SessionError;
use crate::games::Session;
use crate::input::InputSnapshot;
use crate::render::{self, DrawCmd, Frame};
use crate::sim::geom::{reflect, Aabb};
use crate::sim::particle::{self, Particle};

const ARENA: Vec2 = Vec2::new(600.0, 800.0);
const PADDLE_SIZE: Vec2 = Vec2::new(100.0, 15.0);
const PADDLE_Y: f32 = 740.0;
const BALL_RADIUS: f32 = 8.0;
const BRICK_ROWS: usize = 8;
const BRICK_COLS: usize = 7;
const BRICK_HEIGHT: f32 = 25.0;
const BRICK_PADDING: f32 = 10.0;
const BRICK_TOP_OFFSET: f32 = 100.0;
const BRICK_LEFT_OFFSET: f32 = 30.0;
const POINTS_PER_BRICK: u32 = 10;
const START_LIVES: u32 = 3;
/// Ball speeds up a little with every broken brick
const SPEEDUP_PER_BRICK: f32 = 0.05;
const SERVE_VEL: Vec2 = Vec2::new(4.0, -4.0);

const BRICK_COLORS: [u32; 5] = [0x00f2ffff, 0xff00ffff, 0xffff00ff, 0x00ff00ff, 0xff4d00ff];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakoutPhase {
    Playing,
    Cleared,
    GameOver,
}

#[derive(Debug, Clone)]
struct Brick {
    bounds: Aabb,
    color: u32,
    alive: bool,
}

pub struct BreakoutSession {
    config: PhysicsConfig,
    paddle_x: f32,
    ball_pos: Vec2,
    ball_vel: Vec2,
    ball_speed: f32,
    bricks: Vec<Brick>,
    score: u32,
    lives: u32,
    phase: BreakoutPhase,
    particles: Vec<Particle>,
    rng: Pcg32,
}

impl BreakoutSession {
    pub fn new(seed: u64) -> Result<Self, SessionError> {
        let config = PhysicsConfig::breakout();
        config.validate()?;
        Ok(Self {
            config,
            paddle_x: (ARENA.x - PADDLE_SIZE.x) / 2.0,
            ball_pos: Vec2::new(ARENA.x / 2.0, ARENA.y - 80.0),
            ball_vel: SERVE_VEL,
            ball_speed: 6.0,
            bricks: Self::brick_wall(),
            score: 0,
            lives: START_LIVES,
            phase: BreakoutPhase::Playing,
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    fn brick_wall() -> Vec<Brick> {
        let width = (ARENA.x - BRICK_LEFT_OFFSET * 2.0 - BRICK_PADDING * (BRICK_COLS as f32 - 1.0))
            / BRICK_COLS as f32;
        let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                let min = Vec2::new(
                    col as f32 * (width + BRICK_PADDING) + BRICK_LEFT_OFFSET,
                    row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_TOP_OFFSET,
                );
                bricks.push(Brick {
                    bounds: Aabb::new(min, min + Vec2::new(width, BRICK_HEIGHT)),
                    color: BRICK_COLORS[row % BRICK_COLORS.len()],
                    alive: true,
                });
            }
        }
        bricks
    }

    pub fn phase(&self) -> BreakoutPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    fn ball_aabb(&self) -> Aabb {
        Aabb::centered(self.ball_pos, Vec2::splat(BALL_RADIUS * 2.0))
    }

    fn paddle(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.paddle_x, PADDLE_Y),
            Vec2::new(self.paddle_x, PADDLE_Y) + PADDLE_SIZE,
        )
    }

    fn serve(&mut self) {
        self.ball_pos = ARENA / 2.0;
        self.ball_vel = SERVE_VEL;
    }

    /// Reflect off the brick face with the smaller penetration
    fn brick_normal(&self, brick: &Aabb) -> Vec2 {
        let ball = self.ball_aabb();
        let overlap_x = (ball.max.x - brick.min.x).min(brick.max.x - ball.min.x);
        let overlap_y = (ball.max.y - brick.min.y).min(brick.max.y - ball.min.y);
        if overlap_x < overlap_y && self.ball_vel.x != 0.0 {
            Vec2::new(-self.ball_vel.x.signum(), 0.0)
        } else {
            Vec2::new(0.0, -self.ball_vel.y.signum())
        }
    }

    fn hit_bricks(&mut self) {
        let ball = self.ball_aabb();
        let Some(idx) = self
            .bricks
            .iter()
            .position(|b| b.alive && ball.overlaps(&b.bounds))
        else {
            return;
        };
        let normal = self.brick_normal(&self.bricks[idx].bounds);
        self.ball_vel = reflect(self.ball_vel, normal);
        let brick = &mut self.bricks[idx];
        brick.alive = false;
        self.score += POINTS_PER_BRICK;
        self.ball_speed = (self.ball_speed + SPEEDUP_PER_BRICK).min(self.config.max_speed);
        let center = (brick.bounds.min + brick.bounds.max) / 2.0;
        let color = brick.color;
        particle::spawn_burst(&mut self.particles, &mut self.rng, center, 15, 8.0, 30, color);
    }
}

impl Session for BreakoutSession {
    fn tick(&mut self, input: &InputSnapshot) {
        if self.phase != BreakoutPhase::Playing {
            return;
        }
        let c = &self.config;

        self.paddle_x = (self.paddle_x + input.steer_axis() * c.accel)
            .clamp(0.0, ARENA.x - PADDLE_SIZE.x);

        self.ball_pos += self.ball_vel;

        // Side and top walls
        if self.ball_pos.x - BALL_RADIUS < 0.0 {
            self.ball_pos.x = BALL_RADIUS;
            self.ball_vel = reflect(self.ball_vel, Vec2::X);
        } else if self.ball_pos.x + BALL_RADIUS > ARENA.x {
            self.ball_pos.x = ARENA.x - BALL_RADIUS;
            self.ball_vel = reflect(self.ball_vel, Vec2::NEG_X);
        }
        if self.ball_pos.y - BALL_RADIUS < 0.0 {
            self.ball_pos.y = BALL_RADIUS;
            self.ball_vel = reflect(self.ball_vel, Vec2::Y);
        }

        // Paddle: re-aim by hit offset so the player controls the angle
        let paddle = self.paddle();
        if self.ball_vel.y > 0.0 && self.ball_aabb().overlaps(&paddle) {
            let half = PADDLE_SIZE.x / 2.0;
            let offset = ((self.ball_pos.x - (self.paddle_x + half)) / half).clamp(-1.0, 1.0);
            self.ball_vel.x = offset * self.ball_speed;
            self.ball_vel.y = -self.ball_speed * (1.0 - offset.abs() * 0.3);
            self.ball_pos.y = paddle.min.y - BALL_RADIUS;
            particle::spawn_burst(
                &mut self.particles,
                &mut self.rng,
                self.ball_pos,
                8,
                8.0,
                20,
                render::CYAN,
            );
        }

        self.hit_bricks();

        // Bottom is out
        if self.ball_pos.y - BALL_RADIUS > ARENA.y {
            self.lives = self.lives.saturating_sub(1);
            log::info!("ball lost, {} lives left", self.lives);
            if self.lives == 0 {
                self.phase = BreakoutPhase::GameOver;
            } else {
                self.serve();
            }
        }

        if self.bricks.iter().all(|b| !b.alive) {
            self.phase = BreakoutPhase::Cleared;
            log::info!("wall cleared at score {}", self.score);
        }

        particle::age_particles(&mut self.particles);
    }

    fn render(&self) -> Frame {
        let mut frame: Frame = vec![DrawCmd::Clear {
            color: render::BLACK,
        }];
        for brick in self.bricks.iter().filter(|b| b.alive) {
            frame.push(DrawCmd::Rect {
                min: brick.bounds.min,
                size: brick.bounds.max - brick.bounds.min,
                color: brick.color,
            });
        }
        frame.push(DrawCmd::Rect {
            min: Vec2::new(self.paddle_x, PADDLE_Y),
            size: PADDLE_SIZE,
            color: render::CYAN,
        });
        frame.push(DrawCmd::Circle {
            center: self.ball_pos,
            radius: BALL_RADIUS,
            color: render::WHITE,
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
            text: format!("SCORE {:04}  LIVES {}", self.score, self.lives),
            color: render::WHITE,
        });
        frame
    }

    fn over(&self) -> bool {
        self.phase != BreakoutPhase::Playing
    }

    fn summary(&self) -> String {
        let outcome = match self.phase {
            BreakoutPhase::Cleared => "cleared",
            BreakoutPhase::GameOver => "game over",
            BreakoutPhase::Playing => "in play",
        };
        format!(
            "breakout: {outcome}, score {}, {} bricks left",
            self.score,
            self.bricks_left()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_bounce_preserves_speed() {
        let mut session = BreakoutSession::new(1).unwrap();
        session.ball_pos = Vec2::new(10.0, 400.0);
        session.ball_vel = Vec2::new(-4.0, 2.0);
        let before = session.ball_vel.length();
        session.tick(&InputSnapshot::new());
        assert!(session.ball_vel.x > 0.0);
        assert!((session.ball_vel.length() - before).abs() < 1e-4);
    }

    #[test]
    fn test_brick_hit_scores_and_removes_one() {
        let mut session = BreakoutSession::new(2).unwrap();
        // Aim straight up at the bottom brick row
        let target = session.bricks.last().unwrap().bounds;
        session.ball_pos = Vec2::new(
            (target.min.x + target.max.x) / 2.0,
            target.max.y + BALL_RADIUS + 2.0,
        );
        session.ball_vel = Vec2::new(0.0, -4.0);
        let before = session.bricks_left();
        session.tick(&InputSnapshot::new());
        assert_eq!(session.bricks_left(), before - 1);
        assert_eq!(session.score(), POINTS_PER_BRICK);
        // Bounced back down off the brick's underside
        assert!(session.ball_vel.y > 0.0);
        assert!(!session.particles.is_empty());
    }

    #[test]
    fn test_paddle_bounce_aims_by_hit_offset() {
        let mut session = BreakoutSession::new(3).unwrap();
        // Strike the right half of the paddle moving down
        session.ball_pos = Vec2::new(session.paddle_x + 80.0, PADDLE_Y - BALL_RADIUS - 2.0);
        session.ball_vel = Vec2::new(0.0, 4.0);
        session.tick(&InputSnapshot::new());
        assert!(session.ball_vel.y < 0.0);
        assert!(session.ball_vel.x > 0.0);
        // Snapped above the paddle, not stuck inside it
        assert!(session.ball_pos.y <= PADDLE_Y - BALL_RADIUS);
    }

    #[test]
    fn test_lost_ball_burns_a_life_then_ends() {
        let mut session = BreakoutSession::new(4).unwrap();
        session.lives = 1;
        session.ball_pos = Vec2::new(300.0, ARENA.y + 20.0);
        session.ball_vel = Vec2::new(0.0, 4.0);
        session.tick(&InputSnapshot::new());
        assert_eq!(session.lives(), 0);
        assert_eq!(session.phase(), BreakoutPhase::GameOver);
        assert!(session.over());
    }

    #[test]
    fn test_lost_ball_serves_again_when_lives_remain() {
        let mut session = BreakoutSession::new(5).unwrap();
        session.ball_pos = Vec2::new(300.0, ARENA.y + 20.0);
        session.ball_vel = Vec2::new(0.0, 4.0);
        session.tick(&InputSnapshot::new());
        assert_eq!(session.lives(), START_LIVES - 1);
        assert_eq!(session.phase(), BreakoutPhase::Playing);
        assert_eq!(session.ball_pos, ARENA / 2.0);
        assert_eq!(session.ball_vel, SERVE_VEL);
    }

    #[test]
    fn test_clearing_the_wall_wins() {
        let mut session = BreakoutSession::new(6).unwrap();
        for brick in &mut session.bricks {
            brick.alive = false;
        }
        let target = session.bricks[0].bounds;
        session.bricks[0].alive = true;
        session.ball_pos = Vec2::new(
            (target.min.x + target.max.x) / 2.0,
            target.max.y + BALL_RADIUS + 2.0,
        );
        session.ball_vel = Vec2::new(0.0, -4.0);
        session.tick(&InputSnapshot::new());
        assert_eq!(session.bricks_left(), 0);
        assert_eq!(session.phase(), BreakoutPhase::Cleared);
        assert!(session.over());
    }

    #[test]
    fn test_paddle_clamped_to_arena() {
        let mut session = BreakoutSession::new(7).unwrap();
        let mut input = InputSnapshot::new();
        input.set_key(crate::input::Key::Left, true);
        for _ in 0..200 {
            session.tick(&input);
        }
        assert_eq!(session.paddle_x, 0.0);
    }
}
