//! Day10 platformer: tile-grid movement with gravity and a lerped camera

use glam::Vec2;

use crate::config::PhysicsConfig;
use crate::error::SessionError;
use crate::games::Session;
use crate::input::{InputSnapshot, Key};
use crate::render::{self, DrawCmd, Frame};
use crate::sim::{Body, TileGrid};

const TILE_SIZE: f32 = 32.0;
const VIEW_WIDTH: f32 = 640.0;
const VIEW_HEIGHT: f32 = 480.0;
const CAMERA_LERP: f32 = 0.1;

pub struct PlatformerSession {
    config: PhysicsConfig,
    grid: TileGrid,
    player: Body,
    facing: f32,
    camera_x: f32,
    ticks: u64,
}

impl PlatformerSession {
    pub fn new(grid: TileGrid, spawn: Vec2) -> Result<Self, SessionError> {
        let config = PhysicsConfig::platformer();
        config.validate()?;
        Ok(Self {
            config,
            grid,
            player: Body::new(spawn, Vec2::new(24.0, 32.0)),
            facing: 1.0,
            camera_x: 0.0,
            ticks: 0,
        })
    }

    /// The simple demo level: flat ground with a few floating platforms
    pub fn demo_level() -> Result<Self, SessionError> {
        let cols = 30;
        let mut rows = vec![vec![0u8; cols]; 15];
        for row in &mut rows[12..15] {
            row.fill(1);
        }
        // Floating platforms
        for col in 15..20 {
            rows[10][col] = 1;
        }
        for col in 13..22 {
            rows[11][col] = 1;
        }
        for col in 17..20 {
            rows[9][col] = 1;
        }
        for col in [5, 6, 7] {
            rows[9][col] = 2;
        }
        for col in [11, 12, 13] {
            rows[7][col] = 2;
        }
        let grid = TileGrid::new(&rows, TILE_SIZE)?;
        Self::new(grid, Vec2::new(112.0, 366.0))
    }

    pub fn player(&self) -> &Body {
        &self.player
    }

    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }
}

impl Session for PlatformerSession {
    fn tick(&mut self, input: &InputSnapshot) {
        self.ticks += 1;
        let c = &self.config;

        // Control accel or ground friction
        if input.held(Key::Right) {
            self.player.vel.x += c.accel;
            self.facing = 1.0;
        } else if input.held(Key::Left) {
            self.player.vel.x -= c.accel;
            self.facing = -1.0;
        } else {
            self.player.vel.x *= c.ground_friction;
        }
        self.player.vel.x = self.player.vel.x.clamp(-c.max_speed, c.max_speed);

        self.player.apply_gravity(c.gravity);

        if input.held(Key::Jump) && self.player.on_ground {
            self.player.vel.y = c.jump_force;
            self.player.on_ground = false;
        }

        self.grid.move_and_collide(&mut self.player);

        // Camera follows with lerp, clamped to world bounds
        let target = (self.player.pos.x - VIEW_WIDTH / 2.0)
            .clamp(0.0, (self.grid.world_width() - VIEW_WIDTH).max(0.0));
        self.camera_x += (target - self.camera_x) * CAMERA_LERP;
    }

    fn render(&self) -> Frame {
        let mut frame: Frame = vec![DrawCmd::Clear {
            color: render::BLACK,
        }];
        let cam = Vec2::new(self.camera_x, 0.0);

        // Static geometry: only columns near the camera
        let first_col = (self.camera_x / TILE_SIZE).floor().max(0.0) as i32;
        let last_col = ((self.camera_x + VIEW_WIDTH) / TILE_SIZE).ceil() as i32;
        for row in 0..self.grid.rows() as i32 {
            for col in first_col..=last_col {
                let tile = self.grid.tile(col, row);
                if tile == 0 {
                    continue;
                }
                let color = if tile == 1 { 0x8a4b08ff } else { 0xd82800ff };
                frame.push(DrawCmd::Rect {
                    min: Vec2::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE) - cam,
                    size: Vec2::splat(TILE_SIZE),
                    color,
                });
            }
        }

        // Player
        let aabb = self.player.aabb();
        frame.push(DrawCmd::Rect {
            min: aabb.min - cam,
            size: self.player.size,
            color: render::RED,
        });

        frame.push(DrawCmd::Text {
            pos: Vec2::new(10.0, 20.0),
            text: format!("x {:.0}  y {:.0}", self.player.pos.x, self.player.pos.y),
            color: render::WHITE,
        });
        frame
    }

    fn over(&self) -> bool {
        // Endless sandbox; falling off the map ends the session
        self.player.pos.y > self.grid.world_height() + VIEW_HEIGHT
    }

    fn summary(&self) -> String {
        format!(
            "platformer: pos ({:.0}, {:.0}) after {} ticks",
            self.player.pos.x, self.player.pos.y, self.ticks
        )
    }
}
