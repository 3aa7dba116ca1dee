//! Tile grid geometry and swept axis collision
//!
//! The platformer resolves collision one axis at a time: integrate X, test the
//! leading edge column, snap and zero vx on overlap; then the same for Y. The
//! snap guarantees a body never ends a tick inside a solid tile.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::sim::body::Body;

/// Empty tile code; any other code is solid
pub const EMPTY: u8 = 0;

/// Inset applied to the trailing axis so edge-touching tiles do not trigger
const EDGE_EPS: f32 = 0.01;

/// A 2D array of tile-type codes, immutable during a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    cols: usize,
    rows: usize,
    tile_size: f32,
    tiles: Vec<u8>,
}

impl TileGrid {
    /// Build from row-major rows; rejects empty or ragged maps and
    /// non-positive tile sizes
    pub fn new(rows: &[Vec<u8>], tile_size: f32) -> Result<Self, SessionError> {
        if tile_size <= 0.0 || !tile_size.is_finite() {
            return Err(SessionError::DegenerateGeometry(format!(
                "tile size must be positive finite, got {tile_size}"
            )));
        }
        let row_count = rows.len();
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if row_count == 0 || cols == 0 {
            return Err(SessionError::DegenerateGeometry(
                "tile map must be non-empty".into(),
            ));
        }
        if rows.iter().any(|r| r.len() != cols) {
            return Err(SessionError::DegenerateGeometry(
                "tile map rows must have equal length".into(),
            ));
        }
        let mut tiles = Vec::with_capacity(row_count * cols);
        for row in rows {
            tiles.extend_from_slice(row);
        }
        Ok(Self {
            cols,
            rows: row_count,
            tile_size,
            tiles,
        })
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// World-space width of the whole map
    pub fn world_width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    /// World-space height of the whole map
    pub fn world_height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Tile code at (col, row); out-of-bounds reads as empty
    pub fn tile(&self, col: i32, row: i32) -> u8 {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return EMPTY;
        }
        self.tiles[row as usize * self.cols + col as usize]
    }

    #[inline]
    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.tile(col, row) != EMPTY
    }

    /// Cell index containing a world coordinate along one axis
    #[inline]
    fn cell(&self, coord: f32) -> i32 {
        (coord / self.tile_size).floor() as i32
    }

    /// Integrate the body by its velocity, resolving each axis against the
    /// grid. On overlap the position snaps to the cell boundary and the
    /// blocked velocity component is zeroed. Sets `on_ground` when landing.
    pub fn move_and_collide(&self, body: &mut Body) {
        let ts = self.tile_size;
        let half = body.size * 0.5;

        // X axis
        body.pos.x += body.vel.x;
        {
            let top = self.cell(body.pos.y - half.y + EDGE_EPS);
            let bottom = self.cell(body.pos.y + half.y - EDGE_EPS);
            if body.vel.x > 0.0 {
                let lead = self.cell(body.pos.x + half.x);
                for row in top..=bottom {
                    if self.is_solid(lead, row) {
                        body.pos.x = lead as f32 * ts - half.x;
                        body.vel.x = 0.0;
                        break;
                    }
                }
            } else if body.vel.x < 0.0 {
                let lead = self.cell(body.pos.x - half.x);
                for row in top..=bottom {
                    if self.is_solid(lead, row) {
                        body.pos.x = (lead + 1) as f32 * ts + half.x;
                        body.vel.x = 0.0;
                        break;
                    }
                }
            }
        }

        // Y axis
        body.pos.y += body.vel.y;
        body.on_ground = false;
        {
            let left = self.cell(body.pos.x - half.x + EDGE_EPS);
            let right = self.cell(body.pos.x + half.x - EDGE_EPS);
            if body.vel.y > 0.0 {
                let lead = self.cell(body.pos.y + half.y);
                for col in left..=right {
                    if self.is_solid(col, lead) {
                        body.pos.y = lead as f32 * ts - half.y;
                        body.vel.y = 0.0;
                        body.on_ground = true;
                        break;
                    }
                }
            } else if body.vel.y < 0.0 {
                let lead = self.cell(body.pos.y - half.y);
                for col in left..=right {
                    if self.is_solid(col, lead) {
                        body.pos.y = (lead + 1) as f32 * ts + half.y;
                        body.vel.y = 0.0;
                        break;
                    }
                }
            }
        }
    }

    /// Deepest penetration of the body's box into any solid tile, for
    /// asserting the no-tunneling invariant
    pub fn penetration_depth(&self, body: &Body) -> f32 {
        let half = body.size * 0.5;
        let ts = self.tile_size;
        let left = self.cell(body.pos.x - half.x);
        let right = self.cell(body.pos.x + half.x);
        let top = self.cell(body.pos.y - half.y);
        let bottom = self.cell(body.pos.y + half.y);

        let mut deepest = 0.0_f32;
        for row in top..=bottom {
            for col in left..=right {
                if !self.is_solid(col, row) {
                    continue;
                }
                let tile_min = Vec2::new(col as f32 * ts, row as f32 * ts);
                let tile_max = tile_min + Vec2::splat(ts);
                let overlap_x =
                    (body.pos.x + half.x - tile_min.x).min(tile_max.x - (body.pos.x - half.x));
                let overlap_y =
                    (body.pos.y + half.y - tile_min.y).min(tile_max.y - (body.pos.y - half.y));
                if overlap_x > 0.0 && overlap_y > 0.0 {
                    deepest = deepest.max(overlap_x.min(overlap_y));
                }
            }
        }
        deepest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_map() -> TileGrid {
        // 10 wide, 6 tall, solid bottom row and a wall at column 7
        let mut rows = vec![vec![0u8; 10]; 6];
        rows[5] = vec![1; 10];
        for r in 2..5 {
            rows[r][7] = 1;
        }
        TileGrid::new(&rows, 32.0).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_maps() {
        assert!(TileGrid::new(&[], 32.0).is_err());
        assert!(TileGrid::new(&[vec![0, 1], vec![0]], 32.0).is_err());
        assert!(TileGrid::new(&[vec![0, 1]], 0.0).is_err());
    }

    #[test]
    fn test_fall_lands_on_floor() {
        let grid = floor_map();
        let mut body = Body::new(Vec2::new(64.0, 100.0), Vec2::new(24.0, 32.0));
        body.vel = Vec2::new(0.0, 12.0);
        for _ in 0..20 {
            body.vel.y += 0.6;
            grid.move_and_collide(&mut body);
        }
        assert!(body.on_ground);
        assert_eq!(body.vel.y, 0.0);
        // Resting exactly on top of row 5 (y = 160), never inside it
        assert!((body.pos.y + 16.0 - 160.0).abs() < 1e-3);
        assert!(grid.penetration_depth(&body) < 1e-3);
    }

    #[test]
    fn test_walk_into_wall_snaps() {
        let grid = floor_map();
        // Standing on the floor, walking right into the column-7 wall
        let mut body = Body::new(Vec2::new(64.0, 144.0), Vec2::new(24.0, 32.0));
        for _ in 0..60 {
            body.vel.x = (body.vel.x + 0.5).min(5.0);
            body.vel.y += 0.6;
            grid.move_and_collide(&mut body);
        }
        assert_eq!(body.vel.x, 0.0);
        // Right edge flush with the wall at x = 7*32 = 224
        assert!((body.pos.x + 12.0 - 224.0).abs() < 1e-3);
        assert!(grid.penetration_depth(&body) < 1e-3);
    }

    #[test]
    fn test_head_bump_zeroes_upward_velocity() {
        let mut rows = vec![vec![0u8; 4]; 4];
        rows[0] = vec![1; 4];
        rows[3] = vec![1; 4];
        let grid = TileGrid::new(&rows, 32.0).unwrap();
        let mut body = Body::new(Vec2::new(64.0, 70.0), Vec2::new(20.0, 20.0));
        body.vel = Vec2::new(0.0, -15.0);
        grid.move_and_collide(&mut body);
        assert_eq!(body.vel.y, 0.0);
        // Top edge flush with the ceiling bottom at y = 32
        assert!((body.pos.y - 10.0 - 32.0).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_bounds_is_empty() {
        let grid = floor_map();
        assert!(!grid.is_solid(-1, 0));
        assert!(!grid.is_solid(0, -1));
        assert!(!grid.is_solid(100, 100));
    }
}
