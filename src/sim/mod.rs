//! Deterministic simulation primitives
//!
//! All gameplay math lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (passed in, never ambient)
//! - No rendering or platform dependencies

pub mod body;
pub mod geom;
pub mod grid;
pub mod knockback;
pub mod particle;
pub mod steering;

pub use body::Body;
pub use geom::{Aabb, EllipseBounds, dist_to_segment, reflect};
pub use grid::TileGrid;
pub use knockback::{KnockbackParams, launch_speed};
pub use particle::Particle;
pub use steering::{arrival, separation};
