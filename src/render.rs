//! Abstract draw-command frames
//!
//! Sessions never touch a real surface; each tick's render step emits an
//! ordered list of primitives (background first, HUD text last) and the host
//! maps them onto whatever canvas it owns. Exact pixel output is not a
//! compatibility contract.

use glam::Vec2;

/// Packed 0xRRGGBBAA color
pub type Color = u32;

pub const WHITE: Color = 0xffffffff;
pub const BLACK: Color = 0x000000ff;
pub const RED: Color = 0xef4444ff;
pub const YELLOW: Color = 0xf5c542ff;
pub const CYAN: Color = 0x00ffffff;
pub const SLATE: Color = 0x475569ff;

/// One draw primitive; a frame is a `Vec<DrawCmd>` in paint order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Clear the whole surface
    Clear { color: Color },
    /// Axis-aligned filled rectangle
    Rect { min: Vec2, size: Vec2, color: Color },
    /// Filled circle
    Circle { center: Vec2, radius: f32, color: Color },
    /// Stroked circle outline
    Ring { center: Vec2, radius: f32, color: Color },
    /// Stroked axis-aligned ellipse
    Ellipse { center: Vec2, rx: f32, ry: f32, color: Color },
    /// Stroked open polyline with a width (track paths, skid marks)
    Polyline { points: Vec<Vec2>, width: f32, color: Color },
    /// HUD text
    Text { pos: Vec2, text: String, color: Color },
}

/// A full frame in paint order
pub type Frame = Vec<DrawCmd>;
