//! Per-game sessions
//!
//! Each prototype is a thin composition over the shared `sim` primitives: an
//! explicit session object owns all mutable state, `tick` advances it with a
//! pure state update, and `render` emits a frame from the post-tick state.

pub mod breakout;
pub mod kart;
pub mod nearpin;
pub mod platformer;
pub mod race;
pub mod smash;
pub mod swarm;

use crate::input::InputSnapshot;
use crate::render::Frame;

/// Common surface for the demo runner
pub trait Session {
    /// Advance one fixed timestep
    fn tick(&mut self, input: &InputSnapshot);
    /// Emit the current frame (background → geometry → actors → particles → HUD)
    fn render(&self) -> Frame;
    /// Whether the session reached a terminal state
    fn over(&self) -> bool;
    /// One-line outcome summary for logs
    fn summary(&self) -> String;
}
