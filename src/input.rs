//! Input snapshots
//!
//! Key/pointer events are captured asynchronously by the host and folded into
//! a snapshot that the tick reads without mutation. Most recent state wins;
//! ordering within a frame is not a contract.

use glam::Vec2;

/// Logical keys shared across the prototypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Jump,
    Drift,
    Charge,
    Whistle,
    Reset,
}

const KEY_COUNT: usize = 9;

/// Immutable-per-tick view of input state
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    keys: [bool; KEY_COUNT],
    /// Pointer position in canvas coordinates
    pub pointer: Vec2,
    /// Primary button went down this frame (one-shot, host clears after tick)
    pub pointer_pressed: bool,
    /// Primary button is currently held
    pub pointer_held: bool,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a logical key is currently held
    #[inline]
    pub fn held(&self, key: Key) -> bool {
        self.keys[key as usize]
    }

    /// Record a key transition (host side, between ticks)
    pub fn set_key(&mut self, key: Key, down: bool) {
        self.keys[key as usize] = down;
    }

    /// Horizontal axis from left/right keys: -1, 0, or 1
    pub fn steer_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.held(Key::Left) {
            axis -= 1.0;
        }
        if self.held(Key::Right) {
            axis += 1.0;
        }
        axis
    }

    /// Vertical axis from up/down keys: -1, 0, or 1 (up is negative, screen coords)
    pub fn thrust_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.held(Key::Up) {
            axis -= 1.0;
        }
        if self.held(Key::Down) {
            axis += 1.0;
        }
        axis
    }

    /// Clear one-shot edges after a tick has consumed them
    pub fn clear_edges(&mut self) {
        self.pointer_pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes() {
        let mut input = InputSnapshot::new();
        assert_eq!(input.steer_axis(), 0.0);
        input.set_key(Key::Left, true);
        assert_eq!(input.steer_axis(), -1.0);
        input.set_key(Key::Right, true);
        assert_eq!(input.steer_axis(), 0.0);
        input.set_key(Key::Up, true);
        assert_eq!(input.thrust_axis(), -1.0);
    }

    #[test]
    fn test_edge_clear() {
        let mut input = InputSnapshot::new();
        input.pointer_pressed = true;
        input.pointer_held = true;
        input.clear_edges();
        assert!(!input.pointer_pressed);
        assert!(input.pointer_held);
    }
}
