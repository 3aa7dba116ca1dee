//! Combo chain tracking
//!
//! Consecutive trigger events within the timeout window extend the chain;
//! a gap of the full window or more resets it to 1.

/// Chain counter over a fixed timeout window
#[derive(Debug, Clone)]
pub struct ComboTracker {
    timeout_ms: u64,
    last_event_ms: Option<u64>,
    count: u32,
}

impl ComboTracker {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            last_event_ms: None,
            count: 0,
        }
    }

    /// Register a trigger event at `now_ms`; returns the chain length
    /// including this event
    pub fn trigger(&mut self, now_ms: u64) -> u32 {
        let chained = self
            .last_event_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.timeout_ms);
        self.count = if chained { self.count + 1 } else { 1 };
        self.last_event_ms = Some(now_ms);
        self.count
    }

    /// Current chain length (0 before the first event)
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Clear all state at session start
    pub fn reset(&mut self) {
        self.last_event_ms = None;
        self.count = 0;
    }
}
