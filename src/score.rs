//! Session timing, lap tracking, and rank thresholds
//!
//! All timing is derived from the tick counter, never the wall clock, so the
//! whole session replays deterministically from a seed and an input script.

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;

/// Milliseconds elapsed for a given tick count
#[inline]
pub fn ticks_to_ms(ticks: u64) -> u64 {
    (ticks as f64 * SIM_DT as f64 * 1000.0) as u64
}

/// Monotonic session clock, armed by the first meaningful input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionClock {
    started_at_tick: Option<u64>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the clock on first meaningful input; later calls are no-ops
    pub fn start(&mut self, tick: u64) {
        if self.started_at_tick.is_none() {
            self.started_at_tick = Some(tick);
        }
    }

    pub fn running(&self) -> bool {
        self.started_at_tick.is_some()
    }

    /// Elapsed time in ms at `tick`; 0 before the clock is armed
    pub fn elapsed_ms(&self, tick: u64) -> u64 {
        self.started_at_tick
            .map(|start| ticks_to_ms(tick.saturating_sub(start)))
            .unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.started_at_tick = None;
    }
}

/// Lap counting gated by a mid-track checkpoint
///
/// The checkpoint must be crossed before the start line counts as a lap,
/// preventing back-and-forth line farming.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LapTimer {
    lap_start_ms: u64,
    checkpoint_reached: bool,
    laps_completed: u32,
    best_lap_ms: Option<u64>,
}

impl LapTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mid-track checkpoint crossing
    pub fn cross_checkpoint(&mut self) {
        self.checkpoint_reached = true;
    }

    /// Register a start-line crossing. Returns the completed lap time when
    /// the checkpoint was reached first, recording the best-lap minimum.
    pub fn cross_start(&mut self, now_ms: u64) -> Option<u64> {
        if !self.checkpoint_reached {
            return None;
        }
        let lap_ms = now_ms.saturating_sub(self.lap_start_ms);
        self.best_lap_ms = Some(self.best_lap_ms.map_or(lap_ms, |best| best.min(lap_ms)));
        self.lap_start_ms = now_ms;
        self.checkpoint_reached = false;
        self.laps_completed += 1;
        Some(lap_ms)
    }

    pub fn laps_completed(&self) -> u32 {
        self.laps_completed
    }

    pub fn best_lap_ms(&self) -> Option<u64> {
        self.best_lap_ms
    }

    pub fn checkpoint_reached(&self) -> bool {
        self.checkpoint_reached
    }
}

/// Ordered threshold table mapping a lower-is-better value to a rank label
///
/// The value earns the first tier whose threshold it beats; values past every
/// threshold earn the fallback. Thresholds must be strictly increasing, which
/// makes the mapping monotonic: a strictly better value never earns a
/// strictly worse rank.
#[derive(Debug, Clone)]
pub struct RankTable {
    tiers: Vec<(f32, &'static str)>,
    fallback: &'static str,
}

impl RankTable {
    pub fn new(tiers: Vec<(f32, &'static str)>, fallback: &'static str) -> Self {
        debug_assert!(
            tiers.windows(2).all(|w| w[0].0 < w[1].0),
            "rank thresholds must be strictly increasing"
        );
        Self { tiers, fallback }
    }

    /// Day7 race ranks: total time in ms
    pub fn race_times() -> Self {
        Self::new(
            vec![(20_000.0, "S"), (25_000.0, "A"), (30_000.0, "B")],
            "C",
        )
    }

    /// Day9 near-pin tiers: final distance from the pin in meters
    pub fn pin_distance() -> Self {
        Self::new(vec![(1.0, "PERFECT!!"), (5.0, "SO CLOSE!")], "TRY AGAIN")
    }

    /// Rank label for a value
    pub fn rank(&self, value: f32) -> &'static str {
        for &(threshold, label) in &self.tiers {
            if value < threshold {
                return label;
            }
        }
        self.fallback
    }

    /// Tier index for a value (0 = best); used to compare ranks
    pub fn tier_index(&self, value: f32) -> usize {
        self.tiers
            .iter()
            .position(|&(threshold, _)| value < threshold)
            .unwrap_or(self.tiers.len())
    }
}

/// Format milliseconds as `mm:ss.cc`
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let centis = (ms % 1000) / 10;
    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_arms_once() {
        let mut clock = SessionClock::new();
        assert_eq!(clock.elapsed_ms(100), 0);
        clock.start(60);
        clock.start(120); // ignored
        assert_eq!(clock.elapsed_ms(120), 1000);
    }

    #[test]
    fn test_lap_requires_checkpoint() {
        let mut laps = LapTimer::new();
        assert_eq!(laps.cross_start(5000), None);
        laps.cross_checkpoint();
        assert_eq!(laps.cross_start(12_000), Some(12_000));
        // Checkpoint flag consumed by the lap
        assert_eq!(laps.cross_start(13_000), None);
    }

    #[test]
    fn test_best_lap_is_minimum() {
        let mut laps = LapTimer::new();
        laps.cross_checkpoint();
        laps.cross_start(12_000);
        laps.cross_checkpoint();
        laps.cross_start(21_000); // 9s lap
        laps.cross_checkpoint();
        laps.cross_start(35_000); // 14s lap
        assert_eq!(laps.best_lap_ms(), Some(9_000));
        assert_eq!(laps.laps_completed(), 3);
    }

    #[test]
    fn test_race_ranks() {
        let table = RankTable::race_times();
        assert_eq!(table.rank(18_000.0), "S");
        assert_eq!(table.rank(20_000.0), "A");
        assert_eq!(table.rank(29_999.0), "B");
        assert_eq!(table.rank(31_000.0), "C");
    }

    #[test]
    fn test_rank_monotonic() {
        let table = RankTable::race_times();
        let mut prev_tier = 0;
        for ms in (0..40_000).step_by(500) {
            let tier = table.tier_index(ms as f32);
            assert!(tier >= prev_tier);
            prev_tier = tier;
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00.00");
        assert_eq!(format_time(61_230), "01:01.23");
    }
}
