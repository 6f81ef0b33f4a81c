//! Fixed-timestep driver: turns variable frame times into whole simulation ticks.

use bitflags::bitflags;
use tracing::warn;

use crate::constants::{MAX_FRAME_DELTA, STARVATION_THRESHOLD};

/// Accumulator residue below this is treated as exactly zero.
const RESIDUE_EPSILON: f64 = 1e-9;

bitflags! {
    /// Diagnostics that have already been logged once.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    struct Warned: u8 {
        const INVALID_DELTA = 1 << 0;
        const STARVATION = 1 << 1;
        const CLAMPED = 1 << 2;
    }
}

/// Read-only counters for debug overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestepStats {
    /// Ticks run by the most recent [`FixedTimestep::update`].
    pub steps_last_update: u32,
    /// Unsimulated time left over, in seconds.
    pub accumulator: f64,
    /// Consecutive updates that ran no tick at all.
    pub starved_updates: u32,
    pub total_steps: u64,
}

/// Accumulates real elapsed time and runs a fixed-size tick callback for each whole tick.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick: f64,
    max_frame: f64,
    accumulator: f64,
    steps_last_update: u32,
    starved_updates: u32,
    starvation_threshold: u32,
    total_steps: u64,
    warned: Warned,
}

impl FixedTimestep {
    /// A driver running `tick`-second steps with the default frame clamp and starvation threshold.
    pub fn new(tick: f64) -> Self {
        Self::with_limits(tick, MAX_FRAME_DELTA, STARVATION_THRESHOLD)
    }

    pub fn with_limits(tick: f64, max_frame: f64, starvation_threshold: u32) -> Self {
        debug_assert!(tick.is_finite() && tick > 0.0, "tick must be positive, got {tick}");
        Self {
            tick,
            max_frame,
            accumulator: 0.0,
            steps_last_update: 0,
            starved_updates: 0,
            starvation_threshold,
            total_steps: 0,
            warned: Warned::empty(),
        }
    }

    pub fn tick(&self) -> f64 {
        self.tick
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn stats(&self) -> TimestepStats {
        TimestepStats {
            steps_last_update: self.steps_last_update,
            accumulator: self.accumulator,
            starved_updates: self.starved_updates,
            total_steps: self.total_steps,
        }
    }

    /// Drops any unsimulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.starved_updates = 0;
    }

    /// Feeds `real_dt` seconds of wall time and calls `step` once per whole tick.
    ///
    /// Non-finite or negative input is ignored. Frames longer than the clamp only
    /// contribute the clamp. Returns the number of ticks run.
    pub fn update<F: FnMut()>(&mut self, real_dt: f64, mut step: F) -> u32 {
        if !real_dt.is_finite() || real_dt < 0.0 {
            if !self.warned.contains(Warned::INVALID_DELTA) {
                self.warned.insert(Warned::INVALID_DELTA);
                warn!(real_dt, "Ignoring non-finite or negative frame delta");
            }
            self.steps_last_update = 0;
            return 0;
        }

        if real_dt > self.max_frame && !self.warned.contains(Warned::CLAMPED) {
            self.warned.insert(Warned::CLAMPED);
            warn!(real_dt, max = self.max_frame, "Frame delta clamped, simulation will fall behind real time");
        }
        self.accumulator += real_dt.min(self.max_frame);

        let mut steps = 0;
        while self.accumulator + RESIDUE_EPSILON >= self.tick {
            step();
            self.accumulator -= self.tick;
            steps += 1;
        }
        if self.accumulator.abs() < RESIDUE_EPSILON {
            self.accumulator = 0.0;
        }

        self.steps_last_update = steps;
        self.total_steps += u64::from(steps);
        if steps == 0 {
            self.starved_updates = self.starved_updates.saturating_add(1);
            if self.starved_updates >= self.starvation_threshold && !self.warned.contains(Warned::STARVATION) {
                self.warned.insert(Warned::STARVATION);
                warn!(
                    updates = self.starved_updates,
                    accumulator = self.accumulator,
                    "No simulation tick has run for many updates; frame delta may be in the wrong unit"
                );
            }
        } else {
            self.starved_updates = 0;
            self.warned.remove(Warned::STARVATION);
        }
        steps
    }
}
