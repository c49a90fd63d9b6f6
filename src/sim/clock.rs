//! Fixed-timestep frame clock
//!
//! Banks wall-clock time and hands out whole simulation frames.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Accumulator turning variable display frames into fixed `SIM_DT` ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank `dt` seconds and return how many ticks to run now
    ///
    /// At most `MAX_SUBSTEPS` per call. Leftover time is capped at the same
    /// amount, so a slow stretch never turns into a long fast-forward.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }

        self.accumulator = self.accumulator.min(SIM_DT * MAX_SUBSTEPS as f32);
        steps
    }

    /// Drop any banked time (after the page was hidden)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Banked time not yet simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}
