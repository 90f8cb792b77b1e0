//! Oscillator Drift Estimation
//!
//! The free-running tick counter is driven by a local oscillator that
//! runs slightly fast or slow relative to true time. Each successful
//! network sync yields one measurement of that rate: the ticks actually
//! elapsed since the previous sync versus the epoch seconds that truly
//! passed. Samples are blended 3:1 in favor of the newest one, so the
//! estimate adapts within a few syncs but a single noisy sample cannot
//! swing it by more than three quarters of its own error.

use crate::constants::{DRIFT_BASELINE_MIN_SECS, MS_PER_HOUR, SECONDS_PER_HOUR};

/// Smoothed estimate of tick-source drift.
///
/// Positive rates mean the tick source runs fast (accumulates more
/// milliseconds than real time); the engine subtracts the owed
/// correction from elapsed ticks before advancing the clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriftEstimator {
    ms_per_hour: i32,
}

impl DriftEstimator {
    /// New estimator with zero assumed drift.
    pub const fn new() -> Self {
        Self { ms_per_hour: 0 }
    }

    /// Current drift rate in milliseconds per hour.
    pub fn ms_per_hour(&self) -> i32 {
        self.ms_per_hour
    }

    /// Blend in one measurement spanning `expected_secs` of epoch time
    /// over which `actual_ticks_ms` ticks elapsed.
    ///
    /// Returns `false` (sample ignored) when the baseline is shorter than
    /// [`DRIFT_BASELINE_MIN_SECS`]; short spans are dominated by network
    /// round-trip jitter, not oscillator error.
    pub fn observe(&mut self, expected_secs: u32, actual_ticks_ms: u32) -> bool {
        if expected_secs < DRIFT_BASELINE_MIN_SECS {
            return false;
        }

        let error_ms = actual_ticks_ms as i64 - expected_secs as i64 * 1000;
        let sample = error_ms * SECONDS_PER_HOUR as i64 / expected_secs as i64;

        let blended = (3 * sample + self.ms_per_hour as i64) / 4;
        self.ms_per_hour = blended.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        true
    }

    /// Correction owed over `elapsed_ms` of tick time at the current
    /// rate, in milliseconds. Sign follows the rate.
    pub fn correction_ms(&self, elapsed_ms: u32) -> i64 {
        self.ms_per_hour as i64 * elapsed_ms as i64 / MS_PER_HOUR as i64
    }
}
