//! Sync Cadence Scheduler
//!
//! The engine exposes `synchronize()` as a single-shot fallible call;
//! this scheduler owns *when* to make that call. Default cadence: sync
//! immediately at boot, every ten minutes while healthy, thirty seconds
//! after a failure, and immediately whenever the engine pends a resync
//! (midnight, rollover, timezone change).
//!
//! The scheduler never touches the network itself - the firmware loop
//! checks connectivity, asks [`SyncScheduler::due`], runs the sync, and
//! reports the outcome back.

use crate::constants::{SYNC_INTERVAL_MS, SYNC_RETRY_MS};
use crate::ticks::{elapsed_ticks, Ticks};

/// Decides when the next synchronization attempt is owed.
#[derive(Debug, Clone)]
pub struct SyncScheduler {
    interval_ms: u32,
    retry_ms: u32,
    last_attempt: Option<Ticks>,
    last_failed: bool,
}

impl SyncScheduler {
    /// Scheduler with the default cadence (10 min periodic, 30 s retry).
    pub fn new() -> Self {
        Self::with_intervals(SYNC_INTERVAL_MS, SYNC_RETRY_MS)
    }

    /// Scheduler with a custom periodic interval and retry delay, both
    /// in milliseconds.
    pub fn with_intervals(interval_ms: u32, retry_ms: u32) -> Self {
        Self {
            interval_ms,
            retry_ms,
            last_attempt: None,
            last_failed: false,
        }
    }

    /// Is a sync attempt due at tick count `now`?
    ///
    /// `forced` is the engine's `needs_resync()`; it short-circuits the
    /// cadence. Before any attempt has been made the answer is always
    /// yes (boot sync). Wrap-safe across the tick counter rollover.
    pub fn due(&self, now: Ticks, forced: bool) -> bool {
        if forced {
            return true;
        }
        match self.last_attempt {
            None => true,
            Some(at) => {
                let since = elapsed_ticks(at, now);
                let wait = if self.last_failed { self.retry_ms } else { self.interval_ms };
                since >= wait
            }
        }
    }

    /// Record a successful sync finished at `now`.
    pub fn record_success(&mut self, now: Ticks) {
        self.last_attempt = Some(now);
        self.last_failed = false;
    }

    /// Record a failed sync attempt at `now`; the next attempt is owed
    /// after the (shorter) retry delay.
    pub fn record_failure(&mut self, now: Ticks) {
        self.last_attempt = Some(now);
        self.last_failed = true;
    }
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}
