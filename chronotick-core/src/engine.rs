//! Clock Engine
//!
//! Owns the wall clock and everything that moves it: network
//! synchronization with precise second-edge alignment, drift-corrected
//! local advance between syncs, timezone and US-DST application, and the
//! resync triggers (midnight crossover, tick-counter rollover, timezone
//! change).
//!
//! ## Cooperative model
//!
//! The engine is single-context: one firmware loop calls [`tick`] every
//! display iteration and [`synchronize`] when the scheduler says a sync
//! is due and connectivity is up. Nothing here blocks unboundedly - the
//! only waits are the fetch/alignment loops inside `synchronize`, both
//! capped by constants. If ported to a threaded host, wrap the engine in
//! a mutex; mutation and readout must not interleave.
//!
//! [`tick`]: ClockEngine::tick
//! [`synchronize`]: ClockEngine::synchronize

use crate::civil::CivilDateTime;
use crate::clock::{ClockFields, SyncState, TimezoneConfig, WallClock};
use crate::constants::{
    ALIGN_BOUNDARY_GUARD_SECS, ALIGN_MAX_POLLS, ALIGN_PHASE_SLACK, ALIGN_POLL_MS,
    FETCH_MAX_ATTEMPTS, FETCH_POLL_MS, HOURS_PER_DAY, MINUTES_PER_HOUR, MIN_VALID_EPOCH,
    MS_PER_SECOND, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use crate::drift::DriftEstimator;
use crate::dst;
use crate::errors::{ClockError, ClockResult};
use crate::source::{EpochReading, NetworkTimeSource};
use crate::ticks::{elapsed_ticks, ticks_wrapped, TickSource, Ticks};

// Optional logging
#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Drift-corrected wall clock engine.
///
/// Generic over the monotonic [`TickSource`] it measures elapsed time
/// against; the network time source is passed per call because the
/// surrounding firmware owns connectivity and retry cadence.
pub struct ClockEngine<C: TickSource> {
    ticks: C,
    wall: WallClock,
    drift: DriftEstimator,
    tz: TimezoneConfig,
    state: SyncState,
    /// The counter wrapped since the last sync; the drift baseline is
    /// unusable until a fresh sync re-anchors it.
    rollover_since_sync: bool,
}

impl<C: TickSource> ClockEngine<C> {
    /// Create an uninitialized engine.
    ///
    /// The wall clock reports not-ready until the first successful
    /// [`synchronize`](Self::synchronize).
    pub fn new(ticks: C, tz: TimezoneConfig) -> Self {
        Self {
            ticks,
            wall: WallClock::new(),
            drift: DriftEstimator::new(),
            tz,
            state: SyncState::Uninitialized,
            rollover_since_sync: false,
        }
    }

    /// True once a sync has succeeded and the fields are trustworthy.
    pub fn is_initialized(&self) -> bool {
        self.wall.initialized
    }

    /// Read-only snapshot for the display, `None` until initialized.
    pub fn fields(&self) -> Option<ClockFields> {
        if self.wall.initialized {
            Some(self.wall.snapshot(self.tz.utc_offset_hours()))
        } else {
            None
        }
    }

    /// Current lifecycle state.
    pub fn sync_state(&self) -> SyncState {
        self.state
    }

    /// True when the engine owes itself a resync (midnight crossover,
    /// counter rollover, or a timezone change). The scheduler should
    /// treat this as "sync at the next connectivity window".
    pub fn needs_resync(&self) -> bool {
        self.state != SyncState::Tracking
    }

    /// Smoothed drift estimate, milliseconds per hour. Positive means
    /// the tick source runs fast.
    pub fn drift_ms_per_hour(&self) -> i32 {
        self.drift.ms_per_hour()
    }

    /// UTC epoch of the most recent successful sync, for diagnostics.
    pub fn last_sync_epoch(&self) -> Option<u32> {
        if self.wall.initialized {
            Some(self.wall.last_sync_epoch)
        } else {
            None
        }
    }

    /// Timezone configuration currently in effect.
    pub fn timezone(&self) -> TimezoneConfig {
        self.tz
    }

    /// The tick source the engine measures against.
    pub fn tick_source(&self) -> &C {
        &self.ticks
    }

    /// Acquire a fresh UTC reading and rebuild the wall clock from it.
    ///
    /// On any failure the wall clock is left exactly as it was; the
    /// caller retries at its next scheduled opportunity. Connectivity is
    /// the caller's concern - call this only when the network is up.
    ///
    /// Known limitation inherited from the display firmware this engine
    /// was built for: the DST hour is only ever applied when the
    /// configured offset is negative, a geographic proxy for "US
    /// timezone". Behavior for non-US negative-offset zones with
    /// `dst_enabled` is an approximation.
    pub fn synchronize(&mut self, source: &mut dyn NetworkTimeSource) -> ClockResult<()> {
        let base = self.fetch_valid_epoch(source)?;
        let (reading, mark) = self.acquire_second_edge(source, base);

        // Drift sample against the previous sync, when the baseline is
        // usable (no rollover in between, source moving forward).
        if self.wall.initialized
            && !self.rollover_since_sync
            && reading.secs >= self.wall.last_sync_epoch
        {
            let expected = reading.secs - self.wall.last_sync_epoch;
            let actual = elapsed_ticks(self.wall.last_sync_ticks, mark);
            if self.drift.observe(expected, actual) {
                log_debug!(
                    "drift estimate now {} ms/h over {}s baseline",
                    self.drift.ms_per_hour(),
                    expected
                );
            }
        }

        let local = self.local_epoch(reading.secs);
        let civil = CivilDateTime::from_epoch(local);
        self.wall.store_sync(&civil, reading.secs, mark);
        self.state = SyncState::Tracking;
        self.rollover_since_sync = false;

        log_info!(
            "time set: {:02}:{:02}:{:02} {} {} {}, {} (UTC{}{})",
            civil.hour,
            civil.minute,
            civil.second,
            civil.weekday.short_name(),
            crate::civil::month_short_name(civil.month),
            civil.day,
            civil.year,
            if self.tz.utc_offset_hours() >= 0.0 { "+" } else { "" },
            self.tz.utc_offset_hours()
        );
        Ok(())
    }

    /// Advance the wall clock from the tick counter.
    ///
    /// Cheap no-op until a full second has elapsed; call at least every
    /// ~200ms for second accuracy, more often is harmless. Seconds,
    /// minutes and hours only ever move forward here - only a full
    /// [`synchronize`](Self::synchronize) may jump them.
    pub fn tick(&mut self) {
        if !self.wall.initialized {
            return;
        }

        let now = self.ticks.ticks();
        let last = self.wall.last_tick_mark;

        if ticks_wrapped(last, now) {
            // The drift baseline recorded at the last sync no longer
            // measures anything across the wrap.
            self.rollover_since_sync = true;
            if self.state == SyncState::Tracking {
                self.state = SyncState::PendingResync;
                log_warn!("tick counter rolled over; resync pending");
            }
        }

        let elapsed = elapsed_ticks(last, now);
        if elapsed < MS_PER_SECOND {
            return;
        }

        // Subtract the drift owed for this span, never below zero.
        let corrected = (elapsed as i64 - self.drift.correction_ms(elapsed))
            .clamp(0, u32::MAX as i64) as u32;

        let seconds_to_add = corrected / MS_PER_SECOND;
        // Keep the sub-second remainder for the next call so fractions
        // of a second are never lost.
        self.wall.last_tick_mark = now.wrapping_sub(corrected % MS_PER_SECOND);

        if seconds_to_add > 0 {
            self.advance_civil(seconds_to_add);
        }
    }

    /// Swap in a new timezone without network: de-initializes the clock
    /// and pends a resync for the next connectivity window.
    pub fn set_timezone(&mut self, tz: TimezoneConfig) {
        self.tz = tz;
        self.wall.initialized = false;
        self.state = SyncState::Uninitialized;
    }

    /// Apply a user timezone change and immediately resync under it.
    ///
    /// All fields are recomputed from a fresh reading rather than
    /// reinterpreted incrementally; on failure the clock stays
    /// de-initialized and the display shows not-ready until a later
    /// sync lands.
    pub fn reset_for_new_timezone(
        &mut self,
        tz: TimezoneConfig,
        source: &mut dyn NetworkTimeSource,
    ) -> ClockResult<()> {
        self.set_timezone(tz);
        self.synchronize(source)
    }

    /// Bounded fetch loop: polls the source until it yields an epoch at
    /// or above the validity floor, waiting [`FETCH_POLL_MS`] between
    /// attempts, at most [`FETCH_MAX_ATTEMPTS`] times.
    fn fetch_valid_epoch(&self, source: &mut dyn NetworkTimeSource) -> ClockResult<EpochReading> {
        let mut last_invalid: Option<u32> = None;

        for attempt in 0..FETCH_MAX_ATTEMPTS {
            match source.fetch_epoch() {
                Ok(r) if r.secs >= MIN_VALID_EPOCH => return Ok(r),
                Ok(r) => {
                    // Source answered but is not itself synchronized yet.
                    last_invalid = Some(r.secs);
                }
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(e)) => return Err(e),
            }
            if attempt + 1 < FETCH_MAX_ATTEMPTS {
                self.ticks.busy_wait(FETCH_POLL_MS);
            }
        }

        match last_invalid {
            Some(secs) => Err(ClockError::EpochOutOfRange { secs }),
            None => Err(ClockError::SourceTimeout {
                attempts: FETCH_MAX_ATTEMPTS as u8,
            }),
        }
    }

    /// Pin the sync to a second edge of the source, removing up to ±1s
    /// of round-trip jitter.
    ///
    /// Polls until the source's second value changes and captures the
    /// tick count at that instant. Skipped when the reading sits within
    /// [`ALIGN_BOUNDARY_GUARD_SECS`] of the next minute boundary (racing
    /// the source's own rollover) or when its sub-second phase shows it
    /// already on an edge. If the bounded loop never sees an edge, the
    /// base reading and its entry-time mark are used as-is - ordinary
    /// jitter accepted.
    fn acquire_second_edge(
        &self,
        source: &mut dyn NetworkTimeSource,
        base: EpochReading,
    ) -> (EpochReading, Ticks) {
        let entry_mark = self.ticks.ticks();

        let second_of_minute = base.secs % SECONDS_PER_MINUTE;
        if second_of_minute >= SECONDS_PER_MINUTE - ALIGN_BOUNDARY_GUARD_SECS {
            return (base, entry_mark);
        }
        if base.subsec <= ALIGN_PHASE_SLACK {
            return (base, entry_mark);
        }

        for _ in 0..ALIGN_MAX_POLLS {
            self.ticks.busy_wait(ALIGN_POLL_MS);
            match source.fetch_epoch() {
                Ok(r) if r.secs != base.secs && r.secs >= MIN_VALID_EPOCH => {
                    return (r, self.ticks.ticks());
                }
                Ok(_) => {}
                Err(nb::Error::WouldBlock) => {}
                // A hard failure mid-alignment is not a sync failure; we
                // already hold a valid reading.
                Err(nb::Error::Other(_)) => break,
            }
        }

        (base, entry_mark)
    }

    /// Epoch of the local civil instant for a UTC reading: timezone
    /// offset plus the DST hour when the US rule (evaluated on the UTC
    /// calendar date) applies.
    fn local_epoch(&self, utc_secs: u32) -> i64 {
        let offset_secs = libm::roundf(self.tz.utc_offset_hours() * 3600.0) as i64;
        let mut local = utc_secs as i64 + offset_secs;

        if self.tz.dst_enabled() && self.tz.utc_offset_hours() < 0.0 {
            let utc = CivilDateTime::from_epoch(utc_secs as i64);
            if dst::applies_dst(utc.month, utc.day, utc.weekday) {
                local += SECONDS_PER_HOUR as i64;
            }
        }
        local
    }

    /// Standard 60/60/24 carry. Date fields are never advanced locally;
    /// their correctness across midnight depends on the pending resync.
    fn advance_civil(&mut self, seconds: u32) {
        let total_seconds = self.wall.second as u32 + seconds;
        self.wall.second = (total_seconds % SECONDS_PER_MINUTE) as u8;

        let total_minutes = self.wall.minute as u32 + total_seconds / SECONDS_PER_MINUTE;
        self.wall.minute = (total_minutes % MINUTES_PER_HOUR) as u8;

        let carried_hours = total_minutes / MINUTES_PER_HOUR;
        let total_hours = self.wall.hour as u32 + carried_hours;

        if carried_hours > 0 {
            log_debug!("local time now {:02}:{:02}", total_hours % HOURS_PER_DAY, self.wall.minute);
        }

        if total_hours >= HOURS_PER_DAY {
            // Local arithmetic never touches the date; a sync must.
            self.state = SyncState::PendingResync;
            log_info!("midnight crossed; resync pending for date fields");
        }
        self.wall.hour = (total_hours % HOURS_PER_DAY) as u8;
    }
}
