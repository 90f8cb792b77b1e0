//! Time and Cadence Constants
//!
//! This module defines the unit conversions, validity floors, and timing
//! parameters used by the clock engine and the sync scheduler.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u32 = 1000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Minutes per hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Hours per day.
pub const HOURS_PER_DAY: u32 = 24;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: u32 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR;

/// Seconds per day.
pub const SECONDS_PER_DAY: i64 = SECONDS_PER_HOUR as i64 * HOURS_PER_DAY as i64;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = MS_PER_SECOND as u64 * SECONDS_PER_HOUR as u64;

// ===== EPOCH VALIDITY =====

/// Minimum epoch value accepted from a network time source (seconds).
///
/// An SNTP peer that has not itself synchronized reports a counter close
/// to zero. Anything within the first day of the epoch is treated as
/// "source not ready", never as a real time.
pub const MIN_VALID_EPOCH: u32 = SECONDS_PER_DAY as u32;

// ===== NETWORK FETCH =====

/// Maximum fetch attempts per synchronization before reporting failure.
pub const FETCH_MAX_ATTEMPTS: u32 = 10;

/// Pause between fetch attempts (milliseconds).
pub const FETCH_POLL_MS: u32 = 500;

// ===== SECOND-EDGE ALIGNMENT =====

/// Skip alignment when the reading is within this many seconds of the
/// next minute boundary. Polling across the source's own minute rollover
/// races against it for no accuracy gain.
pub const ALIGN_BOUNDARY_GUARD_SECS: u32 = 2;

/// Sub-second phase (1/256ths of a second) at or below which a reading is
/// treated as already sitting on a second edge, making alignment pointless.
pub const ALIGN_PHASE_SLACK: u8 = 3;

/// Maximum alignment polls per synchronization.
///
/// Together with [`ALIGN_POLL_MS`] this bounds the alignment wait at
/// roughly 1.2 seconds, slightly more than one full second of the source.
pub const ALIGN_MAX_POLLS: u32 = 60;

/// Pause between alignment polls (milliseconds).
pub const ALIGN_POLL_MS: u32 = 20;

// ===== DRIFT ESTIMATION =====

/// Minimum epoch seconds between syncs before a drift sample is taken.
///
/// Below this baseline the network round-trip jitter dominates the
/// oscillator error and the sample would be noise.
pub const DRIFT_BASELINE_MIN_SECS: u32 = 300;

// ===== SYNC CADENCE =====

/// Default interval between scheduled synchronizations (milliseconds).
///
/// Ten minutes keeps the displayed time well inside one second of true
/// time for typical oscillator drift, without hammering the time source.
pub const SYNC_INTERVAL_MS: u32 = 600_000;

/// Retry delay after a failed synchronization (milliseconds).
pub const SYNC_RETRY_MS: u32 = 30_000;
