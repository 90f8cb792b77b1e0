//! Wall Clock State
//!
//! The wall clock is the authoritative civil-time state for the display:
//! hour/minute/second plus calendar fields, a validity flag, and the
//! bookkeeping marks the engine needs between syncs. It is mutated only
//! by the engine's sync and tick operations; readers get a [`ClockFields`]
//! snapshot and never a live reference.

use crate::civil::{CivilDateTime, Weekday};
use crate::ticks::Ticks;

/// Lifecycle of the clock engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No successful sync yet; displayed fields must not be trusted.
    Uninitialized,
    /// Synced and advancing locally between syncs.
    Tracking,
    /// A resync is owed (midnight crossover, counter rollover, or a
    /// timezone change); local advance continues meanwhile and the date
    /// fields are known-stale until a sync lands.
    PendingResync,
}

/// Timezone configuration supplied by the persisted config store.
///
/// Validation is the store's responsibility; the constructor still clamps
/// to the representable range so a corrupt value can never put the engine
/// outside civil-time invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimezoneConfig {
    utc_offset_hours: f32,
    dst_enabled: bool,
}

impl TimezoneConfig {
    /// Create a config, clamping the offset to `[-12.0, 14.0]` and
    /// mapping non-finite values to UTC.
    pub fn new(utc_offset_hours: f32, dst_enabled: bool) -> Self {
        let offset = if utc_offset_hours.is_finite() {
            utc_offset_hours.clamp(-12.0, 14.0)
        } else {
            0.0
        };
        Self {
            utc_offset_hours: offset,
            dst_enabled,
        }
    }

    /// UTC offset in hours; fractional values express half/quarter-hour
    /// zones.
    pub fn utc_offset_hours(&self) -> f32 {
        self.utc_offset_hours
    }

    /// Whether the user enabled daylight saving adjustment.
    pub fn dst_enabled(&self) -> bool {
        self.dst_enabled
    }
}

impl Default for TimezoneConfig {
    /// UTC, no daylight saving.
    fn default() -> Self {
        Self {
            utc_offset_hours: 0.0,
            dst_enabled: false,
        }
    }
}

/// Read-only snapshot of the wall clock for the display readout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockFields {
    /// Hour of day, 0-23, local civil time
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// Month, 1-12
    pub month: u8,
    /// Full year
    pub year: u16,
    /// Day of week, consistent with the date fields as of the last sync
    pub weekday: Weekday,
    /// The UTC offset the fields were computed under
    pub utc_offset_hours: f32,
}

/// Authoritative wall-clock state owned by the clock engine. Readers
/// never see it directly; they get a [`ClockFields`] snapshot.
#[derive(Debug, Clone)]
pub(crate) struct WallClock {
    pub(crate) hour: u8,
    pub(crate) minute: u8,
    pub(crate) second: u8,
    pub(crate) day: u8,
    pub(crate) month: u8,
    pub(crate) year: u16,
    pub(crate) weekday: Weekday,
    pub(crate) initialized: bool,
    /// Tick count at the most recent successful sync.
    pub(crate) last_sync_ticks: Ticks,
    /// UTC epoch seconds at that sync.
    pub(crate) last_sync_epoch: u32,
    /// Tick count at which `second` was last advanced.
    pub(crate) last_tick_mark: Ticks,
}

impl WallClock {
    /// An uninitialized clock; fields hold placeholder values until the
    /// first successful sync.
    pub(crate) const fn new() -> Self {
        Self {
            hour: 0,
            minute: 0,
            second: 0,
            day: 1,
            month: 1,
            year: 1970,
            weekday: Weekday::Thursday,
            initialized: false,
            last_sync_ticks: 0,
            last_sync_epoch: 0,
            last_tick_mark: 0,
        }
    }

    /// Install the civil fields of a fresh sync and mark the clock valid.
    pub(crate) fn store_sync(&mut self, civil: &CivilDateTime, utc_epoch: u32, mark: Ticks) {
        self.hour = civil.hour;
        self.minute = civil.minute;
        self.second = civil.second;
        self.day = civil.day;
        self.month = civil.month;
        self.year = civil.year;
        self.weekday = civil.weekday;
        self.initialized = true;
        self.last_sync_ticks = mark;
        self.last_sync_epoch = utc_epoch;
        self.last_tick_mark = mark;
    }

    /// Snapshot for the readout, stamped with the offset in effect.
    pub(crate) fn snapshot(&self, utc_offset_hours: f32) -> ClockFields {
        ClockFields {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            day: self.day,
            month: self.month,
            year: self.year,
            weekday: self.weekday,
            utc_offset_hours,
        }
    }
}
