//! Monotonic Tick Sources
//!
//! The clock engine measures elapsed real time against a free-running
//! millisecond counter, never against the wall clock it maintains. This
//! module provides the `TickSource` abstraction over that counter and the
//! wrap-safe arithmetic for it.
//!
//! ## Rollover
//!
//! The counter is a fixed-width `u32`, matching the millisecond tick of
//! common MCU runtimes, and wraps after about 49.7 days of uptime. All
//! elapsed-time computations in this crate go through [`elapsed_ticks`],
//! which is exact across a single wrap. The engine additionally forces a
//! resync when it observes a wrap, because the drift baseline recorded at
//! the last sync is no longer trustworthy across it.
//!
//! ## Common Implementations
//!
//! - `SystemTicks`: host clock, `Instant`-based (requires `std`)
//! - `FixedTicks`: manually advanced, for deterministic tests
//! - On bare metal: implement `TickSource` over a hardware timer

use core::cell::Cell;

/// Monotonic tick count in milliseconds since boot. Wraps at `u32::MAX`.
pub type Ticks = u32;

/// Elapsed milliseconds between two tick readings, exact across one wrap.
///
/// For `now < last` this equals `(u32::MAX - last) + now + 1`, which is
/// precisely what two's-complement wrapping subtraction computes.
#[inline]
pub fn elapsed_ticks(last: Ticks, now: Ticks) -> u32 {
    now.wrapping_sub(last)
}

/// True if the counter wrapped between the two readings.
///
/// Only valid when less than one full wrap period (~49.7 days) separates
/// the readings; a double wrap is indistinguishable by construction.
#[inline]
pub fn ticks_wrapped(last: Ticks, now: Ticks) -> bool {
    now < last
}

/// Source of monotonic milliseconds for the clock engine
///
/// ## Implementation Requirements
///
/// - `ticks()` must never go backwards except by wrapping at `u32::MAX`
/// - Precision of 1ms is assumed; coarser sources degrade second accuracy
/// - Implementations must be cheap: `ticks()` is called on every engine
///   tick, many times per second
pub trait TickSource {
    /// Current tick count in milliseconds since boot.
    fn ticks(&self) -> Ticks;

    /// Spin until `ms` milliseconds have elapsed on this source.
    ///
    /// Used only inside the bounded fetch/alignment loops of
    /// `ClockEngine::synchronize`; everything else is non-blocking.
    /// Sources that do not advance on their own (test doubles) must
    /// override this to step their counter instead of spinning.
    fn busy_wait(&self, ms: u32) {
        let start = self.ticks();
        while elapsed_ticks(start, self.ticks()) < ms {
            core::hint::spin_loop();
        }
    }
}

/// Host tick source backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTicks {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemTicks {
    /// Create a tick source starting at zero now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TickSource for SystemTicks {
    fn ticks(&self) -> Ticks {
        // Truncation to u32 reproduces the MCU counter's wrap behavior.
        self.origin.elapsed().as_millis() as Ticks
    }
}

/// Manually driven tick source for deterministic tests
///
/// Interior mutability lets tests advance time while the engine holds the
/// source: `engine.tick_source().advance(1000)`.
#[derive(Debug)]
pub struct FixedTicks {
    now: Cell<Ticks>,
}

impl FixedTicks {
    /// Create a fixed source at the given tick count.
    pub fn new(now: Ticks) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Set the counter to an absolute value (may wrap past `u32::MAX`
    /// only via [`advance`](Self::advance)).
    pub fn set(&self, now: Ticks) {
        self.now.set(now);
    }

    /// Advance the counter by `ms`, wrapping like the real counter.
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl TickSource for FixedTicks {
    fn ticks(&self) -> Ticks {
        self.now.get()
    }

    fn busy_wait(&self, ms: u32) {
        // A fixed source never advances on its own; step it directly.
        self.advance(ms);
    }
}
