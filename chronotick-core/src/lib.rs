//! Drift-corrected wall clock engine for Chronotick
//!
//! Maintains a continuously advancing civil wall clock on devices whose
//! only time references are a wrapping millisecond counter and an
//! occasionally reachable network time source.
//!
//! Key constraints:
//! - Runs on small WiFi MCUs (ESP-class parts) without alloc
//! - Non-blocking: bounded waits only inside `synchronize()`
//! - Monotonic displayed time between syncs, drift-corrected
//!
//! ```
//! use chronotick_core::{
//!     ClockEngine, ClockError, EpochReading, FixedTicks, NetworkTimeSource,
//!     TimezoneConfig,
//! };
//!
//! struct Sntp {
//!     epoch: u32,
//! }
//!
//! impl NetworkTimeSource for Sntp {
//!     fn fetch_epoch(&mut self) -> nb::Result<EpochReading, ClockError> {
//!         Ok(EpochReading { secs: self.epoch, subsec: 0 })
//!     }
//! }
//!
//! let mut engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::new(-5.0, true));
//! assert!(engine.fields().is_none()); // not trustworthy before a sync
//!
//! let mut source = Sntp { epoch: 1_700_000_000 };
//! engine.synchronize(&mut source).expect("scripted source cannot fail");
//! assert!(engine.is_initialized());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod civil;
pub mod clock;
pub mod constants;
pub mod drift;
pub mod dst;
pub mod engine;
pub mod errors;
pub mod schedule;
pub mod source;
pub mod ticks;

// Public API
pub use civil::{CivilDateTime, Weekday};
pub use clock::{ClockFields, SyncState, TimezoneConfig};
pub use drift::DriftEstimator;
pub use engine::ClockEngine;
pub use errors::{ClockError, ClockResult};
pub use schedule::SyncScheduler;
pub use source::{EpochReading, NetworkTimeSource, ScriptedReply, ScriptedSource};
pub use ticks::{elapsed_ticks, FixedTicks, TickSource, Ticks};

#[cfg(feature = "std")]
pub use ticks::SystemTicks;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
