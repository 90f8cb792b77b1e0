//! Error Types for Clock Engine Operations
//!
//! Errors are designed for the same constraints as the rest of the crate:
//!
//! 1. **Small Size**: every variant carries inline data only (integers),
//!    so errors stay cheap to return from the sync path and to queue
//!    for diagnostics.
//!
//! 2. **No Heap Allocation**: no `String`, no boxing. Deterministic memory
//!    usage on the smallest targets.
//!
//! 3. **Copy Semantics**: errors implement `Copy` so they can be recorded
//!    (e.g. as "last sync failure" metadata) without move gymnastics.
//!
//! Nothing in this taxonomy is fatal: a failed synchronization leaves the
//! wall clock untouched and the caller retries on its next scheduled
//! opportunity. See `ClockEngine::synchronize`.

use thiserror_no_std::Error;

/// Result type for clock operations
pub type ClockResult<T> = Result<T, ClockError>;

/// Clock engine errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The network time source refused the request or reported a hard
    /// failure (e.g. no connectivity, DNS failure in the transport).
    #[error("time source unavailable")]
    SourceUnavailable,

    /// The source never produced a usable reading within the bounded
    /// retry budget.
    #[error("no valid epoch after {attempts} attempts")]
    SourceTimeout {
        /// Number of fetch attempts made before giving up
        attempts: u8,
    },

    /// The source answered, but with an epoch below the validity floor
    /// (an unsynchronized SNTP peer reports seconds-since-boot).
    #[error("epoch {secs} below validity floor")]
    EpochOutOfRange {
        /// The rejected epoch value, in seconds
        secs: u32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::SourceUnavailable =>
                defmt::write!(fmt, "time source unavailable"),
            Self::SourceTimeout { attempts } =>
                defmt::write!(fmt, "no valid epoch after {} attempts", attempts),
            Self::EpochOutOfRange { secs } =>
                defmt::write!(fmt, "epoch {} below validity floor", secs),
        }
    }
}
