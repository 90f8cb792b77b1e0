//! Network Time Source Seam
//!
//! The clock engine never speaks a wire protocol itself; it consumes a
//! `NetworkTimeSource` that yields UTC epoch readings on demand. The trait
//! uses `nb::Result` for non-blocking operation without async/await
//! overhead, so a firmware loop can poll the source between display
//! redraws.
//!
//! ## Error Handling
//!
//! Sources use a two-level error model:
//! - `nb::Error::WouldBlock` - reply not here yet, ask again shortly
//! - `nb::Error::Other(ClockError)` - the source actually failed
//!
//! The engine's bounded retry loop converts persistent `WouldBlock` into
//! `ClockError::SourceTimeout`; a hard error aborts the attempt at once.
//! Either way the wall clock is left untouched.

use heapless::Deque;

use crate::errors::ClockError;

/// A single UTC reading from the network time source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochReading {
    /// UTC epoch seconds at the moment the reply was formed.
    pub secs: u32,
    /// Sub-second phase of the reading, in 1/256ths of a second
    /// (the most significant byte of an NTP short fraction).
    pub subsec: u8,
}

/// Source of UTC epoch readings
///
/// ## Contract
///
/// - `fetch_epoch()` must not block indefinitely; return `WouldBlock`
///   while a reply is outstanding
/// - Multiple `WouldBlock` returns are normal and expected
/// - After returning an error, the source may still be usable
/// - Readings are best-effort: the engine applies its own validity floor
///   and retry budget
pub trait NetworkTimeSource {
    /// Attempt to obtain a UTC epoch reading.
    fn fetch_epoch(&mut self) -> nb::Result<EpochReading, ClockError>;
}

/// One scripted reply from a [`ScriptedSource`].
#[derive(Debug, Clone, Copy)]
pub enum ScriptedReply {
    /// A reading is delivered.
    Reading(EpochReading),
    /// The reply has not arrived yet (`WouldBlock`).
    NotReady,
    /// The source failed hard.
    Failed(ClockError),
}

/// Replay-from-a-script time source for tests and host-side simulation
///
/// Each `fetch_epoch` call consumes the next scripted reply; once the
/// script runs out the source reports `SourceUnavailable`.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    replies: Deque<ScriptedReply, 32>,
}

impl ScriptedSource {
    /// Create an empty script.
    pub fn new() -> Self {
        Self { replies: Deque::new() }
    }

    /// Append a reply to the script. Returns `false` when the script
    /// buffer (32 entries) is full.
    pub fn push(&mut self, reply: ScriptedReply) -> bool {
        self.replies.push_back(reply).is_ok()
    }

    /// Append a reading with the given epoch and zero sub-second phase.
    pub fn push_epoch(&mut self, secs: u32) -> bool {
        self.push(ScriptedReply::Reading(EpochReading { secs, subsec: 0 }))
    }

    /// Number of replies left in the script.
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl NetworkTimeSource for ScriptedSource {
    fn fetch_epoch(&mut self) -> nb::Result<EpochReading, ClockError> {
        match self.replies.pop_front() {
            Some(ScriptedReply::Reading(r)) => Ok(r),
            Some(ScriptedReply::NotReady) => Err(nb::Error::WouldBlock),
            Some(ScriptedReply::Failed(e)) => Err(nb::Error::Other(e)),
            None => Err(nb::Error::Other(ClockError::SourceUnavailable)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_replies_in_order() {
        let mut src = ScriptedSource::new();
        assert!(src.push(ScriptedReply::NotReady));
        assert!(src.push_epoch(1_000_000));

        assert_eq!(src.fetch_epoch(), Err(nb::Error::WouldBlock));
        assert_eq!(
            src.fetch_epoch(),
            Ok(EpochReading { secs: 1_000_000, subsec: 0 })
        );
        // Script exhausted
        assert_eq!(
            src.fetch_epoch(),
            Err(nb::Error::Other(ClockError::SourceUnavailable))
        );
    }
}
