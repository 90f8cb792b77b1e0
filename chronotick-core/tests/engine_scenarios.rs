//! End-to-End Scenarios for the Clock Engine
//!
//! Each test replays a complete firmware situation - boot, scheduled
//! syncs, outages, day boundaries, counter rollover - against a scripted
//! time source and a manually driven tick counter, so every run is
//! deterministic.

use chronotick_core::{
    ClockEngine, ClockError, FixedTicks, ScriptedReply, ScriptedSource, SyncScheduler, SyncState,
    TickSource, TimezoneConfig, Weekday,
};

// ===== SCENARIO CONSTANTS =====

/// 2024-03-10T07:00:00Z - second Sunday of March 2024, the US DST
/// switch date, while US Eastern (UTC-5) is still in the small hours.
const DST_SWITCH_SYNC_EPOCH: u32 = 1_710_054_000;

/// 2024-01-10T12:00:00Z - deep winter, DST certainly off.
const WINTER_NOON_EPOCH: u32 = 1_704_888_000;

/// 2024-06-15T23:59:50Z - ten seconds before a UTC day boundary.
const BEFORE_MIDNIGHT_EPOCH: u32 = 1_718_495_990;

/// Fetch attempts the engine makes before reporting a timeout.
const FETCH_ATTEMPTS: u8 = 10;

fn failing_source() -> ScriptedSource {
    let mut src = ScriptedSource::new();
    for _ in 0..FETCH_ATTEMPTS {
        src.push(ScriptedReply::NotReady);
    }
    src
}

#[test]
fn boot_is_not_ready_until_first_sync() {
    let engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::new(-5.0, true));
    assert!(!engine.is_initialized());
    assert!(engine.fields().is_none());
    assert!(engine.last_sync_epoch().is_none());
}

/// The spec scenario: sync a UTC-5, DST-enabled clock at
/// 2024-03-10T07:00:00Z. The rule is day-granular and March 10 is on or
/// after the second Sunday (the 10th itself), so the DST hour applies:
/// 07:00Z - 5h + 1h = 03:00 local.
#[test]
fn dst_switch_morning_sync() {
    let mut engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::new(-5.0, true));
    let mut src = ScriptedSource::new();
    src.push_epoch(DST_SWITCH_SYNC_EPOCH);

    engine.synchronize(&mut src).unwrap();
    let f = engine.fields().unwrap();
    assert_eq!((f.hour, f.minute, f.second), (3, 0, 0));
    assert_eq!((f.year, f.month, f.day), (2024, 3, 10));
    assert_eq!(f.weekday, Weekday::Sunday);
    assert_eq!(f.utc_offset_hours, -5.0);
}

#[test]
fn winter_sync_applies_plain_offset() {
    let mut engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::new(-5.0, true));
    let mut src = ScriptedSource::new();
    src.push_epoch(WINTER_NOON_EPOCH);

    engine.synchronize(&mut src).unwrap();
    let f = engine.fields().unwrap();
    assert_eq!((f.hour, f.minute), (7, 0));
    assert_eq!((f.month, f.day), (1, 10));
}

#[test]
fn eastern_hemisphere_never_gets_the_dst_hour() {
    // dst_enabled but positive offset: the engine's US gate keeps DST off.
    let mut engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::new(2.0, true));
    let mut src = ScriptedSource::new();
    src.push_epoch(DST_SWITCH_SYNC_EPOCH);

    engine.synchronize(&mut src).unwrap();
    assert_eq!(engine.fields().unwrap().hour, 9); // 07:00Z + 2h, no DST
}

/// Two outages, then a recovery: failures must not leave any partial
/// mutation behind, and the third attempt resyncs cleanly.
#[test]
fn outage_then_recovery() {
    let mut engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::default());
    let mut src = ScriptedSource::new();
    src.push_epoch(WINTER_NOON_EPOCH);
    engine.synchronize(&mut src).unwrap();
    let before = engine.fields().unwrap();

    for _ in 0..2 {
        let err = engine.synchronize(&mut failing_source()).unwrap_err();
        assert_eq!(err, ClockError::SourceTimeout { attempts: FETCH_ATTEMPTS });
        assert_eq!(engine.fields().unwrap(), before);
        assert_eq!(engine.drift_ms_per_hour(), 0);
    }

    // One true hour later, tick counter in agreement.
    engine.tick_source().set(3_600_000);
    let mut src = ScriptedSource::new();
    src.push_epoch(WINTER_NOON_EPOCH + 3_600);
    engine.synchronize(&mut src).unwrap();
    assert_eq!(engine.fields().unwrap().hour, 13);
    assert_eq!(engine.drift_ms_per_hour(), 0);
}

/// Local advance carries through minute and hour boundaries and crosses
/// midnight without touching the date, which is resynced instead.
#[test]
fn midnight_crossover_pends_resync_and_keeps_date_stale() {
    let mut engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::default());
    let mut src = ScriptedSource::new();
    src.push_epoch(BEFORE_MIDNIGHT_EPOCH);
    engine.synchronize(&mut src).unwrap();
    assert_eq!(engine.fields().unwrap().hour, 23);

    engine.tick_source().advance(15_000);
    engine.tick();

    let f = engine.fields().unwrap();
    assert_eq!((f.hour, f.minute, f.second), (0, 0, 5));
    // Date is stale by design until the pending resync lands.
    assert_eq!((f.month, f.day), (6, 15));
    assert_eq!(engine.sync_state(), SyncState::PendingResync);
    assert!(engine.needs_resync());

    // The pending resync fixes the date.
    let mut src = ScriptedSource::new();
    src.push_epoch(BEFORE_MIDNIGHT_EPOCH + 15);
    engine.synchronize(&mut src).unwrap();
    let f = engine.fields().unwrap();
    assert_eq!((f.month, f.day), (6, 16));
    assert_eq!(engine.sync_state(), SyncState::Tracking);
}

/// Seconds advance by exactly floor(elapsed/1000) across a long span of
/// uneven tick() calls with no drift estimate.
#[test]
fn local_advance_is_exact_without_drift() {
    let mut engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::default());
    let mut src = ScriptedSource::new();
    src.push_epoch(WINTER_NOON_EPOCH);
    engine.synchronize(&mut src).unwrap();

    // 90 uneven steps of 733ms: 65_970ms total -> 65 seconds.
    for _ in 0..90 {
        engine.tick_source().advance(733);
        engine.tick();
    }
    let f = engine.fields().unwrap();
    assert_eq!((f.hour, f.minute, f.second), (12, 1, 5));
}

/// Tick counter rollover: elapsed time is computed as if no wrap
/// occurred, and the engine pends a resync because the drift baseline
/// died with the wrap.
#[test]
fn counter_rollover_is_transparent_to_elapsed_time() {
    let start = u32::MAX - 500;
    let mut engine = ClockEngine::new(FixedTicks::new(start), TimezoneConfig::default());
    let mut src = ScriptedSource::new();
    src.push_epoch(WINTER_NOON_EPOCH);
    engine.synchronize(&mut src).unwrap();

    engine.tick_source().advance(1_500); // wraps past u32::MAX
    engine.tick();

    let f = engine.fields().unwrap();
    assert_eq!(f.second, 1);
    assert_eq!(engine.sync_state(), SyncState::PendingResync);
}

/// Second-edge alignment: a mid-second reading makes the engine poll
/// until the source's second changes, and the tick mark is captured at
/// that edge rather than at the first reply.
#[test]
fn alignment_pins_tick_mark_to_second_edge() {
    let mut engine = ClockEngine::new(FixedTicks::new(10_000), TimezoneConfig::default());
    let mut src = ScriptedSource::new();
    // Mid-second reading (phase 128/256), then the edge two polls later.
    src.push(ScriptedReply::Reading(chronotick_core::EpochReading {
        secs: WINTER_NOON_EPOCH,
        subsec: 128,
    }));
    src.push(ScriptedReply::Reading(chronotick_core::EpochReading {
        secs: WINTER_NOON_EPOCH,
        subsec: 200,
    }));
    src.push(ScriptedReply::Reading(chronotick_core::EpochReading {
        secs: WINTER_NOON_EPOCH + 1,
        subsec: 2,
    }));

    engine.synchronize(&mut src).unwrap();
    let f = engine.fields().unwrap();
    // The aligned reading, one second after the base one.
    assert_eq!((f.hour, f.minute, f.second), (12, 0, 1));

    // The tick mark was captured at the edge (two 20ms polls after the
    // sync started), so the next second is owed 1000ms after that mark.
    engine.tick_source().advance(999);
    engine.tick();
    assert_eq!(engine.fields().unwrap().second, 1);
    engine.tick_source().advance(1);
    engine.tick();
    assert_eq!(engine.fields().unwrap().second, 2);
}

/// Readings within the guard band of a minute boundary skip alignment
/// entirely and consume only the one fetch.
#[test]
fn alignment_skipped_near_minute_boundary() {
    let mut engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::default());
    let mut src = ScriptedSource::new();
    src.push(ScriptedReply::Reading(chronotick_core::EpochReading {
        secs: WINTER_NOON_EPOCH + 59, // :59 of the minute
        subsec: 128,
    }));

    engine.synchronize(&mut src).unwrap();
    assert_eq!(engine.fields().unwrap().second, 59);
    assert_eq!(src.remaining(), 0);
}

/// Full cadence walk: boot sync, failure-retry window, periodic window,
/// and a forced sync from the engine's pending-resync flag.
#[test]
fn scheduler_drives_engine_cadence() {
    let ticks = FixedTicks::new(0);
    let mut engine = ClockEngine::new(ticks, TimezoneConfig::default());
    let mut scheduler = SyncScheduler::with_intervals(600_000, 30_000);

    // Boot: due immediately, but the network is down.
    let now = engine.tick_source().ticks();
    assert!(scheduler.due(now, engine.needs_resync()));
    assert!(engine.synchronize(&mut failing_source()).is_err());
    scheduler.record_failure(engine.tick_source().ticks());

    // Forced by Uninitialized state even inside the retry window.
    let now = engine.tick_source().ticks();
    assert!(scheduler.due(now, engine.needs_resync()));

    // Recover.
    let mut src = ScriptedSource::new();
    src.push_epoch(WINTER_NOON_EPOCH);
    engine.synchronize(&mut src).unwrap();
    scheduler.record_success(engine.tick_source().ticks());

    // Tracking: not due until the periodic interval passes.
    let now = engine.tick_source().ticks();
    assert!(!scheduler.due(now, engine.needs_resync()));
    engine.tick_source().advance(600_000);
    engine.tick();
    assert!(scheduler.due(engine.tick_source().ticks(), engine.needs_resync()));
}

/// Drift correction end to end: two syncs an hour apart teach the
/// engine the oscillator is fast, and subsequent local advance slows
/// down by the learned rate.
#[test]
fn drift_learned_and_applied() {
    let mut engine = ClockEngine::new(FixedTicks::new(0), TimezoneConfig::default());
    let mut src = ScriptedSource::new();
    src.push_epoch(WINTER_NOON_EPOCH);
    engine.synchronize(&mut src).unwrap();

    // Ticks ran 9.6s long over one true hour -> blended estimate 7200 ms/h.
    engine.tick_source().set(3_609_600);
    let mut src = ScriptedSource::new();
    src.push_epoch(WINTER_NOON_EPOCH + 3_600);
    engine.synchronize(&mut src).unwrap();
    assert_eq!(engine.drift_ms_per_hour(), 7_200);

    // 1_000_000 ticks owe 2_000ms of correction: 998 displayed seconds.
    engine.tick_source().advance(1_000_000);
    engine.tick();
    let f = engine.fields().unwrap();
    let displayed = (f.hour as u32) * 3_600 + (f.minute as u32) * 60 + f.second as u32;
    let synced_at = 13 * 3_600; // 13:00:00 local at the second sync
    assert_eq!(displayed - synced_at, 998);
}
