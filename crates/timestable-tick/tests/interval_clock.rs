//! Integration tests for the fixed-interval clock.
//!
//! Uses `tokio::time::pause()` to control time deterministically.
//! All tests run with auto-advanced time so `sleep_until` resolves
//! instantly once the runtime is idle.

use std::time::Duration;

use timestable_tick::{Clock, IntervalClock, TickConfig, TickPolicy};

// =========================================================================
// Helpers
// =========================================================================

const ONE_SECOND: Duration = Duration::from_secs(1);

fn started_clock() -> IntervalClock {
    let mut clock = IntervalClock::default();
    clock.start(ONE_SECOND);
    clock
}

// =========================================================================
// TickConfig
// =========================================================================

#[test]
fn test_default_policy_is_skip() {
    let cfg = TickConfig::default();
    assert_eq!(cfg.policy, TickPolicy::Skip);
}

#[test]
fn test_validated_clamps_tolerance() {
    let cfg = TickConfig {
        overrun_tolerance: 4.0,
        ..TickConfig::default()
    }
    .validated();
    assert_eq!(cfg.overrun_tolerance, 1.0);

    let cfg = TickConfig {
        overrun_tolerance: f64::NAN,
        ..TickConfig::default()
    }
    .validated();
    assert_eq!(cfg.overrun_tolerance, 0.10);
}

// =========================================================================
// Start / stop
// =========================================================================

#[test]
fn test_new_clock_is_stopped() {
    let clock = IntervalClock::default();
    assert!(!clock.is_running());
    assert_eq!(clock.interval(), None);
    assert_eq!(clock.tick_count(), 0);
}

#[tokio::test]
async fn test_start_and_stop() {
    let mut clock = started_clock();
    assert!(clock.is_running());
    assert_eq!(clock.interval(), Some(ONE_SECOND));

    clock.stop();
    clock.stop();
    assert!(!clock.is_running());
    assert_eq!(clock.interval(), None);
}

#[tokio::test]
async fn test_zero_interval_is_raised_to_minimum() {
    let mut clock = IntervalClock::default();
    clock.start(Duration::ZERO);
    assert_eq!(clock.interval(), Some(TickConfig::MIN_INTERVAL));
}

// =========================================================================
// Tick firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_for_tick_fires_and_increments() {
    let mut clock = started_clock();

    let info = clock.wait_for_tick().await;
    assert_eq!(info.tick, 1);
    assert_eq!(info.dt, ONE_SECOND);
    assert!(!info.overrun);
    assert_eq!(info.ticks_skipped, 0);
    assert_eq!(clock.tick_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_ticks_are_one_interval_apart() {
    let mut clock = started_clock();
    let begin = tokio::time::Instant::now();

    for expected in 1..=5 {
        let info = clock.wait_for_tick().await;
        assert_eq!(info.tick, expected);
    }
    assert_eq!(begin.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_restart_resets_tick_count() {
    let mut clock = started_clock();
    clock.wait_for_tick().await;
    clock.wait_for_tick().await;

    clock.start(ONE_SECOND);
    assert_eq!(clock.tick_count(), 0);
    let info = clock.wait_for_tick().await;
    assert_eq!(info.tick, 1);
}

// =========================================================================
// Stopped clock pends forever
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_stopped_clock_never_fires() {
    let mut clock = IntervalClock::default();
    let result = tokio::time::timeout(Duration::from_secs(5), clock.wait_for_tick()).await;
    assert!(result.is_err(), "stopped clock should pend forever");
}

#[tokio::test(start_paused = true)]
async fn test_stop_after_tick_prevents_further_ticks() {
    let mut clock = started_clock();
    clock.wait_for_tick().await;
    clock.stop();

    let result = tokio::time::timeout(Duration::from_secs(5), clock.wait_for_tick()).await;
    assert!(result.is_err(), "stopped clock should pend");
    assert_eq!(clock.tick_count(), 1);
}

// =========================================================================
// Overrun policies
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_skip_policy_reports_skipped_ticks() {
    let mut clock = started_clock();

    // The loop stalls for 3.5 s: the first deadline is 2.5 s in the past.
    tokio::time::advance(Duration::from_millis(3_500)).await;

    let info = clock.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 2);
    assert_eq!(clock.total_overruns(), 1);

    // Rescheduled from now, so the next tick is on time.
    let info = clock.wait_for_tick().await;
    assert!(!info.overrun);
    assert_eq!(info.tick, 2);
}

#[tokio::test(start_paused = true)]
async fn test_catchup_policy_delivers_missed_ticks() {
    let mut clock = IntervalClock::new(TickConfig {
        policy: TickPolicy::CatchUp { max_catchup: 5 },
        ..TickConfig::default()
    });
    clock.start(ONE_SECOND);

    tokio::time::advance(Duration::from_millis(3_500)).await;

    // Deadlines at 1 s, 2 s and 3 s have all passed.
    for expected in 1..=3 {
        let info = clock.wait_for_tick().await;
        assert_eq!(info.tick, expected);
        assert!(info.overrun);
        assert_eq!(info.ticks_skipped, 0);
    }
}

// =========================================================================
// Integration: select! loop pattern
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_select_loop_pattern() {
    let mut clock = started_clock();

    let (tx, mut rx) = tokio::sync::mpsc::channel::<&str>(10);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        tx.send("stop").await.ok();
    });

    let mut ticks_fired = 0u64;
    loop {
        tokio::select! {
            Some(cmd) = rx.recv() => {
                assert_eq!(cmd, "stop");
                clock.stop();
                break;
            }
            info = clock.wait_for_tick() => {
                ticks_fired += 1;
                assert_eq!(info.tick, ticks_fired);
            }
        }
    }

    assert_eq!(ticks_fired, 3);
    assert!(!clock.is_running());
}
