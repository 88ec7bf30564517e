//! Countdown clock for Timestable.
//!
//! The round engine never sleeps or polls on its own. It is handed a
//! [`Clock`] and only tells it when to start and stop; whoever owns the
//! event loop delivers the ticks back to the engine.
//!
//! Two implementations ship with this crate:
//!
//! - [`IntervalClock`]: a fixed-interval ticker on Tokio time, for real play.
//! - [`ManualClock`]: records start/stop calls and never ticks by itself,
//!   so tests can drive the countdown deterministically.
//!
//! # Integration
//!
//! [`IntervalClock::wait_for_tick`] is designed to sit inside a single
//! `tokio::select!` loop next to player input:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(line) = lines.next_line() => { /* handle input */ }
//!         _info = engine.clock_mut().wait_for_tick() => {
//!             engine.tick();
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

mod manual;

pub use manual::ManualClock;

// ---------------------------------------------------------------------------
// Clock trait
// ---------------------------------------------------------------------------

/// Something that can be started at a fixed interval and stopped again.
///
/// Starting a clock that is already running restarts it from now with the
/// new interval; there is never more than one ticker per clock.
pub trait Clock {
    /// Begin ticking once per `interval`.
    fn start(&mut self, interval: Duration);

    /// Stop ticking. Idempotent.
    fn stop(&mut self);

    /// Whether the clock is currently delivering ticks.
    fn is_running(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when the event loop wakes up late for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Skip the missed tick(s) and resume from now.
    #[default]
    Skip,
    /// Deliver up to `max_catchup` missed ticks back to back.
    /// Keeps a countdown honest after a stall.
    CatchUp {
        /// Hard cap on consecutive catch-up ticks.
        max_catchup: u32,
    },
}

/// Configuration for [`IntervalClock`].
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Overrun handling policy.
    pub policy: TickPolicy,
    /// How late (as a fraction of the interval) a wake-up may be before it
    /// counts as an overrun. Default: 0.10.
    pub overrun_tolerance: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            policy: TickPolicy::default(),
            overrun_tolerance: 0.10,
        }
    }
}

impl TickConfig {
    /// Shortest interval the clock accepts. Anything shorter is raised to this.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`IntervalClock::new`].
    pub fn validated(mut self) -> Self {
        if !self.overrun_tolerance.is_finite() {
            self.overrun_tolerance = Self::default().overrun_tolerance;
        }
        self.overrun_tolerance = self.overrun_tolerance.clamp(0.0, 1.0);
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Information about a delivered tick, returned by [`IntervalClock::wait_for_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Tick number since the last `start` (starts at 1).
    pub tick: u64,
    /// The configured interval. Always fixed.
    pub dt: Duration,
    /// `true` if this tick fired late.
    pub overrun: bool,
    /// How many ticks were dropped because of the overrun.
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// IntervalClock
// ---------------------------------------------------------------------------

/// Fixed-interval ticker backed by Tokio time.
///
/// While stopped, [`wait_for_tick`](Self::wait_for_tick) pends forever, so a
/// `select!` loop simply stops seeing the tick branch fire.
#[derive(Debug)]
pub struct IntervalClock {
    config: TickConfig,
    interval: Option<Duration>,
    next_tick: Option<TokioInstant>,
    tick_count: u64,
    total_overruns: u64,
}

impl IntervalClock {
    /// Create a stopped clock from config.
    pub fn new(config: TickConfig) -> Self {
        Self {
            config: config.validated(),
            interval: None,
            next_tick: None,
            tick_count: 0,
            total_overruns: 0,
        }
    }

    /// Wait until the next tick is due.
    ///
    /// Pends forever while the clock is stopped. Cancel-safe: dropping the
    /// future before it resolves leaves the schedule untouched.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let (next, interval) = match (self.next_tick, self.interval) {
            (Some(next), Some(interval)) => (next, interval),
            _ => return std::future::pending().await,
        };

        time::sleep_until(next).await;

        let now = TokioInstant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > interval.mul_f64(self.config.overrun_tolerance);
        let behind = (late_by.as_nanos() / interval.as_nanos()) as u64;
        let mut ticks_skipped = 0u64;

        self.next_tick = Some(match self.config.policy {
            TickPolicy::Skip => {
                if overrun && behind > 0 {
                    ticks_skipped = behind;
                    warn!(
                        tick = self.tick_count,
                        skipped = ticks_skipped,
                        late_ms = late_by.as_secs_f64() * 1000.0,
                        "clock overrun, skipping ahead"
                    );
                }
                now + interval
            }
            TickPolicy::CatchUp { max_catchup } => {
                if overrun && behind > 0 {
                    ticks_skipped = behind.saturating_sub(max_catchup as u64);
                    warn!(
                        tick = self.tick_count,
                        behind,
                        skipping = ticks_skipped,
                        "clock overrun, catch-up capped at {max_catchup}"
                    );
                    if behind <= max_catchup as u64 {
                        next + interval
                    } else {
                        now + interval
                    }
                } else {
                    next + interval
                }
            }
        });

        if overrun {
            self.total_overruns += 1;
        }

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            dt: interval,
            overrun,
            ticks_skipped,
        }
    }

    /// Ticks delivered since the last `start`.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Overruns observed over the clock's whole lifetime.
    pub fn total_overruns(&self) -> u64 {
        self.total_overruns
    }

    /// The running interval, or `None` while stopped.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new(TickConfig::default())
    }
}

impl Clock for IntervalClock {
    fn start(&mut self, interval: Duration) {
        let interval = if interval < TickConfig::MIN_INTERVAL {
            warn!(?interval, "clock interval below minimum, raising");
            TickConfig::MIN_INTERVAL
        } else {
            interval
        };
        if self.interval.is_some() {
            debug!(tick = self.tick_count, "clock restarted while running");
        }
        self.interval = Some(interval);
        self.next_tick = Some(TokioInstant::now() + interval);
        self.tick_count = 0;
        debug!(interval_ms = interval.as_millis() as u64, "clock started");
    }

    fn stop(&mut self) {
        if self.interval.take().is_some() {
            self.next_tick = None;
            debug!(tick = self.tick_count, "clock stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}
