//! A clock that never ticks on its own.

use std::time::Duration;

use crate::Clock;

/// Deterministic [`Clock`] for tests.
///
/// Ticks are delivered by calling the engine's `tick()` directly. The clock
/// only records what the engine asked of it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    running: bool,
    interval: Option<Duration>,
    starts: u32,
    stops: u32,
    /// `start` calls made while the clock was already running.
    overlapping_starts: u32,
}

impl ManualClock {
    /// A stopped clock with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `start` calls.
    pub fn starts(&self) -> u32 {
        self.starts
    }

    /// Number of `stop` calls that actually stopped a running clock.
    pub fn stops(&self) -> u32 {
        self.stops
    }

    /// Number of times `start` was called without a `stop` in between.
    pub fn overlapping_starts(&self) -> u32 {
        self.overlapping_starts
    }

    /// Interval passed to the most recent `start`.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

impl Clock for ManualClock {
    fn start(&mut self, interval: Duration) {
        if self.running {
            self.overlapping_starts += 1;
        }
        self.running = true;
        self.interval = Some(interval);
        self.starts += 1;
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_is_stopped() {
        let clock = ManualClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.starts(), 0);
        assert_eq!(clock.interval(), None);
    }

    #[test]
    fn test_start_stop_counts() {
        let mut clock = ManualClock::new();
        clock.start(Duration::from_secs(1));
        assert!(clock.is_running());
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.starts(), 1);
        assert_eq!(clock.stops(), 1);
    }

    #[test]
    fn test_overlapping_start_is_recorded() {
        let mut clock = ManualClock::new();
        clock.start(Duration::from_secs(1));
        clock.start(Duration::from_secs(2));
        assert_eq!(clock.overlapping_starts(), 1);
        assert_eq!(clock.interval(), Some(Duration::from_secs(2)));
    }
}
