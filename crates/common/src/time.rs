//! Millisecond clocks and the elapsed-time value handed to simulations.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Elapsed time between two cycle samples, in whole milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeDelta {
    millis: u64,
}

impl TimeDelta {
    pub const ZERO: Self = Self { millis: 0 };

    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Delta between two clock samples. A `current` earlier than `last`
    /// yields zero rather than wrapping.
    pub fn between(last: u64, current: u64) -> Self {
        Self::from_millis(current.saturating_sub(last))
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_secs_f32(&self) -> f32 {
        self.millis as f32 / 1000.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }

    pub fn is_zero(&self) -> bool {
        self.millis == 0
    }
}

/// Monotonic millisecond time source sampled once per cycle.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock. Clones share the same reading, so a test can keep one
/// handle while the game owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }

    pub fn set(&self, millis: u64) {
        self.now.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_saturates_at_zero() {
        assert_eq!(TimeDelta::between(100, 40), TimeDelta::ZERO);
        assert_eq!(TimeDelta::between(40, 100).as_millis(), 60);
    }

    #[test]
    fn seconds_conversion() {
        assert_eq!(TimeDelta::from_millis(250).as_secs_f32(), 0.25);
        assert_eq!(TimeDelta::from_millis(16).as_duration(), Duration::from_millis(16));
    }

    #[test]
    fn manual_clock_clones_share_reading() {
        let clock = ManualClock::new(10);
        let handle = clock.clone();
        handle.advance(5);
        assert_eq!(clock.now_millis(), 15);
        handle.set(3);
        assert_eq!(clock.now_millis(), 3);
    }

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }
}
