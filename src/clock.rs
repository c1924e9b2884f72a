// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Time sources and frame pacing.
//!
//! All timestamps in the runtime are [`Duration`] offsets from the origin of
//! the clock in use. The board has a monotonic millisecond counter and
//! nothing else, so there is no wall-clock time anywhere.
//!
//! [`ManualClock`] only moves when told to, including when asked to sleep,
//! which makes whole runtime frames reproducible in tests.

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::RuntimeError;

/// Granularity of the cooperative wait in [`FrameClock::tick_blocking`].
const TICK_SLICE: Duration = Duration::from_millis(1);

pub trait Clock {
    /// Monotonic time since the clock origin.
    fn now(&self) -> Duration;

    fn sleep(&self, duration: Duration);
}

/// Monotonic clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Clock that advances only when told to.
///
/// Clones share the same counter, so a test can keep one handle while the
/// runtime owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Fixed-rate frame pacing.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    last_tick: Duration,
}

impl FrameClock {
    pub fn new(fps: u32) -> Result<Self, RuntimeError> {
        if fps == 0 {
            return Err(RuntimeError::InvalidFps(fps));
        }
        Ok(Self {
            interval: Duration::from_millis(1000 / u64::from(fps)),
            last_tick: Duration::ZERO,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Restarts the frame period from `now`.
    pub fn reset(&mut self, now: Duration) {
        self.last_tick = now;
    }

    /// Returns true, and records the tick, once a full interval has passed
    /// since the previous tick.
    pub fn should_tick(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_tick) >= self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    /// Waits in short sleeps until the next tick is due.
    pub fn tick_blocking(&mut self, clock: &dyn Clock) {
        while !self.should_tick(clock.now()) {
            clock.sleep(TICK_SLICE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fps_is_rejected() {
        assert!(matches!(
            FrameClock::new(0),
            Err(RuntimeError::InvalidFps(0))
        ));
    }

    #[test]
    fn test_interval_from_fps() {
        assert_eq!(
            FrameClock::new(30).unwrap().interval(),
            Duration::from_millis(33)
        );
        assert_eq!(
            FrameClock::new(50).unwrap().interval(),
            Duration::from_millis(20)
        );
    }

    #[test]
    fn test_should_tick_once_per_interval() {
        let mut frames = FrameClock::new(50).unwrap();
        assert!(!frames.should_tick(Duration::from_millis(10)));
        assert!(frames.should_tick(Duration::from_millis(20)));
        assert!(!frames.should_tick(Duration::from_millis(39)));
        assert!(frames.should_tick(Duration::from_millis(40)));
    }

    #[test]
    fn test_tick_blocking_advances_manual_clock() {
        let clock = ManualClock::new();
        let mut frames = FrameClock::new(50).unwrap();

        clock.set(Duration::from_millis(5));
        frames.tick_blocking(&clock);
        assert_eq!(clock.now(), Duration::from_millis(20));

        frames.tick_blocking(&clock);
        assert_eq!(clock.now(), Duration::from_millis(40));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(250));
    }
}
