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

//! Named countdown timers driven by frame deltas.
//!
//! Timers are kept in creation order and fire in that order within one
//! update. A timer fires at most once per update no matter how large the
//! delta is; a repeating timer is re-armed with its full duration rather
//! than carrying the overshoot forward.
//!
//! Callbacks receive a mutable reference to a context value supplied by the
//! caller of [`TimerService::update`]. The runtime passes its event queue, so
//! a callback normally just posts an event.

use std::time::Duration;

use log::debug;

pub type TimerCallback<T> = Box<dyn FnMut(&mut T)>;

struct Timer<T> {
    name: String,
    duration: Duration,
    remaining: Duration,
    repeat: bool,
    active: bool,
    callback: TimerCallback<T>,
}

pub struct TimerService<T> {
    timers: Vec<Timer<T>>,
}

impl<T> TimerService<T> {
    pub fn new() -> Self {
        Self { timers: Vec::new() }
    }

    /// Creates a running timer.
    ///
    /// # Arguments
    ///
    /// * `name` - Identifies the timer for `stop`, `resume` and `remove`.
    /// * `duration` - Time until the first firing, and between firings when
    ///   repeating.
    /// * `callback` - Run with the update context each time the timer fires.
    /// * `repeat` - Re-arm after firing instead of removing the timer.
    ///
    /// # Note
    ///
    /// A timer with the same name is replaced in place and keeps its firing
    /// position.
    pub fn create<F>(&mut self, name: impl Into<String>, duration: Duration, callback: F, repeat: bool)
    where
        F: FnMut(&mut T) + 'static,
    {
        let timer = Timer {
            name: name.into(),
            duration,
            remaining: duration,
            repeat,
            active: true,
            callback: Box::new(callback),
        };
        match self.timers.iter_mut().find(|t| t.name == timer.name) {
            Some(existing) => {
                debug!("timer '{}' replaced", timer.name);
                *existing = timer;
            }
            None => self.timers.push(timer),
        }
    }

    /// Counts every active timer down by `dt` and fires those that reach
    /// zero. Returns the number of callbacks run.
    pub fn update(&mut self, dt: Duration, ctx: &mut T) -> usize {
        let mut fired = 0;
        self.timers.retain_mut(|timer| {
            if !timer.active {
                return true;
            }
            timer.remaining = timer.remaining.saturating_sub(dt);
            if !timer.remaining.is_zero() {
                return true;
            }
            (timer.callback)(ctx);
            fired += 1;
            if timer.repeat {
                timer.remaining = timer.duration;
                true
            } else {
                false
            }
        });
        fired
    }

    /// Suspends a timer, keeping its remaining time. Returns false for an
    /// unknown name.
    pub fn stop(&mut self, name: &str) -> bool {
        self.set_active(name, false)
    }

    pub fn resume(&mut self, name: &str) -> bool {
        self.set_active(name, true)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.name != name);
        self.timers.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.timers.iter().any(|t| t.name == name)
    }

    pub fn remaining(&self, name: &str) -> Option<Duration> {
        self.timers
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.remaining)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.timers.iter().any(|t| t.name == name && t.active)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    fn set_active(&mut self, name: &str, active: bool) -> bool {
        match self.timers.iter_mut().find(|t| t.name == name) {
            Some(timer) => {
                timer.active = active;
                true
            }
            None => false,
        }
    }
}

impl<T> Default for TimerService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_repeating_timer_fires_once_per_update_at_most() {
        let mut timers = TimerService::<Vec<&'static str>>::new();
        timers.create("beat", ms(2000), |log| log.push("beat"), true);

        let mut log = Vec::new();
        let fired: usize = (0..5).map(|_| timers.update(ms(1000), &mut log)).sum();
        assert_eq!(fired, 2);
        assert_eq!(log, vec!["beat", "beat"]);

        // An oversized delta still fires only once.
        assert_eq!(timers.update(ms(10000), &mut log), 1);
    }

    #[test]
    fn test_one_shot_timer_is_removed_after_firing() {
        let mut timers = TimerService::<u32>::new();
        timers.create("once", ms(500), |count| *count += 1, false);

        let mut count = 0;
        timers.update(ms(600), &mut count);
        timers.update(ms(600), &mut count);
        assert_eq!(count, 1);
        assert!(!timers.contains("once"));
    }

    #[test]
    fn test_timers_fire_in_creation_order() {
        let mut timers = TimerService::<Vec<&'static str>>::new();
        timers.create("first", ms(1000), |log| log.push("first"), false);
        timers.create("second", ms(1000), |log| log.push("second"), false);
        // Overwriting keeps the original slot.
        timers.create("first", ms(1000), |log| log.push("first again"), false);

        let mut log = Vec::new();
        timers.update(ms(1000), &mut log);
        assert_eq!(log, vec!["first again", "second"]);
    }

    #[test]
    fn test_stop_and_resume_keep_remaining_time() {
        let mut timers = TimerService::<u32>::new();
        timers.create("t", ms(1000), |count| *count += 1, false);

        let mut count = 0;
        timers.update(ms(400), &mut count);
        assert!(timers.stop("t"));
        timers.update(ms(5000), &mut count);
        assert_eq!(count, 0);
        assert_eq!(timers.remaining("t"), Some(ms(600)));

        assert!(timers.resume("t"));
        timers.update(ms(600), &mut count);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unknown_names() {
        let mut timers = TimerService::<()>::new();
        assert!(!timers.stop("nope"));
        assert!(!timers.resume("nope"));
        assert!(!timers.remove("nope"));
        assert_eq!(timers.remaining("nope"), None);
    }
}
