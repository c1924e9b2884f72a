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

//! Debounced edge detection for a single digital input.
//!
//! A raw change is accepted only when strictly more than the debounce
//! interval has elapsed since the last accepted change; anything faster is
//! contact bounce and is ignored. Releases after a long hold are reported as
//! [`Transition::LongPress`] in place of [`Transition::Released`].

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Pressed,
    Released,
    LongPress,
    RepeatWhileHeld,
}

#[derive(Debug, Clone)]
pub struct EdgeDetector {
    debounce: Duration,
    long_press: Duration,
    repeat: Option<Duration>,
    active: bool,
    last_change: Option<Duration>,
    pressed_at: Duration,
    last_repeat: Duration,
}

impl EdgeDetector {
    pub fn new(debounce: Duration, long_press: Duration) -> Self {
        Self {
            debounce,
            long_press,
            repeat: None,
            active: false,
            last_change: None,
            pressed_at: Duration::ZERO,
            last_repeat: Duration::ZERO,
        }
    }

    /// Emits [`Transition::RepeatWhileHeld`] every `interval` while held.
    pub fn with_repeat(mut self, interval: Option<Duration>) -> Self {
        self.repeat = interval;
        self
    }

    /// Debounced state.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feeds one raw sample taken at `now` and returns the resulting
    /// transition, if any.
    pub fn sample(&mut self, raw: bool, now: Duration) -> Option<Transition> {
        if raw != self.active {
            let settled = self
                .last_change
                .is_none_or(|at| now.saturating_sub(at) > self.debounce);
            if settled {
                self.active = raw;
                self.last_change = Some(now);
                if raw {
                    self.pressed_at = now;
                    self.last_repeat = now;
                    return Some(Transition::Pressed);
                }
                let held = now.saturating_sub(self.pressed_at);
                return Some(if held >= self.long_press {
                    Transition::LongPress
                } else {
                    Transition::Released
                });
            }
        }

        if self.active {
            if let Some(interval) = self.repeat {
                if now.saturating_sub(self.last_repeat) >= interval {
                    self.last_repeat = now;
                    return Some(Transition::RepeatWhileHeld);
                }
            }
        }
        None
    }
}
