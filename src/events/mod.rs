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

//! Application events and the per-frame event queue.
//!
//! # Organization
//!
//! * [`EventKind`]: everything a scene can be told about, from debounced
//!   input to timer expiry.
//! * [`EventQueue`]: FIFO buffer drained once per frame by the runtime.
//! * [`InputPoller`]: samples the board inputs and turns edges into events.
//!
//! # Timestamps
//!
//! The queue keeps the time of the current frame, set by the runtime before
//! anything else runs. Events posted during the frame, including from timer
//! callbacks, are stamped with that time.

mod poller;

pub use poller::InputPoller;

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use log::trace;

use crate::input::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    Stick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Down,
    Up,
    LongPress,
    Repeat,
}

/// Joystick movement, reduced to the four menu directions plus a return to
/// centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
    Center,
}

impl Motion {
    /// North and south take precedence over east and west on diagonals.
    pub fn from_direction(direction: Direction) -> Self {
        if direction.is_northward() {
            Motion::Up
        } else if direction.is_southward() {
            Motion::Down
        } else if direction.is_eastward() {
            Motion::Right
        } else if direction.is_westward() {
            Motion::Left
        } else {
            Motion::Center
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Joystick {
        motion: Motion,
        direction: Direction,
        x: f32,
        y: f32,
    },
    Button {
        button: Button,
        action: ButtonAction,
    },
    Timer(String),
    SequenceFinished,
    Custom(u16),
    Quit,
}

/// Payload-free identity of an event, used for filtering and de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTag {
    Joystick(Motion),
    Button(Button, ButtonAction),
    Timer,
    SequenceFinished,
    Custom(u16),
    Quit,
}

impl EventKind {
    pub fn tag(&self) -> EventTag {
        match self {
            EventKind::Joystick { motion, .. } => EventTag::Joystick(*motion),
            EventKind::Button { button, action } => EventTag::Button(*button, *action),
            EventKind::Timer(_) => EventTag::Timer,
            EventKind::SequenceFinished => EventTag::SequenceFinished,
            EventKind::Custom(code) => EventTag::Custom(*code),
            EventKind::Quit => EventTag::Quit,
        }
    }

    pub fn button(button: Button, action: ButtonAction) -> Self {
        EventKind::Button { button, action }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub at: Duration,
}

impl Event {
    pub fn new(kind: EventKind, at: Duration) -> Self {
        Self { kind, at }
    }

    pub fn tag(&self) -> EventTag {
        self.kind.tag()
    }

    pub fn is_button(&self, button: Button, action: ButtonAction) -> bool {
        self.tag() == EventTag::Button(button, action)
    }

    /// The motion of a joystick event, if this is one.
    pub fn motion(&self) -> Option<Motion> {
        match self.kind {
            EventKind::Joystick { motion, .. } => Some(motion),
            _ => None,
        }
    }

    pub fn timer_name(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Timer(name) => Some(name),
            _ => None,
        }
    }
}

pub struct EventQueue {
    events: VecDeque<Event>,
    window: Duration,
    last_generated: HashMap<EventTag, Duration>,
    now: Duration,
}

impl EventQueue {
    /// `window` is the minimum spacing between two generated events with the
    /// same tag.
    pub fn new(window: Duration) -> Self {
        Self {
            events: VecDeque::new(),
            window,
            last_generated: HashMap::new(),
            now: Duration::ZERO,
        }
    }

    pub fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Appends an event stamped with the current frame time.
    pub fn post(&mut self, kind: EventKind) {
        self.post_event(Event::new(kind, self.now));
    }

    pub fn post_event(&mut self, event: Event) {
        trace!("posted {:?}", event);
        self.events.push_back(event);
    }

    /// Appends an input-generated event unless another with the same tag was
    /// accepted within the de-duplication window. Returns whether the event
    /// was queued.
    pub fn push_generated(&mut self, kind: EventKind) -> bool {
        let tag = kind.tag();
        if let Some(last) = self.last_generated.get(&tag) {
            if self.now.saturating_sub(*last) < self.window {
                trace!("suppressed duplicate {:?}", tag);
                return false;
            }
        }
        self.last_generated.insert(tag, self.now);
        self.post(kind);
        true
    }

    /// Removes and returns every queued event in arrival order.
    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    /// True when an event matching any of `tags` is queued. An empty filter
    /// matches everything.
    pub fn peek(&self, tags: &[EventTag]) -> bool {
        if tags.is_empty() {
            return !self.events.is_empty();
        }
        self.events.iter().any(|e| tags.contains(&e.tag()))
    }

    /// Drops queued events matching any of `tags`, or every event for an
    /// empty filter.
    pub fn clear(&mut self, tags: &[EventTag]) {
        if tags.is_empty() {
            self.events.clear();
        } else {
            self.events.retain(|e| !tags.contains(&e.tag()));
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
