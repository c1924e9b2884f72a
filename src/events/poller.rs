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

use std::time::Duration;

use log::debug;

use super::{Button, ButtonAction, EventKind, EventQueue, Motion};
use crate::config::InputConfig;
use crate::hardware::{DigitalInput, Hardware};
use crate::input::{Direction, EdgeDetector, Transition};

/// Turns raw board readings into queued events once per frame.
pub struct InputPoller {
    button_a: EdgeDetector,
    button_b: EdgeDetector,
    stick_button: EdgeDetector,
    last_direction: Direction,
}

impl InputPoller {
    pub fn new(config: &InputConfig) -> Self {
        let detector = || {
            EdgeDetector::new(config.debounce(), config.long_press()).with_repeat(config.repeat())
        };
        Self {
            button_a: detector(),
            button_b: detector(),
            stick_button: detector(),
            last_direction: Direction::Center,
        }
    }

    /// Samples every input at the queue's current time and returns the number
    /// of events queued.
    pub fn poll(&mut self, hardware: &mut Hardware, queue: &mut EventQueue) -> usize {
        let now = queue.now();
        let mut queued = 0;

        let buttons: [(Button, &mut EdgeDetector, &mut Box<dyn DigitalInput>); 3] = [
            (Button::A, &mut self.button_a, &mut hardware.button_a),
            (Button::B, &mut self.button_b, &mut hardware.button_b),
            (Button::Stick, &mut self.stick_button, &mut hardware.stick_button),
        ];
        for (button, detector, input) in buttons {
            if let Some(transition) = detector.sample(input.is_active(), now) {
                let kind = EventKind::button(button, action_for(transition));
                queued += usize::from(queue.push_generated(kind));
            }
        }

        queued += usize::from(self.poll_stick(hardware, queue, now));
        queued
    }

    fn poll_stick(&mut self, hardware: &mut Hardware, queue: &mut EventQueue, now: Duration) -> bool {
        let raw = hardware.stick.read();
        let direction = hardware.joystick.direction(raw);
        if direction == self.last_direction {
            return false;
        }
        debug!("joystick {} -> {} at {:?}", self.last_direction, direction, now);
        self.last_direction = direction;

        let (x, y) = hardware.joystick.normalized(raw);
        queue.push_generated(EventKind::Joystick {
            motion: Motion::from_direction(direction),
            direction,
            x,
            y,
        })
    }
}

fn action_for(transition: Transition) -> ButtonAction {
    match transition {
        Transition::Pressed => ButtonAction::Down,
        Transition::Released => ButtonAction::Up,
        Transition::LongPress => ButtonAction::LongPress,
        Transition::RepeatWhileHeld => ButtonAction::Repeat,
    }
}
