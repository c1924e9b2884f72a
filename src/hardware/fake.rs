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

//! Scriptable devices for driving the runtime without a board.
//!
//! Every fake is a cheap handle over shared state: clone it, hand one copy
//! to the [`Hardware`](super::Hardware) bundle and keep the other to set
//! inputs or inspect output.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::{Actuator, AnalogInput, DigitalInput, DisplaySurface, PixelSurface, TextLine};
use crate::input::AXIS_CENTER;
use crate::pattern::Pattern;

#[derive(Debug, Clone, Default)]
pub struct ScriptedButton {
    pressed: Rc<Cell<bool>>,
}

impl ScriptedButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pressed: bool) {
        self.pressed.set(pressed);
    }
}

impl DigitalInput for ScriptedButton {
    fn is_active(&mut self) -> bool {
        self.pressed.get()
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedStick {
    position: Rc<Cell<(u16, u16)>>,
}

impl ScriptedStick {
    pub fn new() -> Self {
        Self::at((AXIS_CENTER, AXIS_CENTER))
    }

    pub fn at(position: (u16, u16)) -> Self {
        Self {
            position: Rc::new(Cell::new(position)),
        }
    }

    pub fn set(&self, position: (u16, u16)) {
        self.position.set(position);
    }
}

impl Default for ScriptedStick {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogInput for ScriptedStick {
    fn read(&mut self) -> (u16, u16) {
        self.position.get()
    }
}

/// Actuator that records every emission instead of producing output.
#[derive(Debug, Clone)]
pub struct RecordingActuator<S> {
    emitted: Rc<RefCell<Vec<(S, Duration)>>>,
    silenced: Rc<Cell<usize>>,
    volume: Rc<Cell<Option<f32>>>,
}

impl<S: Clone> RecordingActuator<S> {
    pub fn new() -> Self {
        Self {
            emitted: Rc::new(RefCell::new(Vec::new())),
            silenced: Rc::new(Cell::new(0)),
            volume: Rc::new(Cell::new(None)),
        }
    }

    pub fn emitted(&self) -> Vec<(S, Duration)> {
        self.emitted.borrow().clone()
    }

    pub fn silence_count(&self) -> usize {
        self.silenced.get()
    }

    /// Last volume set, if any.
    pub fn volume(&self) -> Option<f32> {
        self.volume.get()
    }
}

impl<S: Clone> Default for RecordingActuator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> Actuator<S> for RecordingActuator<S> {
    fn emit(&mut self, symbol: &S, duration: Duration) {
        self.emitted.borrow_mut().push((symbol.clone(), duration));
    }

    fn silence(&mut self) {
        self.silenced.set(self.silenced.get() + 1);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume.set(Some(volume));
    }
}

/// Display that keeps every rendered frame.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    frames: Rc<RefCell<Vec<Vec<TextLine>>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last_frame(&self) -> Vec<TextLine> {
        self.frames.borrow().last().cloned().unwrap_or_default()
    }

    /// True when any line of the last frame contains `needle`.
    pub fn shows(&self, needle: &str) -> bool {
        self.last_frame()
            .iter()
            .any(|line| line.text.contains(needle))
    }
}

impl DisplaySurface for RecordingDisplay {
    fn render(&mut self, lines: &[TextLine]) {
        self.frames.borrow_mut().push(lines.to_vec());
    }
}

/// Matrix that keeps the pattern on show, `None` once cleared.
#[derive(Debug, Clone, Default)]
pub struct RecordingMatrix {
    showing: Rc<RefCell<Option<Pattern>>>,
    brightness: Rc<Cell<Option<f32>>>,
}

impl RecordingMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn showing(&self) -> Option<Pattern> {
        self.showing.borrow().clone()
    }

    pub fn brightness(&self) -> Option<f32> {
        self.brightness.get()
    }
}

impl PixelSurface for RecordingMatrix {
    fn show(&mut self, pattern: &Pattern) {
        *self.showing.borrow_mut() = Some(pattern.clone());
    }

    fn clear(&mut self) {
        *self.showing.borrow_mut() = None;
    }

    fn set_brightness(&mut self, level: f32) {
        self.brightness.set(Some(level));
    }
}
