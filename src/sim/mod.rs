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

//! Simulated board running inside the terminal.
//!
//! The devices handed to the runtime are thin handles over state shared with
//! the [`Board`]. The main loop pumps keyboard input into the board before
//! each frame and draws the board's screen, LED matrix and buzzer state
//! after it.

mod keypad;

pub(crate) use keypad::SimKey;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::trace;

use bitloop::config::AppConfig;
use bitloop::hardware::{
    Actuator, AnalogInput, DigitalInput, DisplaySurface, Hardware, PixelSurface, TextLine,
};
use bitloop::input::AXIS_CENTER;
use bitloop::pattern::Pattern;
use bitloop::sequencer::Note;

use crate::sim::keypad::Keypad;

/// Rows of text on the simulated 128x64 OLED.
pub(crate) const SCREEN_ROWS: usize = 8;
/// Characters per row on the simulated OLED.
pub(crate) const SCREEN_COLUMNS: usize = 16;

#[derive(Debug)]
pub(crate) struct BuzzerState {
    tone: Option<u32>,
    until: Option<Instant>,
    emitted: u64,
    volume: f32,
}

impl Default for BuzzerState {
    fn default() -> Self {
        Self {
            tone: None,
            until: None,
            emitted: 0,
            volume: 1.0,
        }
    }
}

impl BuzzerState {
    /// Frequency currently sounding, if any.
    pub(crate) fn sounding(&self, now: Instant) -> Option<u32> {
        match (self.tone, self.until) {
            (Some(hz), Some(until)) if now < until => Some(hz),
            _ => None,
        }
    }

    pub(crate) fn emitted(&self) -> u64 {
        self.emitted
    }

    pub(crate) fn volume(&self) -> f32 {
        self.volume
    }
}

#[derive(Debug)]
pub(crate) struct MatrixState {
    size: (usize, usize),
    showing: Option<Pattern>,
    brightness: f32,
}

pub(crate) struct Board {
    keypad: Rc<RefCell<Keypad>>,
    screen: Rc<RefCell<Vec<TextLine>>>,
    buzzer: Rc<RefCell<BuzzerState>>,
    matrix: Rc<RefCell<MatrixState>>,
}

impl Board {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self {
            keypad: Rc::new(RefCell::new(Keypad::default())),
            screen: Rc::new(RefCell::new(Vec::new())),
            buzzer: Rc::new(RefCell::new(BuzzerState::default())),
            matrix: Rc::new(RefCell::new(MatrixState {
                size: (config.matrix.width, config.matrix.height),
                showing: None,
                brightness: 1.0,
            })),
        }
    }

    /// Builds the device bundle for the runtime.
    pub(crate) fn hardware(&self, config: &AppConfig) -> Hardware {
        let button = |key| -> Result<Box<dyn DigitalInput>> {
            Ok(Box::new(SimButton {
                keypad: self.keypad.clone(),
                key,
            }))
        };
        let stick: Result<Box<dyn AnalogInput>> = Ok(Box::new(SimStick {
            keypad: self.keypad.clone(),
            invert_y: config.input.invert_y,
        }));
        let display: Result<Box<dyn DisplaySurface>> = Ok(Box::new(SimScreen {
            lines: self.screen.clone(),
        }));
        let buzzer: Result<Box<dyn Actuator<Note>>> = Ok(Box::new(SimBuzzer {
            state: self.buzzer.clone(),
        }));
        let matrix: Result<Box<dyn PixelSurface>> = Ok(Box::new(SimMatrix {
            state: self.matrix.clone(),
        }));

        Hardware::builder()
            .input_config(&config.input)
            .button_a(button(SimKey::A))
            .button_b(button(SimKey::B))
            .stick_button(button(SimKey::Push))
            .stick(stick)
            .display(display)
            .buzzer(buzzer)
            .matrix(matrix)
            .audio_config(&config.audio)
            .matrix_config(&config.matrix)
            .build()
    }

    pub(crate) fn pump(&self) -> Result<()> {
        self.keypad.borrow_mut().pump()
    }

    pub(crate) fn take_quit(&self) -> bool {
        self.keypad.borrow_mut().take_quit()
    }

    pub(crate) fn screen(&self) -> Vec<TextLine> {
        self.screen.borrow().clone()
    }

    pub(crate) fn tone(&self) -> Option<u32> {
        self.buzzer.borrow().sounding(Instant::now())
    }

    pub(crate) fn tones_emitted(&self) -> u64 {
        self.buzzer.borrow().emitted()
    }

    pub(crate) fn volume(&self) -> f32 {
        self.buzzer.borrow().volume()
    }

    /// Pattern on the matrix, `None` when it is dark.
    pub(crate) fn matrix(&self) -> Option<Pattern> {
        self.matrix.borrow().showing.clone()
    }

    pub(crate) fn matrix_size(&self) -> (usize, usize) {
        self.matrix.borrow().size
    }

    pub(crate) fn brightness(&self) -> f32 {
        self.matrix.borrow().brightness
    }

    pub(crate) fn held_keys(&self) -> Vec<SimKey> {
        self.keypad.borrow().held(Instant::now())
    }
}

struct SimButton {
    keypad: Rc<RefCell<Keypad>>,
    key: SimKey,
}

impl DigitalInput for SimButton {
    fn is_active(&mut self) -> bool {
        self.keypad.borrow().is_held(self.key, Instant::now())
    }
}

/// Arrow keys pushed to the ends of the axes.
struct SimStick {
    keypad: Rc<RefCell<Keypad>>,
    invert_y: bool,
}

impl AnalogInput for SimStick {
    fn read(&mut self) -> (u16, u16) {
        let keypad = self.keypad.borrow();
        let now = Instant::now();
        let held = |key| keypad.is_held(key, now);

        let x = if held(SimKey::Left) {
            0
        } else if held(SimKey::Right) {
            u16::MAX
        } else {
            AXIS_CENTER
        };
        let (north, south) = if self.invert_y {
            (u16::MAX, 0)
        } else {
            (0, u16::MAX)
        };
        let y = if held(SimKey::Up) {
            north
        } else if held(SimKey::Down) {
            south
        } else {
            AXIS_CENTER
        };
        (x, y)
    }
}

struct SimScreen {
    lines: Rc<RefCell<Vec<TextLine>>>,
}

impl DisplaySurface for SimScreen {
    fn render(&mut self, lines: &[TextLine]) {
        let mut screen = self.lines.borrow_mut();
        screen.clear();
        screen.extend(lines.iter().take(SCREEN_ROWS).cloned());
    }

    fn rows(&self) -> usize {
        SCREEN_ROWS
    }
}

/// Records the tone instead of sounding it, and returns straight away.
/// Nothing sounds at zero volume.
struct SimBuzzer {
    state: Rc<RefCell<BuzzerState>>,
}

impl Actuator<Note> for SimBuzzer {
    fn emit(&mut self, note: &Note, duration: Duration) {
        let Some(hz) = note.frequency() else {
            return;
        };
        let mut state = self.state.borrow_mut();
        if state.volume <= 0.0 {
            trace!("buzzer muted, dropping {} Hz", hz);
            return;
        }
        trace!("buzzer {} Hz for {:?}", hz, duration);
        state.tone = Some(hz);
        state.until = Some(Instant::now() + duration);
        state.emitted += 1;
    }

    fn silence(&mut self) {
        let mut state = self.state.borrow_mut();
        state.tone = None;
        state.until = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }
}

struct SimMatrix {
    state: Rc<RefCell<MatrixState>>,
}

impl PixelSurface for SimMatrix {
    fn show(&mut self, pattern: &Pattern) {
        self.state.borrow_mut().showing = Some(pattern.clone());
    }

    fn clear(&mut self) {
        self.state.borrow_mut().showing = None;
    }

    fn size(&self) -> (usize, usize) {
        self.state.borrow().size
    }

    fn set_brightness(&mut self, level: f32) {
        self.state.borrow_mut().brightness = level;
    }
}
