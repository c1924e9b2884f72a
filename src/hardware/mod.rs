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

//! Board capabilities.
//!
//! The runtime never talks to pins or buses directly. Each device is an
//! object behind one of the small traits in this module, and the [`Hardware`]
//! bundle owns one of each. The bundle is lent to exactly one scene at a time
//! through the scene context, so there is no sharing to coordinate.
//!
//! # Degradation
//!
//! A device that fails to initialise is replaced with a null device that
//! reads as idle and ignores output. The failure is logged once when the
//! bundle is built and the runtime carries on without it.

pub mod fake;
pub mod layout;

use std::fmt;
use std::time::Duration;

use log::{info, warn};

use crate::config::{AudioConfig, InputConfig, MatrixConfig};
use crate::input::{AXIS_CENTER, Joystick};
use crate::pattern::Pattern;
use crate::sequencer::Note;

/// Level-sensitive input such as a push button.
pub trait DigitalInput {
    fn is_active(&mut self) -> bool;
}

/// Two-axis analog input with raw 16-bit readings.
pub trait AnalogInput {
    fn read(&mut self) -> (u16, u16);
}

/// Output device driven by sequencer symbols.
///
/// `emit` may block the caller for up to `duration`, so callers keep each
/// call short.
pub trait Actuator<S> {
    fn emit(&mut self, symbol: &S, duration: Duration);

    fn silence(&mut self) {}

    /// Output level for later emissions, 0.0 (mute) to 1.0.
    fn set_volume(&mut self, _volume: f32) {}
}

/// Text surface.
pub trait DisplaySurface {
    fn render(&mut self, lines: &[TextLine]);

    /// Number of text rows that fit on the surface.
    fn rows(&self) -> usize {
        8
    }
}

/// Grid of RGB pixels such as a NeoPixel matrix.
pub trait PixelSurface {
    /// Replaces the whole frame with `pattern`.
    fn show(&mut self, pattern: &Pattern);

    fn clear(&mut self);

    /// Width and height in pixels.
    fn size(&self) -> (usize, usize) {
        (5, 5)
    }

    /// Scales every colour shown from now on, 0.0 to 1.0.
    fn set_brightness(&mut self, _level: f32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub align: Align,
}

impl TextLine {
    pub fn new(text: impl Into<String>, align: Align) -> Self {
        Self {
            text: text.into(),
            align,
        }
    }

    pub fn left(text: impl Into<String>) -> Self {
        Self::new(text, Align::Left)
    }

    pub fn center(text: impl Into<String>) -> Self {
        Self::new(text, Align::Center)
    }

    pub fn blank() -> Self {
        Self::left("")
    }
}

pub struct NullInput;

impl DigitalInput for NullInput {
    fn is_active(&mut self) -> bool {
        false
    }
}

/// Stick that always rests at the centre.
pub struct NullStick;

impl AnalogInput for NullStick {
    fn read(&mut self) -> (u16, u16) {
        (AXIS_CENTER, AXIS_CENTER)
    }
}

pub struct NullActuator;

impl<S> Actuator<S> for NullActuator {
    fn emit(&mut self, _symbol: &S, _duration: Duration) {}
}

pub struct NullDisplay;

impl DisplaySurface for NullDisplay {
    fn render(&mut self, _lines: &[TextLine]) {}
}

pub struct NullMatrix;

impl PixelSurface for NullMatrix {
    fn show(&mut self, _pattern: &Pattern) {}

    fn clear(&mut self) {}
}

pub struct Hardware {
    pub display: Box<dyn DisplaySurface>,
    pub buzzer: Box<dyn Actuator<Note>>,
    pub matrix: Box<dyn PixelSurface>,
    pub button_a: Box<dyn DigitalInput>,
    pub button_b: Box<dyn DigitalInput>,
    pub stick_button: Box<dyn DigitalInput>,
    pub stick: Box<dyn AnalogInput>,
    pub joystick: Joystick,
}

impl Hardware {
    pub fn builder() -> HardwareBuilder {
        HardwareBuilder::default()
    }

    /// A bundle made entirely of null devices.
    pub fn null() -> Self {
        Self::builder().build()
    }
}

#[derive(Default)]
pub struct HardwareBuilder {
    display: Option<Box<dyn DisplaySurface>>,
    buzzer: Option<Box<dyn Actuator<Note>>>,
    matrix: Option<Box<dyn PixelSurface>>,
    button_a: Option<Box<dyn DigitalInput>>,
    button_b: Option<Box<dyn DigitalInput>>,
    stick_button: Option<Box<dyn DigitalInput>>,
    stick: Option<Box<dyn AnalogInput>>,
    joystick: Joystick,
    volume: Option<f32>,
    brightness: Option<f32>,
}

impl HardwareBuilder {
    pub fn display<E: fmt::Display>(mut self, device: Result<Box<dyn DisplaySurface>, E>) -> Self {
        self.display = accept("display", device);
        self
    }

    pub fn buzzer<E: fmt::Display>(mut self, device: Result<Box<dyn Actuator<Note>>, E>) -> Self {
        self.buzzer = accept("buzzer", device);
        self
    }

    pub fn matrix<E: fmt::Display>(mut self, device: Result<Box<dyn PixelSurface>, E>) -> Self {
        self.matrix = accept("LED matrix", device);
        self
    }

    pub fn button_a<E: fmt::Display>(mut self, device: Result<Box<dyn DigitalInput>, E>) -> Self {
        self.button_a = accept("button A", device);
        self
    }

    pub fn button_b<E: fmt::Display>(mut self, device: Result<Box<dyn DigitalInput>, E>) -> Self {
        self.button_b = accept("button B", device);
        self
    }

    pub fn stick_button<E: fmt::Display>(
        mut self,
        device: Result<Box<dyn DigitalInput>, E>,
    ) -> Self {
        self.stick_button = accept("joystick button", device);
        self
    }

    pub fn stick<E: fmt::Display>(mut self, device: Result<Box<dyn AnalogInput>, E>) -> Self {
        self.stick = accept("joystick", device);
        self
    }

    pub fn input_config(mut self, config: &InputConfig) -> Self {
        self.joystick = Joystick::new(config.deadzone).with_inversion(false, config.invert_y);
        self
    }

    /// Applies the configured buzzer volume once the bundle is built.
    pub fn audio_config(mut self, config: &AudioConfig) -> Self {
        self.volume = Some(config.volume());
        self
    }

    /// Applies the configured matrix brightness once the bundle is built.
    pub fn matrix_config(mut self, config: &MatrixConfig) -> Self {
        self.brightness = Some(config.brightness());
        self
    }

    /// Fills any missing device with its null counterpart, calibrates the
    /// joystick centre from a first reading and applies the output levels.
    pub fn build(self) -> Hardware {
        let mut stick = self.stick.unwrap_or_else(|| Box::new(NullStick));
        let mut joystick = self.joystick;
        let rest = stick.read();
        joystick.calibrate(rest);
        info!("joystick calibrated at {:?}", rest);

        let mut buzzer = self.buzzer.unwrap_or_else(|| Box::new(NullActuator));
        if let Some(volume) = self.volume {
            buzzer.set_volume(volume);
        }
        let mut matrix = self.matrix.unwrap_or_else(|| Box::new(NullMatrix));
        if let Some(level) = self.brightness {
            matrix.set_brightness(level);
        }

        Hardware {
            display: self.display.unwrap_or_else(|| Box::new(NullDisplay)),
            buzzer,
            matrix,
            button_a: self.button_a.unwrap_or_else(|| Box::new(NullInput)),
            button_b: self.button_b.unwrap_or_else(|| Box::new(NullInput)),
            stick_button: self.stick_button.unwrap_or_else(|| Box::new(NullInput)),
            stick,
            joystick,
        }
    }
}

fn accept<T, E: fmt::Display>(name: &str, device: Result<T, E>) -> Option<T> {
    match device {
        Ok(device) => Some(device),
        Err(e) => {
            warn!("{} unavailable, continuing without it: {}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::fake::{
        RecordingActuator, RecordingDisplay, RecordingMatrix, ScriptedButton, ScriptedStick,
    };

    #[test]
    fn test_failed_device_falls_back_to_null() {
        let mut hardware = Hardware::builder()
            .button_a(Err::<Box<dyn DigitalInput>, _>("pin 16 busy"))
            .build();
        assert!(!hardware.button_a.is_active());
        assert_eq!(hardware.stick.read(), (AXIS_CENTER, AXIS_CENTER));
    }

    #[test]
    fn test_working_devices_are_kept() {
        let button = ScriptedButton::new();
        let display = RecordingDisplay::new();
        let mut hardware = Hardware::builder()
            .button_a(Ok::<_, String>(Box::new(button.clone()) as Box<dyn DigitalInput>))
            .display(Ok::<_, String>(Box::new(display.clone()) as Box<dyn DisplaySurface>))
            .build();

        button.set(true);
        assert!(hardware.button_a.is_active());

        hardware.display.render(&[TextLine::center("HELLO")]);
        assert_eq!(display.last_frame(), vec![TextLine::center("HELLO")]);
    }

    #[test]
    fn test_build_calibrates_from_resting_stick() {
        let stick = ScriptedStick::at((30000, 31000));
        let hardware = Hardware::builder()
            .stick(Ok::<_, String>(Box::new(stick) as Box<dyn AnalogInput>))
            .build();
        assert_eq!(hardware.joystick.center(), (30000, 31000));
    }

    #[test]
    fn test_output_levels_reach_devices() {
        let buzzer = RecordingActuator::<Note>::new();
        let matrix = RecordingMatrix::new();
        let audio = AudioConfig {
            volume: 0.6,
            ..AudioConfig::default()
        };
        let leds = MatrixConfig {
            brightness: 1.5,
            ..MatrixConfig::default()
        };
        Hardware::builder()
            .buzzer(Ok::<_, String>(Box::new(buzzer.clone()) as Box<dyn Actuator<Note>>))
            .matrix(Ok::<_, String>(Box::new(matrix.clone()) as Box<dyn PixelSurface>))
            .audio_config(&audio)
            .matrix_config(&leds)
            .build();

        assert_eq!(buzzer.volume(), Some(0.6));
        assert_eq!(matrix.brightness(), Some(1.0));
    }

    #[test]
    fn test_missing_matrix_is_null() {
        let mut hardware = Hardware::null();
        hardware.matrix.show(&Pattern::blank(5, 5));
        assert_eq!(hardware.matrix.size(), (5, 5));
    }
}
