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

//! Application configuration.
//!
//! This module manages the runtime configuration file. Every section falls
//! back to its defaults when missing, so a partial file written by hand is
//! still usable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "bitloop";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub fps: u32,
    pub input: InputConfig,
    pub audio: AudioConfig,
    pub matrix: MatrixConfig,
    pub music_dir: String,
    pub patterns_dir: String,
}

/// Debounce and classification settings for the board inputs.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub debounce_ms: u64,
    pub long_press_ms: u64,
    /// Interval for repeat events while a button is held, `None` disables
    /// them.
    pub repeat_ms: Option<u64>,
    /// Minimum spacing between two generated events of the same kind.
    pub event_window_ms: u64,
    /// Joystick dead zone in raw ADC units (0..=65535).
    pub deadzone: u16,
    pub invert_y: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AudioConfig {
    /// Upper bound for a single blocking actuation.
    pub max_slice_ms: u64,
    pub volume: f32,
}

/// Geometry and brightness of the LED matrix.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MatrixConfig {
    pub width: usize,
    pub height: usize,
    pub brightness: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            fps: 30,
            input: InputConfig::default(),
            audio: AudioConfig::default(),
            matrix: MatrixConfig::default(),
            music_dir: "assets/audio/music".to_string(),
            patterns_dir: "assets/patterns".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            long_press_ms: 1000,
            repeat_ms: Some(200),
            event_window_ms: 100,
            deadzone: 3000,
            invert_y: false,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_slice_ms: 200,
            volume: 0.3,
        }
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            brightness: 0.15,
        }
    }
}

impl InputConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn repeat(&self) -> Option<Duration> {
        self.repeat_ms.filter(|ms| *ms > 0).map(Duration::from_millis)
    }

    pub fn event_window(&self) -> Duration {
        Duration::from_millis(self.event_window_ms)
    }
}

impl AudioConfig {
    pub fn max_slice(&self) -> Duration {
        Duration::from_millis(self.max_slice_ms)
    }

    /// Volume clamped to the 0.0..=1.0 range.
    pub fn volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }
}

impl MatrixConfig {
    /// Brightness clamped to the 0.0..=1.0 range.
    pub fn brightness(&self) -> f32 {
        self.brightness.clamp(0.0, 1.0)
    }
}

/// Loads the configuration from the platform config directory.
///
/// # Note
///
/// A missing or unreadable file is not an error: the defaults are used
/// instead, and written back on the next [`save_config`].
pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

/// Stores `cfg` in the platform config directory.
///
/// # Errors
///
/// Returns the underlying [`confy::ConfyError`] if the file cannot be
/// serialised or written.
pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = AppConfig::default();
        assert_eq!(config.fps, 30);
        assert_eq!(config.input.debounce(), Duration::from_millis(100));
        assert_eq!(config.input.long_press(), Duration::from_secs(1));
        assert_eq!(config.input.repeat(), Some(Duration::from_millis(200)));
        assert_eq!(config.audio.max_slice(), Duration::from_millis(200));
        assert_eq!((config.matrix.width, config.matrix.height), (5, 5));
        assert_eq!(config.matrix.brightness(), 0.15);
        assert_eq!(config.patterns_dir, "assets/patterns");
    }

    #[test]
    fn test_zero_repeat_disables_repeats() {
        let input = InputConfig {
            repeat_ms: Some(0),
            ..InputConfig::default()
        };
        assert_eq!(input.repeat(), None);
    }

    #[test]
    fn test_volume_is_clamped() {
        let audio = AudioConfig {
            volume: 1.7,
            ..AudioConfig::default()
        };
        assert_eq!(audio.volume(), 1.0);
    }
}
