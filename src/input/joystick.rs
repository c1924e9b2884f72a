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

//! Analog joystick classification.
//!
//! Raw readings are 16-bit ADC values per axis. They are normalised against
//! the calibrated centre into -1.0..=1.0, with a dead zone around the centre,
//! and then classified into one of nine directions. Low raw `y` is north
//! unless the axis is inverted.

use std::fmt;

pub const AXIS_CENTER: u16 = 32768;

const AXIS_MAX: f32 = u16::MAX as f32;

/// Both normalised axes must be inside this radius for the stick to count
/// as centred.
const CENTER_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub fn is_northward(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::NorthWest
        )
    }

    pub fn is_southward(self) -> bool {
        matches!(
            self,
            Direction::South | Direction::SouthEast | Direction::SouthWest
        )
    }

    pub fn is_eastward(self) -> bool {
        matches!(
            self,
            Direction::East | Direction::NorthEast | Direction::SouthEast
        )
    }

    pub fn is_westward(self) -> bool {
        matches!(
            self,
            Direction::West | Direction::NorthWest | Direction::SouthWest
        )
    }

    fn from_angle(degrees: f32) -> Self {
        match degrees {
            a if (22.5..67.5).contains(&a) => Direction::NorthEast,
            a if (67.5..112.5).contains(&a) => Direction::North,
            a if (112.5..157.5).contains(&a) => Direction::NorthWest,
            a if (157.5..202.5).contains(&a) => Direction::West,
            a if (202.5..247.5).contains(&a) => Direction::SouthWest,
            a if (247.5..292.5).contains(&a) => Direction::South,
            a if (292.5..337.5).contains(&a) => Direction::SouthEast,
            _ => Direction::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Center => "C",
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Joystick {
    center: (u16, u16),
    deadzone: u16,
    invert_x: bool,
    invert_y: bool,
}

impl Joystick {
    pub fn new(deadzone: u16) -> Self {
        Self {
            center: (AXIS_CENTER, AXIS_CENTER),
            deadzone,
            invert_x: false,
            invert_y: false,
        }
    }

    pub fn with_inversion(mut self, invert_x: bool, invert_y: bool) -> Self {
        self.invert_x = invert_x;
        self.invert_y = invert_y;
        self
    }

    /// Takes `raw` as the resting position of the stick.
    pub fn calibrate(&mut self, raw: (u16, u16)) {
        self.center = raw;
    }

    pub fn center(&self) -> (u16, u16) {
        self.center
    }

    pub fn normalized(&self, raw: (u16, u16)) -> (f32, f32) {
        (
            self.normalize_axis(raw.0, self.center.0, self.invert_x),
            self.normalize_axis(raw.1, self.center.1, self.invert_y),
        )
    }

    pub fn direction(&self, raw: (u16, u16)) -> Direction {
        let (x, y) = self.normalized(raw);
        if x.abs() < CENTER_THRESHOLD && y.abs() < CENTER_THRESHOLD {
            return Direction::Center;
        }
        Direction::from_angle(heading(x, y))
    }

    /// Heading in degrees, 0 east and 90 north, or `None` when centred.
    pub fn angle(&self, raw: (u16, u16)) -> Option<f32> {
        let (x, y) = self.normalized(raw);
        if x == 0.0 && y == 0.0 {
            return None;
        }
        Some(heading(x, y))
    }

    /// Deflection from centre, 0.0..=1.0.
    pub fn distance(&self, raw: (u16, u16)) -> f32 {
        let (x, y) = self.normalized(raw);
        x.hypot(y).min(1.0)
    }

    fn normalize_axis(&self, raw: u16, center: u16, invert: bool) -> f32 {
        let center = f32::from(center);
        let offset = f32::from(raw) - center;
        if offset.abs() < f32::from(self.deadzone) {
            return 0.0;
        }
        let span = if offset < 0.0 { center } else { AXIS_MAX - center };
        if span <= 0.0 {
            return 0.0;
        }
        let value = (offset / span).clamp(-1.0, 1.0);
        if invert { -value } else { value }
    }
}

impl Default for Joystick {
    fn default() -> Self {
        Self::new(3000)
    }
}

fn heading(x: f32, y: f32) -> f32 {
    let degrees = (-y).atan2(x).to_degrees();
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_stick_is_center() {
        let stick = Joystick::default();
        assert_eq!(stick.direction((AXIS_CENTER, AXIS_CENTER)), Direction::Center);
        assert_eq!(stick.angle((AXIS_CENTER, AXIS_CENTER)), None);
        assert_eq!(stick.distance((AXIS_CENTER, AXIS_CENTER)), 0.0);
    }

    #[test]
    fn test_deadzone_swallows_small_deflection() {
        let stick = Joystick::default();
        assert_eq!(stick.normalized((AXIS_CENTER + 2000, AXIS_CENTER)), (0.0, 0.0));
    }

    #[test]
    fn test_cardinal_directions() {
        let stick = Joystick::default();
        assert_eq!(stick.direction((AXIS_CENTER, 0)), Direction::North);
        assert_eq!(stick.direction((AXIS_CENTER, u16::MAX)), Direction::South);
        assert_eq!(stick.direction((u16::MAX, AXIS_CENTER)), Direction::East);
        assert_eq!(stick.direction((0, AXIS_CENTER)), Direction::West);
    }

    #[test]
    fn test_diagonals() {
        let stick = Joystick::default();
        assert_eq!(stick.direction((0, 0)), Direction::NorthWest);
        assert_eq!(stick.direction((u16::MAX, 0)), Direction::NorthEast);
        assert_eq!(stick.direction((u16::MAX, u16::MAX)), Direction::SouthEast);
        assert_eq!(stick.direction((0, u16::MAX)), Direction::SouthWest);
    }

    #[test]
    fn test_inverted_y_swaps_north_and_south() {
        let stick = Joystick::default().with_inversion(false, true);
        assert_eq!(stick.direction((AXIS_CENTER, 0)), Direction::South);
        assert_eq!(stick.direction((AXIS_CENTER, u16::MAX)), Direction::North);
    }

    #[test]
    fn test_calibration_moves_center() {
        let mut stick = Joystick::default();
        stick.calibrate((30000, 30000));
        assert_eq!(stick.direction((30000, 30000)), Direction::Center);
        assert_eq!(stick.direction((30000, 0)), Direction::North);
    }

    #[test]
    fn test_inversion_applies_after_calibration() {
        let mut stick = Joystick::default().with_inversion(false, true);
        stick.calibrate((30000, 30000));
        assert_eq!(stick.direction((30000, 30000)), Direction::Center);
        assert_eq!(stick.direction((30000, 0)), Direction::South);
    }

    #[test]
    fn test_angle_and_distance_at_full_deflection() {
        let stick = Joystick::default();
        let angle = stick.angle((AXIS_CENTER, 0)).unwrap();
        assert!((angle - 90.0).abs() < 0.5);
        assert!((stick.distance((u16::MAX, AXIS_CENTER)) - 1.0).abs() < 1e-3);
    }
}
