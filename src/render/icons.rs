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

//! Unicode symbols for the simulator status line.

pub(crate) const ICON_NOTE: &str = "\u{266A}";
pub(crate) const ICON_STOP: &str = "\u{23F9}";

// Filled and hollow circles for the button indicators.
pub(crate) const ICON_HELD: &str = "\u{25CF}";
pub(crate) const ICON_RELEASED: &str = "\u{25CB}";

// Arrows for the joystick indicator.
pub(crate) const ICON_UP: &str = "\u{2191}";
pub(crate) const ICON_DOWN: &str = "\u{2193}";
pub(crate) const ICON_LEFT: &str = "\u{2190}";
pub(crate) const ICON_RIGHT: &str = "\u{2192}";
pub(crate) const ICON_CENTER: &str = "\u{00B7}";

pub(crate) const ICON_LED: &str = "\u{25CF}";
