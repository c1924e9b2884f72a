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

//! Terminal background control.
//!
//! The simulator paints the whole emulator window in the board colour while
//! it runs, using OSC (Operating System Command) escape sequences.
//!
//! # Compatibility
//!
//! Terminals that do not understand OSC 11/111 ignore the sequences and keep
//! their own colours, so both functions are safe to call everywhere.

use std::io::{self, Write};

/// Sets the terminal background with an OSC 11 escape sequence.
///
/// # Arguments
///
/// * `hex_color` - The board colour as a CSS-style string, e.g. `"#14281e"`.
///
/// # Note
///
/// `stdout` is flushed straight away so the colour is in place before the
/// alternate screen is entered. A failed flush is ignored; the simulator
/// then simply runs on the user's background.
pub(crate) fn set_terminal_bg(hex_color: &str) {
    print!("\x1b]11;{}\x07", hex_color);
    io::stdout().flush().ok();
}

/// Reverts the terminal background to the user's own colour (OSC 111).
///
/// # Note
///
/// Called from terminal teardown, including after a failed run, so it never
/// reports an error.
pub(crate) fn reset_terminal_bg() {
    print!("\x1b]111\x07");
    io::stdout().flush().ok();
}
