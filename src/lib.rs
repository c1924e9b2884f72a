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

//! Cooperative interaction runtime for small single-threaded boards.
//!
//! # Organization
//!
//! * [`input`]: debounced button edges and joystick classification.
//! * [`events`]: the event queue and the input poller feeding it.
//! * [`clock`]: time sources and frame pacing.
//! * [`timer`]: named countdown timers.
//! * [`sequencer`]: non-blocking playback of timed symbol sequences, and the
//!   melody file loader.
//! * [`pattern`]: LED matrix patterns and their loader.
//! * [`assets`]: listing and reading the text asset directories.
//! * [`hardware`]: device traits and the bundle lent to scenes.
//! * [`scene`]: scenes and the scene stack.
//! * [`runtime`]: the loop that ties all of the above together.

pub mod assets;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod hardware;
pub mod input;
pub mod pattern;
pub mod runtime;
pub mod scene;
pub mod sequencer;
pub mod timer;

pub use error::{LoadError, RuntimeError};
pub use runtime::{LoopStatus, Runtime};
