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

//! Error types.
//!
//! Very little in the runtime is allowed to fail. Input noise, unknown scene
//! names and broken melody steps are all absorbed and logged where they occur.
//! What remains are construction errors and loader failures, which callers
//! are expected to downgrade to an empty sequence.

use std::io;

use thiserror::Error;

/// Errors raised while building or starting the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("frame rate must be at least 1 fps, got {0}")]
    InvalidFps(u32),

    #[error("no root scene has been started")]
    NoRootScene,
}

/// Errors raised by a [`SequenceLoader`](crate::sequencer::SequenceLoader) or
/// a [`PatternLoader`](crate::pattern::PatternLoader).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("asset '{0}' not found")]
    NotFound(String),

    #[error("asset '{id}' is malformed: {reason}")]
    Malformed { id: String, reason: String },

    #[error("failed to read asset '{id}'")]
    Io {
        id: String,
        #[source]
        source: io::Error,
    },
}
