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

//! Non-blocking playback of timed symbol sequences.
//!
//! # Architecture
//!
//! A [`Sequencer`] owns a list of [`Step`]s and is advanced by calling
//! [`Sequencer::update`] once per frame with the current time. It never
//! sleeps on its own account; the only time spent inside `update` is the
//! actuator call, which is bounded by the configured maximum slice.
//!
//! The schedule is drift-free: step *i* starts at the start time plus the
//! sum of the durations before it, regardless of how late any individual
//! frame was. A long step is actuated in several slices, each emitted once
//! the step has run for as long as has already been emitted, so the
//! actuator is kept busy without ever blocking for the whole step.
//!
//! Steps with an unknown symbol, or a duration that is negative, not finite
//! or too large to schedule, are skipped with a warning and take no time.

mod melody;

use std::time::Duration;

use log::{debug, warn};

use crate::hardware::Actuator;

pub use melody::{
    MelodyDir, MelodyFormat, Note, SequenceLoader, load_or_empty, note_frequency,
    parse_melody,
};

/// Default upper bound for a single actuation.
pub const DEFAULT_MAX_SLICE: Duration = Duration::from_millis(200);

/// A value a sequencer can play.
pub trait Symbol {
    /// Rests take time but are never sent to the actuator.
    fn is_rest(&self) -> bool;

    fn is_known(&self) -> bool {
        true
    }
}

/// Plain frequencies in hertz, zero being a rest.
impl Symbol for u32 {
    fn is_rest(&self) -> bool {
        *self == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    pub symbol: S,
    pub duration_secs: f64,
}

impl<S> Step<S> {
    pub fn new(symbol: S, duration_secs: f64) -> Self {
        Self {
            symbol,
            duration_secs,
        }
    }

    /// `None` when the duration is negative, not a number or too large to
    /// represent.
    fn duration(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.duration_secs).ok()
    }
}

impl<S: Symbol> Step<S> {
    pub fn is_malformed(&self) -> bool {
        !self.symbol.is_known() || self.duration().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Stopped,
    Playing,
    Paused,
}

/// Outcome of a single [`Sequencer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Not playing; nothing was done.
    Idle,
    Playing,
    /// The last step has elapsed. Reported exactly once per run.
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub skipped: usize,
    pub emitted: usize,
}

pub struct Sequencer<S> {
    steps: Vec<Step<S>>,
    state: SequencerState,
    max_slice: Duration,
    next: usize,
    current: Option<usize>,
    step_started: Duration,
    next_due: Duration,
    emitted: Duration,
    paused_at: Option<Duration>,
    diagnostics: Diagnostics,
}

impl<S: Symbol> Sequencer<S> {
    pub fn new(max_slice: Duration) -> Self {
        Self {
            steps: Vec::new(),
            state: SequencerState::Stopped,
            max_slice: max_slice.max(Duration::from_millis(1)),
            next: 0,
            current: None,
            step_started: Duration::ZERO,
            next_due: Duration::ZERO,
            emitted: Duration::ZERO,
            paused_at: None,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Replaces any current sequence and starts playing from `now`.
    pub fn start(&mut self, steps: Vec<Step<S>>, now: Duration) {
        debug!("sequencer starting {} steps", steps.len());
        self.steps = steps;
        self.state = SequencerState::Playing;
        self.next = 0;
        self.current = None;
        self.step_started = now;
        self.next_due = now;
        self.emitted = Duration::ZERO;
        self.paused_at = None;
        self.diagnostics = Diagnostics::default();
    }

    /// Advances playback to `now`.
    ///
    /// # Arguments
    ///
    /// * `now` - Current time, on the same clock as the `start` time.
    /// * `actuator` - Device the current step is emitted to.
    ///
    /// # Note
    ///
    /// Emits at most one slice per call, so a call never blocks for longer
    /// than the maximum slice.
    pub fn update(&mut self, now: Duration, actuator: &mut dyn Actuator<S>) -> Progress {
        if self.state != SequencerState::Playing {
            return Progress::Idle;
        }

        while now >= self.next_due {
            let Some(step) = self.steps.get(self.next) else {
                self.finish(actuator);
                return Progress::Completed;
            };
            let index = self.next;
            self.next += 1;
            let due = step
                .duration()
                .filter(|_| step.symbol.is_known())
                .and_then(|duration| self.next_due.checked_add(duration));
            let Some(due) = due else {
                warn!(
                    "skipping malformed step {} (duration {})",
                    index, step.duration_secs
                );
                self.diagnostics.skipped += 1;
                continue;
            };
            self.current = Some(index);
            self.step_started = self.next_due;
            self.next_due = due;
            self.emitted = Duration::ZERO;
        }

        self.actuate(now, actuator);
        Progress::Playing
    }

    fn actuate(&mut self, now: Duration, actuator: &mut dyn Actuator<S>) {
        let Some(step) = self.current.and_then(|index| self.steps.get(index)) else {
            return;
        };
        if step.symbol.is_rest() {
            return;
        }
        let Some(total) = step.duration() else {
            return;
        };
        let elapsed = now.saturating_sub(self.step_started);
        if self.emitted < total && elapsed >= self.emitted {
            let slice = self.max_slice.min(total - self.emitted);
            actuator.emit(&step.symbol, slice);
            self.emitted += slice;
            self.diagnostics.emitted += 1;
        }
    }

    fn finish(&mut self, actuator: &mut dyn Actuator<S>) {
        debug!(
            "sequence complete, {} emitted, {} skipped",
            self.diagnostics.emitted, self.diagnostics.skipped
        );
        self.state = SequencerState::Stopped;
        self.current = None;
        actuator.silence();
    }

    pub fn pause(&mut self, now: Duration) {
        if self.state == SequencerState::Playing {
            self.state = SequencerState::Paused;
            self.paused_at = Some(now);
        }
    }

    /// Continues a paused sequence, shifting the remaining schedule by the
    /// time spent paused.
    pub fn resume(&mut self, now: Duration) {
        if self.state != SequencerState::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            let shift = now.saturating_sub(paused_at);
            self.step_started += shift;
            self.next_due += shift;
        }
        self.state = SequencerState::Playing;
    }

    pub fn stop(&mut self, actuator: &mut dyn Actuator<S>) {
        if self.state != SequencerState::Stopped {
            debug!("sequencer stopped at step {}", self.next);
        }
        self.state = SequencerState::Stopped;
        self.current = None;
        self.paused_at = None;
        actuator.silence();
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SequencerState::Playing
    }

    /// Fraction of steps started, 0.0..=1.0.
    pub fn progress(&self) -> f32 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.next as f32 / self.steps.len() as f32
    }

    /// Index of the step currently in progress.
    pub fn current_index(&self) -> Option<usize> {
        if self.state == SequencerState::Stopped {
            return None;
        }
        self.current
    }

    pub fn current_step(&self) -> Option<&Step<S>> {
        self.current_index().and_then(|index| self.steps.get(index))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }
}

impl<S: Symbol> Default for Sequencer<S> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SLICE)
    }
}
