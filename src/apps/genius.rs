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

//! Repeat-the-pattern memory game.
//!
//! Each round appends a random arrow to the pattern, plays the whole pattern
//! back as tones while showing the arrows, then waits for the player to
//! repeat it with the joystick. Pauses between stages run on scene timers.

use std::time::Duration;

use log::{debug, info};
use rand::{rng, seq::SliceRandom};

use bitloop::config::AppConfig;
use bitloop::events::{Button, ButtonAction, Event, EventKind, Motion};
use bitloop::hardware::TextLine;
use bitloop::scene::{Navigation, Scene, SceneContext};
use bitloop::sequencer::{Note, Progress, Sequencer, Step};

use crate::apps::error_beep;

const NEXT_STAGE: &str = "genius.next";

const READY_DELAY: Duration = Duration::from_millis(1500);
const CORRECT_DELAY: Duration = Duration::from_millis(1000);
const WRONG_DELAY: Duration = Duration::from_millis(1500);

const TONE_SECS: f64 = 0.5;
const GAP_SECS: f64 = 0.2;
const ECHO_LENGTH: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

impl Arrow {
    const ALL: [Arrow; 4] = [Arrow::Up, Arrow::Down, Arrow::Left, Arrow::Right];

    fn random() -> Self {
        let mut arrows = Self::ALL;
        arrows.shuffle(&mut rng());
        arrows[0]
    }

    fn from_motion(motion: Motion) -> Option<Self> {
        match motion {
            Motion::Up => Some(Arrow::Up),
            Motion::Down => Some(Arrow::Down),
            Motion::Left => Some(Arrow::Left),
            Motion::Right => Some(Arrow::Right),
            Motion::Center => None,
        }
    }

    fn note(self) -> Note {
        Note::Tone(match self {
            Arrow::Up => 330,
            Arrow::Down => 349,
            Arrow::Left => 262,
            Arrow::Right => 294,
        })
    }

    fn label(self) -> &'static str {
        match self {
            Arrow::Up => "^ UP ^",
            Arrow::Down => "v DOWN v",
            Arrow::Left => "< LEFT",
            Arrow::Right => "RIGHT >",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Ready,
    Showing,
    Input,
    Correct,
    Wrong,
    GameOver,
}

pub(crate) struct Genius {
    stage: Stage,
    pattern: Vec<Arrow>,
    position: usize,
    best: usize,
    sequencer: Sequencer<Note>,
    shown_step: Option<usize>,
}

impl Genius {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self {
            stage: Stage::Ready,
            pattern: Vec::new(),
            position: 0,
            best: 0,
            sequencer: Sequencer::new(config.audio.max_slice()),
            shown_step: None,
        }
    }

    fn restart(&mut self, ctx: &mut SceneContext<'_>) {
        self.pattern.clear();
        self.position = 0;
        self.stage = Stage::Ready;
        ctx.schedule(NEXT_STAGE, READY_DELAY, false);
        ctx.mark_dirty();
    }

    fn score(&self) -> usize {
        match self.stage {
            // The last arrow of a failed round does not count.
            Stage::Wrong | Stage::GameOver => self.pattern.len().saturating_sub(1),
            _ => self.pattern.len(),
        }
    }

    fn next_round(&mut self, ctx: &mut SceneContext<'_>) {
        self.pattern.push(Arrow::random());
        debug!("round {} pattern {:?}", self.pattern.len(), self.pattern);

        let steps = self
            .pattern
            .iter()
            .flat_map(|arrow| [Step::new(arrow.note(), TONE_SECS), Step::new(Note::Rest, GAP_SECS)])
            .collect();
        self.sequencer.start(steps, ctx.now);
        self.shown_step = None;
        self.stage = Stage::Showing;
        ctx.mark_dirty();
    }

    fn guess(&mut self, arrow: Arrow, ctx: &mut SceneContext<'_>) {
        if self.pattern.get(self.position) != Some(&arrow) {
            info!("wrong guess, score {}", self.pattern.len().saturating_sub(1));
            error_beep(ctx);
            self.stage = Stage::Wrong;
            ctx.schedule(NEXT_STAGE, WRONG_DELAY, false);
            ctx.mark_dirty();
            return;
        }

        ctx.hardware.buzzer.emit(&arrow.note(), ECHO_LENGTH);
        self.position += 1;
        if self.position == self.pattern.len() {
            self.best = self.best.max(self.pattern.len());
            self.stage = Stage::Correct;
            ctx.schedule(NEXT_STAGE, CORRECT_DELAY, false);
        }
        ctx.mark_dirty();
    }

    /// Arrow being played back right now, if a tone step is sounding.
    fn showing(&self) -> Option<Arrow> {
        let index = self.sequencer.current_index()?;
        if index % 2 == 1 {
            return None;
        }
        self.pattern.get(index / 2).copied()
    }

    fn lines(&self) -> Vec<TextLine> {
        let round = format!("ROUND {}", self.pattern.len());
        match self.stage {
            Stage::Ready => vec![
                TextLine::center("GENIUS"),
                TextLine::blank(),
                TextLine::center("WATCH, LISTEN"),
                TextLine::center("AND REPEAT"),
                TextLine::blank(),
                TextLine::center("GET READY..."),
            ],
            Stage::Showing => vec![
                TextLine::center(round),
                TextLine::center("WATCH"),
                TextLine::blank(),
                TextLine::center(self.showing().map(Arrow::label).unwrap_or("")),
            ],
            Stage::Input => vec![
                TextLine::center(round),
                TextLine::center("YOUR TURN"),
                TextLine::blank(),
                TextLine::center(format!("{}/{}", self.position, self.pattern.len())),
            ],
            Stage::Correct => vec![
                TextLine::center(round),
                TextLine::blank(),
                TextLine::center("CORRECT!"),
            ],
            Stage::Wrong => vec![
                TextLine::center(round),
                TextLine::blank(),
                TextLine::center("WRONG!"),
            ],
            Stage::GameOver => vec![
                TextLine::center("GAME OVER"),
                TextLine::blank(),
                TextLine::center(format!("SCORE {}", self.score())),
                TextLine::center(format!("BEST  {}", self.best)),
                TextLine::blank(),
                TextLine::center("A:RETRY B:BACK"),
            ],
        }
    }
}

impl Scene for Genius {
    fn enter(&mut self, ctx: &mut SceneContext<'_>) {
        self.restart(ctx);
    }

    fn exit(&mut self, ctx: &mut SceneContext<'_>) {
        ctx.timers.remove(NEXT_STAGE);
        self.sequencer.stop(ctx.hardware.buzzer.as_mut());
    }

    fn handle_input(&mut self, event: &Event, ctx: &mut SceneContext<'_>) -> Navigation {
        if event.is_button(Button::B, ButtonAction::Down) {
            return Navigation::Back;
        }

        match (&event.kind, self.stage) {
            (EventKind::Timer(name), Stage::Ready | Stage::Correct) if name == NEXT_STAGE => {
                self.next_round(ctx);
            }
            (EventKind::Timer(name), Stage::Wrong) if name == NEXT_STAGE => {
                self.stage = Stage::GameOver;
                ctx.mark_dirty();
            }
            (EventKind::SequenceFinished, Stage::Showing) => {
                self.position = 0;
                self.stage = Stage::Input;
                ctx.mark_dirty();
            }
            (EventKind::Joystick { motion, .. }, Stage::Input) => {
                if let Some(arrow) = Arrow::from_motion(*motion) {
                    self.guess(arrow, ctx);
                }
            }
            (EventKind::Button { button: Button::A, action: ButtonAction::Down }, Stage::GameOver) => {
                self.restart(ctx);
            }
            _ => {}
        }
        Navigation::Stay
    }

    fn update(&mut self, _dt: Duration, ctx: &mut SceneContext<'_>) -> Navigation {
        if self.stage != Stage::Showing {
            return Navigation::Stay;
        }
        match self
            .sequencer
            .update(ctx.now, ctx.hardware.buzzer.as_mut())
        {
            Progress::Completed => ctx.post(EventKind::SequenceFinished),
            Progress::Playing | Progress::Idle => {}
        }
        let step = self.sequencer.current_index();
        if step != self.shown_step {
            self.shown_step = step;
            ctx.mark_dirty();
        }
        Navigation::Stay
    }

    fn render(&mut self, ctx: &mut SceneContext<'_>) {
        ctx.render(&self.lines());
    }
}
