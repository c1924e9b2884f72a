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

//! The scenes that make up the demo application.
//!
//! # Organization
//!
//! * [`menu`]: the root scene, listing the others as sub-scenes.
//! * [`player`]: melody browser and player.
//! * [`gallery`]: LED pattern browser with a live preview on the matrix.
//! * [`genius`]: a repeat-the-pattern memory game.
//! * [`settings`]: read-only view of the active configuration.

mod gallery;
mod genius;
mod menu;
mod player;
mod settings;

use std::time::Duration;

use bitloop::config::AppConfig;
use bitloop::scene::{SceneContext, SceneNode};
use bitloop::sequencer::Note;

use crate::apps::{gallery::Gallery, genius::Genius, menu::MainMenu, player::MelodyPlayer, settings::Settings};

pub(crate) const MAIN_MENU: &str = "main";
pub(crate) const PLAYER: &str = "player";
pub(crate) const GALLERY: &str = "gallery";
pub(crate) const GENIUS: &str = "genius";
pub(crate) const SETTINGS: &str = "settings";

const CLICK: Note = Note::Tone(1200);
const CLICK_LENGTH: Duration = Duration::from_millis(10);

const ERROR_TONE: Note = Note::Tone(200);
const ERROR_LENGTH: Duration = Duration::from_millis(200);

/// Builds the scene tree with the main menu at its root.
pub(crate) fn build(config: &AppConfig) -> SceneNode {
    SceneNode::new(MAIN_MENU, MainMenu::new())
        .with_child(SceneNode::new(PLAYER, MelodyPlayer::new(config)))
        .with_child(SceneNode::new(GALLERY, Gallery::new(config)))
        .with_child(SceneNode::new(GENIUS, Genius::new(config)))
        .with_child(SceneNode::new(SETTINGS, Settings::new(config)))
}

/// Short key-click on the buzzer.
pub(crate) fn click(ctx: &mut SceneContext<'_>) {
    ctx.hardware.buzzer.emit(&CLICK, CLICK_LENGTH);
}

pub(crate) fn error_beep(ctx: &mut SceneContext<'_>) {
    ctx.hardware.buzzer.emit(&ERROR_TONE, ERROR_LENGTH);
}

/// Cursor over a list, wrapping at both ends.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Selection {
    index: usize,
}

impl Selection {
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = if self.index >= len - 1 { 0 } else { self.index + 1 };
    }

    pub(crate) fn previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = if self.index == 0 { len - 1 } else { self.index - 1 };
    }

    /// Pulls the cursor back inside a list that may have shrunk.
    pub(crate) fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use bitloop::events::{Button, ButtonAction, Event, EventKind, EventQueue, Motion};
    use bitloop::hardware::fake::{RecordingActuator, RecordingDisplay, RecordingMatrix};
    use bitloop::hardware::{Actuator, DisplaySurface, Hardware, PixelSurface};
    use bitloop::input::Direction;
    use bitloop::scene::SceneContext;
    use bitloop::sequencer::Note;
    use bitloop::timer::TimerService;

    /// Hardware and services for driving a single scene by hand.
    pub(crate) struct Rig {
        pub(crate) hardware: Hardware,
        pub(crate) events: EventQueue,
        pub(crate) timers: TimerService<EventQueue>,
        pub(crate) buzzer: RecordingActuator<Note>,
        pub(crate) display: RecordingDisplay,
        pub(crate) matrix: RecordingMatrix,
        pub(crate) now: Duration,
    }

    impl Rig {
        pub(crate) fn new() -> Self {
            let buzzer = RecordingActuator::new();
            let display = RecordingDisplay::new();
            let matrix = RecordingMatrix::new();
            let hardware = Hardware::builder()
                .buzzer(Ok::<_, String>(Box::new(buzzer.clone()) as Box<dyn Actuator<Note>>))
                .display(Ok::<_, String>(Box::new(display.clone()) as Box<dyn DisplaySurface>))
                .matrix(Ok::<_, String>(Box::new(matrix.clone()) as Box<dyn PixelSurface>))
                .build();
            Self {
                hardware,
                events: EventQueue::new(Duration::from_millis(100)),
                timers: TimerService::new(),
                buzzer,
                display,
                matrix,
                now: Duration::ZERO,
            }
        }

        pub(crate) fn ctx(&mut self) -> SceneContext<'_> {
            self.events.set_time(self.now);
            SceneContext::new(
                &mut self.hardware,
                &mut self.events,
                &mut self.timers,
                self.now,
            )
        }

        pub(crate) fn advance(&mut self, millis: u64) {
            self.now += Duration::from_millis(millis);
        }

        /// Runs the timers for `millis` and returns what they posted.
        pub(crate) fn run_timers(&mut self, millis: u64) -> Vec<Event> {
            self.advance(millis);
            self.events.set_time(self.now);
            self.timers
                .update(Duration::from_millis(millis), &mut self.events);
            self.events.drain()
        }
    }

    pub(crate) fn press(button: Button) -> Event {
        Event::new(
            EventKind::button(button, ButtonAction::Down),
            Duration::ZERO,
        )
    }

    pub(crate) fn stick(motion: Motion) -> Event {
        let direction = match motion {
            Motion::Up => Direction::North,
            Motion::Down => Direction::South,
            Motion::Left => Direction::West,
            Motion::Right => Direction::East,
            Motion::Center => Direction::Center,
        };
        Event::new(
            EventKind::Joystick {
                motion,
                direction,
                x: 0.0,
                y: 0.0,
            },
            Duration::ZERO,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        let mut selection = Selection::default();
        selection.previous(3);
        assert_eq!(selection.index(), 2);
        selection.next(3);
        assert_eq!(selection.index(), 0);
        selection.next(0);
        assert_eq!(selection.index(), 0);
    }

    #[test]
    fn test_selection_clamps_to_shorter_list() {
        let mut selection = Selection::default();
        selection.previous(5);
        selection.clamp(2);
        assert_eq!(selection.index(), 1);
    }

    #[test]
    fn test_tree_registers_every_app() {
        let root = build(&AppConfig::default());
        assert_eq!(root.name(), MAIN_MENU);
        assert!(root.has_child(PLAYER));
        assert!(root.has_child(GENIUS));
        assert!(root.has_child(SETTINGS));
    }
}
