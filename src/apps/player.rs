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

//! Melody browser and player.
//!
//! Lists the melody files in the configured directory. A plays the selected
//! melody, the joystick button pauses and resumes, B stops playback or,
//! when nothing is playing, goes back to the menu.

use std::time::Duration;

use log::info;

use bitloop::assets::AssetEntry;
use bitloop::config::AppConfig;
use bitloop::events::{Button, ButtonAction, Event, EventKind, Motion};
use bitloop::hardware::TextLine;
use bitloop::hardware::layout::{fit, menu_lines};
use bitloop::scene::{Navigation, Scene, SceneContext};
use bitloop::sequencer::{
    MelodyDir, Note, Progress, Sequencer, SequencerState, load_or_empty,
};

use crate::apps::{Selection, click, error_beep};

const LINE_WIDTH: usize = 16;
const BAR_WIDTH: usize = 10;

pub(crate) struct MelodyPlayer {
    library: MelodyDir,
    entries: Vec<AssetEntry>,
    selection: Selection,
    sequencer: Sequencer<Note>,
    now_playing: Option<String>,
    shown_percent: u32,
}

impl MelodyPlayer {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self {
            library: MelodyDir::new(&config.music_dir),
            entries: Vec::new(),
            selection: Selection::default(),
            sequencer: Sequencer::new(config.audio.max_slice()),
            now_playing: None,
            shown_percent: 0,
        }
    }

    fn play_selected(&mut self, ctx: &mut SceneContext<'_>) {
        let Some(entry) = self.entries.get(self.selection.index()) else {
            error_beep(ctx);
            return;
        };
        let steps = load_or_empty(&self.library, &entry.id);
        if steps.is_empty() {
            error_beep(ctx);
            return;
        }
        info!("playing '{}' ({} steps)", entry.title, steps.len());
        self.sequencer.start(steps, ctx.now);
        self.now_playing = Some(entry.title.clone());
        self.shown_percent = 0;
        ctx.mark_dirty();
    }

    fn toggle_pause(&mut self, ctx: &mut SceneContext<'_>) {
        match self.sequencer.state() {
            SequencerState::Playing => {
                self.sequencer.pause(ctx.now);
                ctx.hardware.buzzer.silence();
            }
            SequencerState::Paused => self.sequencer.resume(ctx.now),
            SequencerState::Stopped => return,
        }
        ctx.mark_dirty();
    }

    fn stop(&mut self, ctx: &mut SceneContext<'_>) {
        self.sequencer.stop(ctx.hardware.buzzer.as_mut());
        self.now_playing = None;
        ctx.mark_dirty();
    }

    fn percent(&self) -> u32 {
        (self.sequencer.progress() * 100.0).round() as u32
    }

    fn playing_lines(&self, title: &str) -> Vec<TextLine> {
        let percent = self.percent();
        let filled = (percent as usize * BAR_WIDTH / 100).min(BAR_WIDTH);
        let bar = format!(
            "[{}{}]",
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled)
        );
        let status = match self.sequencer.state() {
            SequencerState::Paused => "PAUSED",
            _ => "PLAYING",
        };
        vec![
            TextLine::center("NOW PLAYING"),
            TextLine::blank(),
            TextLine::center(fit(title, LINE_WIDTH)),
            TextLine::blank(),
            TextLine::center(format!("{} {:>3}%", bar, percent)),
            TextLine::center(status),
            TextLine::blank(),
            TextLine::center("PUSH:PAUSE B:END"),
        ]
    }
}

impl Scene for MelodyPlayer {
    fn enter(&mut self, _ctx: &mut SceneContext<'_>) {
        self.entries = self.library.list();
        self.selection.clamp(self.entries.len());
        info!(
            "{} melodies in {}",
            self.entries.len(),
            self.library.root().display()
        );
    }

    fn exit(&mut self, ctx: &mut SceneContext<'_>) {
        self.stop(ctx);
    }

    fn handle_input(&mut self, event: &Event, ctx: &mut SceneContext<'_>) -> Navigation {
        if event.kind == EventKind::SequenceFinished {
            self.now_playing = None;
            ctx.mark_dirty();
            return Navigation::Stay;
        }

        if self.now_playing.is_none() {
            match event.motion() {
                Some(Motion::Up) => {
                    self.selection.previous(self.entries.len());
                    click(ctx);
                    ctx.mark_dirty();
                }
                Some(Motion::Down) => {
                    self.selection.next(self.entries.len());
                    click(ctx);
                    ctx.mark_dirty();
                }
                _ => {}
            }
        }

        if event.is_button(Button::A, ButtonAction::Down) {
            self.play_selected(ctx);
        } else if event.is_button(Button::Stick, ButtonAction::Down) {
            self.toggle_pause(ctx);
        } else if event.is_button(Button::B, ButtonAction::Down) {
            if self.sequencer.state() == SequencerState::Stopped {
                return Navigation::Back;
            }
            self.stop(ctx);
        }
        Navigation::Stay
    }

    fn update(&mut self, _dt: Duration, ctx: &mut SceneContext<'_>) -> Navigation {
        match self
            .sequencer
            .update(ctx.now, ctx.hardware.buzzer.as_mut())
        {
            Progress::Completed => {
                ctx.post(EventKind::SequenceFinished);
                ctx.mark_dirty();
            }
            Progress::Playing => {
                let percent = self.percent();
                if percent != self.shown_percent {
                    self.shown_percent = percent;
                    ctx.mark_dirty();
                }
            }
            Progress::Idle => {}
        }
        Navigation::Stay
    }

    fn render(&mut self, ctx: &mut SceneContext<'_>) {
        let lines = match &self.now_playing {
            Some(title) => self.playing_lines(title),
            None if self.entries.is_empty() => vec![
                TextLine::center("MELODIES"),
                TextLine::blank(),
                TextLine::center("NO MELODIES"),
                TextLine::center("FOUND"),
            ],
            None => {
                let titles: Vec<String> = self
                    .entries
                    .iter()
                    .map(|e| fit(&e.title, LINE_WIDTH - 2))
                    .collect();
                let rows = ctx.hardware.display.rows();
                menu_lines(
                    "MELODIES",
                    &titles,
                    self.selection.index(),
                    Some("A:PLAY B:BACK"),
                    rows,
                )
            }
        };
        ctx.render(&lines);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::apps::testing::{Rig, press};

    fn player_with(melodies: &[(&str, &str)]) -> (MelodyPlayer, TempDir) {
        let dir = TempDir::new().unwrap();
        for (name, content) in melodies {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let config = AppConfig {
            music_dir: dir.path().to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        (MelodyPlayer::new(&config), dir)
    }

    #[test]
    fn test_plays_selected_melody_to_completion() {
        let (mut player, _dir) = player_with(&[("scale.txt", "262:0.1\n294:0.1\n")]);
        let mut rig = Rig::new();

        {
            let mut ctx = rig.ctx();
            player.enter(&mut ctx);
            player.handle_input(&press(Button::A), &mut ctx);
        }
        for _ in 0..25 {
            let mut ctx = rig.ctx();
            player.update(Duration::from_millis(10), &mut ctx);
            rig.advance(10);
        }

        let tones: Vec<_> = rig.buzzer.emitted().into_iter().map(|(n, _)| n).collect();
        assert_eq!(tones, vec![Note::Tone(262), Note::Tone(294)]);
        let events = rig.events.drain();
        assert!(events.iter().any(|e| e.kind == EventKind::SequenceFinished));
    }

    #[test]
    fn test_broken_melody_gives_error_beep() {
        let (mut player, _dir) = player_with(&[("broken.txt", "# nothing\n")]);
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();

        player.enter(&mut ctx);
        player.handle_input(&press(Button::A), &mut ctx);
        assert_eq!(player.sequencer.state(), SequencerState::Stopped);
        drop(ctx);
        assert_eq!(rig.buzzer.emitted()[0].0, Note::Tone(200));
    }

    #[test]
    fn test_b_stops_then_goes_back() {
        let (mut player, _dir) = player_with(&[("long.txt", "440:5.0\n")]);
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();

        player.enter(&mut ctx);
        player.handle_input(&press(Button::A), &mut ctx);
        assert!(matches!(
            player.handle_input(&press(Button::B), &mut ctx),
            Navigation::Stay
        ));
        assert_eq!(player.sequencer.state(), SequencerState::Stopped);
        assert!(matches!(
            player.handle_input(&press(Button::B), &mut ctx),
            Navigation::Back
        ));
    }

    #[test]
    fn test_stick_button_pauses_and_resumes() {
        let (mut player, _dir) = player_with(&[("long.txt", "440:5.0\n")]);
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();

        player.enter(&mut ctx);
        player.handle_input(&press(Button::A), &mut ctx);
        player.handle_input(&press(Button::Stick), &mut ctx);
        assert_eq!(player.sequencer.state(), SequencerState::Paused);
        player.handle_input(&press(Button::Stick), &mut ctx);
        assert_eq!(player.sequencer.state(), SequencerState::Playing);
    }

    #[test]
    fn test_empty_library_renders_notice() {
        let (mut player, _dir) = player_with(&[]);
        let mut rig = Rig::new();
        {
            let mut ctx = rig.ctx();
            player.enter(&mut ctx);
            player.render(&mut ctx);
        }
        assert!(rig.display.shows("NO MELODIES"));
    }
}
