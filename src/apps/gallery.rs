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

//! LED pattern gallery.
//!
//! Lists the pattern files in the configured directory and previews the
//! selected one on the matrix as the cursor moves. A shows details of the
//! selected pattern, B goes back.

use log::{info, warn};

use bitloop::assets::AssetEntry;
use bitloop::config::AppConfig;
use bitloop::events::{Button, ButtonAction, Event, Motion};
use bitloop::hardware::TextLine;
use bitloop::hardware::layout::{fit, menu_lines};
use bitloop::pattern::{Pattern, PatternDir, PatternLoader};
use bitloop::scene::{Navigation, Scene, SceneContext};

use crate::apps::{Selection, click, error_beep};

const LINE_WIDTH: usize = 16;

pub(crate) struct Gallery {
    library: PatternDir,
    entries: Vec<AssetEntry>,
    selection: Selection,
    preview: Option<Pattern>,
    details: bool,
}

impl Gallery {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self {
            library: PatternDir::new(
                &config.patterns_dir,
                config.matrix.width,
                config.matrix.height,
            ),
            entries: Vec::new(),
            selection: Selection::default(),
            preview: None,
            details: false,
        }
    }

    /// Shows the selected pattern on the matrix, or clears it when the
    /// pattern cannot be loaded.
    fn update_preview(&mut self, ctx: &mut SceneContext<'_>) {
        self.preview = self
            .entries
            .get(self.selection.index())
            .and_then(|entry| match self.library.load(&entry.id) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            });
        match &self.preview {
            Some(pattern) => ctx.hardware.matrix.show(pattern),
            None => ctx.hardware.matrix.clear(),
        }
    }

    fn move_by(&mut self, motion: Motion, ctx: &mut SceneContext<'_>) {
        let len = self.entries.len();
        match motion {
            Motion::Up => self.selection.previous(len),
            Motion::Down => self.selection.next(len),
            _ => return,
        }
        click(ctx);
        self.update_preview(ctx);
        ctx.mark_dirty();
    }

    fn detail_lines(&self, entry: &AssetEntry) -> Vec<TextLine> {
        let (lit, size) = match &self.preview {
            Some(pattern) => (pattern.lit(), pattern.width() * pattern.height()),
            None => (0, 0),
        };
        vec![
            TextLine::center(fit(&entry.title.to_uppercase(), LINE_WIDTH)),
            TextLine::blank(),
            TextLine::left(fit(&format!("FILE {}", entry.id), LINE_WIDTH)),
            TextLine::left(format!("LIT  {}/{}", lit, size)),
            TextLine::blank(),
            TextLine::center("A/B:CLOSE"),
        ]
    }
}

impl Scene for Gallery {
    fn enter(&mut self, ctx: &mut SceneContext<'_>) {
        self.entries = self.library.list();
        self.selection.clamp(self.entries.len());
        self.details = false;
        info!(
            "{} patterns in {}",
            self.entries.len(),
            self.library.root().display()
        );
        self.update_preview(ctx);
    }

    fn exit(&mut self, ctx: &mut SceneContext<'_>) {
        self.preview = None;
        ctx.hardware.matrix.clear();
    }

    fn handle_input(&mut self, event: &Event, ctx: &mut SceneContext<'_>) -> Navigation {
        let a = event.is_button(Button::A, ButtonAction::Down);
        let b = event.is_button(Button::B, ButtonAction::Down);

        if self.details {
            if a || b {
                self.details = false;
                click(ctx);
                ctx.mark_dirty();
            }
            return Navigation::Stay;
        }

        if let Some(motion) = event.motion() {
            self.move_by(motion, ctx);
        }
        if a {
            if self.entries.is_empty() {
                error_beep(ctx);
            } else {
                self.details = true;
                click(ctx);
                ctx.mark_dirty();
            }
        } else if b {
            return Navigation::Back;
        }
        Navigation::Stay
    }

    fn render(&mut self, ctx: &mut SceneContext<'_>) {
        let selected = self.entries.get(self.selection.index());
        let lines = match selected {
            Some(entry) if self.details => self.detail_lines(entry),
            Some(_) => {
                let titles: Vec<String> = self
                    .entries
                    .iter()
                    .map(|e| fit(&e.title, LINE_WIDTH - 2))
                    .collect();
                let rows = ctx.hardware.display.rows();
                menu_lines(
                    "GALLERY",
                    &titles,
                    self.selection.index(),
                    Some("A:INFO B:BACK"),
                    rows,
                )
            }
            None => vec![
                TextLine::center("GALLERY"),
                TextLine::blank(),
                TextLine::center("NO PATTERNS"),
                TextLine::center("FOUND"),
            ],
        };
        ctx.render(&lines);
    }
}
