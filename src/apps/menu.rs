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

use bitloop::events::{Button, ButtonAction, Event, Motion};
use bitloop::hardware::layout::menu_lines;
use bitloop::scene::{Navigation, Scene, SceneContext};

use crate::apps::{GALLERY, GENIUS, PLAYER, SETTINGS, Selection, click};

struct MenuItem {
    label: &'static str,
    /// Sub-scene to enter, `None` to quit.
    target: Option<&'static str>,
}

const ITEMS: [MenuItem; 5] = [
    MenuItem {
        label: "Melody Player",
        target: Some(PLAYER),
    },
    MenuItem {
        label: "Gallery",
        target: Some(GALLERY),
    },
    MenuItem {
        label: "Genius",
        target: Some(GENIUS),
    },
    MenuItem {
        label: "Settings",
        target: Some(SETTINGS),
    },
    MenuItem {
        label: "Exit",
        target: None,
    },
];

pub(crate) struct MainMenu {
    selection: Selection,
}

impl MainMenu {
    pub(crate) fn new() -> Self {
        Self {
            selection: Selection::default(),
        }
    }
}

impl Scene for MainMenu {
    fn handle_input(&mut self, event: &Event, ctx: &mut SceneContext<'_>) -> Navigation {
        match event.motion() {
            Some(Motion::Up) => {
                self.selection.previous(ITEMS.len());
                click(ctx);
                ctx.mark_dirty();
            }
            Some(Motion::Down) => {
                self.selection.next(ITEMS.len());
                click(ctx);
                ctx.mark_dirty();
            }
            _ => {}
        }

        if event.is_button(Button::A, ButtonAction::Down) {
            return match ITEMS[self.selection.index()].target {
                Some(target) => Navigation::Enter(target.to_string()),
                None => Navigation::Exit,
            };
        }
        Navigation::Stay
    }

    fn render(&mut self, ctx: &mut SceneContext<'_>) {
        let labels: Vec<String> = ITEMS.iter().map(|item| item.label.to_string()).collect();
        let rows = ctx.hardware.display.rows();
        let lines = menu_lines(
            "BITLOOP",
            &labels,
            self.selection.index(),
            Some("A:SELECT"),
            rows,
        );
        ctx.render(&lines);
    }
}
