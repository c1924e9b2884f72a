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

use bitloop::config::AppConfig;
use bitloop::events::{Button, ButtonAction, Event, Motion};
use bitloop::hardware::TextLine;
use bitloop::hardware::layout::menu_lines;
use bitloop::scene::{Navigation, Scene, SceneContext};

use crate::apps::{Selection, click};

pub(crate) struct Settings {
    rows: Vec<String>,
    selection: Selection,
}

impl Settings {
    pub(crate) fn new(config: &AppConfig) -> Self {
        let repeat = config
            .input
            .repeat_ms
            .filter(|ms| *ms > 0)
            .map(|ms| format!("{}ms", ms))
            .unwrap_or_else(|| "off".to_string());
        let rows = vec![
            format!("FPS      {}", config.fps),
            format!("DEBOUNCE {}ms", config.input.debounce_ms),
            format!("LONG     {}ms", config.input.long_press_ms),
            format!("REPEAT   {}", repeat),
            format!("DEADZONE {}", config.input.deadzone),
            format!("INVERT Y {}", if config.input.invert_y { "on" } else { "off" }),
            format!("SLICE    {}ms", config.audio.max_slice_ms),
            format!("VOLUME   {:.0}%", config.audio.volume() * 100.0),
            format!("LED      {:.0}%", config.matrix.brightness() * 100.0),
        ];
        Self {
            rows,
            selection: Selection::default(),
        }
    }
}

impl Scene for Settings {
    fn handle_input(&mut self, event: &Event, ctx: &mut SceneContext<'_>) -> Navigation {
        if event.is_button(Button::B, ButtonAction::Down) {
            return Navigation::Back;
        }
        match event.motion() {
            Some(Motion::Up) => self.selection.previous(self.rows.len()),
            Some(Motion::Down) => self.selection.next(self.rows.len()),
            _ => return Navigation::Stay,
        }
        click(ctx);
        ctx.mark_dirty();
        Navigation::Stay
    }

    fn render(&mut self, ctx: &mut SceneContext<'_>) {
        let rows = ctx.hardware.display.rows();
        let lines: Vec<TextLine> = menu_lines(
            "SETTINGS",
            &self.rows,
            self.selection.index(),
            Some("B:BACK"),
            rows,
        );
        ctx.render(&lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::testing::{Rig, press, stick};

    #[test]
    fn test_shows_configured_values() {
        let config = AppConfig {
            fps: 60,
            ..AppConfig::default()
        };
        let mut settings = Settings::new(&config);
        let mut rig = Rig::new();
        {
            let mut ctx = rig.ctx();
            settings.render(&mut ctx);
        }
        assert!(rig.display.shows("FPS      60"));
    }

    #[test]
    fn test_scrolls_and_goes_back() {
        let mut settings = Settings::new(&AppConfig::default());
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();

        settings.handle_input(&stick(Motion::Up), &mut ctx);
        assert_eq!(settings.selection.index(), 8);
        assert!(matches!(
            settings.handle_input(&press(Button::B), &mut ctx),
            Navigation::Back
        ));
    }
}
