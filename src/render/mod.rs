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

//! Terminal rendering of the simulated board.
//!
//! The primary entry point is [`draw`], called once per runtime frame with a
//! [`BoardView`] snapshot. The frame is split into the OLED panel beside the
//! LED matrix, a status block with the buzzer and input state, and a
//! one-line key reference.

mod icons;
mod matrix;
mod oled;
mod status;

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Paragraph},
};

use bitloop::hardware::TextLine;
use bitloop::pattern::Pattern;

use crate::{sim::SimKey, theme::Theme};

const HELP: &str = "arrows: stick  a/b: buttons  space: push  q: quit";

/// Everything drawn for one frame.
pub(crate) struct BoardView {
    pub(crate) screen: Vec<TextLine>,
    pub(crate) tone: Option<u32>,
    pub(crate) tones_emitted: u64,
    pub(crate) volume: f32,
    pub(crate) matrix: Option<Pattern>,
    pub(crate) matrix_size: (usize, usize),
    pub(crate) brightness: f32,
    pub(crate) path: Vec<String>,
    pub(crate) uptime: Duration,
    pub(crate) frames: u64,
    pub(crate) held: Vec<SimKey>,
}

/// Draws one frame of the simulated board.
///
/// # Arguments
///
/// * `f` - The current terminal frame used for drawing.
/// * `view` - Snapshot of the board taken after the runtime step.
/// * `theme` - Colours for the panels and text.
pub(crate) fn draw(f: &mut Frame, view: &BoardView, theme: &Theme) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_colour)),
        area,
    );

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(area);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[0]);

    oled::draw_oled(f, panels[0], &view.screen, theme);
    matrix::draw_matrix(f, panels[1], view, theme);
    status::draw_status(f, outer[1], view, theme);

    f.render_widget(
        Paragraph::new(HELP)
            .centered()
            .style(Style::default().fg(theme.help_fg)),
        outer[2],
    );
}
