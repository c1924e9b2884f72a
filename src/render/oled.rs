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

//! Render the OLED panel.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph},
};

use bitloop::hardware::{Align, TextLine};

use crate::{
    sim::{SCREEN_COLUMNS, SCREEN_ROWS},
    theme::Theme,
};

/// Draws the panel centred in `area`, clipping rows and columns to the
/// physical character grid.
pub(crate) fn draw_oled(f: &mut Frame, area: Rect, screen: &[TextLine], theme: &Theme) {
    // Border plus one column of padding on each side.
    let width = SCREEN_COLUMNS as u16 + 4;
    let height = SCREEN_ROWS as u16 + 2;

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [panel] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .title(" OLED ")
        .title_alignment(Alignment::Center)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(theme.oled_bg));

    let lines: Vec<Line> = screen
        .iter()
        .take(SCREEN_ROWS)
        .map(|line| {
            let text: String = line.text.chars().take(SCREEN_COLUMNS).collect();
            Line::from(text).alignment(alignment(line.align))
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(
            Style::default()
                .fg(theme.oled_fg)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(paragraph, panel);
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}
