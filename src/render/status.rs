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

//! Render the board status: buzzer, inputs, scene path and uptime.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{
    render::{
        BoardView,
        icons::{
            ICON_CENTER, ICON_DOWN, ICON_HELD, ICON_LEFT, ICON_NOTE, ICON_RELEASED, ICON_RIGHT,
            ICON_STOP, ICON_UP,
        },
    },
    sim::SimKey,
    theme::Theme,
    util::format::{format_time, format_tone},
};

pub(crate) fn draw_status(f: &mut Frame, area: Rect, view: &BoardView, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner_area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(rows[0]);

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let icon = if view.tone.is_some() { ICON_NOTE } else { ICON_STOP };
    let buzzer_line = Line::from(vec![
        Span::styled(format!(" {} ", icon), bold).fg(theme.status_fg),
        Span::styled(format_tone(view.tone), bold).fg(theme.accent_colour),
        Span::raw(format!("  ({} tones)", view.tones_emitted)).fg(theme.help_fg),
        Span::raw(format!("  vol {:.0}%", view.volume * 100.0)).fg(theme.help_fg),
    ]);
    f.render_widget(Paragraph::new(buzzer_line), top[0]);

    let time_line = Line::from(vec![
        Span::styled(format_time(view.uptime), bold).fg(theme.accent_colour),
        Span::styled(format!("  frame {}", view.frames), bold).fg(theme.status_fg),
    ]);
    f.render_widget(
        Paragraph::new(time_line).alignment(Alignment::Right),
        top[1],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(rows[1]);

    let path = if view.path.is_empty() {
        "-".to_string()
    } else {
        view.path.join(" > ")
    };
    let path_line = Line::from(vec![
        Span::raw(" scene ").fg(theme.help_fg),
        Span::styled(path, bold).fg(theme.accent_colour),
    ]);
    f.render_widget(Paragraph::new(path_line), bottom[0]);

    f.render_widget(
        Paragraph::new(input_line(&view.held, theme)).alignment(Alignment::Right),
        bottom[1],
    );
}

fn input_line(held: &[SimKey], theme: &Theme) -> Line<'static> {
    let button = |label: &'static str, key: SimKey| {
        let icon = if held.contains(&key) { ICON_HELD } else { ICON_RELEASED };
        vec![
            Span::raw(label).fg(theme.help_fg),
            Span::raw(icon).fg(theme.accent_colour),
            Span::raw(" "),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(button("A", SimKey::A));
    spans.extend(button("B", SimKey::B));
    spans.extend(button("P", SimKey::Push));
    spans.push(Span::raw(stick_icon(held)).fg(theme.accent_colour));
    Line::from(spans)
}

fn stick_icon(held: &[SimKey]) -> &'static str {
    if held.contains(&SimKey::Up) {
        ICON_UP
    } else if held.contains(&SimKey::Down) {
        ICON_DOWN
    } else if held.contains(&SimKey::Left) {
        ICON_LEFT
    } else if held.contains(&SimKey::Right) {
        ICON_RIGHT
    } else {
        ICON_CENTER
    }
}
