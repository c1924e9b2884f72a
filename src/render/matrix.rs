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

//! Render the LED matrix.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use bitloop::pattern::{Pattern, Rgb};

use crate::{
    render::{BoardView, icons::ICON_LED},
    theme::Theme,
};

/// Draws the matrix centred in `area`, one LED per two columns so that the
/// grid comes out roughly square.
pub(crate) fn draw_matrix(f: &mut Frame, area: Rect, view: &BoardView, theme: &Theme) {
    let (columns, rows) = view.matrix_size;
    let width = (columns * 2 + 3) as u16;
    let height = (rows + 2) as u16;

    let [column] = Layout::horizontal([Constraint::Length(width.max(12))])
        .flex(Flex::Center)
        .areas(area);
    let [panel] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .title(format!(" LED {:.0}% ", view.brightness * 100.0))
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(theme.oled_bg));

    let lines = grid(view.matrix.as_ref(), columns, rows, theme);
    f.render_widget(Paragraph::new(lines).centered().block(block), panel);
}

fn grid(
    pattern: Option<&Pattern>,
    columns: usize,
    rows: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    (0..rows)
        .map(|y| {
            let spans: Vec<Span> = (0..columns)
                .map(|x| {
                    let colour = pattern
                        .and_then(|p| p.get(x, y))
                        .map(to_colour)
                        .unwrap_or(theme.led_off);
                    Span::raw(format!("{} ", ICON_LED)).fg(colour)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn to_colour(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_colours_lit_pixels() {
        let theme = Theme::default();
        let mut pattern = Pattern::blank(3, 2);
        pattern.set(1, 0, Rgb(255, 0, 0));

        let lines = grid(Some(&pattern), 3, 2, &theme);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[1].style.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(lines[0].spans[0].style.fg, Some(theme.led_off));
        assert_eq!(lines[1].spans.len(), 3);
    }

    #[test]
    fn test_dark_matrix() {
        let theme = Theme::default();
        let lines = grid(None, 5, 5, &theme);
        assert!(
            lines
                .iter()
                .flat_map(|line| line.spans.iter())
                .all(|span| span.style.fg == Some(theme.led_off))
        );
    }
}
