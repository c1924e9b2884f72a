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

use super::TextLine;

const CURSOR: &str = "> ";
const NO_CURSOR: &str = "  ";

/// Lays out a titled list with a selection cursor and an optional footer.
///
/// The list is scrolled so the selected row is always visible within
/// `rows` lines in total.
pub fn menu_lines(
    title: &str,
    items: &[String],
    selected: usize,
    footer: Option<&str>,
    rows: usize,
) -> Vec<TextLine> {
    let reserved = 1 + usize::from(footer.is_some());
    let visible = rows.saturating_sub(reserved).max(1);
    let first = (selected + 1).saturating_sub(visible);

    let mut lines = Vec::with_capacity(rows);
    lines.push(TextLine::center(title));
    for (i, item) in items.iter().enumerate().skip(first).take(visible) {
        let cursor = if i == selected { CURSOR } else { NO_CURSOR };
        lines.push(TextLine::left(format!("{}{}", cursor, item)));
    }
    if let Some(footer) = footer {
        while lines.len() < rows.saturating_sub(1) {
            lines.push(TextLine::blank());
        }
        lines.push(TextLine::center(footer));
    }
    lines
}

/// Truncates to `width` characters, marking the cut with a tilde.
pub fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("Item {}", i)).collect()
    }

    #[test]
    fn test_cursor_marks_selection() {
        let lines = menu_lines("MENU", &items(3), 1, None, 8);
        assert_eq!(lines[0], TextLine::center("MENU"));
        assert_eq!(lines[1].text, "  Item 0");
        assert_eq!(lines[2].text, "> Item 1");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_scrolls_to_keep_selection_visible() {
        let lines = menu_lines("MENU", &items(10), 9, Some("A:OK B:BACK"), 8);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[6].text, "> Item 9");
        assert_eq!(lines[1].text, "  Item 4");
        assert_eq!(lines[7], TextLine::center("A:OK B:BACK"));
    }

    #[test]
    fn test_footer_pinned_to_last_row() {
        let lines = menu_lines("MENU", &items(2), 0, Some("B:BACK"), 8);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[7].text, "B:BACK");
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("short", 16), "short");
        assert_eq!(fit("a very long melody title", 10), "a very lo~");
    }
}
