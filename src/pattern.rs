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

//! LED matrix patterns.
//!
//! A pattern file draws one matrix row per line:
//!
//! ```text
//! # 1: (255, 0, 0)
//! # 2: (0, 0, 255)
//! .1.1.
//! 11111
//! .222.
//! ```
//!
//! `X` lights a pixel in white, a digit `1`-`9` lights it in the colour
//! declared for that digit in a `# N: (r, g, b)` comment (white when none
//! is declared), and `.`, `0` or a space leaves it dark. Lines holding
//! anything else, and lines with no lit pixel, are not rows. Rows and
//! columns beyond the matrix size are ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::assets::{AssetEntry, list_entries, read_entry};
use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Scales each channel by `level`, clamped to 0.0..=1.0.
    pub fn scaled(self, level: f32) -> Rgb {
        let level = level.clamp(0.0, 1.0);
        let scale = |c: u8| (f32::from(c) * level).round() as u8;
        Rgb(scale(self.0), scale(self.1), scale(self.2))
    }
}

/// A full frame for the matrix, row-major from the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb>>,
}

impl Pattern {
    /// An unlit pattern.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[y * self.width + x]
    }

    /// Lights `(x, y)`. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, colour: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = Some(colour);
        }
    }

    /// Number of lit pixels.
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_blank(&self) -> bool {
        self.lit() == 0
    }

    /// Rows of pixels, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Rgb>]> {
        self.pixels.chunks(self.width.max(1))
    }
}

/// Parses pattern text into a `width` by `height` frame.
///
/// # Arguments
///
/// * `content` - Pattern file text, see the module documentation.
/// * `width` - Matrix width in pixels; longer rows are cut.
/// * `height` - Matrix height in pixels; further rows are ignored.
///
/// # Examples
///
/// ```
/// use bitloop::pattern::{Rgb, parse_pattern};
///
/// let pattern = parse_pattern("# 1: (255, 0, 0)\n.1.\nX.X\n", 3, 3);
/// assert_eq!(pattern.get(1, 0), Some(Rgb(255, 0, 0)));
/// assert_eq!(pattern.lit(), 3);
/// ```
pub fn parse_pattern(content: &str, width: usize, height: usize) -> Pattern {
    let palette = palette(content);
    let mut pattern = Pattern::blank(width, height);

    let rows = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter(|line| line.chars().all(|c| ".0123456789Xx ".contains(c)))
        .filter(|line| line.chars().any(|c| "123456789Xx".contains(c)))
        .take(height);

    for (y, line) in rows.enumerate() {
        for (x, c) in line.chars().enumerate() {
            let colour = match c {
                'X' | 'x' => Rgb::WHITE,
                '1'..='9' => palette.get(&c).copied().unwrap_or(Rgb::WHITE),
                _ => continue,
            };
            pattern.set(x, y, colour);
        }
    }
    pattern
}

/// Colours declared as `# N: (r, g, b)` comments.
fn palette(content: &str) -> HashMap<char, Rgb> {
    content
        .lines()
        .filter_map(|line| {
            let (digit, rest) = line.trim().strip_prefix('#')?.split_once(':')?;
            let mut digits = digit.trim().chars();
            let digit = digits.next().filter(|c| c.is_ascii_digit())?;
            if digits.next().is_some() {
                return None;
            }
            let inner = rest.trim().strip_prefix('(')?.split_once(')')?.0;
            let channels: Vec<u8> = inner
                .split(',')
                .map(|v| v.trim().parse::<u8>())
                .collect::<Result<_, _>>()
                .ok()?;
            match channels[..] {
                [r, g, b] => Some((digit, Rgb(r, g, b))),
                _ => None,
            }
        })
        .collect()
}

/// Source of patterns by identifier.
pub trait PatternLoader {
    fn load(&self, id: &str) -> Result<Pattern, LoadError>;
}

/// Directory of pattern text files sized for one matrix.
#[derive(Debug, Clone)]
pub struct PatternDir {
    root: PathBuf,
    width: usize,
    height: usize,
}

impl PatternDir {
    pub fn new(root: impl AsRef<Path>, width: usize, height: usize) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            width,
            height,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn list(&self) -> Vec<AssetEntry> {
        list_entries(&self.root)
    }

    /// Loads `id`, logging a failure and returning a blank pattern in its
    /// place.
    pub fn load_or_blank(&self, id: &str) -> Pattern {
        self.load(id).unwrap_or_else(|e| {
            warn!("{}", e);
            Pattern::blank(self.width, self.height)
        })
    }
}

impl PatternLoader for PatternDir {
    fn load(&self, id: &str) -> Result<Pattern, LoadError> {
        let content = read_entry(&self.root, id)?;
        let pattern = parse_pattern(&content, self.width, self.height);
        if pattern.is_blank() {
            return Err(LoadError::Malformed {
                id: id.to_string(),
                reason: "no lit pixels".to_string(),
            });
        }
        debug!("loaded pattern {} ({} lit)", id, pattern.lit());
        Ok(pattern)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_plain_rows() {
        let pattern = parse_pattern("# plus\n..X..\nXXXXX\n..X..\n", 5, 5);
        assert_eq!(pattern.lit(), 7);
        assert_eq!(pattern.get(2, 0), Some(Rgb::WHITE));
        assert_eq!(pattern.get(0, 0), None);
        assert_eq!(pattern.get(4, 1), Some(Rgb::WHITE));
        assert_eq!(pattern.get(2, 3), None);
        assert_eq!(pattern.rows().count(), 5);
        assert!(pattern.rows().all(|row| row.len() == 5));
    }

    #[test]
    fn test_palette_colours() {
        let content = "# 1: (255, 0, 0)\n# 2: (0,0,255)\n.1.2.\n..3..\n";
        let pattern = parse_pattern(content, 5, 5);
        assert_eq!(pattern.get(1, 0), Some(Rgb(255, 0, 0)));
        assert_eq!(pattern.get(3, 0), Some(Rgb(0, 0, 255)));
        assert_eq!(pattern.get(2, 1), Some(Rgb::WHITE));
    }

    #[test]
    fn test_non_rows_are_skipped_and_bounds_respected() {
        let content = "title: heart\n.....\nX.....X\nXXXXX\nXXXXX\nXXXXX\nXXXXX\nXXXXX\n";
        let pattern = parse_pattern(content, 5, 5);
        assert_eq!(pattern.get(0, 0), Some(Rgb::WHITE));
        assert_eq!(pattern.get(1, 0), None);
        assert_eq!(pattern.lit(), 1 + 4 * 5);
    }

    #[test]
    fn test_scaled_colour() {
        assert_eq!(Rgb(200, 100, 0).scaled(0.5), Rgb(100, 50, 0));
        assert_eq!(Rgb::WHITE.scaled(2.0), Rgb::WHITE);
    }

    #[test]
    fn test_directory_loading() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dot.txt"), "..X..\n").unwrap();
        fs::write(dir.path().join("empty.txt"), "# nothing\n.....\n").unwrap();
        let patterns = PatternDir::new(dir.path(), 5, 5);

        assert_eq!(patterns.list().len(), 2);
        assert_eq!(patterns.load("dot.txt").unwrap().lit(), 1);
        assert!(matches!(
            patterns.load("empty.txt"),
            Err(LoadError::Malformed { .. })
        ));
        assert!(patterns.load_or_blank("missing.txt").is_blank());
    }
}
