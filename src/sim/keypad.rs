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

//! Keyboard stand-in for the board's buttons and joystick.
//!
//! Terminals report key presses but not releases, so every press holds the
//! matching input for a short time. Auto-repeat from a held key keeps
//! extending the hold.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const HOLD: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SimKey {
    A,
    B,
    Push,
    Up,
    Down,
    Left,
    Right,
}

impl SimKey {
    fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('a') | KeyCode::Char('z') | KeyCode::Enter => Some(SimKey::A),
            KeyCode::Char('b') | KeyCode::Char('x') | KeyCode::Backspace => Some(SimKey::B),
            KeyCode::Char(' ') => Some(SimKey::Push),
            KeyCode::Up | KeyCode::Char('k') => Some(SimKey::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(SimKey::Down),
            KeyCode::Left | KeyCode::Char('h') => Some(SimKey::Left),
            KeyCode::Right | KeyCode::Char('l') => Some(SimKey::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Keypad {
    held_until: HashMap<SimKey, Instant>,
    quit: bool,
}

impl Keypad {
    /// Drains pending terminal events without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal event source cannot be polled or
    /// read.
    pub(crate) fn pump(&mut self) -> Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, Instant::now());
            }
        }
        Ok(())
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => self.quit = true,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.quit = true,
            (code, _) => {
                if let Some(sim_key) = SimKey::from_code(code) {
                    self.held_until.insert(sim_key, now + HOLD);
                }
            }
        }
    }

    pub(crate) fn is_held(&self, key: SimKey, now: Instant) -> bool {
        self.held_until.get(&key).is_some_and(|until| now < *until)
    }

    pub(crate) fn held(&self, now: Instant) -> Vec<SimKey> {
        let mut keys: Vec<SimKey> = self
            .held_until
            .iter()
            .filter(|(_, until)| now < **until)
            .map(|(key, _)| *key)
            .collect();
        keys.sort_by_key(|key| *key as u8);
        keys
    }

    /// Returns true once after a quit key was pressed.
    pub(crate) fn take_quit(&mut self) -> bool {
        std::mem::take(&mut self.quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_press_holds_for_a_while() {
        let mut keypad = Keypad::default();
        let start = Instant::now();
        keypad.handle_key(key(KeyCode::Char('a')), start);

        assert!(keypad.is_held(SimKey::A, start + Duration::from_millis(100)));
        assert!(!keypad.is_held(SimKey::A, start + Duration::from_millis(200)));
        assert!(!keypad.is_held(SimKey::B, start));
    }

    #[test]
    fn test_arrows_map_to_stick() {
        let mut keypad = Keypad::default();
        let start = Instant::now();
        keypad.handle_key(key(KeyCode::Left), start);
        keypad.handle_key(key(KeyCode::Up), start);
        assert_eq!(keypad.held(start), vec![SimKey::Up, SimKey::Left]);
    }

    #[test]
    fn test_quit_is_reported_once() {
        let mut keypad = Keypad::default();
        keypad.handle_key(key(KeyCode::Char('q')), Instant::now());
        assert!(keypad.take_quit());
        assert!(!keypad.take_quit());
    }
}
