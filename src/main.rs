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

//! # Board simulator.
//!
//! Runs the bitloop applications (main menu, melody player, pattern gallery,
//! memory game and settings) against a simulated board drawn in the
//! terminal.
//!
//! ## Architecture
//!
//! Everything happens on the main thread. Each pass of the loop:
//!
//! * pumps pending key presses into the simulated buttons and joystick,
//! * runs one runtime frame, which polls the devices, dispatches events,
//!   advances timers, updates and renders the current scene and then waits
//!   for the frame boundary,
//! * draws the simulated OLED, the LED matrix and the board status with
//!   `ratatui`.
//!
//! The terminal follows a strict setup-run-teardown pattern so that it is
//! restored even when the loop fails. Log output goes to a file, since the
//! terminal is taken over by the interface.

mod apps;
mod render;
mod sim;
mod theme;
mod util;

use std::{fs::File, io};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use env_logger::{Builder, Env, Target};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};

use bitloop::{
    LoopStatus, Runtime,
    clock::SystemClock,
    config,
    events::EventKind,
};

use crate::{render::BoardView, sim::Board, theme::Theme};

const LOG_FILE: &str = "bitloop.log";

/// The entry point of the simulator.
///
/// Loads the configuration, builds the runtime over the simulated board and
/// manages the terminal lifecycle around the main loop.
fn main() -> Result<()> {
    init_logging()?;

    let config = config::load_config();
    let theme = Theme::default();

    let board = Board::new(&config);
    let hardware = board.hardware(&config);
    let mut runtime = Runtime::new(&config, hardware, Box::new(SystemClock::new()))
        .context("Failed to initialise runtime")?;
    runtime.start(apps::build(&config));

    let mut terminal = setup_terminal(&theme)?;
    let res = run(&mut terminal, &mut runtime, &board, &theme);
    runtime.shutdown();
    restore_terminal(&mut terminal);

    info!("simulator stopped after {} frames", runtime.frame_count());
    res.context("Simulator error occurred")
}

/// Sends log output to [`LOG_FILE`], at `info` unless `RUST_LOG` says
/// otherwise.
fn init_logging() -> Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("Failed to create {}", LOG_FILE))?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Prepares the terminal: board background colour, raw mode and the
/// alternate screen.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(theme: &Theme) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Paint the whole emulator window, otherwise a thin outline of the
    // user's own background shows around the frame.
    if let Some(hex) = Theme::to_hex(theme.background_colour) {
        util::term::set_terminal_bg(&hex);
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Best-effort, every step is attempted even if an earlier one fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Runs frames until the scene stack empties.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &mut Runtime,
    board: &Board,
    theme: &Theme,
) -> Result<()> {
    loop {
        board.pump()?;
        if board.take_quit() {
            runtime.events_mut().post(EventKind::Quit);
        }

        let status = runtime.step();

        let view = board_view(runtime, board);
        terminal.draw(|f| render::draw(f, &view, theme))?;

        if status == LoopStatus::Exited {
            return Ok(());
        }
    }
}

fn board_view(runtime: &Runtime, board: &Board) -> BoardView {
    BoardView {
        screen: board.screen(),
        tone: board.tone(),
        tones_emitted: board.tones_emitted(),
        volume: board.volume(),
        matrix: board.matrix(),
        matrix_size: board.matrix_size(),
        brightness: board.brightness(),
        path: runtime
            .stack()
            .path()
            .into_iter()
            .map(str::to_string)
            .collect(),
        uptime: runtime.now(),
        frames: runtime.frame_count(),
        held: board.held_keys(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use bitloop::{clock::ManualClock, config::AppConfig};

    #[test]
    fn test_simulated_board_boots_into_main_menu() {
        let config = AppConfig::default();
        let board = Board::new(&config);
        let clock = ManualClock::new();
        let mut runtime =
            Runtime::new(&config, board.hardware(&config), Box::new(clock.clone())).unwrap();
        runtime.start(apps::build(&config));

        assert_eq!(runtime.step(), LoopStatus::Running);
        let view = board_view(&runtime, &board);
        assert_eq!(view.path, vec![apps::MAIN_MENU.to_string()]);
        assert!(view.screen.iter().any(|line| line.text.contains("BITLOOP")));
        assert!(view.uptime >= Duration::from_millis(33));

        runtime.events_mut().post(EventKind::Quit);
        assert_eq!(runtime.step(), LoopStatus::Exited);
    }
}
