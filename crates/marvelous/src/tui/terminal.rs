use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use marvelous_app::{Confirm, StdinPrompt};
use ratatui::{Terminal, backend::CrosstermBackend};

pub(super) type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Switch stdout to raw mode on the alternate screen.
pub(super) fn enter_terminal() -> Result<CrosstermTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

/// Undo [`enter_terminal`]. Best effort: the process is usually about to exit.
pub(super) fn restore_terminal(terminal: &mut CrosstermTerminal) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

pub(super) fn with_terminal_suspended<F, T>(terminal: &mut CrosstermTerminal, f: F) -> Result<T>
where
    F: FnOnce() -> T,
{
    suspend_terminal(terminal)?;
    let result = f();
    resume_terminal(terminal)?;
    Ok(result)
}

fn suspend_terminal(terminal: &mut CrosstermTerminal) -> Result<()> {
    terminal.show_cursor()?;
    terminal.flush()?;
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("failed to leave alternate screen")?;
    Ok(())
}

fn resume_terminal(terminal: &mut CrosstermTerminal) -> Result<()> {
    execute!(terminal.backend_mut(), EnterAlternateScreen).context("failed to re-enter alternate screen")?;
    enable_raw_mode().context("failed to enable raw mode")?;
    terminal.clear()?;
    terminal.hide_cursor()?;
    terminal.flush()?;
    Ok(())
}

/// Asks yes/no questions on the plain terminal, leaving the TUI for the duration.
pub(super) struct TerminalPrompt<'a> {
    terminal: &'a mut CrosstermTerminal,
    /// Terminal failure seen while asking, if any.
    pub(super) failure: Option<anyhow::Error>,
}

impl<'a> TerminalPrompt<'a> {
    pub(super) const fn new(terminal: &'a mut CrosstermTerminal) -> Self {
        Self {
            terminal,
            failure: None,
        }
    }
}

impl Confirm for TerminalPrompt<'_> {
    fn confirm(&mut self, message: &str) -> bool {
        match with_terminal_suspended(self.terminal, || StdinPrompt::stdio().confirm(message)) {
            Ok(answer) => answer,
            Err(err) => {
                // A prompt that could not be shown is a refusal.
                self.failure = Some(err);
                false
            }
        }
    }
}
