use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent};
use marvelous_app::{Board, TaskStore};
use tracing::subscriber::NoSubscriber;

use crate::config::KeyBindingsConfig;

pub mod constants;
mod form;
mod handlers;
mod terminal;
mod view;
mod widgets;

use self::constants::TUI_TICK_RATE_MS;
use self::handlers::handle_ui_action;
use self::terminal::{CrosstermTerminal, enter_terminal, restore_terminal};
use self::view::Ui;

/// Launch the interactive TUI.
///
/// # Errors
/// Fails when the terminal cannot be set up or an input event cannot be read.
pub fn run<S: TaskStore>(store: S, keybindings: KeyBindingsConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let mut terminal = enter_terminal()?;

    let result = tracing::subscriber::with_default(NoSubscriber::default(), || {
        runtime.block_on(run_event_loop(&mut terminal, store, keybindings))
    });

    restore_terminal(&mut terminal);
    result
}

async fn run_event_loop<S: TaskStore>(
    terminal: &mut CrosstermTerminal,
    store: S,
    keybindings: KeyBindingsConfig,
) -> Result<()> {
    let mut ui = Ui::new(Board::new(store), keybindings);

    ui.info("Loading tasks…");
    terminal.draw(|f| ui.draw(f))?;
    ui.reload().await;

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(TUI_TICK_RATE_MS);

    loop {
        terminal.draw(|f| ui.draw(f))?;
        if ui.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)?
            && let CrosstermEvent::Key(key) = event::read()?
            && let Some(action) = ui.handle_key(key)
        {
            handle_ui_action(terminal, &mut ui, action).await;
        }

        if last_tick.elapsed() >= tick_rate {
            ui.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
