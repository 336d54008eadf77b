use marvelous_app::TaskStore;

use super::terminal::{CrosstermTerminal, TerminalPrompt};
use super::view::{Ui, UiAction};

pub(super) mod navigation;

pub(super) async fn handle_ui_action<S: TaskStore>(
    terminal: &mut CrosstermTerminal,
    ui: &mut Ui<S>,
    action: UiAction,
) {
    match action {
        UiAction::AddTask { content } => ui.add_task(content).await,
        UiAction::Reload => ui.reload().await,
        UiAction::DeleteAll => {
            let mut prompt = TerminalPrompt::new(terminal);
            ui.delete_all(&mut prompt).await;
            if let Some(err) = prompt.failure {
                ui.error(format!("Could not ask for confirmation: {err}"));
            }
        }
    }
}
