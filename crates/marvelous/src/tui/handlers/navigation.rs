use crossterm::event::{KeyEvent, KeyEventKind};
use marvelous_app::TaskStore;

use super::super::form::InputForm;
use super::super::view::{Focus, Ui, UiAction};
use crate::config::{Action, ViewType};

const BOARD_ACTIONS: [Action; 9] = [
    Action::Quit,
    Action::Down,
    Action::Up,
    Action::SwitchPane,
    Action::Toggle,
    Action::AddTask,
    Action::Search,
    Action::DeleteAll,
    Action::Reload,
];

impl<S: TaskStore> Ui<S> {
    /// Apply a key press. Work that needs the store or the terminal is returned as an action.
    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match self.focus {
            Focus::Lists => self.handle_board_key(key),
            Focus::AddForm | Focus::SearchForm => self.handle_form_key(key),
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        let action = BOARD_ACTIONS
            .into_iter()
            .find(|action| self.keybindings.matches(ViewType::Board, *action, &key))?;

        match action {
            Action::Quit => self.should_quit = true,
            Action::Down => self.select_next(),
            Action::Up => self.select_prev(),
            Action::SwitchPane => self.switch_pane(),
            Action::Toggle => self.toggle_selected(),
            Action::AddTask => self.focus = Focus::AddForm,
            Action::Search => self.focus = Focus::SearchForm,
            Action::DeleteAll => return Some(UiAction::DeleteAll),
            Action::Reload => {
                self.info("Reloading…");
                return Some(UiAction::Reload);
            }
            Action::Submit | Action::Cancel | Action::Clear => {}
        }
        None
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        let searching = self.focus == Focus::SearchForm;

        if self.keybindings.matches(ViewType::Form, Action::Submit, &key) {
            self.focus = Focus::Lists;
            if searching {
                return None;
            }
            let content = self.draft.take();
            return Some(UiAction::AddTask { content });
        }

        if self.keybindings.matches(ViewType::Form, Action::Cancel, &key) {
            self.focus = Focus::Lists;
            return None;
        }

        let changed = if self.keybindings.matches(ViewType::Form, Action::Clear, &key) {
            self.active_form_mut().clear()
        } else {
            self.active_form_mut().handle_edit_key(&key)
        };
        if changed && searching {
            // The visible lists change with every search edit.
            self.reset_selection();
        }
        None
    }

    fn active_form_mut(&mut self) -> &mut InputForm {
        if self.focus == Focus::SearchForm {
            &mut self.search
        } else {
            &mut self.draft
        }
    }
}
