//! Keybindings configuration for the TUI.

#![allow(clippy::enum_glob_use, clippy::unused_self)]

use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

macro_rules! vec_of_strings {
    ($($s:expr),* $(,)?) => {
        vec![$($s.to_string()),*]
    };
}

/// Keybindings configuration for all TUI views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyBindingsConfig {
    /// Keybindings while browsing the two lists.
    pub board: BoardKeyBindings,
    /// Keybindings while typing into the add or search input.
    pub form: FormKeyBindings,
}

/// Keybindings for the board view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardKeyBindings {
    /// Quit the application.
    pub quit: Vec<String>,
    /// Move down in the focused list.
    pub down: Vec<String>,
    /// Move up in the focused list.
    pub up: Vec<String>,
    /// Move focus to the other list.
    pub switch_pane: Vec<String>,
    /// Complete or reopen the selected task.
    pub toggle: Vec<String>,
    /// Start typing a new task.
    pub add_task: Vec<String>,
    /// Start editing the search text.
    pub search: Vec<String>,
    /// Delete every task after confirmation.
    pub delete_all: Vec<String>,
    /// Reload both lists from the store.
    pub reload: Vec<String>,
}

/// Keybindings for the input forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormKeyBindings {
    /// Submit the input.
    pub submit: Vec<String>,
    /// Leave the input and return to the lists.
    pub cancel: Vec<String>,
    /// Clear the input.
    pub clear: Vec<String>,
}

impl Default for BoardKeyBindings {
    fn default() -> Self {
        Self {
            quit: vec_of_strings!["q", "Q"],
            down: vec_of_strings!["j", "Down"],
            up: vec_of_strings!["k", "Up"],
            switch_pane: vec_of_strings!["Tab", "h", "l"],
            toggle: vec_of_strings!["Space", "Enter"],
            add_task: vec_of_strings!["a"],
            search: vec_of_strings!["/"],
            delete_all: vec_of_strings!["D"],
            reload: vec_of_strings!["r"],
        }
    }
}

impl Default for FormKeyBindings {
    fn default() -> Self {
        Self {
            submit: vec_of_strings!["Enter"],
            cancel: vec_of_strings!["Esc"],
            clear: vec_of_strings!["Ctrl+u"],
        }
    }
}

/// Parse a key string into a `KeyEvent`.
///
/// # Examples
/// - "j" -> `KeyCode::Char('j')`
/// - "Enter" -> `KeyCode::Enter`
/// - "Ctrl+u" -> `KeyCode::Char('u')` with CONTROL modifier
pub fn parse_key(s: &str) -> Result<KeyEvent> {
    // A lone "+" is the plus key, not a modifier separator.
    if s == "+" {
        return Ok(KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE));
    }

    let parts: Vec<&str> = s.split('+').collect();
    let Some((key_part, modifier_parts)) = parts.split_last() else {
        bail!("Empty key string");
    };

    let mut modifiers = KeyModifiers::NONE;
    for &modifier in modifier_parts {
        match modifier {
            "Ctrl" | "Control" => modifiers |= KeyModifiers::CONTROL,
            "Alt" => modifiers |= KeyModifiers::ALT,
            "Shift" => modifiers |= KeyModifiers::SHIFT,
            other => bail!("Unknown modifier: {other}"),
        }
    }

    let code = parse_key_code(key_part)?;

    Ok(KeyEvent::new(code, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    match s {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" => Ok(KeyCode::Esc),
        "Space" => Ok(KeyCode::Char(' ')),
        "Backspace" => Ok(KeyCode::Backspace),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Tab" => Ok(KeyCode::Tab),
        "Delete" => Ok(KeyCode::Delete),
        s if s.chars().count() == 1 => {
            let ch = s.chars().next().ok_or_else(|| anyhow!("Empty char"))?;
            Ok(KeyCode::Char(ch))
        }
        other => bail!("Unknown key: {other}"),
    }
}

/// Validate the keybindings configuration.
///
/// Checks for:
/// - Empty key bindings
/// - Invalid key expressions
/// - Key conflicts within each view
pub fn validate_keybindings_config(config: &KeyBindingsConfig) -> Result<()> {
    let views = [
        ("board", collect_board_bindings(config)),
        ("form", collect_form_bindings(config)),
    ];
    for (view_name, bindings) in &views {
        validate_non_empty_bindings(view_name, bindings)?;
        validate_key_expressions(view_name, bindings)?;
        validate_view_keybindings(view_name, bindings)?;
    }
    Ok(())
}

fn validate_non_empty_bindings(view_name: &str, bindings: &[(&str, &[String])]) -> Result<()> {
    for (action, keys) in bindings {
        if keys.is_empty() {
            bail!("{view_name}.{action} must have at least one key binding");
        }
    }
    Ok(())
}

fn validate_key_expressions(view_name: &str, bindings: &[(&str, &[String])]) -> Result<()> {
    for (action, keys) in bindings {
        for key in *keys {
            parse_key(key).with_context(|| format!("Invalid key '{key}' in {view_name}.{action}"))?;
        }
    }
    Ok(())
}

fn validate_view_keybindings(view_name: &str, bindings: &[(&str, &[String])]) -> Result<()> {
    let mut key_to_actions: HashMap<&str, Vec<&str>> = HashMap::new();

    for (action, keys) in bindings {
        for key in *keys {
            key_to_actions.entry(key.as_str()).or_default().push(*action);
        }
    }

    let mut conflicts: Vec<_> = key_to_actions
        .into_iter()
        .filter(|(_, actions)| actions.len() > 1)
        .collect();
    conflicts.sort_unstable();
    if let Some((key, actions)) = conflicts.first() {
        bail!("Key '{key}' is bound to multiple actions in {view_name}: {actions:?}");
    }

    Ok(())
}

fn collect_board_bindings(config: &KeyBindingsConfig) -> Vec<(&'static str, &[String])> {
    let board = &config.board;
    vec![
        ("quit", board.quit.as_slice()),
        ("down", board.down.as_slice()),
        ("up", board.up.as_slice()),
        ("switch_pane", board.switch_pane.as_slice()),
        ("toggle", board.toggle.as_slice()),
        ("add_task", board.add_task.as_slice()),
        ("search", board.search.as_slice()),
        ("delete_all", board.delete_all.as_slice()),
        ("reload", board.reload.as_slice()),
    ]
}

fn collect_form_bindings(config: &KeyBindingsConfig) -> Vec<(&'static str, &[String])> {
    let form = &config.form;
    vec![
        ("submit", form.submit.as_slice()),
        ("cancel", form.cancel.as_slice()),
        ("clear", form.clear.as_slice()),
    ]
}

/// View type for keybinding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    /// The two task lists.
    Board,
    /// The add or search input.
    Form,
}

/// Action that can be performed in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Board
    /// Quit.
    Quit,
    /// Move down.
    Down,
    /// Move up.
    Up,
    /// Focus the other list.
    SwitchPane,
    /// Complete or reopen the selected task.
    Toggle,
    /// Open the add input.
    AddTask,
    /// Open the search input.
    Search,
    /// Delete every task.
    DeleteAll,
    /// Reload both lists.
    Reload,

    // Form
    /// Submit the input.
    Submit,
    /// Leave the input.
    Cancel,
    /// Clear the input.
    Clear,
}

impl KeyBindingsConfig {
    /// Generate help text for a specific view.
    pub fn generate_help_text(&self, view: ViewType) -> String {
        match view {
            ViewType::Board => self.generate_board_help(),
            ViewType::Form => self.generate_form_help(),
        }
    }

    fn generate_board_help(&self) -> String {
        format!(
            "{}:move {}:switch {}:toggle {}:add {}:search {}:reload {}:delete all {}:quit",
            self.format_key_pair(&self.board.down, &self.board.up),
            self.format_first_key(&self.board.switch_pane),
            self.format_first_key(&self.board.toggle),
            self.format_first_key(&self.board.add_task),
            self.format_first_key(&self.board.search),
            self.format_first_key(&self.board.reload),
            self.format_first_key(&self.board.delete_all),
            self.format_first_key(&self.board.quit),
        )
    }

    fn generate_form_help(&self) -> String {
        format!(
            "{}:submit {}:clear {}:back",
            self.format_first_key(&self.form.submit),
            self.format_first_key(&self.form.clear),
            self.format_first_key(&self.form.cancel),
        )
    }

    /// Format the first key of a key binding list for display.
    fn format_first_key(&self, keys: &[String]) -> String {
        keys.first()
            .map_or_else(|| "?".to_string(), |k| self.format_key_display(k))
    }

    /// Format two keys as a pair (e.g., "j/k" for down/up).
    fn format_key_pair(&self, down: &[String], up: &[String]) -> String {
        format!("{}/{}", self.format_first_key(down), self.format_first_key(up))
    }

    /// Format a key for display, converting special keys to readable symbols.
    fn format_key_display(&self, key: &str) -> String {
        match key {
            "Enter" => "↵".to_string(),
            "Space" | " " => "Space".to_string(),
            "Backspace" => "BS".to_string(),
            "Delete" => "Del".to_string(),
            "Up" => "↑".to_string(),
            "Down" => "↓".to_string(),
            "Left" => "←".to_string(),
            "Right" => "→".to_string(),
            "PageUp" => "PgUp".to_string(),
            "PageDown" => "PgDn".to_string(),
            other if other.starts_with("Ctrl+") || other.starts_with("Alt+") => other.replace('+', "-"),
            other => other.to_string(),
        }
    }

    /// Check if a key event matches a configured action in a view.
    pub fn matches(&self, view: ViewType, action: Action, key: &KeyEvent) -> bool {
        self.get_keys(view, action)
            .iter()
            .filter_map(|key_str| parse_key(key_str).ok())
            .any(|expected| Self::key_event_matches(&expected, key))
    }

    fn key_event_matches(expected: &KeyEvent, actual: &KeyEvent) -> bool {
        if expected.code != actual.code {
            return false;
        }
        // Terminals report Shift alongside upper-case characters; the character already
        // carries it.
        let significant = |event: &KeyEvent| {
            let mut modifiers = event.modifiers;
            if matches!(event.code, KeyCode::Char(_)) {
                modifiers.remove(KeyModifiers::SHIFT);
            }
            modifiers
        };
        significant(expected) == significant(actual)
    }

    fn get_keys(&self, view: ViewType, action: Action) -> &[String] {
        use Action::*;
        use ViewType::*;

        match (view, action) {
            (Board, Quit) => &self.board.quit,
            (Board, Down) => &self.board.down,
            (Board, Up) => &self.board.up,
            (Board, SwitchPane) => &self.board.switch_pane,
            (Board, Toggle) => &self.board.toggle,
            (Board, AddTask) => &self.board.add_task,
            (Board, Search) => &self.board.search,
            (Board, DeleteAll) => &self.board.delete_all,
            (Board, Reload) => &self.board.reload,

            (Form, Submit) => &self.form.submit,
            (Form, Cancel) => &self.form.cancel,
            (Form, Clear) => &self.form.clear,

            // Invalid combinations
            _ => &[],
        }
    }
}
