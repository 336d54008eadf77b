use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

/// Single-line text input owned by the TUI (new-task draft, search text).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct InputForm {
    text: String,
}

impl InputForm {
    pub(super) fn as_str(&self) -> &str {
        &self.text
    }

    pub(super) fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Remove the last user-perceived character.
    pub(super) fn backspace(&mut self) -> bool {
        match self.text.grapheme_indices(true).next_back() {
            Some((start, _)) => {
                self.text.truncate(start);
                true
            }
            None => false,
        }
    }

    pub(super) fn clear(&mut self) -> bool {
        let changed = !self.text.is_empty();
        self.text.clear();
        changed
    }

    /// Hand out the current text and leave the input empty.
    pub(super) fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Apply a typing key. Returns whether the text changed.
    pub(super) fn handle_edit_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(ch) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.push(ch);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_appends_and_backspace_removes_graphemes() {
        let mut form = InputForm::default();
        for ch in "Café 👍🏽".chars() {
            assert!(form.handle_edit_key(&press(KeyCode::Char(ch))));
        }
        assert_eq!(form.as_str(), "Café 👍🏽");

        assert!(form.handle_edit_key(&press(KeyCode::Backspace)));
        assert_eq!(form.as_str(), "Café ");
        form.backspace();
        form.backspace();
        assert_eq!(form.as_str(), "Caf");
    }

    #[test]
    fn backspace_on_empty_input_is_a_no_op() {
        let mut form = InputForm::default();
        assert!(!form.backspace());
        assert!(!form.clear());
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut form = InputForm::default();
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(!form.handle_edit_key(&ctrl_u));
        assert!(!form.handle_edit_key(&press(KeyCode::Tab)));

        let shifted = KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT);
        assert!(form.handle_edit_key(&shifted));
        assert_eq!(form.as_str(), "B");
    }

    #[test]
    fn take_returns_text_and_clears() {
        let mut form = InputForm::default();
        form.push('x');
        assert_eq!(form.take(), "x");
        assert_eq!(form.as_str(), "");
    }
}
