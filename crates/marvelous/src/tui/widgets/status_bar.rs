use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use marvelous_app::TaskStore;

use super::super::constants::INPUT_CURSOR;
use super::super::view::{Focus, Message, Ui};

impl<S: TaskStore> Ui<S> {
    pub(in crate::tui) fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(Self::status_layout_constraints())
            .split(area);

        let instructions = Paragraph::new(self.instructions())
            .block(Block::default().title("Keys").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(instructions, rows[0]);

        let input = Paragraph::new(self.input_line())
            .block(Block::default().title("Input").borders(Borders::ALL));
        f.render_widget(input, rows[1]);

        let message = Paragraph::new(self.status_text())
            .block(Block::default().title("Status").borders(Borders::ALL))
            .style(self.status_style())
            .wrap(Wrap { trim: true });
        f.render_widget(message, rows[2]);
    }

    pub(in crate::tui) const fn status_layout_constraints() -> [Constraint; 3] {
        [
            Constraint::Length(Self::INSTRUCTIONS_HEIGHT),
            Constraint::Length(Self::INPUT_HEIGHT),
            Constraint::Min(Self::STATUS_MESSAGE_MIN_HEIGHT),
        ]
    }

    pub(in crate::tui) fn instructions(&self) -> String {
        self.keybindings.generate_help_text(self.focus.view_type())
    }

    fn input_line(&self) -> Line<'_> {
        let field = |label: &'static str, text: &str, focused: bool| {
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut value = text.to_owned();
            if focused {
                value.push_str(INPUT_CURSOR);
            }
            [Span::styled(label, label_style), Span::raw(value)]
        };

        let mut spans = Vec::with_capacity(5);
        spans.extend(field("New task: ", self.draft.as_str(), self.focus == Focus::AddForm));
        spans.push(Span::raw("   "));
        spans.extend(field("Search: ", self.search.as_str(), self.focus == Focus::SearchForm));
        Line::from(spans)
    }

    fn status_text(&self) -> &str {
        self.message.as_ref().map_or("", |msg| msg.text.as_str())
    }

    fn status_style(&self) -> Style {
        self.message.as_ref().map_or_else(Style::default, Message::style)
    }
}
