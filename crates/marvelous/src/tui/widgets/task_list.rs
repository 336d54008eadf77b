use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use marvelous_app::TaskStore;
use marvelous_core::TaskStatus;

use super::super::constants::{DOING_PANE_TITLE, DONE_PANE_TITLE, TASK_LIST_HIGHLIGHT_SYMBOL};
use super::super::view::{Focus, Ui};
use super::util::truncate_with_ellipsis;

impl<S: TaskStore> Ui<S> {
    pub(in crate::tui) fn draw_task_pane(&self, f: &mut Frame<'_>, area: Rect, status: TaskStatus) {
        let tasks = self.visible(status);
        // Borders plus the highlight symbol.
        let text_width = usize::from(area.width.saturating_sub(4));

        let items: Vec<ListItem<'_>> = if tasks.is_empty() {
            let message = if self.search.as_str().is_empty() {
                "No tasks"
            } else {
                "No tasks match the search"
            };
            vec![ListItem::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            )))]
        } else {
            tasks
                .iter()
                .map(|task| {
                    let mut content_style = Style::default().add_modifier(Modifier::BOLD);
                    if task.status == TaskStatus::Done {
                        content_style = content_style.add_modifier(Modifier::CROSSED_OUT);
                    }
                    let content = Span::styled(
                        truncate_with_ellipsis(&task.content, text_width).into_owned(),
                        content_style,
                    );
                    let meta = format!("{} | {}", task.id, task.date.date());
                    let meta = Span::styled(
                        truncate_with_ellipsis(&meta, text_width).into_owned(),
                        Style::default().fg(Color::DarkGray),
                    );
                    ListItem::new(vec![Line::from(content), Line::from(meta)])
                })
                .collect()
        };

        let focused = self.focus == Focus::Lists && self.pane == status;
        let title = match status {
            TaskStatus::Doing => DOING_PANE_TITLE,
            TaskStatus::Done => DONE_PANE_TITLE,
        };
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("{title} ({})", tasks.len()))
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(TASK_LIST_HIGHLIGHT_SYMBOL);
        let mut state = ListState::default();
        if self.pane == status {
            state.select(self.selected_index(status));
        }
        f.render_stateful_widget(list, area, &mut state);
    }
}
