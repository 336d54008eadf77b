use std::time::{Duration, Instant};

use marvelous_app::{Board, Confirm, DeleteOutcome, SettledWrite, TaskStore, WriteState};
use marvelous_core::{Task, TaskStatus};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use super::constants::{APP_TITLE, UI_MESSAGE_TTL_SECS};
use super::form::InputForm;
use crate::config::{KeyBindingsConfig, ViewType};

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Focus {
    /// Browsing the two lists.
    Lists,
    /// Typing a new task.
    AddForm,
    /// Typing the search text.
    SearchForm,
}

impl Focus {
    pub(super) const fn view_type(self) -> ViewType {
        match self {
            Self::Lists => ViewType::Board,
            Self::AddForm | Self::SearchForm => ViewType::Form,
        }
    }
}

pub(super) struct Ui<S: TaskStore> {
    pub(super) board: Board<S>,
    pub(super) keybindings: KeyBindingsConfig,
    pub(super) focus: Focus,
    /// Pane that list keys act on.
    pub(super) pane: TaskStatus,
    selection: [usize; 2],
    pub(super) draft: InputForm,
    pub(super) search: InputForm,
    pub(super) message: Option<Message>,
    pub(super) should_quit: bool,
}

impl<S: TaskStore> Ui<S> {
    pub(super) const HEADER_HEIGHT: u16 = 3;
    pub(super) const MAIN_MIN_HEIGHT: u16 = 5;
    pub(super) const INSTRUCTIONS_HEIGHT: u16 = 3;
    pub(super) const INPUT_HEIGHT: u16 = 3;
    pub(super) const STATUS_MESSAGE_MIN_HEIGHT: u16 = 3;
    pub(super) const STATUS_FOOTER_MIN_HEIGHT: u16 =
        Self::INSTRUCTIONS_HEIGHT + Self::INPUT_HEIGHT + Self::STATUS_MESSAGE_MIN_HEIGHT;

    pub(super) fn new(board: Board<S>, keybindings: KeyBindingsConfig) -> Self {
        Self {
            board,
            keybindings,
            focus: Focus::Lists,
            pane: TaskStatus::Doing,
            selection: [0; 2],
            draft: InputForm::default(),
            search: InputForm::default(),
            message: None,
            should_quit: false,
        }
    }

    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Self::HEADER_HEIGHT),
                Constraint::Min(Self::MAIN_MIN_HEIGHT),
                Constraint::Length(Self::STATUS_FOOTER_MIN_HEIGHT),
            ])
            .split(f.area());

        self.draw_header(f, chunks[0]);
        self.draw_main(f, chunks[1]);
        self.draw_status(f, chunks[2]);
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let title = format!(
            "{APP_TITLE}  ({} to do, {} done)",
            self.board.tasks(TaskStatus::Doing).len(),
            self.board.tasks(TaskStatus::Done).len()
        );
        let header = Paragraph::new(title)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_main(&self, f: &mut Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.draw_task_pane(f, columns[0], TaskStatus::Doing);
        self.draw_task_pane(f, columns[1], TaskStatus::Done);
    }

    /// Tasks of `status` as currently displayed: filtered by the search text, then sorted.
    pub(super) fn visible(&self, status: TaskStatus) -> Vec<&Task> {
        self.board.visible(status, self.search.as_str())
    }

    /// Selected row of the pane for `status`, clamped to what is displayed.
    pub(super) fn selected_index(&self, status: TaskStatus) -> Option<usize> {
        let len = self.visible(status).len();
        (len > 0).then(|| self.selection[pane_slot(status)].min(len - 1))
    }

    pub(super) fn selected_task(&self) -> Option<&Task> {
        let index = self.selected_index(self.pane)?;
        self.visible(self.pane).get(index).copied()
    }

    pub(super) fn select_next(&mut self) {
        let len = self.visible(self.pane).len();
        let slot = &mut self.selection[pane_slot(self.pane)];
        if len > 0 {
            *slot = (*slot + 1).min(len - 1);
        }
    }

    pub(super) fn select_prev(&mut self) {
        let len = self.visible(self.pane).len();
        let slot = &mut self.selection[pane_slot(self.pane)];
        *slot = slot.saturating_sub(1).min(len.saturating_sub(1));
    }

    pub(super) const fn switch_pane(&mut self) {
        self.pane = self.pane.toggled();
    }

    pub(super) const fn reset_selection(&mut self) {
        self.selection = [0; 2];
    }

    /// Complete the selected to-do task, or reopen the selected done task.
    pub(super) fn toggle_selected(&mut self) {
        let Some((id, content)) = self
            .selected_task()
            .map(|task| (task.id.clone(), task.content.clone()))
        else {
            self.error("No task selected");
            return;
        };

        let result = match self.pane {
            TaskStatus::Doing => self.board.complete(&id),
            TaskStatus::Done => self.board.uncomplete(&id),
        };
        match result {
            Ok(_) if self.pane == TaskStatus::Doing => self.info(format!("Completed: {content}")),
            Ok(_) => self.info(format!("Reopened: {content}")),
            Err(err) => self.error(format!("Could not move task: {err}")),
        }
    }

    pub(super) async fn reload(&mut self) {
        match self.board.load().await {
            Ok(()) => self.info(format!(
                "Loaded {} to do, {} done",
                self.board.tasks(TaskStatus::Doing).len(),
                self.board.tasks(TaskStatus::Done).len()
            )),
            Err(err) => self.error(format!("Failed to load tasks: {err}")),
        }
    }

    pub(super) async fn add_task(&mut self, content: String) {
        match self.board.add(&content).await {
            Ok(task) => self.info(format!("Added: {}", task.content)),
            Err(err) => self.error(format!("Failed to add task: {err}")),
        }
    }

    pub(super) async fn delete_all<C: Confirm + ?Sized>(&mut self, confirm: &mut C) {
        match self.board.delete_all(confirm).await {
            DeleteOutcome::Declined => self.info("Delete cancelled"),
            DeleteOutcome::Deleted => {
                self.reset_selection();
                self.info("Deleted all tasks");
            }
            DeleteOutcome::DeletedLocally(err) => {
                self.reset_selection();
                self.error(format!("Lists cleared, but the store reported: {err}"));
            }
        }
    }

    pub(super) fn info(&mut self, message: impl Into<String>) {
        self.message = Some(Message::info(message));
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.message = Some(Message::error(message));
    }

    pub(super) fn tick(&mut self) {
        let failures: Vec<String> = self
            .board
            .reconcile()
            .iter()
            .filter_map(describe_failed_write)
            .collect();
        if let Some(last) = failures.into_iter().last() {
            self.error(last);
            return;
        }

        if let Some(msg) = &self.message
            && msg.is_expired(Duration::from_secs(UI_MESSAGE_TTL_SECS))
        {
            self.message = None;
        }
    }
}

const fn pane_slot(status: TaskStatus) -> usize {
    match status {
        TaskStatus::Doing => 0,
        TaskStatus::Done => 1,
    }
}

fn describe_failed_write(write: &SettledWrite) -> Option<String> {
    let WriteState::Failed(err) = &write.state else {
        return None;
    };
    let target = match write.status {
        TaskStatus::Doing => "to do",
        TaskStatus::Done => "done",
    };
    let suffix = if write.reverted { "; change undone" } else { "" };
    Some(format!(
        "Failed to mark task {} as {target}: {err}{suffix}",
        write.task
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum UiAction {
    AddTask { content: String },
    DeleteAll,
    Reload,
}

pub(super) struct Message {
    pub(super) text: String,
    pub(super) level: MessageLevel,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MessageLevel {
    Info,
    Error,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Info,
            created_at: Instant::now(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Error,
            created_at: Instant::now(),
        }
    }

    pub(super) fn style(&self) -> Style {
        match self.level {
            MessageLevel::Info => Style::default().fg(Color::Green),
            MessageLevel::Error => Style::default().fg(Color::Red),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}
