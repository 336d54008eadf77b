//! Domain types for the marvelous task board.

/// Identifier types.
pub mod id;
/// Case-insensitive search.
pub mod text_matcher;
/// Filtering and ordering of lists for display.
pub mod view;

pub use id::TaskId;
pub use text_matcher::TextMatcher;
pub use view::{compare_content, filter_sort};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::OffsetDateTime;

/// Which of the two lists a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Still to do.
    Doing,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// Both statuses in display order.
    pub const ALL: [Self; 2] = [Self::Doing, Self::Done];

    /// Wire value used by the remote store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// The opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Doing => Self::Done,
            Self::Done => Self::Doing,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status '{0}' (expected 'doing' or 'done')")]
pub struct ParseStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}

/// A unit of work as exchanged with the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned by the store.
    #[serde(rename = "_id")]
    pub id: TaskId,
    /// Display text.
    pub content: String,
    /// Creation timestamp, set by the client when the task was added.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Current list.
    pub status: TaskStatus,
}

impl Task {
    /// Assemble a task from its parts.
    #[must_use]
    pub const fn new(id: TaskId, content: String, date: OffsetDateTime, status: TaskStatus) -> Self {
        Self {
            id,
            content,
            date,
            status,
        }
    }

    /// The same task filed under another status. Identity, content and date are kept.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}
