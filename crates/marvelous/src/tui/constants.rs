//! Shared constants for the TUI to keep layout and timing in sync.

/// Interval in milliseconds between UI ticks/redraws.
pub const TUI_TICK_RATE_MS: u64 = 200;
/// Time-to-live in seconds for transient status messages.
pub const UI_MESSAGE_TTL_SECS: u64 = 5;
/// Title shown in the header bar.
pub const APP_TITLE: &str = "Marvelous Todo";
/// Title of the pane holding the doing-list.
pub const DOING_PANE_TITLE: &str = "To Do";
/// Title of the pane holding the done-list.
pub const DONE_PANE_TITLE: &str = "Done";
/// Highlight symbol shown beside selected list entries.
pub const TASK_LIST_HIGHLIGHT_SYMBOL: &str = "▶ ";
/// Marker drawn after the text of the focused input.
pub const INPUT_CURSOR: &str = "▏";
