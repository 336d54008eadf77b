//! Application layer logic for marvelous.
//!
//! This crate provides the board state machine, the storage seam, configuration, and
//! the confirmation capability shared by the CLI and TUI.

pub mod board;
pub mod config;
pub mod confirm;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod store;

// Re-exports for convenience
pub use board::{
    Board, BoardError, DELETE_ALL_PROMPT, DeleteOutcome, RETAINED_OUTCOMES, SettledWrite, WriteState,
    WriteTicket,
};
pub use config::{DEFAULT_BASE_URL, RemoteConfig};
pub use confirm::{Assume, Confirm, StdinPrompt};
#[cfg(any(test, feature = "test-util"))]
pub use memory::{MemoryStore, StoreCall};
pub use store::{StoreError, TaskStore};
