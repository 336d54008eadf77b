//! Storage seam between the board and the remote task store.

use std::future::Future;

use marvelous_core::{Task, TaskId, TaskStatus};
use marvelous_store_http::{HttpStoreError, HttpTaskStore};
use thiserror::Error;

/// Failure categories the board distinguishes when talking to a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("network error: {0}")]
    Network(String),
    /// The store answered with something that is not the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The store rejected a write as conflicting.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Any other failure reported by the store.
    #[error("{0}")]
    Other(String),
}

impl From<HttpStoreError> for StoreError {
    fn from(err: HttpStoreError) -> Self {
        let message = err.to_string();
        match err {
            HttpStoreError::Network { .. } => Self::Network(message),
            HttpStoreError::Decode { .. } => Self::Decode(message),
            HttpStoreError::Conflict { .. } => Self::Conflict(message),
            HttpStoreError::InvalidBaseUrl { .. } | HttpStoreError::Status { .. } => Self::Other(message),
        }
    }
}

/// Minimal storage abstraction required by [`crate::Board`].
///
/// Futures are `Send` so status writes can run on spawned tasks.
pub trait TaskStore: Send + Sync + 'static {
    /// Error type bubbled up from the backing store.
    type Error: Into<StoreError> + Send;

    /// Fetch every task filed under `status`.
    ///
    /// # Errors
    /// Returns a store-specific error when the list cannot be fetched or decoded.
    fn list(&self, status: TaskStatus) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send;

    /// Fetch the doing-list.
    ///
    /// # Errors
    /// Returns a store-specific error when the list cannot be fetched or decoded.
    fn list_doing(&self) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send {
        self.list(TaskStatus::Doing)
    }

    /// Fetch the done-list.
    ///
    /// # Errors
    /// Returns a store-specific error when the list cannot be fetched or decoded.
    fn list_done(&self) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send {
        self.list(TaskStatus::Done)
    }

    /// Create a doing task stamped with the current time.
    ///
    /// # Errors
    /// Returns a store-specific error when the task cannot be created.
    fn add_task(&self, content: &str) -> impl Future<Output = Result<Task, Self::Error>> + Send;

    /// Record a new status for an existing task.
    ///
    /// # Errors
    /// Returns a store-specific error when the update is rejected or cannot be sent.
    fn set_status(
        &self,
        id: &TaskId,
        status: TaskStatus,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Remove every task regardless of status.
    ///
    /// # Errors
    /// Returns a store-specific error when the deletion cannot be sent.
    fn delete_all(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl TaskStore for HttpTaskStore {
    type Error = HttpStoreError;

    async fn list(&self, status: TaskStatus) -> Result<Vec<Task>, Self::Error> {
        self.fetch_tasks(status).await
    }

    async fn add_task(&self, content: &str) -> Result<Task, Self::Error> {
        self.insert_task(content).await
    }

    async fn set_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), Self::Error> {
        self.update_status(id, status).await
    }

    async fn delete_all(&self) -> Result<(), Self::Error> {
        self.remove_all().await
    }
}
