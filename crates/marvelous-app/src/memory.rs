//! In-process task store for tests, available with the `test-util` feature.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use marvelous_core::{Task, TaskId, TaskStatus};
use time::OffsetDateTime;
use tokio::sync::Semaphore;

use crate::store::{StoreError, TaskStore};

/// One call observed by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `list(status)`.
    List(TaskStatus),
    /// `add_task(content)`.
    AddTask(String),
    /// `set_status(id, status)`.
    SetStatus(TaskId, TaskStatus),
    /// `delete_all()`.
    DeleteAll,
}

#[derive(Debug, Default)]
struct Inner {
    tasks: Vec<Task>,
    next_id: u64,
    calls: Vec<StoreCall>,
    fail_list: Option<StoreError>,
    fail_add: Option<StoreError>,
    fail_set_status: Option<StoreError>,
    fail_delete_all: Option<StoreError>,
    write_gate: Option<Arc<Semaphore>>,
}

/// [`TaskStore`] kept entirely in memory, with call recording and failure injection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `tasks`, filed by their status.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let store = Self::new();
        store.lock().tasks.extend(tasks);
        store
    }

    /// Snapshot of every stored task.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    /// Every call received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Number of calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&StoreCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    /// Make every `list` call fail with `error` (or succeed again with `None`).
    pub fn fail_list(&self, error: Option<StoreError>) {
        self.lock().fail_list = error;
    }

    /// Make every `add_task` call fail with `error` (or succeed again with `None`).
    pub fn fail_add(&self, error: Option<StoreError>) {
        self.lock().fail_add = error;
    }

    /// Make every `set_status` call fail with `error` (or succeed again with `None`).
    pub fn fail_set_status(&self, error: Option<StoreError>) {
        self.lock().fail_set_status = error;
    }

    /// Make every `delete_all` call fail with `error` (or succeed again with `None`).
    pub fn fail_delete_all(&self, error: Option<StoreError>) {
        self.lock().fail_delete_all = error;
    }

    /// Park `set_status` calls until [`Self::release_status_writes`] is called.
    pub fn hold_status_writes(&self) {
        self.lock().write_gate = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let parked and future `set_status` calls proceed.
    pub fn release_status_writes(&self) {
        if let Some(gate) = self.lock().write_gate.take() {
            gate.close();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskStore for MemoryStore {
    type Error = StoreError;

    async fn list(&self, status: TaskStatus) -> Result<Vec<Task>, Self::Error> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::List(status));
        if let Some(err) = inner.fail_list.clone() {
            return Err(err);
        }
        Ok(inner
            .tasks
            .iter()
            .filter(|task| task.status == status)
            .cloned()
            .collect())
    }

    async fn add_task(&self, content: &str) -> Result<Task, Self::Error> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::AddTask(content.to_owned()));
        if let Some(err) = inner.fail_add.clone() {
            return Err(err);
        }
        inner.next_id += 1;
        let task = Task::new(
            TaskId::new(format!("task-{}", inner.next_id)),
            content.to_owned(),
            OffsetDateTime::now_utc(),
            TaskStatus::Doing,
        );
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn set_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), Self::Error> {
        let gate = {
            let mut inner = self.lock();
            inner.calls.push(StoreCall::SetStatus(id.clone(), status));
            inner.write_gate.clone()
        };
        if let Some(gate) = gate {
            // Closing the semaphore is the release signal.
            let _ = gate.acquire().await;
        }

        let mut inner = self.lock();
        if let Some(err) = inner.fail_set_status.clone() {
            return Err(err);
        }
        if let Some(task) = inner.tasks.iter_mut().find(|task| &task.id == id) {
            task.status = status;
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::DeleteAll);
        if let Some(err) = inner.fail_delete_all.clone() {
            return Err(err);
        }
        inner.tasks.clear();
        Ok(())
    }
}
