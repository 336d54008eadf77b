//! The two task lists and the transitions the user can apply to them.
//!
//! Status changes are applied locally first and written to the store in the
//! background. Each background write is tracked by a [`WriteTicket`]; failed writes
//! are rolled back by [`Board::reconcile`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use marvelous_core::{Task, TaskId, TaskStatus, filter_sort};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::confirm::Confirm;
use crate::store::{StoreError, TaskStore};

/// Number of settled write outcomes kept for [`Board::write_state`].
pub const RETAINED_OUTCOMES: usize = 256;

/// Question asked before every delete-all.
pub const DELETE_ALL_PROMPT: &str = "ARE YOU SURE to delete all tasks? It cannot be restored!";

/// Errors surfaced by board operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The task is not in the list the transition starts from.
    #[error("task {0} is not in the expected list")]
    UnknownTask(TaskId),
    /// The store rejected or failed the request.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Handle for one background status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WriteTicket(u64);

/// Progress of a background status write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteState {
    /// The request has not settled yet.
    Pending,
    /// The store accepted the new status.
    Succeeded,
    /// The store did not accept the new status.
    Failed(StoreError),
}

/// A background write that has settled, as reported by [`Board::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledWrite {
    /// Ticket handed out when the write started.
    pub ticket: WriteTicket,
    /// Task whose status was written.
    pub task: TaskId,
    /// Status that was written.
    pub status: TaskStatus,
    /// Final state, never [`WriteState::Pending`].
    pub state: WriteState,
    /// Whether the local move was undone because the write failed.
    pub reverted: bool,
}

/// Result of [`Board::delete_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent and nothing changed.
    Declined,
    /// The store deleted every task and the lists were cleared.
    Deleted,
    /// The lists were cleared but the store reported a failure.
    DeletedLocally(StoreError),
}

#[derive(Debug)]
struct WriteReport {
    ticket: WriteTicket,
    result: Result<(), StoreError>,
}

#[derive(Debug)]
struct PendingWrite {
    task: TaskId,
    status: TaskStatus,
    handle: Option<JoinHandle<()>>,
}

/// Unsettled writes for one task.
#[derive(Debug)]
struct WriteChain {
    /// Most recently issued write; only its failure moves the task.
    latest: WriteTicket,
    /// Status the store is believed to hold for the task.
    confirmed: TaskStatus,
    /// Write that established `confirmed`, if any succeeded yet.
    confirmed_by: Option<WriteTicket>,
}

/// Doing-list and done-list backed by a [`TaskStore`].
#[derive(Debug)]
pub struct Board<S> {
    store: Arc<S>,
    doing: Vec<Task>,
    done: Vec<Task>,
    pending: HashMap<WriteTicket, PendingWrite>,
    chains: HashMap<TaskId, WriteChain>,
    outcomes: BTreeMap<WriteTicket, WriteState>,
    next_ticket: u64,
    reports_tx: UnboundedSender<WriteReport>,
    reports_rx: UnboundedReceiver<WriteReport>,
}

impl<S: TaskStore> Board<S> {
    /// Board with both lists empty.
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Board sharing an existing store handle.
    pub fn from_arc(store: Arc<S>) -> Self {
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();
        Self {
            store,
            doing: Vec::new(),
            done: Vec::new(),
            pending: HashMap::new(),
            chains: HashMap::new(),
            outcomes: BTreeMap::new(),
            next_ticket: 0,
            reports_tx,
            reports_rx,
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tasks currently held in the list for `status`, in arrival order.
    pub fn tasks(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Doing => &self.doing,
            TaskStatus::Done => &self.done,
        }
    }

    /// Tasks of `status` matching `search`, ordered for display.
    pub fn visible(&self, status: TaskStatus, search: &str) -> Vec<&Task> {
        filter_sort(self.tasks(status), search)
    }

    /// Replace both lists with the store's contents.
    ///
    /// Both lists are fetched concurrently and replaced together; when either fetch
    /// fails the lists are left as they were.
    ///
    /// # Errors
    /// Returns the doing-list failure if there is one, otherwise the done-list failure.
    pub async fn load(&mut self) -> Result<(), BoardError> {
        let (doing, done) = tokio::join!(self.store.list_doing(), self.store.list_done());
        let doing = doing.map_err(Into::<StoreError>::into)?;
        let done = done.map_err(Into::<StoreError>::into)?;
        debug!(doing = doing.len(), done = done.len(), "loaded task lists");
        self.doing = doing;
        self.done = done;
        Ok(())
    }

    /// Move a doing task to the done-list and write the new status in the background.
    ///
    /// # Errors
    /// Returns [`BoardError::UnknownTask`] when `id` is not in the doing-list.
    pub fn complete(&mut self, id: &TaskId) -> Result<WriteTicket, BoardError> {
        self.transition(id, TaskStatus::Done)
    }

    /// Move a done task back to the doing-list and write the new status in the background.
    ///
    /// # Errors
    /// Returns [`BoardError::UnknownTask`] when `id` is not in the done-list.
    pub fn uncomplete(&mut self, id: &TaskId) -> Result<WriteTicket, BoardError> {
        self.transition(id, TaskStatus::Doing)
    }

    /// Create a task in the store and append it to the doing-list.
    ///
    /// # Errors
    /// Returns the store failure; the doing-list is unchanged in that case.
    pub async fn add(&mut self, content: &str) -> Result<Task, BoardError> {
        let task = self.store.add_task(content).await.map_err(Into::<StoreError>::into)?;
        debug!(id = %task.id, "added task");
        self.doing.push(task.clone());
        Ok(task)
    }

    /// Delete every task after asking `confirm`.
    ///
    /// Once confirmed the lists are cleared even if the store call fails.
    pub async fn delete_all<C: Confirm + ?Sized>(&mut self, confirm: &mut C) -> DeleteOutcome {
        if !confirm.confirm(DELETE_ALL_PROMPT) {
            return DeleteOutcome::Declined;
        }

        let result = self.store.delete_all().await.map_err(Into::<StoreError>::into);
        self.doing.clear();
        self.done.clear();
        match result {
            Ok(()) => DeleteOutcome::Deleted,
            Err(err) => {
                warn!(error = %err, "delete-all failed on the store");
                DeleteOutcome::DeletedLocally(err)
            }
        }
    }

    /// Progress of the write behind `ticket`.
    ///
    /// Only the last [`RETAINED_OUTCOMES`] settled writes are remembered; older tickets
    /// and tickets this board never issued give `None`.
    pub fn write_state(&self, ticket: WriteTicket) -> Option<WriteState> {
        if self.pending.contains_key(&ticket) {
            return Some(WriteState::Pending);
        }
        self.outcomes.get(&ticket).cloned()
    }

    /// Number of background writes that have not been reconciled yet.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Collect settled background writes without waiting.
    ///
    /// Only the newest write issued for a task can move it. When that write fails the
    /// task goes back to the list of the last status the store accepted, provided it is
    /// still on the board. Failures of older writes are reported but move nothing.
    pub fn reconcile(&mut self) -> Vec<SettledWrite> {
        let mut settled = Vec::new();
        while let Ok(report) = self.reports_rx.try_recv() {
            let Some(write) = self.pending.remove(&report.ticket) else {
                continue;
            };
            let (state, reverted) = match report.result {
                Ok(()) => {
                    self.confirm_write(&write.task, report.ticket, write.status);
                    (WriteState::Succeeded, false)
                }
                Err(err) => {
                    let reverted = self.revert_if_latest(&write.task, report.ticket);
                    warn!(id = %write.task, status = %write.status, reverted, error = %err, "status write failed");
                    (WriteState::Failed(err), reverted)
                }
            };
            self.record_outcome(report.ticket, state.clone());
            settled.push(SettledWrite {
                ticket: report.ticket,
                task: write.task,
                status: write.status,
                state,
                reverted,
            });
        }
        settled
    }

    /// Wait for every outstanding write, then reconcile.
    pub async fn settle(&mut self) -> Vec<SettledWrite> {
        let handles: Vec<(WriteTicket, JoinHandle<()>)> = self
            .pending
            .iter_mut()
            .filter_map(|(ticket, write)| write.handle.take().map(|handle| (*ticket, handle)))
            .collect();

        for (ticket, handle) in handles {
            if let Err(err) = handle.await {
                let _ = self.reports_tx.send(WriteReport {
                    ticket,
                    result: Err(StoreError::Other(format!("status write aborted: {err}"))),
                });
            }
        }
        self.reconcile()
    }

    fn list_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Doing => &mut self.doing,
            TaskStatus::Done => &mut self.done,
        }
    }

    fn transition(&mut self, id: &TaskId, to: TaskStatus) -> Result<WriteTicket, BoardError> {
        let source = self.list_mut(to.toggled());
        let index = source
            .iter()
            .position(|task| &task.id == id)
            .ok_or_else(|| BoardError::UnknownTask(id.clone()))?;
        let task = source.remove(index).with_status(to);
        self.list_mut(to).push(task);

        let ticket = self.spawn_status_write(id.clone(), to);
        self.chains
            .entry(id.clone())
            .and_modify(|chain| chain.latest = ticket)
            .or_insert(WriteChain {
                latest: ticket,
                confirmed: to.toggled(),
                confirmed_by: None,
            });
        Ok(ticket)
    }

    fn spawn_status_write(&mut self, id: TaskId, status: TaskStatus) -> WriteTicket {
        self.next_ticket += 1;
        let ticket = WriteTicket(self.next_ticket);

        let store = Arc::clone(&self.store);
        let reports = self.reports_tx.clone();
        let task = id.clone();
        let handle = tokio::spawn(async move {
            let result = store.set_status(&task, status).await.map_err(Into::<StoreError>::into);
            // The board may already be gone; nothing left to report to.
            let _ = reports.send(WriteReport { ticket, result });
        });

        debug!(%id, %status, "status write started");
        self.pending.insert(
            ticket,
            PendingWrite {
                task: id,
                status,
                handle: Some(handle),
            },
        );
        ticket
    }

    fn confirm_write(&mut self, id: &TaskId, ticket: WriteTicket, status: TaskStatus) {
        let Some(chain) = self.chains.get_mut(id) else {
            return;
        };
        if chain.confirmed_by.is_none_or(|newest| newest < ticket) {
            chain.confirmed = status;
            chain.confirmed_by = Some(ticket);
        }
        if chain.latest == ticket {
            self.chains.remove(id);
        }
    }

    fn revert_if_latest(&mut self, id: &TaskId, ticket: WriteTicket) -> bool {
        let confirmed = match self.chains.get(id) {
            Some(chain) if chain.latest == ticket => chain.confirmed,
            _ => return false,
        };
        self.chains.remove(id);
        self.move_back(id, confirmed)
    }

    fn move_back(&mut self, id: &TaskId, to: TaskStatus) -> bool {
        let source = self.list_mut(to.toggled());
        let Some(index) = source.iter().position(|task| &task.id == id) else {
            return false;
        };
        let task = source.remove(index).with_status(to);
        self.list_mut(to).push(task);
        true
    }

    fn record_outcome(&mut self, ticket: WriteTicket, state: WriteState) {
        self.outcomes.insert(ticket, state);
        while self.outcomes.len() > RETAINED_OUTCOMES {
            self.outcomes.pop_first();
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::confirm::Assume;
    use crate::memory::{MemoryStore, StoreCall};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use time::macros::datetime;

    fn task(id: &str, content: &str, status: TaskStatus) -> Task {
        Task::new(TaskId::new(id), content.into(), datetime!(2024-03-01 09:00 UTC), status)
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    async fn loaded(tasks: Vec<Task>) -> Board<MemoryStore> {
        let mut board = Board::new(MemoryStore::with_tasks(tasks));
        board.load().await.expect("initial load");
        board
    }

    fn assert_lists_disjoint(board: &Board<MemoryStore>, total: usize) {
        let doing: HashSet<&str> = ids(board.tasks(TaskStatus::Doing)).into_iter().collect();
        let done: HashSet<&str> = ids(board.tasks(TaskStatus::Done)).into_iter().collect();
        assert!(doing.is_disjoint(&done), "doing {doing:?} and done {done:?} share a task");
        assert_eq!(doing.len(), board.tasks(TaskStatus::Doing).len());
        assert_eq!(doing.len() + done.len(), total);
    }

    /// Store whose first status write times out slowly; later writes go through.
    #[derive(Debug, Default)]
    struct SlowFirstWrite {
        inner: MemoryStore,
        first_done: AtomicBool,
    }

    impl TaskStore for SlowFirstWrite {
        type Error = StoreError;

        async fn list(&self, status: TaskStatus) -> Result<Vec<Task>, Self::Error> {
            self.inner.list(status).await
        }

        async fn add_task(&self, content: &str) -> Result<Task, Self::Error> {
            self.inner.add_task(content).await
        }

        async fn set_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), Self::Error> {
            if !self.first_done.swap(true, Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(200)).await;
                return Err(StoreError::Network("timeout".into()));
            }
            self.inner.set_status(id, status).await
        }

        async fn delete_all(&self) -> Result<(), Self::Error> {
            self.inner.delete_all().await
        }
    }

    fn status_writes(board: &Board<MemoryStore>) -> usize {
        board
            .store()
            .count_calls(|call| matches!(call, StoreCall::SetStatus(..)))
    }

    #[tokio::test]
    async fn starts_empty_and_loads_both_lists() {
        let mut board = Board::new(MemoryStore::with_tasks([
            task("1", "Write report", TaskStatus::Doing),
            task("2", "Pay bills", TaskStatus::Done),
        ]));
        assert!(board.tasks(TaskStatus::Doing).is_empty());
        assert!(board.tasks(TaskStatus::Done).is_empty());

        board.load().await.expect("load");
        assert_eq!(ids(board.tasks(TaskStatus::Doing)), ["1"]);
        assert_eq!(ids(board.tasks(TaskStatus::Done)), ["2"]);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_lists() {
        let mut board = loaded(vec![task("1", "Write report", TaskStatus::Doing)]).await;
        board
            .store()
            .fail_list(Some(StoreError::Network("connection refused".into())));

        let err = board.load().await.expect_err("load must fail");
        assert_eq!(err, BoardError::Store(StoreError::Network("connection refused".into())));
        assert_eq!(ids(board.tasks(TaskStatus::Doing)), ["1"]);
    }

    #[tokio::test]
    async fn complete_moves_task_and_writes_done() {
        let mut board = loaded(vec![
            task("5", "Pay bills", TaskStatus::Doing),
            task("6", "Call mom", TaskStatus::Doing),
        ])
        .await;

        let ticket = board.complete(&TaskId::new("5")).expect("complete");
        assert_eq!(ids(board.tasks(TaskStatus::Doing)), ["6"]);
        let done = board.tasks(TaskStatus::Done);
        assert_eq!(ids(done), ["5"]);
        assert_eq!(done[0].content, "Pay bills");
        assert_eq!(done[0].status, TaskStatus::Done);

        let settled = board.settle().await;
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].state, WriteState::Succeeded);
        assert_eq!(board.write_state(ticket), Some(WriteState::Succeeded));
        assert_eq!(
            board.store().calls().last(),
            Some(&StoreCall::SetStatus(TaskId::new("5"), TaskStatus::Done))
        );
    }

    #[tokio::test]
    async fn uncomplete_moves_task_back() {
        let mut board = loaded(vec![task("2", "Pay bills", TaskStatus::Done)]).await;

        board.uncomplete(&TaskId::new("2")).expect("uncomplete");
        assert_eq!(ids(board.tasks(TaskStatus::Doing)), ["2"]);
        assert_eq!(board.tasks(TaskStatus::Doing)[0].status, TaskStatus::Doing);
        assert!(board.tasks(TaskStatus::Done).is_empty());

        board.settle().await;
        assert_eq!(board.store().tasks()[0].status, TaskStatus::Doing);
    }

    #[tokio::test]
    async fn unknown_task_is_rejected_without_remote_call() {
        let mut board = loaded(vec![task("1", "Write report", TaskStatus::Doing)]).await;

        let err = board.uncomplete(&TaskId::new("1")).expect_err("not in done-list");
        assert_eq!(err, BoardError::UnknownTask(TaskId::new("1")));
        assert!(board.complete(&TaskId::new("missing")).is_err());

        assert_eq!(ids(board.tasks(TaskStatus::Doing)), ["1"]);
        assert_eq!(board.pending_writes(), 0);
        assert_eq!(status_writes(&board), 0);
    }

    #[tokio::test]
    async fn failed_write_is_reverted() {
        let mut board = loaded(vec![task("5", "Pay bills", TaskStatus::Doing)]).await;
        board
            .store()
            .fail_set_status(Some(StoreError::Conflict("stale".into())));

        let ticket = board.complete(&TaskId::new("5")).expect("complete");
        assert_eq!(ids(board.tasks(TaskStatus::Done)), ["5"]);

        let settled = board.settle().await;
        assert_eq!(
            settled,
            vec![SettledWrite {
                ticket,
                task: TaskId::new("5"),
                status: TaskStatus::Done,
                state: WriteState::Failed(StoreError::Conflict("stale".into())),
                reverted: true,
            }]
        );
        assert_eq!(ids(board.tasks(TaskStatus::Doing)), ["5"]);
        assert_eq!(board.tasks(TaskStatus::Doing)[0].status, TaskStatus::Doing);
        assert!(board.tasks(TaskStatus::Done).is_empty());
    }

    #[tokio::test]
    async fn writes_stay_pending_until_the_store_answers() {
        let mut board = loaded(vec![task("5", "Pay bills", TaskStatus::Doing)]).await;
        board.store().hold_status_writes();

        let ticket = board.complete(&TaskId::new("5")).expect("complete");
        tokio::task::yield_now().await;
        assert!(board.reconcile().is_empty());
        assert_eq!(board.write_state(ticket), Some(WriteState::Pending));
        assert_eq!(board.pending_writes(), 1);

        board.store().release_status_writes();
        board.settle().await;
        assert_eq!(board.write_state(ticket), Some(WriteState::Succeeded));
        assert_eq!(board.pending_writes(), 0);
    }

    #[tokio::test]
    async fn failed_write_is_not_reverted_after_task_left_target_list() {
        let mut board = loaded(vec![task("5", "Pay bills", TaskStatus::Doing)]).await;
        board.store().hold_status_writes();
        board
            .store()
            .fail_set_status(Some(StoreError::Network("reset".into())));

        board.complete(&TaskId::new("5")).expect("complete");
        let outcome = board.delete_all(&mut Assume(true)).await;
        assert_eq!(outcome, DeleteOutcome::Deleted);

        board.store().release_status_writes();
        let settled = board.settle().await;
        assert_eq!(settled.len(), 1);
        assert!(!settled[0].reverted);
        assert!(matches!(settled[0].state, WriteState::Failed(_)));
        assert!(board.tasks(TaskStatus::Doing).is_empty());
        assert!(board.tasks(TaskStatus::Done).is_empty());
    }

    #[tokio::test]
    async fn add_appends_created_task() {
        let mut board = loaded(vec![task("1", "Write report", TaskStatus::Doing)]).await;

        let created = board.add("Buy milk").await.expect("add");
        assert_eq!(created.content, "Buy milk");
        assert_eq!(created.status, TaskStatus::Doing);

        let doing = board.tasks(TaskStatus::Doing);
        assert_eq!(doing.len(), 2);
        assert_eq!(doing[1], created);
    }

    #[tokio::test]
    async fn add_passes_empty_content_through() {
        let mut board = Board::new(MemoryStore::new());
        let created = board.add("").await.expect("add");
        assert_eq!(created.content, "");
        assert_eq!(board.tasks(TaskStatus::Doing).len(), 1);
    }

    #[tokio::test]
    async fn failed_add_appends_nothing() {
        let mut board = Board::new(MemoryStore::new());
        board
            .store()
            .fail_add(Some(StoreError::Other("HTTP 500".into())));

        assert!(board.add("Buy milk").await.is_err());
        assert!(board.tasks(TaskStatus::Doing).is_empty());
    }

    #[tokio::test]
    async fn declined_delete_all_changes_nothing() {
        let mut board = loaded(vec![
            task("1", "Write report", TaskStatus::Doing),
            task("2", "Pay bills", TaskStatus::Done),
        ])
        .await;

        let mut asked = Vec::new();
        let mut decline = |message: &str| {
            asked.push(message.to_owned());
            false
        };
        let outcome = board.delete_all(&mut decline).await;

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(asked, vec![DELETE_ALL_PROMPT.to_owned()]);
        assert_eq!(board.tasks(TaskStatus::Doing).len(), 1);
        assert_eq!(board.tasks(TaskStatus::Done).len(), 1);
        assert_eq!(
            board
                .store()
                .count_calls(|call| matches!(call, StoreCall::DeleteAll)),
            0
        );
    }

    #[tokio::test]
    async fn confirmed_delete_all_clears_both_lists() {
        let mut board = loaded(vec![
            task("1", "Write report", TaskStatus::Doing),
            task("2", "Call mom", TaskStatus::Doing),
            task("3", "Pay bills", TaskStatus::Done),
            task("4", "Book flights", TaskStatus::Done),
        ])
        .await;

        let outcome = board.delete_all(&mut Assume(true)).await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(board.tasks(TaskStatus::Doing).is_empty());
        assert!(board.tasks(TaskStatus::Done).is_empty());
        assert_eq!(
            board
                .store()
                .count_calls(|call| matches!(call, StoreCall::DeleteAll)),
            1
        );
    }

    #[tokio::test]
    async fn failed_delete_all_still_clears_locally() {
        let mut board = loaded(vec![task("1", "Write report", TaskStatus::Doing)]).await;
        board
            .store()
            .fail_delete_all(Some(StoreError::Network("timeout".into())));

        let outcome = board.delete_all(&mut Assume(true)).await;

        assert_eq!(
            outcome,
            DeleteOutcome::DeletedLocally(StoreError::Network("timeout".into()))
        );
        assert!(board.tasks(TaskStatus::Doing).is_empty());
    }

    #[tokio::test]
    async fn visible_filters_then_sorts() {
        let board = loaded(vec![
            task("1", "Zebra", TaskStatus::Doing),
            task("2", "apple pie", TaskStatus::Doing),
            task("3", "Apple", TaskStatus::Doing),
        ])
        .await;

        let shown: Vec<&str> = board
            .visible(TaskStatus::Doing, "APP")
            .iter()
            .map(|task| task.content.as_str())
            .collect();
        assert_eq!(shown, ["Apple", "apple pie"]);
        assert_eq!(ids(board.tasks(TaskStatus::Doing)), ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn complete_then_uncomplete_round_trips() {
        let original = task("5", "Pay bills", TaskStatus::Doing);
        let mut board = loaded(vec![
            task("4", "Write report", TaskStatus::Doing),
            original.clone(),
            task("6", "Call mom", TaskStatus::Doing),
        ])
        .await;

        board.complete(&original.id).expect("complete");
        board.uncomplete(&original.id).expect("uncomplete");

        assert!(board.tasks(TaskStatus::Done).is_empty());
        let doing = board.tasks(TaskStatus::Doing);
        assert_eq!(ids(doing), ["4", "6", "5"]);
        assert_eq!(doing[2], original);

        let settled = board.settle().await;
        assert!(settled.iter().all(|write| write.state == WriteState::Succeeded));
        assert_eq!(board.tasks(TaskStatus::Doing)[2], original);
        assert_eq!(board.store().tasks()[1].status, TaskStatus::Doing);
    }

    #[tokio::test]
    async fn stale_failure_does_not_undo_newer_move() {
        let store = SlowFirstWrite {
            inner: MemoryStore::with_tasks([task("5", "Pay bills", TaskStatus::Doing)]),
            ..SlowFirstWrite::default()
        };
        let mut board = Board::new(store);
        board.load().await.expect("load");
        let id = TaskId::new("5");

        let slow = board.complete(&id).expect("complete");
        board.uncomplete(&id).expect("uncomplete");
        board.complete(&id).expect("complete again");

        let settled = board.settle().await;
        assert_eq!(settled.len(), 3);
        let stale = settled
            .iter()
            .find(|write| write.ticket == slow)
            .expect("slow write settled");
        assert_eq!(stale.state, WriteState::Failed(StoreError::Network("timeout".into())));
        assert!(!stale.reverted);

        assert!(board.tasks(TaskStatus::Doing).is_empty());
        assert_eq!(ids(board.tasks(TaskStatus::Done)), ["5"]);
        assert_eq!(board.store().inner.tasks()[0].status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn latest_failure_returns_task_to_last_accepted_list() {
        let mut board = loaded(vec![task("5", "Pay bills", TaskStatus::Doing)]).await;
        let id = TaskId::new("5");
        board
            .store()
            .fail_set_status(Some(StoreError::Network("reset".into())));

        board.complete(&id).expect("complete");
        board.uncomplete(&id).expect("uncomplete");
        let settled = board.settle().await;

        assert_eq!(settled.len(), 2);
        assert!(settled.iter().all(|write| !write.reverted));
        assert_eq!(ids(board.tasks(TaskStatus::Doing)), ["5"]);
        assert_eq!(board.store().tasks()[0].status, TaskStatus::Doing);
    }

    #[tokio::test]
    async fn mixed_toggles_never_list_a_task_twice() {
        let mut board = loaded(vec![
            task("1", "Write report", TaskStatus::Doing),
            task("2", "Call mom", TaskStatus::Doing),
            task("3", "Pay bills", TaskStatus::Done),
            task("4", "Book flights", TaskStatus::Done),
        ])
        .await;

        let steps = [
            ("1", TaskStatus::Done, false),
            ("3", TaskStatus::Doing, true),
            ("1", TaskStatus::Doing, false),
            ("2", TaskStatus::Done, true),
            ("2", TaskStatus::Doing, true),
            ("4", TaskStatus::Doing, false),
            ("1", TaskStatus::Done, true),
            ("3", TaskStatus::Doing, false),
            ("4", TaskStatus::Done, true),
            ("2", TaskStatus::Done, false),
            ("1", TaskStatus::Doing, false),
            ("9", TaskStatus::Done, false),
        ];

        for (round, (id, to, failing)) in steps.into_iter().enumerate() {
            board
                .store()
                .fail_set_status(failing.then(|| StoreError::Network("reset".into())));
            let id = TaskId::new(id);
            let _ = match to {
                TaskStatus::Done => board.complete(&id),
                TaskStatus::Doing => board.uncomplete(&id),
            };
            assert_lists_disjoint(&board, 4);

            if round % 3 == 2 {
                board.settle().await;
                assert_lists_disjoint(&board, 4);
            }
        }

        board.store().fail_set_status(None);
        board.settle().await;
        assert_lists_disjoint(&board, 4);
        assert_eq!(board.pending_writes(), 0);
    }

    #[tokio::test]
    async fn only_recent_outcomes_are_remembered() {
        let mut board = loaded(vec![task("5", "Pay bills", TaskStatus::Doing)]).await;
        let id = TaskId::new("5");

        let mut tickets = Vec::new();
        for round in 0..=RETAINED_OUTCOMES {
            let ticket = if round % 2 == 0 {
                board.complete(&id)
            } else {
                board.uncomplete(&id)
            };
            tickets.push(ticket.expect("toggle"));
        }
        board.settle().await;

        assert_eq!(board.outcomes.len(), RETAINED_OUTCOMES);
        assert!(board.chains.is_empty());
        assert_eq!(board.write_state(tickets[0]), None);
        assert_eq!(board.write_state(tickets[1]), Some(WriteState::Succeeded));
        let last = tickets.last().copied().expect("at least one ticket");
        assert_eq!(board.write_state(last), Some(WriteState::Succeeded));
    }
}
