use std::io::Write;

use anyhow::{Context, Result, anyhow};
use marvelous_app::{Assume, Board, Confirm, DeleteOutcome, TaskStore, WriteState, WriteTicket};
use marvelous_core::{Task, TaskId, TaskStatus};
use time::format_description::well_known::Rfc3339;

use crate::{Command, LsFormat};

/// Execute a non-interactive command against `board`, writing results to `out`.
///
/// `confirm` is asked before destructive commands unless they were told not to ask.
///
/// # Errors
/// Fails when the store fails, the task is unknown, or `out` cannot be written.
pub async fn run<S, W, C>(command: Command, board: &mut Board<S>, out: &mut W, confirm: &mut C) -> Result<()>
where
    S: TaskStore,
    W: Write,
    C: Confirm + ?Sized,
{
    match command {
        Command::Ls { search, status, format } => {
            board.load().await.context("Failed to load tasks")?;

            let search = search.unwrap_or_default();
            let statuses = status.map_or_else(|| TaskStatus::ALL.to_vec(), |status| vec![status]);
            let tasks: Vec<&Task> = statuses
                .into_iter()
                .flat_map(|status| board.visible(status, &search))
                .collect();

            if tasks.is_empty() {
                if search.is_empty() {
                    writeln!(out, "No tasks found")?;
                } else {
                    writeln!(out, "No tasks matched the search")?;
                }
                return Ok(());
            }

            match format {
                LsFormat::Table => render_task_table(out, &tasks)?,
                LsFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?,
            }
        }
        Command::Add { content } => {
            let task = board.add(&content).await.context("Failed to add task")?;
            writeln!(out, "created task: {}", task.id)?;
        }
        Command::Done { id } => {
            move_task(board, &TaskId::new(id.clone()), TaskStatus::Done).await?;
            writeln!(out, "completed task: {id}")?;
        }
        Command::Undo { id } => {
            move_task(board, &TaskId::new(id.clone()), TaskStatus::Doing).await?;
            writeln!(out, "reopened task: {id}")?;
        }
        Command::Purge { yes } => {
            let outcome = if yes {
                board.delete_all(&mut Assume(true)).await
            } else {
                board.delete_all(confirm).await
            };
            match outcome {
                DeleteOutcome::Declined => writeln!(out, "Aborted.")?,
                DeleteOutcome::Deleted => writeln!(out, "Deleted all tasks")?,
                DeleteOutcome::DeletedLocally(err) => {
                    return Err(anyhow::Error::new(err).context("Failed to delete tasks"));
                }
            }
        }
        Command::Tui | Command::InitConfig { .. } => unreachable!("Unhandled command routed to the board"),
    }

    Ok(())
}

async fn move_task<S: TaskStore>(board: &mut Board<S>, id: &TaskId, to: TaskStatus) -> Result<()> {
    board.load().await.context("Failed to load tasks")?;

    let ticket = match to {
        TaskStatus::Done => board.complete(id),
        TaskStatus::Doing => board.uncomplete(id),
    }?;
    board.settle().await;
    ensure_written(board, ticket, id, to)
}

fn ensure_written<S: TaskStore>(board: &Board<S>, ticket: WriteTicket, id: &TaskId, to: TaskStatus) -> Result<()> {
    match board.write_state(ticket) {
        Some(WriteState::Succeeded) => Ok(()),
        Some(WriteState::Failed(err)) => {
            Err(anyhow::Error::new(err).context(format!("Failed to mark task {id} as {to}")))
        }
        Some(WriteState::Pending) | None => Err(anyhow!("Write for task {id} did not settle")),
    }
}

fn render_task_table<W: Write>(out: &mut W, tasks: &[&Task]) -> Result<()> {
    writeln!(out, "ID | Status | Date | Content")?;
    writeln!(out, "-- | ------ | ---- | -------")?;

    for task in tasks {
        let date = task.date.format(&Rfc3339)?;
        writeln!(out, "{} | {} | {} | {}", task.id, task.status, date, task.content)?;
    }
    Ok(())
}
