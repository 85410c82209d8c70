//! Remote sync adapter
//!
//! Maps the deltas produced by `flowdeck_board::reconcile` onto API calls.
//! Persistence always runs after the optimistic model update, never before.
//! Independent deltas (for example both columns' task orders after a cross
//! column move) are sent concurrently; the calls touch disjoint resources, so
//! their completion order carries no meaning.
//!
//! Failure policy: log and move on. A failed persistence call is neither
//! retried nor rolled back, so the local snapshot can diverge from the server
//! until the next load. That trade-off is deliberate and documented in
//! DESIGN.md.

use crate::client::BoardApi;
use crate::error::Result;
use crate::wire::{CreateColumnRequest, CreateTaskRequest};
use chrono::{DateTime, Utc};
use flowdeck_board::{reconcile, Board, ColumnId, PersistDelta, ProjectId};
use futures::future::join_all;
use tracing::{debug, error, instrument};

/// Persist a batch of deltas, concurrently, logging failures.
///
/// This never returns an error: by the time it runs the UI already shows the
/// optimistic state, and the only failure surface is the log.
#[instrument(skip(api, deltas), fields(deltas = deltas.len()))]
pub async fn persist(api: &dyn BoardApi, project_id: &ProjectId, deltas: &[PersistDelta]) {
    join_all(
        deltas
            .iter()
            .map(|delta| persist_one(api, project_id, delta)),
    )
    .await;
}

async fn persist_one(api: &dyn BoardApi, project_id: &ProjectId, delta: &PersistDelta) {
    let outcome = match delta {
        PersistDelta::ColumnOrder { column_order } => api
            .update_column_order(project_id, column_order)
            .await
            .map(|_| ()),
        PersistDelta::TaskOrder {
            column_id,
            task_ids,
        } => api.update_task_order(column_id, task_ids).await.map(|_| ()),
        PersistDelta::TaskMoved {
            task_id,
            target_column_id,
        } => api.move_task(task_id, target_column_id).await.map(|_| ()),
        PersistDelta::TaskUpdated { task_id, patch } => {
            api.update_task(task_id, patch).await.map(|_| ())
        }
        PersistDelta::TaskDeleted { task_id } => api.delete_task(task_id).await,
        PersistDelta::ColumnDeleted { column_id } => api.delete_column(column_id).await,
    };
    match outcome {
        Ok(()) => debug!(?delta, "persisted"),
        Err(error) => {
            error!(%error, ?delta, "failed to persist board change; local state left as-is");
        }
    }
}

/// Fields of a task to be created. The server assigns the id and the
/// creation timestamp.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub labels: Option<Vec<String>>,
}

impl NewTask {
    /// A task with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the deadline
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the labels
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }
}

/// Create a column on the server, then insert it into the board.
///
/// Creation is not optimistic: the server owns id assignment, so the column
/// only appears in the returned snapshot once the create call has succeeded.
#[instrument(skip(api, board, title), fields(project = %board.id))]
pub async fn create_column(
    api: &dyn BoardApi,
    board: &Board,
    title: impl Into<String>,
) -> Result<Board> {
    let request = CreateColumnRequest {
        title: title.into(),
        project_id: board.id.clone(),
    };
    let dto = api.create_column(&request).await?;
    let column = dto.into_column();
    debug!(column = %column.id, "server created column");
    match reconcile::add_column(board, column) {
        Some(outcome) => Ok(outcome.board),
        None => Ok(board.clone()),
    }
}

/// Create a task on the server, then insert it into the given column.
///
/// Not optimistic, for the same reason as [`create_column`].
#[instrument(skip(api, board, new_task), fields(project = %board.id, column = %column_id))]
pub async fn create_task(
    api: &dyn BoardApi,
    board: &Board,
    column_id: &ColumnId,
    new_task: NewTask,
) -> Result<Board> {
    let request = CreateTaskRequest {
        title: new_task.title,
        description: new_task.description,
        column_id: column_id.clone(),
        project_id: board.id.clone(),
        deadline: new_task.deadline,
        labels: new_task.labels,
    };
    let dto = api.create_task(&request).await?;
    let (task, _) = dto.into_task();
    debug!(task = %task.id, "server created task");
    match reconcile::add_task(board, column_id, task) {
        Some(outcome) => Ok(outcome.board),
        None => Ok(board.clone()),
    }
}
