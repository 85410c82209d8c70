//! Gesture reconciliation
//!
//! Translates the abstract result of a drag gesture (or a CRUD action) into
//! exactly one [`BoardOp`], applies it optimistically, and names the deltas
//! that must be persisted. The gesture types deliberately carry raw strings:
//! any front end (pointer events, keyboard reordering) can produce them
//! without knowing the model's id newtypes.

use crate::op::BoardOp;
use crate::reduce;
use crate::types::{Board, Column, ColumnId, Task, TaskId, TaskPatch};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Container id used for column drags, where the droppable is the board strip
pub const BOARD_CONTAINER: &str = "board";

/// What kind of entity was dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    Column,
    Task,
}

/// Where a drag started or ended: a droppable container plus an index in it.
/// For column drags the container is the board itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropSlot {
    pub container_id: String,
    pub index: usize,
}

impl DropSlot {
    /// Create a slot
    pub fn new(container_id: impl Into<String>, index: usize) -> Self {
        Self {
            container_id: container_id.into(),
            index,
        }
    }
}

/// The result of a finished drag gesture. `destination` is `None` when the
/// drag was released outside every droppable (cancelled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEnd {
    pub kind: DragKind,
    pub dragged_id: String,
    pub source: DropSlot,
    pub destination: Option<DropSlot>,
}

impl DragEnd {
    /// A column dragged from one slot of the board strip to another
    pub fn column(column_id: impl Into<String>, from_index: usize, to_index: usize) -> Self {
        Self {
            kind: DragKind::Column,
            dragged_id: column_id.into(),
            source: DropSlot::new(BOARD_CONTAINER, from_index),
            destination: Some(DropSlot::new(BOARD_CONTAINER, to_index)),
        }
    }

    /// A task dragged between (or within) columns
    pub fn task(
        task_id: impl Into<String>,
        source_column: impl Into<String>,
        source_index: usize,
        dest_column: impl Into<String>,
        dest_index: usize,
    ) -> Self {
        Self {
            kind: DragKind::Task,
            dragged_id: task_id.into(),
            source: DropSlot::new(source_column, source_index),
            destination: Some(DropSlot::new(dest_column, dest_index)),
        }
    }

    /// A drag released outside every droppable
    pub fn cancelled(kind: DragKind, dragged_id: impl Into<String>, source: DropSlot) -> Self {
        Self {
            kind,
            dragged_id: dragged_id.into(),
            source,
            destination: None,
        }
    }
}

/// A derived ordering (or event) that must be sent to the server after an
/// optimistic model update. Order sequences are always the full authoritative
/// sequence, never a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersistDelta {
    /// The board's complete column order changed
    ColumnOrder { column_order: Vec<ColumnId> },

    /// One column's complete task order changed
    TaskOrder {
        column_id: ColumnId,
        task_ids: Vec<TaskId>,
    },

    /// A task changed columns
    TaskMoved {
        task_id: TaskId,
        target_column_id: ColumnId,
    },

    /// A task's fields changed
    TaskUpdated { task_id: TaskId, patch: TaskPatch },

    /// A task was deleted
    TaskDeleted { task_id: TaskId },

    /// A column was deleted
    ColumnDeleted { column_id: ColumnId },
}

/// An optimistic snapshot plus what must be persisted to match it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The next board snapshot, already reflecting the gesture
    pub board: Board,
    /// The operation the gesture resolved to
    pub op: BoardOp,
    /// Deltas for the sync adapter; independent entries may be persisted
    /// concurrently
    pub deltas: Vec<PersistDelta>,
}

/// Resolve a finished drag gesture.
///
/// Returns `None` when there is nothing to do: the drag was cancelled,
/// dropped back onto its source slot, or refers to state the board does not
/// have (a stale gesture from a racing UI).
pub fn drag_end(board: &Board, event: &DragEnd) -> Option<Reconciliation> {
    let destination = match &event.destination {
        Some(destination) => destination,
        None => {
            debug!(dragged = %event.dragged_id, "drag cancelled, nothing to reconcile");
            return None;
        }
    };
    if *destination == event.source {
        return None;
    }

    match event.kind {
        DragKind::Column => reconcile_column_drag(board, event, destination),
        DragKind::Task => reconcile_task_drag(board, event, destination),
    }
}

fn reconcile_column_drag(
    board: &Board,
    event: &DragEnd,
    destination: &DropSlot,
) -> Option<Reconciliation> {
    let column_id = ColumnId::new(event.dragged_id.clone());
    let len = board.column_order.len();
    if event.source.index >= len || destination.index >= len {
        warn!(
            column = %column_id,
            from_index = event.source.index,
            to_index = destination.index,
            len,
            "column drag out of range, dropping gesture"
        );
        return None;
    }
    if board.column_order.get(event.source.index) != Some(&column_id) {
        warn!(
            column = %column_id,
            index = event.source.index,
            "dragged column is not at the source index, dropping gesture"
        );
        return None;
    }

    let op = BoardOp::ReorderColumn {
        column_id,
        from_index: event.source.index,
        to_index: destination.index,
    };
    let next = reduce::apply(board, &op);
    let deltas = vec![PersistDelta::ColumnOrder {
        column_order: next.column_order.clone(),
    }];
    Some(Reconciliation {
        board: next,
        op,
        deltas,
    })
}

fn reconcile_task_drag(
    board: &Board,
    event: &DragEnd,
    destination: &DropSlot,
) -> Option<Reconciliation> {
    let task_id = TaskId::new(event.dragged_id.clone());
    let source_column = ColumnId::new(event.source.container_id.clone());
    let dest_column = ColumnId::new(destination.container_id.clone());

    let source = match board.find_column(&source_column) {
        Some(column) => column,
        None => {
            warn!(source = %source_column, dest = %dest_column, "missing column data, dropping gesture");
            return None;
        }
    };
    if board.find_column(&dest_column).is_none() {
        warn!(source = %source_column, dest = %dest_column, "missing column data, dropping gesture");
        return None;
    }
    if source.task_ids.get(event.source.index) != Some(&task_id) {
        warn!(
            task = %task_id,
            column = %source_column,
            index = event.source.index,
            "dragged task is not at the source index, dropping gesture"
        );
        return None;
    }

    // Same column: a reorder persisted as that column's full task order
    if source_column == dest_column {
        if destination.index >= source.task_ids.len() {
            warn!(
                task = %task_id,
                column = %source_column,
                to_index = destination.index,
                "task drag out of range, dropping gesture"
            );
            return None;
        }
        let op = BoardOp::ReorderTask {
            column_id: source_column.clone(),
            task_id,
            from_index: event.source.index,
            to_index: destination.index,
        };
        let next = reduce::apply(board, &op);
        let task_ids = next
            .find_column(&source_column)
            .map(|column| column.task_ids.clone())
            .unwrap_or_default();
        let deltas = vec![PersistDelta::TaskOrder {
            column_id: source_column,
            task_ids,
        }];
        return Some(Reconciliation {
            board: next,
            op,
            deltas,
        });
    }

    // Cross column: a move event plus both columns' full task orders
    let op = BoardOp::MoveTask {
        task_id: task_id.clone(),
        source_column_id: source_column.clone(),
        dest_column_id: dest_column.clone(),
        dest_index: destination.index,
    };
    let next = reduce::apply(board, &op);
    let source_ids = next
        .find_column(&source_column)
        .map(|column| column.task_ids.clone())
        .unwrap_or_default();
    let dest_ids = next
        .find_column(&dest_column)
        .map(|column| column.task_ids.clone())
        .unwrap_or_default();
    let deltas = vec![
        PersistDelta::TaskMoved {
            task_id,
            target_column_id: dest_column.clone(),
        },
        PersistDelta::TaskOrder {
            column_id: source_column,
            task_ids: source_ids,
        },
        PersistDelta::TaskOrder {
            column_id: dest_column,
            task_ids: dest_ids,
        },
    ];
    Some(Reconciliation {
        board: next,
        op,
        deltas,
    })
}

/// Optimistic task deletion: the task leaves the snapshot now, the DELETE is
/// persisted afterwards
pub fn remove_task(board: &Board, task_id: &TaskId) -> Option<Reconciliation> {
    if !board.tasks.contains_key(task_id) {
        warn!(task = %task_id, "unknown task, dropping removal");
        return None;
    }
    let op = BoardOp::RemoveTask {
        task_id: task_id.clone(),
    };
    let next = reduce::apply(board, &op);
    let deltas = vec![PersistDelta::TaskDeleted {
        task_id: task_id.clone(),
    }];
    Some(Reconciliation {
        board: next,
        op,
        deltas,
    })
}

/// Optimistic column deletion. The column's tasks stay in the task map,
/// unreferenced.
pub fn remove_column(board: &Board, column_id: &ColumnId) -> Option<Reconciliation> {
    if !board.columns.contains_key(column_id) {
        warn!(column = %column_id, "unknown column, dropping removal");
        return None;
    }
    let op = BoardOp::RemoveColumn {
        column_id: column_id.clone(),
    };
    let next = reduce::apply(board, &op);
    let deltas = vec![PersistDelta::ColumnDeleted {
        column_id: column_id.clone(),
    }];
    Some(Reconciliation {
        board: next,
        op,
        deltas,
    })
}

/// Optimistic task update
pub fn update_task(board: &Board, task_id: &TaskId, patch: TaskPatch) -> Option<Reconciliation> {
    if !board.tasks.contains_key(task_id) {
        warn!(task = %task_id, "unknown task, dropping update");
        return None;
    }
    let op = BoardOp::UpdateTask {
        task_id: task_id.clone(),
        patch: patch.clone(),
    };
    let next = reduce::apply(board, &op);
    let deltas = vec![PersistDelta::TaskUpdated {
        task_id: task_id.clone(),
        patch,
    }];
    Some(Reconciliation {
        board: next,
        op,
        deltas,
    })
}

/// Insert a server-created column. No deltas: the create call that produced
/// the column already persisted it.
pub fn add_column(board: &Board, column: Column) -> Option<Reconciliation> {
    if board.columns.contains_key(&column.id) {
        warn!(column = %column.id, "duplicate column id, dropping add");
        return None;
    }
    let op = BoardOp::AddColumn { column };
    let next = reduce::apply(board, &op);
    Some(Reconciliation {
        board: next,
        op,
        deltas: Vec::new(),
    })
}

/// Insert a server-created task into a column. No deltas, as with
/// [`add_column`].
pub fn add_task(board: &Board, column_id: &ColumnId, task: Task) -> Option<Reconciliation> {
    if !board.columns.contains_key(column_id) {
        warn!(column = %column_id, task = %task.id, "unknown column, dropping task add");
        return None;
    }
    if board.tasks.contains_key(&task.id) {
        warn!(task = %task.id, "duplicate task id, dropping add");
        return None;
    }
    let op = BoardOp::AddTask {
        column_id: column_id.clone(),
        task,
    };
    let next = reduce::apply(board, &op);
    Some(Reconciliation {
        board: next,
        op,
        deltas: Vec::new(),
    })
}
