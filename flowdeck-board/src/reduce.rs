//! Pure board reducer
//!
//! Every function takes a snapshot and returns a new one; the input is never
//! mutated, so a caller can diff consecutive snapshots to compute the minimal
//! persistence delta. Structurally invalid input (unknown ids, out-of-range
//! indices) is a logged no-op rather than an error - gesture input comes from
//! a UI layer that may race ahead of the model.

use crate::op::BoardOp;
use crate::types::{Board, Column, ColumnId, Task, TaskId, TaskPatch};
use tracing::warn;

/// Apply one operation, producing the next snapshot
pub fn apply(board: &Board, op: &BoardOp) -> Board {
    match op {
        BoardOp::ReorderColumn {
            column_id,
            from_index,
            to_index,
        } => reorder_column(board, column_id, *from_index, *to_index),
        BoardOp::ReorderTask {
            column_id,
            task_id,
            from_index,
            to_index,
        } => reorder_task(board, column_id, task_id, *from_index, *to_index),
        BoardOp::MoveTask {
            task_id,
            source_column_id,
            dest_column_id,
            dest_index,
        } => move_task(board, task_id, source_column_id, dest_column_id, *dest_index),
        BoardOp::AddColumn { column } => add_column(board, column.clone()),
        BoardOp::RemoveColumn { column_id } => remove_column(board, column_id),
        BoardOp::AddTask { column_id, task } => add_task(board, column_id, task.clone()),
        BoardOp::UpdateTask { task_id, patch } => update_task(board, task_id, patch),
        BoardOp::RemoveTask { task_id } => remove_task(board, task_id),
    }
}

/// Remove `column_id` from `column_order` at `from_index` and reinsert it at
/// `to_index`. No-op when the indices are equal, out of range, or the id is
/// not actually at `from_index`.
pub fn reorder_column(
    board: &Board,
    column_id: &ColumnId,
    from_index: usize,
    to_index: usize,
) -> Board {
    if from_index == to_index {
        return board.clone();
    }
    let len = board.column_order.len();
    if from_index >= len || to_index >= len {
        warn!(
            column = %column_id,
            from_index, to_index, len,
            "column reorder index out of range, ignoring"
        );
        return board.clone();
    }
    if board.column_order[from_index] != *column_id {
        warn!(
            column = %column_id,
            from_index,
            "column is not at the reported index, ignoring reorder"
        );
        return board.clone();
    }

    let mut next = board.clone();
    let id = next.column_order.remove(from_index);
    next.column_order.insert(to_index, id);
    next
}

/// The same splice on a single column's `task_ids`
pub fn reorder_task(
    board: &Board,
    column_id: &ColumnId,
    task_id: &TaskId,
    from_index: usize,
    to_index: usize,
) -> Board {
    if from_index == to_index {
        return board.clone();
    }
    let column = match board.find_column(column_id) {
        Some(column) => column,
        None => {
            warn!(column = %column_id, "unknown column, ignoring task reorder");
            return board.clone();
        }
    };
    let len = column.task_ids.len();
    if from_index >= len || to_index >= len {
        warn!(
            column = %column_id,
            task = %task_id,
            from_index, to_index, len,
            "task reorder index out of range, ignoring"
        );
        return board.clone();
    }
    if column.task_ids[from_index] != *task_id {
        warn!(
            column = %column_id,
            task = %task_id,
            from_index,
            "task is not at the reported index, ignoring reorder"
        );
        return board.clone();
    }

    let mut next = board.clone();
    if let Some(column) = next.columns.get_mut(column_id) {
        let id = column.task_ids.remove(from_index);
        column.task_ids.insert(to_index, id);
    }
    next
}

/// Remove a task from the source column and insert it into the destination at
/// `dest_index` (clamped to the destination length). No-op when either column
/// is unknown or the task is not listed by the source column.
pub fn move_task(
    board: &Board,
    task_id: &TaskId,
    source_column_id: &ColumnId,
    dest_column_id: &ColumnId,
    dest_index: usize,
) -> Board {
    let source = match board.find_column(source_column_id) {
        Some(column) => column,
        None => {
            warn!(
                task = %task_id,
                source = %source_column_id,
                dest = %dest_column_id,
                "missing source column, ignoring move"
            );
            return board.clone();
        }
    };
    if board.find_column(dest_column_id).is_none() {
        warn!(
            task = %task_id,
            source = %source_column_id,
            dest = %dest_column_id,
            "missing destination column, ignoring move"
        );
        return board.clone();
    }
    let from_index = match source.task_ids.iter().position(|id| id == task_id) {
        Some(index) => index,
        None => {
            warn!(
                task = %task_id,
                source = %source_column_id,
                "task is not in the source column, ignoring move"
            );
            return board.clone();
        }
    };

    let mut next = board.clone();
    if let Some(column) = next.columns.get_mut(source_column_id) {
        column.task_ids.remove(from_index);
    }
    if let Some(column) = next.columns.get_mut(dest_column_id) {
        let index = dest_index.min(column.task_ids.len());
        column.task_ids.insert(index, task_id.clone());
    }
    next
}

/// Insert a column and append its id to `column_order`
pub fn add_column(board: &Board, column: Column) -> Board {
    if board.columns.contains_key(&column.id) {
        warn!(column = %column.id, "duplicate column id, ignoring add");
        return board.clone();
    }
    let mut next = board.clone();
    next.column_order.push(column.id.clone());
    next.columns.insert(column.id.clone(), column);
    next
}

/// Remove a column and its entry in `column_order`.
///
/// The column's tasks remain in `tasks`, unreferenced by any column.
pub fn remove_column(board: &Board, column_id: &ColumnId) -> Board {
    if !board.columns.contains_key(column_id) {
        warn!(column = %column_id, "unknown column, ignoring removal");
        return board.clone();
    }
    let mut next = board.clone();
    next.columns.shift_remove(column_id);
    next.column_order.retain(|id| id != column_id);
    next
}

/// Insert a task and append its id to the column's `task_ids`
pub fn add_task(board: &Board, column_id: &ColumnId, task: Task) -> Board {
    if !board.columns.contains_key(column_id) {
        warn!(column = %column_id, task = %task.id, "unknown column, ignoring task add");
        return board.clone();
    }
    if board.tasks.contains_key(&task.id) {
        warn!(task = %task.id, "duplicate task id, ignoring add");
        return board.clone();
    }
    let mut next = board.clone();
    if let Some(column) = next.columns.get_mut(column_id) {
        column.task_ids.push(task.id.clone());
    }
    next.tasks.insert(task.id.clone(), task);
    next
}

/// Merge a partial update into a task
pub fn update_task(board: &Board, task_id: &TaskId, patch: &TaskPatch) -> Board {
    if !board.tasks.contains_key(task_id) {
        warn!(task = %task_id, "unknown task, ignoring update");
        return board.clone();
    }
    let mut next = board.clone();
    if let Some(task) = next.tasks.get_mut(task_id) {
        task.apply_patch(patch);
    }
    next
}

/// Remove a task from `tasks` and from whichever column lists it
pub fn remove_task(board: &Board, task_id: &TaskId) -> Board {
    if !board.tasks.contains_key(task_id) {
        warn!(task = %task_id, "unknown task, ignoring removal");
        return board.clone();
    }
    let mut next = board.clone();
    next.tasks.shift_remove(task_id);
    for column in next.columns.values_mut() {
        column.task_ids.retain(|id| id != task_id);
    }
    next
}
