//! Tagged board mutations

use crate::types::{Column, ColumnId, Task, TaskId, TaskPatch};
use serde::{Deserialize, Serialize};

/// The closed set of board mutations.
///
/// Every user gesture resolves to exactly one operation, and
/// [`crate::reduce::apply`] turns an operation plus a snapshot into the next
/// snapshot. Keeping the set closed lets the invariants be property-tested
/// over arbitrary operation sequences without any UI in the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BoardOp {
    /// Move a column to a new slot in `column_order`
    ReorderColumn {
        column_id: ColumnId,
        from_index: usize,
        to_index: usize,
    },

    /// Move a task to a new slot within the same column
    ReorderTask {
        column_id: ColumnId,
        task_id: TaskId,
        from_index: usize,
        to_index: usize,
    },

    /// Move a task from one column into another at the given slot
    MoveTask {
        task_id: TaskId,
        source_column_id: ColumnId,
        dest_column_id: ColumnId,
        dest_index: usize,
    },

    /// Insert a server-created column at the end of `column_order`
    AddColumn { column: Column },

    /// Remove a column and its order entry. Its tasks stay in `tasks`,
    /// unreferenced.
    RemoveColumn { column_id: ColumnId },

    /// Insert a server-created task at the end of a column
    AddTask { column_id: ColumnId, task: Task },

    /// Merge a partial update into a task
    UpdateTask { task_id: TaskId, patch: TaskPatch },

    /// Remove a task from its column and from `tasks`
    RemoveTask { task_id: TaskId },
}
