//! Error types for the board model

use crate::types::{ColumnId, TaskId};
use thiserror::Error;

/// A structural inconsistency detectable on a board snapshot.
///
/// The reducer never produces these for structurally valid input; they are
/// returned by [`crate::Board::check_invariants`] and used by the loader and
/// the property tests to verify snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// An id in `column_order` has no entry in `columns`
    #[error("column {id} is listed in columnOrder but missing from columns")]
    OrderedColumnMissing { id: ColumnId },

    /// A column exists but is missing from `column_order`
    #[error("column {id} is missing from columnOrder")]
    ColumnNotOrdered { id: ColumnId },

    /// A column appears more than once in `column_order`
    #[error("column {id} appears {count} times in columnOrder")]
    ColumnOrderedTwice { id: ColumnId, count: usize },

    /// A column lists a task that has no entry in `tasks`
    #[error("task {task} is listed by column {column} but missing from tasks")]
    ListedTaskMissing { task: TaskId, column: ColumnId },

    /// A task is listed by more than one column
    #[error("task {task} is listed by both column {first} and column {second}")]
    TaskMultiplyOwned {
        task: TaskId,
        first: ColumnId,
        second: ColumnId,
    },
}
