//! Board-level types: Board and Column

use super::ids::{ColumnId, ProjectId, TaskId};
use super::task::Task;
use crate::error::InvariantViolation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kanban board for one project.
///
/// `column_order` is the authoritative left-to-right order; `columns` and
/// `tasks` are keyed lookups whose iteration order carries no meaning.
/// Vertical order lives in each column's `task_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: ProjectId,
    pub title: String,
    pub column_order: Vec<ColumnId>,
    pub columns: IndexMap<ColumnId, Column>,
    pub tasks: IndexMap<TaskId, Task>,
}

impl Board {
    /// Create an empty board
    pub fn new(id: impl Into<ProjectId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            column_order: Vec::new(),
            columns: IndexMap::new(),
            tasks: IndexMap::new(),
        }
    }

    /// Look up a column by id
    pub fn find_column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.get(id)
    }

    /// The column that currently lists the task, if any.
    ///
    /// Tasks may be unreferenced after a column deletion; those return `None`.
    pub fn owner_of(&self, task: &TaskId) -> Option<&ColumnId> {
        self.columns
            .values()
            .find(|column| column.task_ids.contains(task))
            .map(|column| &column.id)
    }

    /// Verify the structural invariants:
    ///
    /// - every id in `column_order` resolves in `columns`, and every column
    ///   appears in `column_order` exactly once
    /// - every id listed in a column's `task_ids` resolves in `tasks`, and no
    ///   task is listed by more than one column
    ///
    /// Unreferenced entries in `tasks` are allowed (orphans from a column
    /// deletion).
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for id in &self.column_order {
            if !self.columns.contains_key(id) {
                return Err(InvariantViolation::OrderedColumnMissing { id: id.clone() });
            }
        }
        for id in self.columns.keys() {
            let count = self.column_order.iter().filter(|o| *o == id).count();
            if count == 0 {
                return Err(InvariantViolation::ColumnNotOrdered { id: id.clone() });
            }
            if count > 1 {
                return Err(InvariantViolation::ColumnOrderedTwice {
                    id: id.clone(),
                    count,
                });
            }
        }

        let mut owners: HashMap<&TaskId, &ColumnId> = HashMap::new();
        for column in self.columns.values() {
            for task_id in &column.task_ids {
                if !self.tasks.contains_key(task_id) {
                    return Err(InvariantViolation::ListedTaskMissing {
                        task: task_id.clone(),
                        column: column.id.clone(),
                    });
                }
                if let Some(first) = owners.insert(task_id, &column.id) {
                    return Err(InvariantViolation::TaskMultiplyOwned {
                        task: task_id.clone(),
                        first: first.clone(),
                        second: column.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A column is a named, ordered bucket of tasks representing a workflow stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub task_ids: Vec<TaskId>,
}

impl Column {
    /// Create an empty column
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            task_ids: Vec::new(),
        }
    }

    /// Set the task ordering
    pub fn with_task_ids(mut self, task_ids: Vec<TaskId>) -> Self {
        self.task_ids = task_ids;
        self
    }
}
