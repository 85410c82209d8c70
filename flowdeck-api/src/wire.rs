//! Wire types for the board REST API
//!
//! The server is Mongo-backed and may emit `_id` instead of `id`; DTOs accept
//! either spelling. Array fields may be absent entirely and deserialize as
//! empty, which is exactly the drift the loader repairs.

use chrono::{DateTime, Utc};
use flowdeck_board::{Column, ColumnId, ProjectId, Task, TaskId};
use serde::{Deserialize, Serialize};

/// Project as returned by the projects endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    #[serde(alias = "_id")]
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub column_order: Vec<ColumnId>,
}

/// Column as returned by the columns endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDto {
    #[serde(alias = "_id")]
    pub id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub task_ids: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

impl ColumnDto {
    /// Convert into the model type
    pub fn into_column(self) -> Column {
        Column {
            id: self.id,
            title: self.title,
            task_ids: self.task_ids,
        }
    }
}

/// Task as returned by the tasks endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    #[serde(alias = "_id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Which column the server believes owns this task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_id: Option<ColumnId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

impl TaskDto {
    /// Convert into the model task plus the server's column membership claim
    pub fn into_task(self) -> (Task, Option<ColumnId>) {
        let task = Task {
            id: self.id,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
            deadline: self.deadline,
            labels: self.labels,
        };
        (task, self.column_id)
    }
}

/// Body of `POST /projects` and `PUT /projects/{id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectRequest {
    /// A request with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Body of `POST /columns`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    pub title: String,
    pub project_id: ProjectId,
}

/// Body of `PUT /columns/{id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameColumnRequest {
    pub title: String,
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub column_id: ColumnId,
    pub project_id: ProjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Body of `PATCH /projects/{id}/column-order`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ColumnOrderBody<'a> {
    pub column_order: &'a [ColumnId],
}

/// Body of `PATCH /columns/{id}/task-order`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskOrderBody<'a> {
    pub task_ids: &'a [TaskId],
}

/// Body of `PATCH /tasks/{id}/move`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoveTaskBody<'a> {
    pub target_column_id: &'a ColumnId,
}
