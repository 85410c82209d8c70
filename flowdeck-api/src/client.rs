//! REST client for the board API
//!
//! A thin reqwest wrapper: bearer-token injection from the injected
//! [`TokenStore`], local id validation before dispatch, and status-to-error
//! mapping. There are no automatic retries - persistence callers are
//! fire-and-forget and the loader surfaces failures directly.

use crate::config::HttpConfig;
use crate::error::{ApiError, Result};
use crate::token::TokenStore;
use crate::wire::{
    ColumnDto, ColumnOrderBody, CreateColumnRequest, CreateTaskRequest, MoveTaskBody, ProjectDto,
    ProjectRequest, RenameColumnRequest, TaskDto, TaskOrderBody,
};
use async_trait::async_trait;
use flowdeck_board::{ColumnId, ProjectId, TaskId, TaskPatch};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// Everything the loader and the sync adapter need from the remote API.
///
/// [`ApiClient`] is the production implementation; tests can substitute a
/// stub to exercise reconciliation without a server.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<ProjectDto>>;
    async fn create_project(&self, request: &ProjectRequest) -> Result<ProjectDto>;
    async fn get_project(&self, id: &ProjectId) -> Result<ProjectDto>;
    async fn update_project(&self, id: &ProjectId, request: &ProjectRequest)
        -> Result<ProjectDto>;
    async fn delete_project(&self, id: &ProjectId) -> Result<()>;
    async fn update_column_order(
        &self,
        id: &ProjectId,
        column_order: &[ColumnId],
    ) -> Result<ProjectDto>;

    async fn list_columns(&self, project_id: &ProjectId) -> Result<Vec<ColumnDto>>;
    async fn create_column(&self, request: &CreateColumnRequest) -> Result<ColumnDto>;
    async fn rename_column(&self, id: &ColumnId, title: &str) -> Result<ColumnDto>;
    async fn delete_column(&self, id: &ColumnId) -> Result<()>;
    async fn update_task_order(&self, id: &ColumnId, task_ids: &[TaskId]) -> Result<ColumnDto>;

    async fn list_tasks(&self, project_id: &ProjectId) -> Result<Vec<TaskDto>>;
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<TaskDto>;
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<TaskDto>;
    async fn delete_task(&self, id: &TaskId) -> Result<()>;
    async fn move_task(&self, id: &TaskId, target_column_id: &ColumnId) -> Result<TaskDto>;

    async fn upcoming_tasks(&self, days: u32) -> Result<Vec<TaskDto>>;
    async fn overdue_tasks(&self) -> Result<Vec<TaskDto>>;
}

/// Reject obviously bad ids before they reach the wire. The literal string
/// `"undefined"` shows up when an upstream layer interpolates a missing value
/// into a path, and it is cheaper to catch here than to chase a 404.
fn require_id(id: &str, what: &'static str) -> Result<()> {
    if id.is_empty() || id == "undefined" {
        warn!(what, "rejecting request with invalid id");
        return Err(ApiError::invalid_id(what));
    }
    Ok(())
}

/// Production [`BoardApi`] implementation over reqwest
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client from configuration and an injected token store
    pub fn new(config: &HttpConfig, tokens: Arc<dyn TokenStore>) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("failed to create HTTP client");
        Self {
            http,
            base_url: config.base_url.clone(),
            tokens,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url);
        match self.tokens.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Map non-success statuses onto the error taxonomy. A 401 also drops the
    /// stored token so the identity layer re-authenticates.
    fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().to_string();
        debug!(%url, status = status.as_u16(), "request failed");
        match status {
            StatusCode::UNAUTHORIZED => {
                self.tokens.clear();
                Err(ApiError::Unauthorized { url })
            }
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden { url }),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound { url }),
            _ => Err(ApiError::Status {
                status: status.as_u16(),
                url,
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .request(Method::GET, url.clone())
            .query(query)
            .send()
            .await
            .map_err(|error| ApiError::from_transport(error, &url))?;
        let response = self.check(response)?;
        response
            .json()
            .await
            .map_err(|error| ApiError::from_transport(error, &url))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .request(method, url.clone())
            .json(body)
            .send()
            .await
            .map_err(|error| ApiError::from_transport(error, &url))?;
        let response = self.check(response)?;
        response
            .json()
            .await
            .map_err(|error| ApiError::from_transport(error, &url))
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<()> {
        let url = self.endpoint(path)?;
        let response = self
            .request(method, url.clone())
            .send()
            .await
            .map_err(|error| ApiError::from_transport(error, &url))?;
        self.check(response)?;
        Ok(())
    }
}

#[async_trait]
impl BoardApi for ApiClient {
    #[instrument(skip(self))]
    async fn list_projects(&self) -> Result<Vec<ProjectDto>> {
        self.get_json("projects", &[]).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_project(&self, request: &ProjectRequest) -> Result<ProjectDto> {
        self.send_json(Method::POST, "projects", request).await
    }

    #[instrument(skip(self))]
    async fn get_project(&self, id: &ProjectId) -> Result<ProjectDto> {
        require_id(id.as_str(), "project ID")?;
        self.get_json(&format!("projects/{id}"), &[]).await
    }

    #[instrument(skip(self, request))]
    async fn update_project(
        &self,
        id: &ProjectId,
        request: &ProjectRequest,
    ) -> Result<ProjectDto> {
        require_id(id.as_str(), "project ID")?;
        self.send_json(Method::PUT, &format!("projects/{id}"), request)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_project(&self, id: &ProjectId) -> Result<()> {
        require_id(id.as_str(), "project ID")?;
        self.send_empty(Method::DELETE, &format!("projects/{id}"))
            .await
    }

    #[instrument(skip(self, column_order), fields(columns = column_order.len()))]
    async fn update_column_order(
        &self,
        id: &ProjectId,
        column_order: &[ColumnId],
    ) -> Result<ProjectDto> {
        require_id(id.as_str(), "project ID")?;
        self.send_json(
            Method::PATCH,
            &format!("projects/{id}/column-order"),
            &ColumnOrderBody { column_order },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_columns(&self, project_id: &ProjectId) -> Result<Vec<ColumnDto>> {
        require_id(project_id.as_str(), "project ID")?;
        self.get_json("columns", &[("projectId", project_id.to_string())])
            .await
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create_column(&self, request: &CreateColumnRequest) -> Result<ColumnDto> {
        require_id(request.project_id.as_str(), "project ID")?;
        self.send_json(Method::POST, "columns", request).await
    }

    #[instrument(skip(self, title))]
    async fn rename_column(&self, id: &ColumnId, title: &str) -> Result<ColumnDto> {
        require_id(id.as_str(), "column ID")?;
        self.send_json(
            Method::PUT,
            &format!("columns/{id}"),
            &RenameColumnRequest {
                title: title.to_string(),
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_column(&self, id: &ColumnId) -> Result<()> {
        require_id(id.as_str(), "column ID")?;
        self.send_empty(Method::DELETE, &format!("columns/{id}"))
            .await
    }

    #[instrument(skip(self, task_ids), fields(tasks = task_ids.len()))]
    async fn update_task_order(&self, id: &ColumnId, task_ids: &[TaskId]) -> Result<ColumnDto> {
        require_id(id.as_str(), "column ID")?;
        self.send_json(
            Method::PATCH,
            &format!("columns/{id}/task-order"),
            &TaskOrderBody { task_ids },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_tasks(&self, project_id: &ProjectId) -> Result<Vec<TaskDto>> {
        require_id(project_id.as_str(), "project ID")?;
        self.get_json("tasks", &[("projectId", project_id.to_string())])
            .await
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<TaskDto> {
        require_id(request.project_id.as_str(), "project ID")?;
        require_id(request.column_id.as_str(), "column ID")?;
        self.send_json(Method::POST, "tasks", request).await
    }

    #[instrument(skip(self, patch))]
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<TaskDto> {
        require_id(id.as_str(), "task ID")?;
        self.send_json(Method::PUT, &format!("tasks/{id}"), patch)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        require_id(id.as_str(), "task ID")?;
        self.send_empty(Method::DELETE, &format!("tasks/{id}")).await
    }

    #[instrument(skip(self))]
    async fn move_task(&self, id: &TaskId, target_column_id: &ColumnId) -> Result<TaskDto> {
        require_id(id.as_str(), "task ID")?;
        require_id(target_column_id.as_str(), "target column ID")?;
        self.send_json(
            Method::PATCH,
            &format!("tasks/{id}/move"),
            &MoveTaskBody { target_column_id },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn upcoming_tasks(&self, days: u32) -> Result<Vec<TaskDto>> {
        self.get_json("tasks/upcoming", &[("days", days.to_string())])
            .await
    }

    #[instrument(skip(self))]
    async fn overdue_tasks(&self) -> Result<Vec<TaskDto>> {
        self.get_json("tasks/overdue", &[]).await
    }
}
