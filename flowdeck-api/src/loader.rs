//! Board loader
//!
//! The API has no single "get full board" endpoint, so the initial snapshot
//! is assembled from three independently-fetched resources: the project (with
//! its persisted column order), the columns, and the tasks. Because the three
//! can drift apart on the server, the loader repairs inconsistencies as it
//! assembles, then pushes the repaired orderings back, best-effort.
//!
//! Only the three fetches are fatal. The repair write-backs are
//! fire-and-forget: a failure there leaves the server drifted and the local
//! board correct, which the next load repairs again.

use crate::client::BoardApi;
use crate::error::Result;
use crate::wire::ProjectDto;
use flowdeck_board::{Board, ColumnId, ProjectId, TaskId};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Fetch project, columns and tasks, and assemble a consistent [`Board`].
///
/// Fatal errors (any of the three fetches) are returned to the caller, which
/// owns the recoverable error surface. The project fetch runs first; when it
/// fails, no column or task fetch is attempted.
#[instrument(skip(api))]
pub async fn load_board(api: &dyn BoardApi, project_id: &ProjectId) -> Result<Board> {
    let project = api.get_project(project_id).await?;
    let columns = api.list_columns(project_id).await?;
    let tasks = api.list_tasks(project_id).await?;

    let server_order = dedupe_order(&project);
    let mut board = Board::new(project.id.clone(), project.name.clone());
    board.column_order = server_order.clone();

    // Columns the order does not know about are appended (drift repair);
    // order entries with no matching column are dropped below.
    for dto in columns {
        let column = dto.into_column();
        if !board.column_order.contains(&column.id) {
            debug!(column = %column.id, "column missing from columnOrder, appending");
            board.column_order.push(column.id.clone());
        }
        board.columns.insert(column.id.clone(), column);
    }
    let known: HashSet<ColumnId> = board.columns.keys().cloned().collect();
    board.column_order.retain(|id| {
        let keep = known.contains(id);
        if !keep {
            warn!(column = %id, "columnOrder references a column the server did not return, dropping");
        }
        keep
    });

    // Tasks always land in the task map. Membership drift (a task whose
    // column does not list it) is repaired by appending.
    for dto in tasks {
        let (task, column_id) = dto.into_task();
        match column_id {
            Some(column_id) => match board.columns.get_mut(&column_id) {
                Some(column) => {
                    if !column.task_ids.contains(&task.id) {
                        debug!(task = %task.id, column = %column_id, "task missing from taskIds, appending");
                        column.task_ids.push(task.id.clone());
                    }
                }
                None => {
                    warn!(task = %task.id, column = %column_id, "task references an unknown column");
                }
            },
            None => warn!(task = %task.id, "task has no column"),
        }
        board.tasks.insert(task.id.clone(), task);
    }

    // Drop listed task ids the server returned no task for, so every listed
    // id resolves.
    let known_tasks: HashSet<TaskId> = board.tasks.keys().cloned().collect();
    for column in board.columns.values_mut() {
        let column_id = column.id.clone();
        column.task_ids.retain(|id| {
            let keep = known_tasks.contains(id);
            if !keep {
                warn!(task = %id, column = %column_id, "taskIds references a task the server did not return, dropping");
            }
            keep
        });
    }

    reconcile_server_order(api, &board, &server_order).await;
    reconcile_task_orders(api, &board).await;

    info!(
        project = %board.id,
        columns = board.columns.len(),
        tasks = board.tasks.len(),
        "board loaded"
    );
    Ok(board)
}

fn dedupe_order(project: &ProjectDto) -> Vec<ColumnId> {
    let mut order: Vec<ColumnId> = Vec::with_capacity(project.column_order.len());
    for id in &project.column_order {
        if order.contains(id) {
            warn!(column = %id, "duplicate entry in columnOrder, dropping");
        } else {
            order.push(id.clone());
        }
    }
    order
}

/// If repair changed the column order, push it back. Best-effort.
async fn reconcile_server_order(api: &dyn BoardApi, board: &Board, server_order: &[ColumnId]) {
    if board.column_order == server_order {
        return;
    }
    debug!(project = %board.id, "column order drifted, persisting repaired order");
    if let Err(error) = api.update_column_order(&board.id, &board.column_order).await {
        warn!(%error, project = %board.id, "failed to persist repaired column order");
    }
}

/// Push every column's reconstructed task order back, concurrently.
/// Best-effort, symmetrical with the membership repair above.
async fn reconcile_task_orders(api: &dyn BoardApi, board: &Board) {
    join_all(board.columns.values().map(|column| async move {
        if let Err(error) = api.update_task_order(&column.id, &column.task_ids).await {
            warn!(%error, column = %column.id, "failed to persist reconstructed task order");
        }
    }))
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::config::HttpConfig;
    use crate::error::ApiError;
    use crate::token::MemoryTokenStore;
    use flowdeck_board::TaskId;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        let config = HttpConfig::new(server.uri()).unwrap();
        ApiClient::new(&config, Arc::new(MemoryTokenStore::with_token("tok")))
    }

    fn project_body() -> serde_json::Value {
        json!({"_id": "p1", "name": "Roadmap", "columnOrder": ["a", "b"]})
    }

    async fn mount_task_order_ack(server: &MockServer) {
        Mock::given(method("PATCH"))
            .and(wiremock::matchers::path_regex(r"^/columns/[^/]+/task-order$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "x", "title": "x", "taskIds": []
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_load_assembles_consistent_board() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/columns"))
            .and(query_param("projectId", "p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "a", "title": "To Do", "taskIds": ["t1", "t2"]},
                {"_id": "b", "title": "Done", "taskIds": []}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .and(query_param("projectId", "p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "t1", "title": "One", "createdAt": "2026-03-01T09:00:00Z", "columnId": "a"},
                {"_id": "t2", "title": "Two", "createdAt": "2026-03-01T09:05:00Z", "columnId": "a"}
            ])))
            .mount(&server)
            .await;
        mount_task_order_ack(&server).await;

        let client = client_for(&server).await;
        let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();

        assert_eq!(board.title, "Roadmap");
        assert_eq!(
            board.column_order,
            vec![ColumnId::new("a"), ColumnId::new("b")]
        );
        assert_eq!(board.tasks.len(), 2);
        assert_eq!(board.check_invariants(), Ok(()));
    }

    #[tokio::test]
    async fn test_column_missing_from_order_is_appended_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/p1"))
            // The server order knows nothing about column "c"
            .respond_with(ResponseTemplate::new(200).set_body_json(project_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/columns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "a", "title": "To Do"},
                {"_id": "b", "title": "Done"},
                {"_id": "c", "title": "Review"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        // Drift repair pushes the fixed order back, exactly once
        Mock::given(method("PATCH"))
            .and(path("/projects/p1/column-order"))
            .and(body_json(json!({"columnOrder": ["a", "b", "c"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "p1", "name": "Roadmap", "columnOrder": ["a", "b", "c"]
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_task_order_ack(&server).await;

        let client = client_for(&server).await;
        let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();

        let appended: Vec<_> = board
            .column_order
            .iter()
            .filter(|id| id.as_str() == "c")
            .collect();
        assert_eq!(appended.len(), 1);
        assert_eq!(board.check_invariants(), Ok(()));
    }

    #[tokio::test]
    async fn test_stale_order_entry_is_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/p1"))
            // "ghost" was deleted server-side but the order still lists it
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "p1", "name": "Roadmap", "columnOrder": ["a", "ghost", "b"]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/columns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "a", "title": "To Do"},
                {"_id": "b", "title": "Done"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/projects/p1/column-order"))
            .and(body_json(json!({"columnOrder": ["a", "b"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "p1", "name": "Roadmap", "columnOrder": ["a", "b"]
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_task_order_ack(&server).await;

        let client = client_for(&server).await;
        let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();
        assert_eq!(
            board.column_order,
            vec![ColumnId::new("a"), ColumnId::new("b")]
        );
        assert_eq!(board.check_invariants(), Ok(()));
    }

    #[tokio::test]
    async fn test_task_membership_drift_is_repaired() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/columns"))
            // Column "a" has forgotten about t2; it also lists a task the
            // server no longer has
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "a", "title": "To Do", "taskIds": ["t1", "gone"]},
                {"_id": "b", "title": "Done"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "t1", "title": "One", "createdAt": "2026-03-01T09:00:00Z", "columnId": "a"},
                {"_id": "t2", "title": "Two", "createdAt": "2026-03-01T09:05:00Z", "columnId": "a"}
            ])))
            .mount(&server)
            .await;
        mount_task_order_ack(&server).await;

        let client = client_for(&server).await;
        let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();

        let column = board.find_column(&ColumnId::new("a")).unwrap();
        assert_eq!(
            column.task_ids,
            vec![TaskId::new("t1"), TaskId::new("t2")]
        );
        assert_eq!(board.check_invariants(), Ok(()));
    }

    #[tokio::test]
    async fn test_unknown_project_is_fatal_and_stops_loading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/nope"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        // Column and task fetches must never happen
        Mock::given(method("GET"))
            .and(path("/columns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = load_board(&client, &ProjectId::new("nope")).await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_repair_persistence_failure_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "p1", "name": "Roadmap", "columnOrder": []
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/columns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "a", "title": "To Do"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        // Both repair write-backs blow up; the load still succeeds
        Mock::given(method("PATCH"))
            .and(path("/projects/p1/column-order"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/columns/a/task-order"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();
        assert_eq!(board.column_order, vec![ColumnId::new("a")]);
        assert_eq!(board.check_invariants(), Ok(()));
    }
}
