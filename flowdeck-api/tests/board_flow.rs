//! End-to-end flow: load a drifted board, reconcile a drag, persist,
//! delete optimistically

use flowdeck_api::{load_board, sync, ApiClient, HttpConfig, MemoryTokenStore, NewTask};
use flowdeck_board::{reconcile, ColumnId, ProjectId, TaskId, TaskPatch};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ApiClient {
    let config = HttpConfig::new(server.uri()).unwrap();
    ApiClient::new(&config, Arc::new(MemoryTokenStore::with_token("session-token")))
}

/// Mount the three read endpoints for a board whose resources have drifted:
/// column "c" is missing from the order, and task t3 is missing from its
/// column's taskIds.
async fn mount_drifted_board(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/projects/p1"))
        .and(header("Authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "p1",
            "name": "Launch plan",
            "columnOrder": ["a", "b"]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/columns"))
        .and(query_param("projectId", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "a", "title": "To Do", "taskIds": ["t1", "t2"]},
            {"_id": "b", "title": "Doing", "taskIds": []},
            {"_id": "c", "title": "Done", "taskIds": []}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("projectId", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "t1", "title": "Write copy", "createdAt": "2026-03-01T09:00:00Z",
             "columnId": "a", "labels": ["marketing"]},
            {"_id": "t2", "title": "Fix signup", "createdAt": "2026-03-01T09:05:00Z",
             "columnId": "a", "deadline": "2026-03-20T00:00:00Z"},
            {"_id": "t3", "title": "Ship it", "createdAt": "2026-03-01T09:10:00Z",
             "columnId": "c"}
        ])))
        .mount(server)
        .await;
    // Loader write-backs: the repaired column order, and every column's
    // reconstructed task order
    Mock::given(method("PATCH"))
        .and(path("/projects/p1/column-order"))
        .and(body_json(json!({"columnOrder": ["a", "b", "c"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "p1", "name": "Launch plan", "columnOrder": ["a", "b", "c"]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("PATCH"))
        .and(path_regex(r"^/columns/[^/]+/task-order$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "x", "title": "x", "taskIds": []
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn drifted_board_loads_consistent_and_repairs_server() {
    let server = MockServer::start().await;
    mount_drifted_board(&server).await;

    let client = client_for(&server).await;
    let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();

    assert_eq!(
        board.column_order,
        vec![ColumnId::new("a"), ColumnId::new("b"), ColumnId::new("c")]
    );
    // t3's membership was reconstructed from its columnId
    let done = board.find_column(&ColumnId::new("c")).unwrap();
    assert_eq!(done.task_ids, vec![TaskId::new("t3")]);
    assert_eq!(board.check_invariants(), Ok(()));

    // Every column's reconstructed task order was pushed back
    let received = server.received_requests().await.unwrap();
    let order_writes = received
        .iter()
        .filter(|r| r.url.path().ends_with("/task-order"))
        .count();
    assert_eq!(order_writes, 3);
}

#[tokio::test]
async fn drag_reconcile_persist_round_trip() {
    let server = MockServer::start().await;
    mount_drifted_board(&server).await;

    // The cross-column drag fires a move plus both columns' orders
    Mock::given(method("PATCH"))
        .and(path("/tasks/t1/move"))
        .and(body_json(json!({"targetColumnId": "b"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "t1", "title": "Write copy",
            "createdAt": "2026-03-01T09:00:00Z", "columnId": "b"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();

    let gesture = flowdeck_board::DragEnd::task("t1", "a", 0, "b", 0);
    let outcome = reconcile::drag_end(&board, &gesture).unwrap();

    // Optimistic: the snapshot reflects the move before persistence runs
    let a = outcome.board.find_column(&ColumnId::new("a")).unwrap();
    let b = outcome.board.find_column(&ColumnId::new("b")).unwrap();
    assert_eq!(a.task_ids, vec![TaskId::new("t2")]);
    assert_eq!(b.task_ids, vec![TaskId::new("t1")]);
    assert_eq!(outcome.board.check_invariants(), Ok(()));

    sync::persist(&client, &board.id, &outcome.deltas).await;
}

#[tokio::test]
async fn optimistic_update_survives_persistence_failure() {
    let server = MockServer::start().await;
    mount_drifted_board(&server).await;

    Mock::given(method("PUT"))
        .and(path("/tasks/t2"))
        .and(body_json(json!({"title": "Fix signup flow"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();

    let patch = TaskPatch::new().with_title("Fix signup flow");
    let outcome = reconcile::update_task(&board, &TaskId::new("t2"), patch).unwrap();
    assert_eq!(
        outcome.board.tasks[&TaskId::new("t2")].title,
        "Fix signup flow"
    );

    // The 500 is logged, not surfaced, and nothing is rolled back
    sync::persist(&client, &board.id, &outcome.deltas).await;
    assert_eq!(
        outcome.board.tasks[&TaskId::new("t2")].title,
        "Fix signup flow"
    );
}

#[tokio::test]
async fn column_deletion_is_optimistic_and_orphans_tasks() {
    let server = MockServer::start().await;
    mount_drifted_board(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/columns/a"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();

    let outcome = reconcile::remove_column(&board, &ColumnId::new("a")).unwrap();
    // Column gone from both collections; its tasks remain, unreferenced
    assert!(outcome.board.find_column(&ColumnId::new("a")).is_none());
    assert!(!outcome.board.column_order.contains(&ColumnId::new("a")));
    assert!(outcome.board.tasks.contains_key(&TaskId::new("t1")));
    assert!(outcome.board.tasks.contains_key(&TaskId::new("t2")));
    assert_eq!(outcome.board.owner_of(&TaskId::new("t1")), None);
    assert_eq!(outcome.board.check_invariants(), Ok(()));

    sync::persist(&client, &board.id, &outcome.deltas).await;
}

#[tokio::test]
async fn server_confirmed_task_creation_lands_in_column() {
    let server = MockServer::start().await;
    mount_drifted_board(&server).await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({
            "title": "Announce",
            "columnId": "b",
            "projectId": "p1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "t-new", "title": "Announce",
            "createdAt": "2026-03-02T08:00:00Z", "columnId": "b"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let board = load_board(&client, &ProjectId::new("p1")).await.unwrap();

    let next = sync::create_task(&client, &board, &ColumnId::new("b"), NewTask::new("Announce"))
        .await
        .unwrap();
    let doing = next.find_column(&ColumnId::new("b")).unwrap();
    assert_eq!(doing.task_ids, vec![TaskId::new("t-new")]);
    assert_eq!(next.check_invariants(), Ok(()));
}
