use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use todo_server::{
    config::AppConfig, repository::MemoryTodoRepository, routes::app, state::AppState,
};

fn test_app() -> Router {
    let state = AppState::new(
        AppConfig::default(),
        Arc::new(MemoryTodoRepository::new()),
    );
    app(state)
}

async fn json_response(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json: Value = serde_json::from_slice(&body).expect("body should be json");
    (status, json)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, body: Value) -> (StatusCode, Value) {
    json_response(app, json_request("POST", "/api/todos", body)).await
}

async fn list_len(app: &Router) -> usize {
    let (status, todos) = json_response(app, empty_request("GET", "/api/todos")).await;
    assert_eq!(status, StatusCode::OK);
    todos.as_array().expect("list should be an array").len()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let (status, json) = json_response(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));
}

#[tokio::test]
async fn create_then_get_round_trips_with_defaults() {
    let app = test_app();
    let (status, created) = create(&app, json!({ "title": "A" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_u64().expect("id should be a number");
    let (status, fetched) =
        json_response(&app, empty_request("GET", &format!("/api/todos/{id}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "A");
    assert_eq!(fetched["description"], "");
    assert_eq!(fetched["completed"], false);
    assert_eq!(fetched["created_at"], fetched["updated_at"]);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn partial_update_preserves_untouched_fields() {
    let app = test_app();
    let (_, created) = create(&app, json!({ "title": "A", "description": "B" })).await;
    let id = created["id"].as_u64().unwrap();

    let (status, updated) = json_response(
        &app,
        json_request("PUT", &format!("/api/todos/{id}"), json!({ "completed": true })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "A");
    assert_eq!(updated["description"], "B");
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["created_at"], created["created_at"]);

    let before = chrono::DateTime::parse_from_rfc3339(created["updated_at"].as_str().unwrap())
        .expect("timestamp should parse");
    let after = chrono::DateTime::parse_from_rfc3339(updated["updated_at"].as_str().unwrap())
        .expect("timestamp should parse");
    assert!(after > before);
}

#[tokio::test]
async fn explicit_false_and_empty_values_are_applied() {
    let app = test_app();
    let (_, created) = create(&app, json!({ "title": "A", "description": "B" })).await;
    let id = created["id"].as_u64().unwrap();
    let uri = format!("/api/todos/{id}");

    json_response(&app, json_request("PUT", &uri, json!({ "completed": true }))).await;
    let (status, updated) = json_response(
        &app,
        json_request("PUT", &uri, json!({ "completed": false, "description": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], false);
    assert_eq!(updated["description"], "");
    assert_eq!(updated["title"], "A");
}

#[tokio::test]
async fn empty_update_still_refreshes_updated_at() {
    let app = test_app();
    let (_, created) = create(&app, json!({ "title": "A" })).await;
    let id = created["id"].as_u64().unwrap();

    let (status, updated) =
        json_response(&app, json_request("PUT", &format!("/api/todos/{id}"), json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "A");
    assert_ne!(updated["updated_at"], created["updated_at"]);
}

#[tokio::test]
async fn update_rejects_blank_title() {
    let app = test_app();
    let (_, created) = create(&app, json!({ "title": "A" })).await;
    let id = created["id"].as_u64().unwrap();

    let (status, json) = json_response(
        &app,
        json_request("PUT", &format!("/api/todos/{id}"), json!({ "title": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "title is required");
}

#[tokio::test]
async fn delete_is_terminal() {
    let app = test_app();
    let (_, created) = create(&app, json!({ "title": "A" })).await;
    let id = created["id"].as_u64().unwrap();
    let uri = format!("/api/todos/{id}");

    let (status, json) = json_response(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Todo deleted successfully");

    let (status, json) = json_response(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Todo not found");

    assert_eq!(list_len(&app).await, 0);

    let (status, _) = json_response(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_requires_title() {
    let app = test_app();

    for body in [json!({ "title": "" }), json!({}), json!({ "title": null }), json!({ "description": "x" })] {
        let (status, json) = create(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "title is required");
    }

    assert_eq!(list_len(&app).await, 0);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = test_app();

    let (status, json) = json_response(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/todos")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, json) = create(&app, json!({ "title": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, _) = json_response(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/todos")
            .body(Body::from(json!({ "title": "A" }).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(list_len(&app).await, 0);
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = test_app();

    let requests = [
        empty_request("GET", "/api/todos/abc"),
        json_request("PUT", "/api/todos/abc", json!({ "completed": true })),
        empty_request("DELETE", "/api/todos/abc"),
        empty_request("GET", "/api/todos/-1"),
    ];
    for request in requests {
        let (status, json) = json_response(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid ID");
    }
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = test_app();

    let requests = [
        empty_request("GET", "/api/todos/99"),
        json_request("PUT", "/api/todos/99", json!({ "completed": true })),
        empty_request("DELETE", "/api/todos/99"),
    ];
    for request in requests {
        let (status, json) = json_response(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Todo not found");
    }
}

#[tokio::test]
async fn ids_increase_across_deletions() {
    let app = test_app();
    let mut last = 0;

    for title in ["a", "b", "c"] {
        let (_, created) = create(&app, json!({ "title": title })).await;
        let id = created["id"].as_u64().unwrap();
        assert!(id > last);

        let (status, _) =
            json_response(&app, empty_request("DELETE", &format!("/api/todos/{last}"))).await;
        if last > 0 {
            assert_eq!(status, StatusCode::OK);
        }
        last = id;
    }
}

#[tokio::test]
async fn list_keeps_insertion_order() {
    let app = test_app();
    for title in ["first", "second", "third"] {
        create(&app, json!({ "title": title })).await;
    }

    let (_, todos) = json_response(&app, empty_request("GET", "/api/todos")).await;
    let titles: Vec<&str> = todos
        .as_array()
        .unwrap()
        .iter()
        .map(|todo| todo["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_unique_ids() {
    let app = test_app();
    let handles: Vec<_> = (0..32)
        .map(|n| {
            let app = app.clone();
            tokio::spawn(async move {
                let (status, created) =
                    create(&app, json!({ "title": format!("todo {n}") })).await;
                assert_eq!(status, StatusCode::CREATED);
                created["id"].as_u64().unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.expect("task should not panic"));
    }
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 32);
    assert_eq!(list_len(&app).await, 32);
}

#[tokio::test]
async fn titles_are_stored_as_sent() {
    let app = test_app();
    let (status, created) = create(&app, json!({ "title": "  A  " })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "  A  ");

    let id = created["id"].as_u64().unwrap();
    let (status, updated) = json_response(
        &app,
        json_request("PUT", &format!("/api/todos/{id}"), json!({ "title": " B" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], " B");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_of_different_fields_are_all_kept() {
    let app = test_app();
    let (_, created) = create(&app, json!({ "title": "A" })).await;
    let id = created["id"].as_u64().unwrap();
    let uri = format!("/api/todos/{id}");

    let handles: Vec<_> = [
        json!({ "completed": true }),
        json!({ "title": "X" }),
        json!({ "description": "B" }),
    ]
    .into_iter()
    .map(|body| {
        let app = app.clone();
        let uri = uri.clone();
        tokio::spawn(async move {
            let (status, _) = json_response(&app, json_request("PUT", &uri, body)).await;
            assert_eq!(status, StatusCode::OK);
        })
    })
    .collect();
    for handle in handles {
        handle.await.expect("task should not panic");
    }

    let (status, stored) = json_response(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["title"], "X");
    assert_eq!(stored["description"], "B");
    assert_eq!(stored["completed"], true);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn update_racing_delete_leaves_no_record() {
    let app = test_app();
    let (_, created) = create(&app, json!({ "title": "A" })).await;
    let uri = format!("/api/todos/{}", created["id"].as_u64().unwrap());

    let update = {
        let app = app.clone();
        let uri = uri.clone();
        tokio::spawn(async move {
            json_response(&app, json_request("PUT", &uri, json!({ "completed": true }))).await
        })
    };
    let delete = {
        let app = app.clone();
        let uri = uri.clone();
        tokio::spawn(async move { json_response(&app, empty_request("DELETE", &uri)).await })
    };

    let (update_status, _) = update.await.expect("task should not panic");
    let (delete_status, _) = delete.await.expect("task should not panic");
    assert!(update_status == StatusCode::OK || update_status == StatusCode::NOT_FOUND);
    assert_eq!(delete_status, StatusCode::OK);

    let (status, _) = json_response(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(list_len(&app).await, 0);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/todos")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request should succeed");

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("http://localhost:3000")
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|value| value.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn cors_ignores_unknown_origin() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
