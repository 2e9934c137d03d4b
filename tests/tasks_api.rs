//! Tasks service over HTTP.

mod common;

use axum::http::StatusCode;
use common::*;
use crud_services::tasks_entity;
use serde_json::json;

async fn tasks_app() -> axum::Router {
    test_app(vec![tasks_entity()], "Task API").await
}

#[tokio::test]
async fn create_task_with_and_without_description() {
    let app = tasks_app().await;
    let (status, data) = post(&app, "/tasks", json!({"title": "Buy groceries", "description": "Milk, eggs, bread"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["title"], "Buy groceries");
    assert_eq!(data["description"], "Milk, eggs, bread");
    assert!(data["id"].is_i64());

    let (status, data) = post(&app, "/tasks", json!({"title": "Simple task"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["description"], json!(null));
}

#[tokio::test]
async fn missing_title_is_a_validation_error_not_a_crash() {
    let app = tasks_app().await;
    let (status, body) = post(&app, "/tasks", json!({"description": "No title"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(get(&app, "/tasks").await.1, json!([]));
}

#[tokio::test]
async fn list_returns_all_created_tasks() {
    let app = tasks_app().await;
    assert_eq!(get(&app, "/tasks").await, (StatusCode::OK, json!([])));
    post(&app, "/tasks", json!({"title": "Task 1"})).await;
    post(&app, "/tasks", json!({"title": "Task 2", "description": "Second"})).await;

    let (status, data) = get(&app, "/tasks").await;
    assert_eq!(status, StatusCode::OK);
    let data = data.as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["title"], "Task 1");
    assert_eq!(data[1]["description"], "Second");
    assert!(data.iter().all(|t| t["id"].is_i64() && t["title"].is_string()));
}

#[tokio::test]
async fn list_without_limit_is_not_capped() {
    let app = tasks_app().await;
    for i in 0..105 {
        post(&app, "/tasks", json!({"title": format!("Task {}", i)})).await;
    }
    let (status, data) = get(&app, "/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data.as_array().unwrap().len(), 105);
    assert_eq!(get(&app, "/tasks?limit=5").await.1.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn get_by_id_and_structured_not_found() {
    let app = tasks_app().await;
    let (_, created) = post(&app, "/tasks", json!({"title": "Specific Task", "description": "Find me"})).await;
    let (status, data) = get(&app, &format!("/tasks/{}", created["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data, created);

    let (status, body) = get(&app, "/tasks/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": {"code": "not_found", "message": "Task not found"}})
    );
}

#[tokio::test]
async fn patch_title_keeps_description() {
    let app = tasks_app().await;
    let (_, created) = post(&app, "/tasks", json!({"title": "Original Title", "description": "Original Desc"})).await;
    let (status, data) = patch(&app, &format!("/tasks/{}", created["id"]), json!({"title": "Updated Title"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["title"], "Updated Title");
    assert_eq!(data["description"], "Original Desc");
}

#[tokio::test]
async fn patch_can_clear_description_but_not_title() {
    let app = tasks_app().await;
    let (_, created) = post(&app, "/tasks", json!({"title": "Keep This", "description": "Change Me"})).await;
    let uri = format!("/tasks/{}", created["id"]);

    let (status, data) = patch(&app, &uri, json!({"description": null})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["title"], "Keep This");
    assert_eq!(data["description"], json!(null));

    let (status, _) = patch(&app, &uri, json!({"title": null})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn put_overwrites_all_fields() {
    let app = tasks_app().await;
    let (_, created) = post(&app, "/tasks", json!({"title": "Old Title", "description": "Old Desc"})).await;
    let uri = format!("/tasks/{}", created["id"]);

    let (status, data) = put(&app, &uri, json!({"title": "New Title", "description": "New Desc"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data, json!({"id": created["id"], "title": "New Title", "description": "New Desc"}));

    let (status, data) = put(&app, &uri, json!({"title": "Only Title"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["description"], json!(null));
}

#[tokio::test]
async fn put_requires_title() {
    let app = tasks_app().await;
    let (_, created) = post(&app, "/tasks", json!({"title": "Stay"})).await;
    let uri = format!("/tasks/{}", created["id"]);
    let (status, _) = put(&app, &uri, json!({"description": "no title"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(get(&app, &uri).await.1["title"], "Stay");
}

#[tokio::test]
async fn update_and_replace_missing_are_not_found() {
    let app = tasks_app().await;
    let (status, body) = patch(&app, "/tasks/999", json!({"title": "Won't Work"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Task not found");
    let (status, _) = put(&app, "/tasks/999", json!({"title": "Won't Work", "description": "Nope"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_gone() {
    let app = tasks_app().await;
    let (_, created) = post(&app, "/tasks", json!({"title": "Delete Me"})).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/tasks/{}", id);

    let (status, body) = delete(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Task deleted successfully", "id": id}));
    assert_eq!(get(&app, &uri).await.0, StatusCode::NOT_FOUND);

    let (status, body) = delete(&app, "/tasks/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Task not found");
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let app = tasks_app().await;
    let (_, first) = post(&app, "/tasks", json!({"title": "one"})).await;
    delete(&app, &format!("/tasks/{}", first["id"])).await;
    let (_, second) = post(&app, "/tasks", json!({"title": "two"})).await;
    assert!(second["id"].as_i64().unwrap() > first["id"].as_i64().unwrap());
}

#[tokio::test]
async fn both_services_share_one_router() {
    let app = test_app(vec![crud_services::items_entity(), tasks_entity()], "Combined API").await;
    post(&app, "/tasks", json!({"title": "t"})).await;
    post(&app, "/items/", json!({"name": "i", "price": 2.5})).await;
    assert_eq!(get(&app, "/tasks").await.1.as_array().unwrap().len(), 1);
    assert_eq!(get(&app, "/items/").await.1.as_array().unwrap().len(), 1);
}
