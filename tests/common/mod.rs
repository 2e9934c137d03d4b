//! Shared test harness: the router over an in-memory database injected through `SharedSession`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use crud_services::{app, apply_migrations, resolve, AppState, EntityConfig, ServiceInfo, SharedSession};
use serde_json::Value;
use sqlx::{Connection, SqliteConnection};
use tower::ServiceExt;

pub async fn memory_conn(entities: &[EntityConfig]) -> SqliteConnection {
    let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
    let model = resolve(entities).unwrap();
    apply_migrations(&mut conn, &model).await.unwrap();
    conn
}

pub async fn test_app(entities: Vec<EntityConfig>, title: &str) -> Router {
    test_app_with_limit(entities, title, 1024 * 1024).await
}

pub async fn test_app_with_limit(entities: Vec<EntityConfig>, title: &str, body_limit: usize) -> Router {
    let conn = memory_conn(&entities).await;
    let model = resolve(&entities).unwrap();
    let state = AppState::new(
        SharedSession::new(conn),
        model,
        ServiceInfo {
            title: title.into(),
            description: format!("{} under test", title),
        },
    );
    app(state, body_limit)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    read_response(app, req).await
}

/// POST a raw body, optionally without a content type.
pub async fn send_raw(app: &Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    read_response(app, req).await
}

async fn read_response(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}
