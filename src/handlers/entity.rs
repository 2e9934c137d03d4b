//! Entity CRUD handlers: create, list/search, read, update, replace, delete.

use crate::config::{Operation, ResolvedEntity};
use crate::error::AppError;
use crate::extractors::DbSession;
use crate::response::Deleted;
use crate::service::{CrudService, RequestValidator};
use crate::sql::UpdateMode;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

fn entity_for<'a>(state: &'a AppState, path_segment: &str, op: Operation) -> Result<&'a ResolvedEntity, AppError> {
    let entity = state
        .model
        .entity_by_path(path_segment)
        .ok_or_else(|| AppError::NotFound(format!("unknown resource: {}", path_segment)))?;
    if !entity.allows(op) {
        return Err(AppError::BadRequest(format!("{} not allowed", op.as_str())));
    }
    Ok(entity)
}

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str.parse().map_err(|_| AppError::BadRequest("invalid id".into()))
}

/// Malformed JSON and a wrong content type surface as our error envelope, not axum's plain text.
fn body_to_map(body: Result<Json<Value>, JsonRejection>) -> Result<HashMap<String, Value>, AppError> {
    let Json(value) = body.map_err(|rej| match rej.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rej.body_text()),
        _ => AppError::BadRequest(rej.body_text()),
    })?;
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// `skip` defaults to 0 and `limit` to the entity's page size; any positive `limit` is accepted.
fn page(params: &HashMap<String, String>, default_limit: Option<u32>) -> Result<(u32, Option<u32>), AppError> {
    let skip = match params.get("skip") {
        Some(s) => s
            .parse::<u32>()
            .map_err(|_| AppError::Validation("skip must be a non-negative integer".into()))?,
        None => 0,
    };
    let limit = match params.get("limit") {
        Some(s) => s
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .map(Some)
            .ok_or_else(|| AppError::Validation("limit must be a positive integer".into()))?,
        None => default_limit,
    };
    Ok((skip, limit))
}

/// GET /:path_segment: page of records; with `q` (and optional `field`) a substring search.
pub async fn list(
    State(state): State<AppState>,
    DbSession(mut session): DbSession,
    Path(path_segment): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment, Operation::Read)?;
    let (skip, limit) = page(&params, entity.default_limit)?;
    let rows = match params.get("q") {
        Some(needle) => {
            let field = params
                .get("field")
                .or(entity.search_field.as_ref())
                .ok_or_else(|| AppError::BadRequest("field is required for search".into()))?;
            CrudService::search(&mut session, entity, field, needle, skip, limit).await?
        }
        None => CrudService::list(&mut session, entity, skip, limit).await?,
    };
    Ok((StatusCode::OK, Json(rows)))
}

pub async fn create(
    State(state): State<AppState>,
    DbSession(mut session): DbSession,
    Path(path_segment): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment, Operation::Create)?;
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, entity)?;
    let row = CrudService::create(&mut session, entity, &body).await?;
    Ok((StatusCode::OK, Json(row)))
}

pub async fn read(
    State(state): State<AppState>,
    DbSession(mut session): DbSession,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment, Operation::Read)?;
    let id = parse_id(&id_str)?;
    let row = CrudService::read(&mut session, entity, id)
        .await?
        .ok_or_else(|| AppError::NotFound(entity.not_found()))?;
    Ok((StatusCode::OK, Json(row)))
}

/// PATCH: only the supplied fields change.
pub async fn update(
    State(state): State<AppState>,
    DbSession(mut session): DbSession,
    Path((path_segment, id_str)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment, Operation::Update)?;
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, entity)?;
    let row = CrudService::update(&mut session, entity, id, &body, UpdateMode::Partial)
        .await?
        .ok_or_else(|| AppError::NotFound(entity.not_found()))?;
    Ok((StatusCode::OK, Json(row)))
}

/// PUT: every mutable field is overwritten; required ones must be supplied.
pub async fn replace(
    State(state): State<AppState>,
    DbSession(mut session): DbSession,
    Path((path_segment, id_str)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment, Operation::Replace)?;
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, entity)?;
    let row = CrudService::update(&mut session, entity, id, &body, UpdateMode::Full)
        .await?
        .ok_or_else(|| AppError::NotFound(entity.not_found()))?;
    Ok((StatusCode::OK, Json(row)))
}

pub async fn delete(
    State(state): State<AppState>,
    DbSession(mut session): DbSession,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment, Operation::Delete)?;
    let id = parse_id(&id_str)?;
    if !CrudService::delete(&mut session, entity, id).await? {
        return Err(AppError::NotFound(entity.not_found()));
    }
    Ok((StatusCode::OK, Json(Deleted::new(&entity.name, id))))
}
