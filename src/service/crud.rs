//! Generic CRUD execution against SQLite, one statement per call on the request's connection.

use crate::config::{ColumnType, ResolvedEntity};
use crate::error::AppError;
use crate::sql::{delete, insert, select_by_id, select_list, select_search, update, BindValue, QueryBuf, UpdateMode};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;
use std::collections::HashMap;

pub struct CrudService;

impl CrudService {
    /// Insert one row. The store assigns the id; omitted defaulted columns take their default.
    pub async fn create(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        body: &HashMap<String, Value>,
    ) -> Result<Value, AppError> {
        let q = insert(entity, body);
        let row = Self::fetch_optional(conn, entity, &q)
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::Protocol("INSERT returned no row".into())))?;
        tracing::debug!(entity = %entity.name, id = ?row.get(&entity.pk_column), "created");
        Ok(row)
    }

    /// Page of rows in insertion order. An empty table is an empty page; no `limit` means every row.
    pub async fn list(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        skip: u32,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, AppError> {
        let q = select_list(entity, limit, skip);
        Self::fetch_all(conn, entity, &q).await
    }

    /// Page of rows whose `field` contains `needle` (case-sensitive).
    pub async fn search(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        field: &str,
        needle: &str,
        skip: u32,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, AppError> {
        let searchable = entity
            .column(field)
            .map(|c| c.column_type == ColumnType::Text)
            .unwrap_or(false);
        if !searchable {
            return Err(AppError::Validation(format!("{} is not a searchable field", field)));
        }
        let q = select_search(entity, field, needle, limit, skip);
        Self::fetch_all(conn, entity, &q).await
    }

    /// Fetch one row by primary key. Absent is `None`, not an error.
    pub async fn read(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let mut q = select_by_id(entity);
        q.params.push(Value::from(id));
        Self::fetch_optional(conn, entity, &q).await
    }

    /// Update one row by id and return it as stored. `None` when the id does not exist.
    pub async fn update(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        id: i64,
        body: &HashMap<String, Value>,
        mode: UpdateMode,
    ) -> Result<Option<Value>, AppError> {
        let q = update(entity, &Value::from(id), body, mode);
        Self::fetch_optional(conn, entity, &q).await
    }

    /// Delete one row by id. Returns whether a row was removed.
    pub async fn delete(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        id: i64,
    ) -> Result<bool, AppError> {
        let mut q = delete(entity);
        q.params.push(Value::from(id));
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(BindValue::from_json(p));
        }
        let result = query.execute(&mut *conn).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_optional(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        q: &QueryBuf,
    ) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(BindValue::from_json(p));
        }
        let row = query.fetch_optional(&mut *conn).await?;
        row.map(|r| row_to_json(&r, entity)).transpose()
    }

    async fn fetch_all(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        q: &QueryBuf,
    ) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(BindValue::from_json(p));
        }
        let rows = query.fetch_all(&mut *conn).await?;
        rows.iter().map(|r| row_to_json(r, entity)).collect()
    }
}

/// SQLite has no boolean storage class, so cells are decoded by the declared column type.
fn row_to_json(row: &SqliteRow, entity: &ResolvedEntity) -> Result<Value, AppError> {
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in &entity.columns {
        let name = col.name.as_str();
        let v = match col.column_type {
            ColumnType::Integer => row.try_get::<Option<i64>, _>(name)?.map(Value::from),
            ColumnType::Real => row
                .try_get::<Option<f64>, _>(name)?
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            ColumnType::Text => row.try_get::<Option<String>, _>(name)?.map(Value::String),
            ColumnType::Boolean => row.try_get::<Option<bool>, _>(name)?.map(Value::Bool),
        };
        map.insert(name.to_string(), v.unwrap_or(Value::Null));
    }
    Ok(Value::Object(map))
}
