//! Apply the entity model to the database: one table per entity.

use crate::config::{ColumnInfo, ColumnType, ResolvedEntity, ResolvedModel};
use crate::error::AppError;
use crate::sql::quoted;
use serde_json::Value;
use sqlx::SqliteConnection;

/// CREATE TABLE IF NOT EXISTS for every entity. Idempotent; existing tables are left untouched.
pub async fn apply_migrations(conn: &mut SqliteConnection, model: &ResolvedModel) -> Result<(), AppError> {
    for entity in &model.entities {
        let ddl = create_table_sql(entity);
        tracing::debug!(sql = %ddl, "migration");
        sqlx::query(&ddl).execute(&mut *conn).await?;
        tracing::info!(table = %entity.table_name, "table ensured");
    }
    Ok(())
}

/// The AUTOINCREMENT primary key keeps ids of deleted rows from being handed out again.
pub fn create_table_sql(entity: &ResolvedEntity) -> String {
    let mut col_defs = vec![format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", quoted(&entity.pk_column))];
    col_defs.extend(entity.mutable_columns().map(column_def));
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(&entity.table_name),
        col_defs.join(", ")
    )
}

fn column_def(c: &ColumnInfo) -> String {
    let mut def = format!("{} {}", quoted(&c.name), c.column_type.sql_name());
    if !c.nullable {
        def.push_str(" NOT NULL");
    }
    if let Some(lit) = c.default.as_ref().and_then(|d| default_literal(c.column_type, d)) {
        def.push_str(" DEFAULT ");
        def.push_str(&lit);
    }
    def
}

fn default_literal(ty: ColumnType, v: &Value) -> Option<String> {
    match (ty, v) {
        (_, Value::Null) => Some("NULL".into()),
        (ColumnType::Boolean, Value::Bool(b)) => Some(if *b { "1".into() } else { "0".into() }),
        (ColumnType::Integer | ColumnType::Real, Value::Number(n)) => Some(n.to_string()),
        (ColumnType::Text, Value::String(s)) => Some(format!("'{}'", s.replace('\'', "''"))),
        _ => None,
    }
}
