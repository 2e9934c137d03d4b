//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from a resolved entity.

use crate::config::{ColumnInfo, ColumnType, ResolvedEntity};
use serde_json::Value;
use std::collections::HashMap;

/// How an UPDATE treats columns the body does not mention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Leave them as they are.
    Partial,
    /// Reset them to the column default, or NULL.
    Full,
}

/// Quote identifier for SQLite (safe: only from validated config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> &'static str {
        self.params.push(v);
        "?"
    }
}

/// Integers sent for REAL columns are bound as floats so reads decode them uniformly.
fn column_value(c: &ColumnInfo, v: Value) -> Value {
    if c.column_type == ColumnType::Real {
        if let Value::Number(n) = &v {
            if let (false, Some(f)) = (n.is_f64(), n.as_f64()) {
                return Value::from(f);
            }
        }
    }
    v
}

fn select_column_list(entity: &ResolvedEntity) -> String {
    entity
        .columns
        .iter()
        .map(|c| quoted(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT by primary key. Caller adds id as sole param.
pub fn select_by_id(entity: &ResolvedEntity) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        select_column_list(entity),
        quoted(&entity.table_name),
        quoted(&entity.pk_column)
    );
    q
}

/// SQLite wants a LIMIT before OFFSET; -1 means no limit.
fn page_clause(limit: Option<u32>, offset: u32) -> String {
    match limit {
        Some(n) => format!("LIMIT {} OFFSET {}", n, offset),
        None => format!("LIMIT -1 OFFSET {}", offset),
    }
}

/// SELECT page ordered by primary key, i.e. insertion order.
pub fn select_list(entity: &ResolvedEntity, limit: Option<u32>, offset: u32) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {} {}",
        select_column_list(entity),
        quoted(&entity.table_name),
        quoted(&entity.pk_column),
        page_clause(limit, offset)
    );
    q
}

/// SELECT page of rows whose `field` contains `needle`. `instr` keeps the match case-sensitive
/// and free of LIKE wildcards.
pub fn select_search(
    entity: &ResolvedEntity,
    field: &str,
    needle: &str,
    limit: Option<u32>,
    offset: u32,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(Value::String(needle.to_string()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE instr({}, {}) > 0 ORDER BY {} {}",
        select_column_list(entity),
        quoted(&entity.table_name),
        quoted(field),
        ph,
        quoted(&entity.pk_column),
        page_clause(limit, offset)
    );
    q
}

/// INSERT: one placeholder per supplied column; the primary key is always left to the store.
/// Columns with a default are omitted when the body does not provide a value.
pub fn insert(entity: &ResolvedEntity, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in entity.mutable_columns() {
        let val = body.get(&c.name).cloned();
        if val.is_none() && c.default.is_some() {
            continue;
        }
        placeholders.push(q.push_param(column_value(c, val.unwrap_or(Value::Null))));
        cols.push(quoted(&c.name));
    }
    let table = quoted(&entity.table_name);
    let returning = select_column_list(entity);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE by id. Partial sets only columns present in body; Full sets every mutable column.
/// With nothing to set, degrades to a SELECT by id so the caller still gets the row back.
pub fn update(entity: &ResolvedEntity, id: &Value, body: &HashMap<String, Value>, mode: UpdateMode) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in entity.mutable_columns() {
        let val = match (body.get(&c.name), mode) {
            (Some(v), _) => v.clone(),
            (None, UpdateMode::Partial) => continue,
            (None, UpdateMode::Full) => c.default.clone().unwrap_or(Value::Null),
        };
        let ph = q.push_param(column_value(c, val));
        sets.push(format!("{} = {}", quoted(&c.name), ph));
    }
    if sets.is_empty() {
        let mut q = select_by_id(entity);
        q.params.push(id.clone());
        return q;
    }
    q.params.push(id.clone());
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ? RETURNING {}",
        quoted(&entity.table_name),
        sets.join(", "),
        quoted(&entity.pk_column),
        select_column_list(entity)
    );
    q
}

/// DELETE by id. Caller adds id as sole param.
pub fn delete(entity: &ResolvedEntity) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        quoted(&entity.table_name),
        quoted(&entity.pk_column)
    );
    q
}
