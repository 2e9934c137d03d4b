//! Raw entity config types, deserializable from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage type of a column. Maps one-to-one onto SQLite type names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Boolean,
}

impl ColumnType {
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: ColumnType,
    #[serde(default)]
    pub nullable: bool,
    /// Literal applied when a create (or full update) omits the column.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub primary_key: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub allowed: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub exclusive_minimum: Option<f64>,
    #[serde(default)]
    pub exclusive_maximum: Option<f64>,
}

/// CRUD operations an entity can expose. `Replace` is the full-overwrite PUT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Replace,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Replace => "replace",
            Operation::Delete => "delete",
        }
    }
}

fn default_page_size() -> Option<u32> {
    Some(100)
}

fn default_operations() -> Vec<Operation> {
    vec![Operation::Create, Operation::Read, Operation::Update, Operation::Delete]
}

/// One record type: its table, route and columns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Display name used in messages ("Item not found").
    pub name: String,
    pub table: String,
    pub path_segment: String,
    pub columns: Vec<ColumnConfig>,
    #[serde(default = "default_operations")]
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub validation: HashMap<String, ValidationRule>,
    /// Text column searched by `?q=` when the request names no field.
    #[serde(default)]
    pub search_field: Option<String>,
    /// Rows returned by a list without `limit`. `null` returns every row.
    #[serde(default = "default_page_size")]
    pub default_limit: Option<u32>,
}
