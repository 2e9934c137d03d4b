//! Resolved entity model: config validated and flattened for runtime use.

use crate::config::{ColumnType, Operation, ValidationRule};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub default: Option<Value>,
}

#[derive(Clone, Debug)]
pub struct ResolvedEntity {
    pub name: String,
    pub table_name: String,
    pub path_segment: String,
    pub pk_column: String,
    /// All columns, primary key first.
    pub columns: Vec<ColumnInfo>,
    pub operations: Vec<Operation>,
    pub validation: HashMap<String, ValidationRule>,
    pub search_field: Option<String>,
    pub default_limit: Option<u32>,
}

impl ResolvedEntity {
    pub fn allows(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Every column except the primary key.
    pub fn mutable_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(move |c| c.name != self.pk_column)
    }

    pub fn not_found(&self) -> String {
        format!("{} not found", self.name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedModel {
    pub entities: Vec<ResolvedEntity>,
    pub entity_by_path: HashMap<String, ResolvedEntity>,
}

impl ResolvedModel {
    pub fn entity_by_path(&self, path: &str) -> Option<&ResolvedEntity> {
        self.entity_by_path.get(path)
    }
}
