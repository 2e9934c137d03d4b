//! The two record types served out of the box.

use crate::config::{ColumnConfig, ColumnType, EntityConfig, Operation, ValidationRule};
use serde_json::Value;
use std::collections::HashMap;

fn column(name: &str, type_: ColumnType) -> ColumnConfig {
    ColumnConfig {
        name: name.into(),
        type_,
        nullable: false,
        default: None,
        primary_key: false,
    }
}

fn id_column() -> ColumnConfig {
    ColumnConfig {
        primary_key: true,
        ..column("id", ColumnType::Integer)
    }
}

fn optional_text(name: &str) -> ColumnConfig {
    ColumnConfig {
        nullable: true,
        ..column(name, ColumnType::Text)
    }
}

fn required_text() -> ValidationRule {
    ValidationRule {
        required: Some(true),
        min_length: Some(1),
        ..Default::default()
    }
}

/// `Item`: name, optional description, strictly positive price, availability flag.
pub fn items_entity() -> EntityConfig {
    let mut validation = HashMap::new();
    validation.insert("name".to_string(), required_text());
    validation.insert(
        "price".to_string(),
        ValidationRule {
            required: Some(true),
            exclusive_minimum: Some(0.0),
            ..Default::default()
        },
    );
    EntityConfig {
        name: "Item".into(),
        table: "item".into(),
        path_segment: "items".into(),
        columns: vec![
            id_column(),
            column("name", ColumnType::Text),
            optional_text("description"),
            column("price", ColumnType::Real),
            ColumnConfig {
                default: Some(Value::Bool(true)),
                ..column("is_available", ColumnType::Boolean)
            },
        ],
        operations: vec![Operation::Create, Operation::Read, Operation::Update, Operation::Delete],
        validation,
        search_field: Some("name".into()),
        default_limit: Some(100),
    }
}

/// `Task`: title and optional description. Also supports full replacement via PUT.
pub fn tasks_entity() -> EntityConfig {
    let mut validation = HashMap::new();
    validation.insert("title".to_string(), required_text());
    EntityConfig {
        name: "Task".into(),
        table: "task".into(),
        path_segment: "tasks".into(),
        columns: vec![id_column(), column("title", ColumnType::Text), optional_text("description")],
        operations: vec![
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Replace,
            Operation::Delete,
        ],
        validation,
        search_field: Some("title".into()),
        default_limit: None,
    }
}
