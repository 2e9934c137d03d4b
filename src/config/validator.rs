//! Config validation: identifiers, primary keys and cross-entity consistency.

use crate::config::{ColumnConfig, ColumnType, EntityConfig};
use crate::error::ConfigError;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Table and column names end up in SQL text, so only plain identifiers are accepted.
pub fn check_identifier(s: &str) -> Result<(), ConfigError> {
    let re = Regex::new(IDENTIFIER_PATTERN).map_err(|e| ConfigError::Validation(e.to_string()))?;
    if re.is_match(s) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier(s.to_string()))
    }
}

/// A default is written into the DDL, so it has to be a literal of the column's own type.
fn check_default(entity: &str, c: &ColumnConfig) -> Result<(), ConfigError> {
    let Some(default) = &c.default else {
        return Ok(());
    };
    let fits = match (c.type_, default) {
        (_, Value::Null) => c.nullable,
        (ColumnType::Boolean, Value::Bool(_)) | (ColumnType::Text, Value::String(_)) => true,
        (ColumnType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
        (ColumnType::Real, Value::Number(_)) => true,
        _ => false,
    };
    if fits {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "default {} of {}.{} does not fit a {}{} column",
            default,
            entity,
            c.name,
            if c.nullable { "" } else { "non-null " },
            c.type_.sql_name().to_lowercase()
        )))
    }
}

pub fn validate(entities: &[EntityConfig]) -> Result<(), ConfigError> {
    let mut path_segments = HashSet::new();
    let mut tables = HashSet::new();

    for e in entities {
        check_identifier(&e.table)?;
        check_identifier(&e.path_segment)?;
        if !tables.insert(e.table.as_str()) {
            return Err(ConfigError::Validation(format!("duplicate table: {}", e.table)));
        }
        if !path_segments.insert(e.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(e.path_segment.clone()));
        }

        let mut names = HashSet::new();
        for c in &e.columns {
            check_identifier(&c.name)?;
            if !names.insert(c.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate column {} in {}",
                    c.name, e.name
                )));
            }
            check_default(&e.name, c)?;
        }

        if e.default_limit == Some(0) {
            return Err(ConfigError::Validation(format!("default_limit of {} must be positive", e.name)));
        }

        let pks: Vec<_> = e.columns.iter().filter(|c| c.primary_key).collect();
        match pks.as_slice() {
            [pk] if pk.type_ == ColumnType::Integer => {}
            [_] => {
                return Err(ConfigError::InvalidPrimaryKey {
                    entity: e.name.clone(),
                    reason: "primary key must be an integer column".into(),
                })
            }
            _ => {
                return Err(ConfigError::InvalidPrimaryKey {
                    entity: e.name.clone(),
                    reason: format!("expected exactly one primary key, found {}", pks.len()),
                })
            }
        }

        for col in e.validation.keys() {
            let known = e.columns.iter().any(|c| c.name == *col && !c.primary_key);
            if !known {
                return Err(ConfigError::MissingReference {
                    kind: "column",
                    id: format!("{}.{}", e.name, col),
                });
            }
        }
        for rule in e.validation.values() {
            if let Some(p) = &rule.pattern {
                Regex::new(p).map_err(|err| ConfigError::Validation(format!("bad pattern {}: {}", p, err)))?;
            }
        }

        if let Some(field) = &e.search_field {
            let is_text = e
                .columns
                .iter()
                .any(|c| c.name == *field && c.type_ == ColumnType::Text);
            if !is_text {
                return Err(ConfigError::Validation(format!(
                    "search_field {} of {} must be a text column",
                    field, e.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{items_entity, tasks_entity};
    use serde_json::json;

    #[test]
    fn builtin_entities_are_valid() {
        validate(&[items_entity(), tasks_entity()]).unwrap();
    }

    #[test]
    fn rejects_sql_in_identifiers() {
        let mut e = items_entity();
        e.table = "item; DROP TABLE item".into();
        assert!(matches!(validate(&[e]), Err(ConfigError::InvalidIdentifier(_))));
    }

    #[test]
    fn rejects_duplicate_path_segment() {
        let mut other = tasks_entity();
        other.path_segment = "items".into();
        assert!(matches!(
            validate(&[items_entity(), other]),
            Err(ConfigError::DuplicatePathSegment(_))
        ));
    }

    #[test]
    fn requires_single_integer_primary_key() {
        let mut e = tasks_entity();
        e.columns.push(ColumnConfig {
            name: "code".into(),
            type_: ColumnType::Text,
            nullable: false,
            default: None,
            primary_key: true,
        });
        assert!(matches!(validate(&[e]), Err(ConfigError::InvalidPrimaryKey { .. })));

        let mut e = tasks_entity();
        e.columns.retain(|c| !c.primary_key);
        assert!(matches!(validate(&[e]), Err(ConfigError::InvalidPrimaryKey { .. })));
    }

    #[test]
    fn validation_rule_must_name_a_column() {
        let mut e = items_entity();
        e.validation.insert("colour".into(), Default::default());
        assert!(matches!(validate(&[e]), Err(ConfigError::MissingReference { .. })));
    }

    fn pinned(default: Value, nullable: bool) -> EntityConfig {
        let mut e = tasks_entity();
        e.columns.push(ColumnConfig {
            name: "pinned".into(),
            type_: ColumnType::Boolean,
            nullable,
            default: Some(default),
            primary_key: false,
        });
        e
    }

    #[test]
    fn default_must_match_column_type() {
        assert!(matches!(validate(&[pinned(json!("no"), false)]), Err(ConfigError::Validation(_))));
        assert!(matches!(validate(&[pinned(json!(0), false)]), Err(ConfigError::Validation(_))));
        validate(&[pinned(json!(false), false)]).unwrap();

        let mut e = items_entity();
        for c in e.columns.iter_mut().filter(|c| c.name == "price") {
            c.default = Some(json!(2));
        }
        validate(&[e]).unwrap();
    }

    #[test]
    fn null_default_needs_nullable_column() {
        assert!(matches!(validate(&[pinned(Value::Null, false)]), Err(ConfigError::Validation(_))));
        validate(&[pinned(Value::Null, true)]).unwrap();
    }

    #[test]
    fn default_limit_must_be_positive() {
        let mut e = items_entity();
        e.default_limit = Some(0);
        assert!(matches!(validate(&[e]), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn search_field_must_be_text() {
        let mut e = items_entity();
        e.search_field = Some("price".into());
        assert!(matches!(validate(&[e]), Err(ConfigError::Validation(_))));
    }
}
