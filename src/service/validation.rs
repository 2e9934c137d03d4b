//! Request validation from column types and config rules. Runs before the store is touched.

use crate::config::{ColumnInfo, ColumnType, ResolvedEntity, ValidationRule};
use crate::error::AppError;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a complete record (create, full update). Every required column must be present:
    /// those marked `required`, and non-nullable columns without a default.
    pub fn validate(body: &HashMap<String, Value>, entity: &ResolvedEntity) -> Result<(), AppError> {
        for col in entity.mutable_columns() {
            let rule = entity.validation.get(&col.name);
            let required = rule.and_then(|r| r.required) == Some(true) || (!col.nullable && col.default.is_none());
            let val = body.get(&col.name);
            if required && (val.is_none() || val == Some(&Value::Null)) {
                return Err(AppError::Validation(format!("{} is required", col.name)));
            }
            if let Some(v) = val {
                validate_field(col, v, rule)?;
            }
        }
        Ok(())
    }

    /// Validate only the fields present in body (for PATCH). Required is not enforced for missing fields.
    pub fn validate_partial(body: &HashMap<String, Value>, entity: &ResolvedEntity) -> Result<(), AppError> {
        for (name, v) in body {
            if *name == entity.pk_column {
                continue;
            }
            if let Some(col) = entity.column(name) {
                validate_field(col, v, entity.validation.get(name))?;
            }
        }
        Ok(())
    }
}

fn validate_field(col: &ColumnInfo, v: &Value, rule: Option<&ValidationRule>) -> Result<(), AppError> {
    let name = col.name.as_str();
    if v.is_null() {
        if col.nullable {
            return Ok(());
        }
        return Err(AppError::Validation(format!("{} cannot be null", name)));
    }
    check_type(name, col.column_type, v)?;
    match rule {
        Some(rule) => check_rule(name, v, rule),
        None => Ok(()),
    }
}

fn check_type(col: &str, ty: ColumnType, v: &Value) -> Result<(), AppError> {
    let ok = match ty {
        ColumnType::Integer => v.is_i64() || v.is_u64(),
        ColumnType::Real => v.is_number(),
        ColumnType::Text => v.is_string(),
        ColumnType::Boolean => v.is_boolean(),
    };
    if ok {
        return Ok(());
    }
    let expected = match ty {
        ColumnType::Integer => "an integer",
        ColumnType::Real => "a number",
        ColumnType::Text => "a string",
        ColumnType::Boolean => "a boolean",
    };
    Err(AppError::Validation(format!("{} must be {}", col, expected)))
}

fn check_rule(col: &str, v: &Value, rule: &ValidationRule) -> Result<(), AppError> {
    if let Some(max) = rule.max_length {
        if let Some(s) = v.as_str() {
            if s.chars().count() > max as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    col, max
                )));
            }
        }
    }
    if let Some(min) = rule.min_length {
        if let Some(s) = v.as_str() {
            if s.chars().count() < min as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    col, min
                )));
            }
        }
    }
    if let Some(ref pattern) = rule.pattern {
        let re = Regex::new(pattern).map_err(|_| AppError::Validation(format!("invalid pattern for {}", col)))?;
        if let Some(s) = v.as_str() {
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", col)));
            }
        }
    }
    if let Some(ref allowed) = rule.allowed {
        if !allowed.iter().any(|a| value_eq(v, a)) {
            return Err(AppError::Validation(format!(
                "{} must be one of: {:?}",
                col,
                allowed.iter().take(5).collect::<Vec<_>>()
            )));
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", col, min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", col, max)));
            }
        }
        if let Some(min) = rule.exclusive_minimum {
            if n <= min {
                return Err(AppError::Validation(format!("{} must be greater than {}", col, min)));
            }
        }
        if let Some(max) = rule.exclusive_maximum {
            if n >= max {
                return Err(AppError::Validation(format!("{} must be less than {}", col, max)));
            }
        }
    }
    Ok(())
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}
