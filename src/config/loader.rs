//! Load entity config from JSON files and resolve it into the runtime model.

use crate::config::resolved::{ColumnInfo, ResolvedEntity, ResolvedModel};
use crate::config::{validate, EntityConfig};
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

/// Build resolved model from entity configs. Validates first.
pub fn resolve(configs: &[EntityConfig]) -> Result<ResolvedModel, ConfigError> {
    validate(configs)?;

    let mut entities = Vec::new();
    let mut entity_by_path = HashMap::new();

    for e in configs {
        let pk = e
            .columns
            .iter()
            .find(|c| c.primary_key)
            .ok_or_else(|| ConfigError::InvalidPrimaryKey {
                entity: e.name.clone(),
                reason: "no primary key".into(),
            })?;

        let mut columns: Vec<ColumnInfo> = Vec::with_capacity(e.columns.len());
        columns.push(ColumnInfo {
            name: pk.name.clone(),
            column_type: pk.type_,
            nullable: false,
            default: None,
        });
        columns.extend(e.columns.iter().filter(|c| !c.primary_key).map(|c| ColumnInfo {
            name: c.name.clone(),
            column_type: c.type_,
            nullable: c.nullable,
            default: c.default.clone(),
        }));

        let search_field = e.search_field.clone().or_else(|| {
            e.columns
                .iter()
                .find(|c| !c.primary_key && c.type_ == crate::config::ColumnType::Text)
                .map(|c| c.name.clone())
        });

        let entity = ResolvedEntity {
            name: e.name.clone(),
            table_name: e.table.clone(),
            path_segment: e.path_segment.clone(),
            pk_column: pk.name.clone(),
            columns,
            operations: e.operations.clone(),
            validation: e.validation.clone(),
            search_field,
            default_limit: e.default_limit,
        };
        entity_by_path.insert(e.path_segment.clone(), entity.clone());
        entities.push(entity);
    }

    Ok(ResolvedModel {
        entities,
        entity_by_path,
    })
}

/// Read a JSON array of entity configs. Not validated here; `resolve` does that.
pub async fn load_entities_from_path(path: impl AsRef<Path>) -> Result<Vec<EntityConfig>, ConfigError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let entities: Vec<EntityConfig> =
        serde_json::from_str(&text).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), count = entities.len(), "loaded entity config");
    Ok(entities)
}
