use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::{CommandType, DataType, Result};
use crate::entity::NamingStyle;
use crate::mapping::MappingRegistry;

/// Startup settings for a `MetadataContext`.
///
/// ```
/// # use entitymeta::{MetadataConfig, NamingStyle};
/// let config = MetadataConfig::from_json(r#"{
///     "naming": "snake_plural",
///     "declared_types": { "Uuid": "uuid" }
/// }"#).unwrap();
/// assert_eq!(config.naming, NamingStyle::SnakePlural);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Convention for entity types without a declared or mapped table.
    pub naming: NamingStyle,
    /// Treat `Id` / `<Type>Id` properties as primary without a marker.
    pub primary_conventions: bool,
    /// Command type used when no rule exists for an (entity, command) pair.
    pub default_command_type: CommandType,
    /// Declared Rust type -> database type, applied to every entity.
    pub declared_types: HashMap<String, DataType>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            naming: NamingStyle::default(),
            primary_conventions: true,
            default_command_type: CommandType::default(),
            declared_types: HashMap::new(),
        }
    }
}

impl MetadataConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn naming(mut self, naming: NamingStyle) -> Self {
        self.naming = naming;
        self
    }

    pub fn primary_conventions(mut self, enabled: bool) -> Self {
        self.primary_conventions = enabled;
        self
    }

    pub fn default_command_type(mut self, command_type: CommandType) -> Self {
        self.default_command_type = command_type;
        self
    }

    pub fn declared_type(mut self, declared: &str, db_type: DataType) -> Self {
        self.declared_types.insert(declared.to_string(), db_type);
        self
    }

    /// Copies the declared-type rules into `registry`. Rules registered in code
    /// for the same declared type take precedence.
    pub(crate) fn apply_to(&self, registry: &mut MappingRegistry) -> Result<()> {
        for (declared, db_type) in &self.declared_types {
            if registry.declared_type(declared).is_none() {
                registry.map_declared_type(declared, *db_type)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config = MetadataConfig::from_json("{}").unwrap();
        assert_eq!(config, MetadataConfig::default());
        assert!(config.primary_conventions);
    }

    #[test]
    fn test_full_json() {
        let config = MetadataConfig::from_json(
            r#"{
                "naming": "snake_case",
                "primary_conventions": false,
                "default_command_type": "stored_procedure",
                "declared_types": { "String": "text", "i64": "integer" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.naming, NamingStyle::SnakeCase);
        assert!(!config.primary_conventions);
        assert_eq!(config.default_command_type, CommandType::StoredProcedure);
        assert_eq!(config.declared_types.get("i64"), Some(&DataType::Integer));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = MetadataConfig::from_json(r#"{"naming": "kebab"}"#).unwrap_err();
        assert!(matches!(err, crate::core::MetaError::ConfigError(_)));
    }

    #[test]
    fn test_apply_to_registry() {
        let config = MetadataConfig::default()
            .declared_type("bool", DataType::Boolean)
            .declared_type("String", DataType::Text);
        let mut registry = MappingRegistry::new();
        registry.map_declared_type("String", DataType::Json).unwrap();
        config.apply_to(&mut registry).unwrap();

        assert_eq!(registry.declared_type("bool"), Some(DataType::Boolean));
        assert_eq!(registry.declared_type("String"), Some(DataType::Json));
    }
}
