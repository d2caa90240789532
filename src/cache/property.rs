use std::sync::Arc;

use log::debug;

use crate::core::{DataType, Field, Result};
use crate::entity::{EntityKey, EntityType, PropertyDescriptor, ReflectionProvider};
use crate::handler::HandlerKey;
use crate::mapping::MappingRegistry;
use super::MemoCache;

/// A declared property with registry overrides and conventions applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProperty {
    descriptor: PropertyDescriptor,
    mapped_name: String,
    db_type: Option<DataType>,
    is_primary: bool,
    has_primary_marker: bool,
    is_identity: bool,
    handler: Option<HandlerKey>,
}

impl ClassProperty {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn declared_type(&self) -> &str {
        &self.descriptor.declared_type
    }

    /// Column the property maps to.
    pub fn mapped_name(&self) -> &str {
        &self.mapped_name
    }

    pub fn db_type(&self) -> Option<DataType> {
        self.db_type
    }

    /// Flagged primary by attribute, registry rule or naming convention.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Carries an explicit primary designation (attribute or registry rule).
    pub fn has_primary_marker(&self) -> bool {
        self.has_primary_marker
    }

    pub fn is_identity(&self) -> bool {
        self.is_identity
    }

    pub fn handler(&self) -> Option<HandlerKey> {
        self.handler
    }

    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    pub fn as_field(&self) -> Field {
        Field {
            name: self.mapped_name.clone(),
            db_type: self.db_type,
        }
    }
}

/// Declared properties of each entity type, resolved once per type.
pub struct PropertyCache {
    registry: Arc<MappingRegistry>,
    reflection: Arc<dyn ReflectionProvider>,
    primary_conventions: bool,
    entries: MemoCache<EntityKey, Arc<[ClassProperty]>>,
}

impl PropertyCache {
    pub fn new(registry: Arc<MappingRegistry>, reflection: Arc<dyn ReflectionProvider>) -> Self {
        Self {
            registry,
            reflection,
            primary_conventions: true,
            entries: MemoCache::new(),
        }
    }

    /// Enables or disables treating `Id` / `<Type>Id` as primary without a marker.
    pub fn with_primary_conventions(mut self, enabled: bool) -> Self {
        self.primary_conventions = enabled;
        self
    }

    pub fn get(&self, entity: &EntityType) -> Result<Arc<[ClassProperty]>> {
        entity.validate()?;
        self.entries
            .get_or_try_insert_with(entity.key().clone(), || self.resolve(entity))
    }

    pub fn contains(&self, entity: &EntityType) -> bool {
        self.entries.contains(entity.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn flush(&self) {
        self.entries.clear();
    }

    fn resolve(&self, entity: &EntityType) -> Result<Arc<[ClassProperty]>> {
        let definition = self.reflection.describe(entity)?;
        let primary_rule = self.registry.primary(entity);
        let identity_rule = self.registry.identity(entity);

        let properties = definition
            .into_properties()
            .into_iter()
            .map(|descriptor| {
                let name = descriptor.name.as_str();
                let registry = &self.registry;

                let mapped_name = registry
                    .column(entity, name)
                    .map(str::to_string)
                    .or_else(|| descriptor.column.clone())
                    .unwrap_or_else(|| name.to_string());
                let db_type = registry
                    .db_type(entity, name)
                    .or(descriptor.db_type)
                    .or_else(|| registry.declared_type(&descriptor.declared_type));
                let handler = registry
                    .handler(entity, name)
                    .or(descriptor.handler)
                    .or_else(|| registry.declared_handler(&descriptor.declared_type));

                let has_primary_marker = descriptor.primary || primary_rule == Some(name);
                let is_primary = has_primary_marker
                    || (self.primary_conventions && is_primary_by_convention(entity.name(), name));
                let is_identity = descriptor.identity || identity_rule == Some(name);

                ClassProperty {
                    mapped_name,
                    db_type,
                    is_primary,
                    has_primary_marker,
                    is_identity,
                    handler,
                    descriptor,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Resolved {} properties for entity '{}'",
            properties.len(),
            entity
        );
        Ok(Arc::from(properties))
    }
}

/// `Id`, `<Type>Id` and `<type>_id`, compared case-insensitively.
fn is_primary_by_convention(type_name: &str, property: &str) -> bool {
    let property = property.to_ascii_lowercase();
    let type_name = type_name.to_ascii_lowercase();
    property == "id"
        || property == format!("{}id", type_name)
        || property == format!("{}_id", type_name)
}

/// Column projections of each entity type's properties.
pub struct FieldCache {
    properties: Arc<PropertyCache>,
    entries: MemoCache<EntityKey, Arc<[Field]>>,
}

impl FieldCache {
    pub fn new(properties: Arc<PropertyCache>) -> Self {
        Self {
            properties,
            entries: MemoCache::new(),
        }
    }

    pub fn get(&self, entity: &EntityType) -> Result<Arc<[Field]>> {
        entity.validate()?;
        self.entries.get_or_try_insert_with(entity.key().clone(), || {
            let properties = self.properties.get(entity)?;
            Ok(properties.iter().map(ClassProperty::as_field).collect())
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Also flushes the property cache this one is derived from.
    pub fn flush(&self) {
        self.entries.clear();
        self.properties.flush();
    }
}
