use std::sync::Arc;

use crate::core::Result;
use crate::entity::{EntityKey, EntityType};
use crate::mapping::MappingRegistry;
use super::{ClassProperty, MemoCache, PropertyCache};

/// The primary property of each entity type.
///
/// Selection order: the property named by a registry `Primary` rule; otherwise,
/// among properties flagged primary, the first carrying an explicit marker;
/// otherwise the first flagged one in declaration order. No candidate is a
/// valid `None` answer.
pub struct PrimaryCache {
    registry: Arc<MappingRegistry>,
    properties: Arc<PropertyCache>,
    entries: MemoCache<EntityKey, Option<ClassProperty>>,
}

impl PrimaryCache {
    pub fn new(registry: Arc<MappingRegistry>, properties: Arc<PropertyCache>) -> Self {
        Self {
            registry,
            properties,
            entries: MemoCache::new(),
        }
    }

    pub fn get(&self, entity: &EntityType) -> Result<Option<ClassProperty>> {
        entity.validate()?;
        self.entries.get_or_try_insert_with(entity.key().clone(), || {
            let properties = self.properties.get(entity)?;
            let mapped = self
                .registry
                .primary(entity)
                .and_then(|name| properties.iter().find(|p| p.name() == name));
            Ok(mapped.or_else(|| select_primary(&properties)).cloned())
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

fn select_primary(properties: &[ClassProperty]) -> Option<&ClassProperty> {
    let mut candidates = properties.iter().filter(|p| p.is_primary());
    let first = candidates.clone().next()?;
    Some(candidates.find(|p| p.has_primary_marker()).unwrap_or(first))
}

/// The database-generated property of each entity type.
pub struct IdentityCache {
    registry: Arc<MappingRegistry>,
    properties: Arc<PropertyCache>,
    entries: MemoCache<EntityKey, Option<ClassProperty>>,
}

impl IdentityCache {
    pub fn new(registry: Arc<MappingRegistry>, properties: Arc<PropertyCache>) -> Self {
        Self {
            registry,
            properties,
            entries: MemoCache::new(),
        }
    }

    pub fn get(&self, entity: &EntityType) -> Result<Option<ClassProperty>> {
        entity.validate()?;
        self.entries.get_or_try_insert_with(entity.key().clone(), || {
            let properties = self.properties.get(entity)?;
            let mapped = self
                .registry
                .identity(entity)
                .and_then(|name| properties.iter().find(|p| p.name() == name));
            Ok(mapped
                .or_else(|| properties.iter().find(|p| p.is_identity()))
                .cloned())
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
