use std::sync::Arc;

use log::debug;

use crate::core::Result;
use crate::entity::{EntityKey, EntityType, NamingConvention, ReflectionProvider};
use crate::mapping::MappingRegistry;
use super::MemoCache;

/// Table name each entity type maps to.
///
/// Resolution order: registry `Table` rule, then the table declared on the
/// type, then the naming convention. Named entity types without a rule map to
/// their own name.
pub struct MappedNameCache {
    registry: Arc<MappingRegistry>,
    reflection: Arc<dyn ReflectionProvider>,
    naming: Arc<dyn NamingConvention>,
    entries: MemoCache<EntityKey, Arc<str>>,
}

impl MappedNameCache {
    pub fn new(
        registry: Arc<MappingRegistry>,
        reflection: Arc<dyn ReflectionProvider>,
        naming: Arc<dyn NamingConvention>,
    ) -> Self {
        Self {
            registry,
            reflection,
            naming,
            entries: MemoCache::new(),
        }
    }

    pub fn get(&self, entity: &EntityType) -> Result<Arc<str>> {
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
        debug!("Flushing {} mapped names", self.entries.len());
        self.entries.clear();
    }

    fn resolve(&self, entity: &EntityType) -> Result<Arc<str>> {
        let name = if let Some(table) = self.registry.table(entity) {
            table.to_string()
        } else if entity.is_named() {
            entity.name().to_string()
        } else {
            let definition = self.reflection.describe(entity)?;
            match definition.table_name() {
                Some(table) => table.to_string(),
                None => self.naming.table_name(entity),
            }
        };

        debug!("Entity '{}' maps to table '{}'", entity, name);
        Ok(Arc::from(name))
    }
}
