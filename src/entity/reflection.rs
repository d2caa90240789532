use crate::core::Result;
use super::{EntityDefinition, EntityType};

/// Source of declared metadata for entity types.
///
/// The caches call this only on a miss, so implementations may be arbitrarily
/// expensive.
pub trait ReflectionProvider: Send + Sync {
    fn describe(&self, entity: &EntityType) -> Result<EntityDefinition>;
}

/// Reads the definition each type declares through [`super::Entity`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredReflection;

impl ReflectionProvider for DeclaredReflection {
    fn describe(&self, entity: &EntityType) -> Result<EntityDefinition> {
        entity.validate()?;
        Ok(entity.definition())
    }
}
