use std::sync::Arc;

use crate::core::{Command, CommandType, Result};
use crate::entity::{EntityKey, EntityType};
use crate::mapping::MappingRegistry;
use super::MemoCache;

/// Command type to use for each (entity type, command) pair.
pub struct CommandTypeCache {
    registry: Arc<MappingRegistry>,
    default: CommandType,
    entries: MemoCache<(EntityKey, Command), CommandType>,
}

impl CommandTypeCache {
    pub fn new(registry: Arc<MappingRegistry>, default: CommandType) -> Self {
        Self {
            registry,
            default,
            entries: MemoCache::new(),
        }
    }

    pub fn get(&self, entity: &EntityType, command: Command) -> Result<CommandType> {
        entity.validate()?;
        self.entries
            .get_or_try_insert_with((entity.key().clone(), command), || {
                Ok(self
                    .registry
                    .command_type(entity, command)
                    .unwrap_or(self.default))
            })
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_and_default_command_types() {
        let mut registry = MappingRegistry::new();
        registry
            .named_entity("orders")
            .command_type(Command::Query, CommandType::StoredProcedure)
            .finish()
            .unwrap();
        let cache = CommandTypeCache::new(Arc::new(registry), CommandType::Text);
        let orders = EntityType::named("orders");

        assert_eq!(cache.get(&orders, Command::Query).unwrap(), CommandType::StoredProcedure);
        assert_eq!(cache.get(&orders, Command::Insert).unwrap(), CommandType::Text);
        assert_eq!(cache.len(), 2);

        cache.flush();
        assert!(cache.is_empty());
    }
}
