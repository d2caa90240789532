use std::sync::Arc;

use log::debug;

use crate::core::{MetaError, Result, error::require_name};
use crate::entity::EntityType;
use crate::handler::{HandlerFactory, HandlerKey, PropertyHandler};
use super::{MemoCache, PropertyCache};

/// One shared instance per handler type for the whole process.
pub struct PropertyHandlerCache {
    factory: Arc<HandlerFactory>,
    properties: Arc<PropertyCache>,
    entries: MemoCache<HandlerKey, Arc<dyn PropertyHandler>>,
}

impl PropertyHandlerCache {
    pub fn new(factory: Arc<HandlerFactory>, properties: Arc<PropertyCache>) -> Self {
        Self {
            factory,
            properties,
            entries: MemoCache::new(),
        }
    }

    /// Shared instance of the handler type `key`, constructing it on first use.
    /// Construction failures surface as `ConstructionError` and are not stored.
    pub fn get(&self, key: &HandlerKey) -> Result<Arc<dyn PropertyHandler>> {
        self.entries.get_or_try_insert_with(*key, || {
            debug!("Constructing property handler '{}'", key.name());
            self.factory.construct(key)
        })
    }

    pub fn get_typed<H: PropertyHandler>(&self) -> Result<Arc<dyn PropertyHandler>> {
        self.get(&HandlerKey::of::<H>())
    }

    /// Handler attached to `property` of `entity`, if it has one.
    pub fn get_for(
        &self,
        entity: &EntityType,
        property: &str,
    ) -> Result<Option<Arc<dyn PropertyHandler>>> {
        let property = require_name(property, "property name")?;
        let properties = self.properties.get(entity)?;
        let resolved = properties
            .iter()
            .find(|p| p.name() == property)
            .ok_or_else(|| MetaError::MissingProperty(property.to_string(), entity.to_string()))?;

        match resolved.handler() {
            Some(key) => self.get(&key).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains(&self, key: &HandlerKey) -> bool {
        self.entries.contains(key)
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
