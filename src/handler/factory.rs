use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{MetaError, Result};
use super::{HandlerKey, PropertyHandler};

type Constructor = Arc<dyn Fn() -> Result<Arc<dyn PropertyHandler>> + Send + Sync>;

/// Typed registry of handler constructors, filled in at startup.
#[derive(Clone, Default)]
pub struct HandlerFactory {
    constructors: HashMap<HandlerKey, Constructor>,
}

impl HandlerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `H` to be built with `H::default()`.
    pub fn register<H: PropertyHandler + Default>(&mut self) -> &mut Self {
        self.register_with::<H, _>(|| Ok(H::default()))
    }

    /// Registers a fallible constructor for `H`. A later registration for the
    /// same handler type replaces the earlier one.
    pub fn register_with<H, F>(&mut self, constructor: F) -> &mut Self
    where
        H: PropertyHandler,
        F: Fn() -> Result<H> + Send + Sync + 'static,
    {
        let constructor: Constructor = Arc::new(move || {
            let handler = constructor()?;
            Ok(Arc::new(handler) as Arc<dyn PropertyHandler>)
        });
        self.constructors.insert(HandlerKey::of::<H>(), constructor);
        self
    }

    pub fn contains(&self, key: &HandlerKey) -> bool {
        self.constructors.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Builds a fresh instance. Callers wanting the shared instance go through
    /// `PropertyHandlerCache`.
    pub fn construct(&self, key: &HandlerKey) -> Result<Arc<dyn PropertyHandler>> {
        let constructor = self.constructors.get(key).ok_or_else(|| {
            MetaError::ConstructionError(format!(
                "no constructor registered for handler '{}'",
                key.name()
            ))
        })?;

        constructor().map_err(|err| match err {
            MetaError::ConstructionError(_) => err,
            other => MetaError::ConstructionError(format!(
                "handler '{}' failed to construct: {}",
                key.name(),
                other
            )),
        })
    }
}
