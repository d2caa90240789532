//! Entity type descriptors and the declared metadata they carry.
//!
//! An [`EntityType`] is the cache key root for every lookup in this crate. Typed
//! entities are identified by their `TypeId` and describe themselves through
//! [`Entity::definition`]; named entities are plain table names with no declared
//! properties.

pub mod definition;
pub mod naming;
pub mod reflection;

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::core::{MetaError, Result};

pub use definition::{EntityDefinition, PropertyDescriptor};
pub use naming::{NamingConvention, NamingStyle};
pub use reflection::{DeclaredReflection, ReflectionProvider};

/// An in-memory model type that maps to a database row shape.
///
/// Usually implemented with `#[derive(Entity)]`.
pub trait Entity: 'static {
    /// Declared table and property metadata. Must be pure: the caches call it at
    /// most once per type between flushes.
    fn definition() -> EntityDefinition;

    fn entity_type() -> EntityType
    where
        Self: Sized,
    {
        EntityType::of::<Self>()
    }
}

/// Identity of an entity type, used as the root of every cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Type(TypeId),
    Named(Arc<str>),
}

/// Process-unique, immutable descriptor of an entity type.
#[derive(Clone)]
pub struct EntityType {
    key: EntityKey,
    name: Arc<str>,
    definition: Option<fn() -> EntityDefinition>,
}

impl EntityType {
    pub fn of<T: Entity>() -> Self {
        Self {
            key: EntityKey::Type(TypeId::of::<T>()),
            name: Arc::from(short_type_name(std::any::type_name::<T>())),
            definition: Some(T::definition),
        }
    }

    /// An untyped entity addressed only by its table name.
    pub fn named(name: impl AsRef<str>) -> Self {
        let name: Arc<str> = Arc::from(name.as_ref().trim());
        Self {
            key: EntityKey::Named(name.clone()),
            name,
            definition: None,
        }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_named(&self) -> bool {
        matches!(self.key, EntityKey::Named(_))
    }

    /// Declared metadata of the type; empty for named entities.
    pub fn definition(&self) -> EntityDefinition {
        self.definition.map(|define| define()).unwrap_or_default()
    }

    /// Fails with an argument error for the blank sentinel a named type can carry.
    pub fn validate(&self) -> Result<&Self> {
        if self.name.is_empty() {
            return Err(MetaError::argument("entity type name cannot be empty"));
        }
        Ok(self)
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.name)
            .field("named", &self.is_named())
            .finish()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Strips module paths but keeps generic arguments:
/// `my_app::Wrapper<my_app::Inner>` becomes `Wrapper<Inner>`.
fn short_type_name(full: &str) -> String {
    let last_segment = |path: &str| path.rsplit("::").next().unwrap_or(path).to_string();

    let mut short = String::with_capacity(full.len());
    let mut rest = full;
    while let Some(pos) = rest.find(|ch: char| "<>,()[]; &".contains(ch)) {
        short.push_str(&last_segment(&rest[..pos]));
        short.push_str(&rest[pos..pos + 1]);
        rest = &rest[pos + 1..];
    }
    short.push_str(&last_segment(rest));
    short
}
