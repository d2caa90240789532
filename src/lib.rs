// ============================================================================
// entitymeta Library
// ============================================================================

//! Resolves, once per entity type, the metadata needed to turn an in-memory
//! entity model into database operations: mapped table name, primary and
//! identity properties, column list, live column definitions and property
//! handlers.
//!
//! Mapping rules are authored once at startup in a [`MappingRegistry`]. A
//! [`MetadataContext`] freezes the registry and wires thread-safe, lazily
//! populated caches over it.
//!
//! ```
//! use std::sync::Arc;
//! use entitymeta::prelude::*;
//!
//! #[derive(Entity)]
//! #[entity(table = "customers")]
//! struct Customer {
//!     #[column(primary, identity)]
//!     id: i64,
//!     #[column(name = "full_name")]
//!     name: String,
//! }
//!
//! let context = MetadataContext::builder().build().unwrap();
//!
//! assert_eq!(&*context.mapped_name::<Customer>().unwrap(), "customers");
//! let primary = context.primary::<Customer>().unwrap().unwrap();
//! assert_eq!(primary.name(), "id");
//! assert!(primary.is_identity());
//! ```

pub mod cache;
pub mod connection;
pub mod context;
pub mod core;
pub mod entity;
pub mod handler;
pub mod mapping;
pub mod prelude;
pub mod schema;

// Re-export main types for convenience
pub use cache::{
    ClassProperty, CommandTypeCache, DbFieldCache, FieldCache, IdentityCache, MappedNameCache,
    MemoCache, PrimaryCache, PrimaryIdentityCache, PropertyCache, PropertyHandlerCache,
};
pub use connection::{ConnectionConfig, ConnectionKey};
pub use context::{MetadataConfig, MetadataContext, MetadataContextBuilder};
pub use core::{Command, CommandType, DataType, DbField, Field, MetaError, Result, Value};
pub use entity::{
    DeclaredReflection, Entity, EntityDefinition, EntityKey, EntityType, NamingConvention,
    NamingStyle, PropertyDescriptor, ReflectionProvider,
};
pub use handler::{HandlerFactory, HandlerKey, PropertyHandler};
pub use mapping::{EntityMapper, MappingRegistry, MappingRule, PropertyKey};
pub use schema::{InMemorySchemaProvider, SchemaProvider, UnconfiguredSchemaProvider};

pub use entitymeta_derive::Entity;
