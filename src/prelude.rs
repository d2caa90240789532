//! Common imports for applications configuring and querying entity metadata.

pub use crate::{
    ClassProperty, Command, CommandType, ConnectionConfig, ConnectionKey, DataType, DbField,
    Entity, EntityDefinition, EntityType, HandlerFactory, MappingRegistry, MappingRule,
    MetaError, MetadataConfig, MetadataContext, PropertyDescriptor, PropertyHandler, Result,
    Value,
};
