use crate::core::{Command, CommandType, DataType, MetaError, Result};
use crate::entity::{Entity, EntityType};
use crate::handler::PropertyHandler;
use super::{MappingRegistry, MappingRule, PropertyKey};

/// Fluent front end over [`MappingRegistry::register`] for one entity type.
///
/// ```
/// use entitymeta::{DataType, Entity, EntityDefinition, MappingRegistry};
///
/// struct Customer;
///
/// impl Entity for Customer {
///     fn definition() -> EntityDefinition {
///         EntityDefinition::new()
///     }
/// }
///
/// let mut registry = MappingRegistry::new();
/// registry
///     .entity::<Customer>()
///     .table("customers")
///     .primary("Code")
///     .column("Name", "full_name")
///     .db_type("Name", DataType::Text)
///     .finish()
///     .unwrap();
///
/// assert_eq!(registry.table(&Customer::entity_type()), Some("customers"));
/// ```
pub struct EntityMapper<'a> {
    registry: &'a mut MappingRegistry,
    entity: EntityType,
    errors: Vec<MetaError>,
}

impl MappingRegistry {
    pub fn entity<T: Entity>(&mut self) -> EntityMapper<'_> {
        EntityMapper::new(self, T::entity_type())
    }

    pub fn named_entity(&mut self, name: impl AsRef<str>) -> EntityMapper<'_> {
        EntityMapper::new(self, EntityType::named(name))
    }
}

impl<'a> EntityMapper<'a> {
    fn new(registry: &'a mut MappingRegistry, entity: EntityType) -> Self {
        Self {
            registry,
            entity,
            errors: Vec::new(),
        }
    }

    pub fn table(self, name: impl Into<String>) -> Self {
        self.apply(MappingRule::table(name))
    }

    pub fn primary(self, property: impl Into<PropertyKey>) -> Self {
        self.apply(MappingRule::primary(property))
    }

    pub fn identity(self, property: impl Into<PropertyKey>) -> Self {
        self.apply(MappingRule::identity(property))
    }

    pub fn column(self, property: impl Into<PropertyKey>, column: impl Into<String>) -> Self {
        self.apply(MappingRule::column(property, column))
    }

    pub fn db_type(self, property: impl Into<PropertyKey>, db_type: DataType) -> Self {
        self.apply(MappingRule::db_type(property, db_type))
    }

    pub fn handler<H: PropertyHandler>(self, property: impl Into<PropertyKey>) -> Self {
        self.apply(MappingRule::handler::<H>(property))
    }

    pub fn command_type(self, command: Command, command_type: CommandType) -> Self {
        self.apply(MappingRule::command_type(command, command_type))
    }

    /// Returns the first registration error, if any. Rules that registered
    /// successfully stay registered.
    pub fn finish(self) -> Result<()> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn apply(mut self, rule: MappingRule) -> Self {
        if let Err(err) = self.registry.register(&self.entity, rule) {
            self.errors.push(err);
        }
        self
    }
}
