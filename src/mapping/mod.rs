//! Declarative mapping rules authored once at startup.

pub mod fluent;
pub mod registry;

use crate::core::{Command, CommandType, DataType, Result, error::require_name};
use crate::entity::PropertyDescriptor;
use crate::handler::{HandlerKey, PropertyHandler};

pub use fluent::EntityMapper;
pub use registry::MappingRegistry;

/// Selects one property of an entity type.
///
/// However the selector is expressed, the registry stores the resolved name so
/// later lookups by name succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyKey(String);

impl PropertyKey {
    /// Resolves the selector to the stable name key used by the registry.
    pub fn resolve(&self) -> Result<String> {
        require_name(&self.0, "property selector").map(str::to_string)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&PropertyDescriptor> for PropertyKey {
    fn from(value: &PropertyDescriptor) -> Self {
        Self(value.name.clone())
    }
}

/// A user-declared association between an entity type (and optionally one of
/// its properties) and a database-side concept.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingRule {
    Table(String),
    Primary(PropertyKey),
    Identity(PropertyKey),
    Column { property: PropertyKey, column: String },
    DbType { property: PropertyKey, db_type: DataType },
    Handler { property: PropertyKey, handler: HandlerKey },
    CommandType { command: Command, command_type: CommandType },
}

impl MappingRule {
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table(name.into())
    }

    pub fn primary(property: impl Into<PropertyKey>) -> Self {
        Self::Primary(property.into())
    }

    pub fn identity(property: impl Into<PropertyKey>) -> Self {
        Self::Identity(property.into())
    }

    pub fn column(property: impl Into<PropertyKey>, column: impl Into<String>) -> Self {
        Self::Column {
            property: property.into(),
            column: column.into(),
        }
    }

    pub fn db_type(property: impl Into<PropertyKey>, db_type: DataType) -> Self {
        Self::DbType {
            property: property.into(),
            db_type,
        }
    }

    pub fn handler<H: PropertyHandler>(property: impl Into<PropertyKey>) -> Self {
        Self::Handler {
            property: property.into(),
            handler: HandlerKey::of::<H>(),
        }
    }

    pub fn command_type(command: Command, command_type: CommandType) -> Self {
        Self::CommandType {
            command,
            command_type,
        }
    }

    /// Short label used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Primary(_) => "primary",
            Self::Identity(_) => "identity",
            Self::Column { .. } => "column",
            Self::DbType { .. } => "db type",
            Self::Handler { .. } => "handler",
            Self::CommandType { .. } => "command type",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_key_resolution() {
        assert_eq!(PropertyKey::from(" Name ").resolve().unwrap(), "Name");
        let descriptor = PropertyDescriptor::new("Email", "String");
        assert_eq!(PropertyKey::from(&descriptor).resolve().unwrap(), "Email");
        assert!(PropertyKey::from("").resolve().unwrap_err().is_argument_error());
    }

    #[test]
    fn test_rule_kinds() {
        assert_eq!(MappingRule::table("t").kind(), "table");
        assert_eq!(MappingRule::column("A", "a").kind(), "column");
        assert_eq!(
            MappingRule::command_type(Command::Query, CommandType::StoredProcedure).kind(),
            "command type"
        );
    }
}
