use std::collections::{BTreeMap, HashMap};

use log::warn;

use crate::core::{Command, CommandType, DataType, Result, error::require_name};
use crate::entity::{EntityKey, EntityType};
use crate::handler::{HandlerKey, PropertyHandler};
use super::{MappingRule, PropertyKey};

#[derive(Debug, Clone, Default)]
struct EntityRules {
    table: Option<String>,
    primary: Option<String>,
    identity: Option<String>,
    columns: BTreeMap<String, String>,
    db_types: BTreeMap<String, DataType>,
    handlers: BTreeMap<String, HandlerKey>,
    command_types: BTreeMap<Command, CommandType>,
}

/// Process-wide table of user-declared mapping rules.
///
/// Writes take `&mut self`, so the registry has exactly one writer while it is
/// being configured. Once handed to a `MetadataContext` behind an `Arc` it can
/// no longer change, which makes every registration happen-before the first
/// resolution that reads it.
///
/// A later registration for the same key replaces the earlier one; rules are
/// never merged.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    entities: HashMap<EntityKey, EntityRules>,
    declared_types: HashMap<String, DataType>,
    declared_handlers: HashMap<String, HandlerKey>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `rule` for `entity`, overwriting any rule with the same key.
    ///
    /// Property names are not checked against the entity; an unknown property
    /// simply never matches during resolution.
    pub fn register(&mut self, entity: &EntityType, rule: MappingRule) -> Result<()> {
        entity.validate()?;
        let kind = rule.kind();
        let rule = resolve(rule)?;
        let rules = self.entities.entry(entity.key().clone()).or_default();

        let replaced = match rule {
            MappingRule::Table(name) => rules.table.replace(name).is_some(),
            MappingRule::Primary(property) => rules.primary.replace(property.0).is_some(),
            MappingRule::Identity(property) => rules.identity.replace(property.0).is_some(),
            MappingRule::Column { property, column } => {
                rules.columns.insert(property.0, column).is_some()
            }
            MappingRule::DbType { property, db_type } => {
                rules.db_types.insert(property.0, db_type).is_some()
            }
            MappingRule::Handler { property, handler } => {
                rules.handlers.insert(property.0, handler).is_some()
            }
            MappingRule::CommandType {
                command,
                command_type,
            } => rules.command_types.insert(command, command_type).is_some(),
        };

        if replaced {
            warn!("Overwriting {} mapping registered for entity '{}'", kind, entity);
        }
        Ok(())
    }

    /// Most recent rules registered for `entity`, or an empty list.
    pub fn lookup(&self, entity: &EntityType) -> Vec<MappingRule> {
        let Some(rules) = self.entities.get(entity.key()) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        if let Some(table) = &rules.table {
            found.push(MappingRule::Table(table.clone()));
        }
        if let Some(primary) = &rules.primary {
            found.push(MappingRule::Primary(PropertyKey::from(primary.as_str())));
        }
        if let Some(identity) = &rules.identity {
            found.push(MappingRule::Identity(PropertyKey::from(identity.as_str())));
        }
        for (property, column) in &rules.columns {
            found.push(MappingRule::column(property.as_str(), column.clone()));
        }
        for (property, db_type) in &rules.db_types {
            found.push(MappingRule::db_type(property.as_str(), *db_type));
        }
        for (property, handler) in &rules.handlers {
            found.push(MappingRule::Handler {
                property: PropertyKey::from(property.as_str()),
                handler: *handler,
            });
        }
        for (command, command_type) in &rules.command_types {
            found.push(MappingRule::command_type(*command, *command_type));
        }
        found
    }

    pub fn table(&self, entity: &EntityType) -> Option<&str> {
        self.rules(entity)?.table.as_deref()
    }

    pub fn primary(&self, entity: &EntityType) -> Option<&str> {
        self.rules(entity)?.primary.as_deref()
    }

    pub fn identity(&self, entity: &EntityType) -> Option<&str> {
        self.rules(entity)?.identity.as_deref()
    }

    pub fn column(&self, entity: &EntityType, property: &str) -> Option<&str> {
        self.rules(entity)?.columns.get(property).map(String::as_str)
    }

    pub fn db_type(&self, entity: &EntityType, property: &str) -> Option<DataType> {
        self.rules(entity)?.db_types.get(property).copied()
    }

    pub fn handler(&self, entity: &EntityType, property: &str) -> Option<HandlerKey> {
        self.rules(entity)?.handlers.get(property).copied()
    }

    pub fn command_type(&self, entity: &EntityType, command: Command) -> Option<CommandType> {
        self.rules(entity)?.command_types.get(&command).copied()
    }

    /// Maps every property declared with the Rust type `declared` to `db_type`
    /// unless a per-property rule or attribute says otherwise.
    pub fn map_declared_type(&mut self, declared: &str, db_type: DataType) -> Result<()> {
        let declared = normalize_declared(require_name(declared, "declared type")?);
        if self.declared_types.insert(declared.clone(), db_type).is_some() {
            warn!("Overwriting db type mapping for declared type '{}'", declared);
        }
        Ok(())
    }

    /// Attaches handler `H` to every property declared with the Rust type
    /// `declared` unless a per-property rule or attribute says otherwise.
    pub fn map_declared_handler<H: PropertyHandler>(&mut self, declared: &str) -> Result<()> {
        let declared = normalize_declared(require_name(declared, "declared type")?);
        if self
            .declared_handlers
            .insert(declared.clone(), HandlerKey::of::<H>())
            .is_some()
        {
            warn!("Overwriting handler mapping for declared type '{}'", declared);
        }
        Ok(())
    }

    pub fn declared_type(&self, declared: &str) -> Option<DataType> {
        self.declared_types.get(&normalize_declared(declared)).copied()
    }

    pub fn declared_handler(&self, declared: &str) -> Option<HandlerKey> {
        self.declared_handlers.get(&normalize_declared(declared)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.declared_types.is_empty() && self.declared_handlers.is_empty()
    }

    fn rules(&self, entity: &EntityType) -> Option<&EntityRules> {
        self.entities.get(entity.key())
    }
}

/// Validates names and resolves property selectors to their stable keys.
fn resolve(rule: MappingRule) -> Result<MappingRule> {
    Ok(match rule {
        MappingRule::Table(name) => MappingRule::Table(require_name(&name, "table name")?.to_string()),
        MappingRule::Primary(property) => MappingRule::Primary(PropertyKey(property.resolve()?)),
        MappingRule::Identity(property) => MappingRule::Identity(PropertyKey(property.resolve()?)),
        MappingRule::Column { property, column } => MappingRule::Column {
            property: PropertyKey(property.resolve()?),
            column: require_name(&column, "column name")?.to_string(),
        },
        MappingRule::DbType { property, db_type } => MappingRule::DbType {
            property: PropertyKey(property.resolve()?),
            db_type,
        },
        MappingRule::Handler { property, handler } => MappingRule::Handler {
            property: PropertyKey(property.resolve()?),
            handler,
        },
        rule @ MappingRule::CommandType { .. } => rule,
    })
}

/// `Option < i64 >` and `Option<i64>` name the same declared type.
fn normalize_declared(declared: &str) -> String {
    declared.chars().filter(|ch| !ch.is_whitespace()).collect()
}
