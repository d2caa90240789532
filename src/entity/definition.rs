use crate::core::DataType;
use crate::handler::{HandlerKey, PropertyHandler};

/// Declared table and property metadata of one entity type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDefinition {
    table: Option<String>,
    properties: Vec<PropertyDescriptor>,
}

impl EntityDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table name declared on the type itself.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self
    }

    /// Appends a property; declaration order is preserved.
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn property_named(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn into_properties(self) -> Vec<PropertyDescriptor> {
        self.properties
    }
}

/// One declared property of an entity and the attributes attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Rust type as written, e.g. `Option<i64>`.
    pub declared_type: String,
    pub column: Option<String>,
    pub db_type: Option<DataType>,
    /// Explicit primary-key marker.
    pub primary: bool,
    pub identity: bool,
    pub handler: Option<HandlerKey>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            column: None,
            db_type: None,
            primary: false,
            identity: false,
            handler: None,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn db_type(mut self, db_type: DataType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn handler<H: PropertyHandler>(mut self) -> Self {
        self.handler = Some(HandlerKey::of::<H>());
        self
    }
}
