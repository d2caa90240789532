use std::fmt;
use serde::{Deserialize, Serialize};
use super::DataType;

/// Statement family a metadata lookup is made on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    None,
    Query,
    QueryAll,
    BatchQuery,
    Count,
    Exists,
    Insert,
    InsertAll,
    Update,
    UpdateAll,
    Merge,
    MergeAll,
    Delete,
    DeleteAll,
    Truncate,
    BulkInsert,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How a command's text is interpreted by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    #[default]
    Text,
    StoredProcedure,
    TableDirect,
}

/// Entity-side column projection: the mapped name of one property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub db_type: Option<DataType>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_type: None,
        }
    }

    pub fn with_type(mut self, db_type: DataType) -> Self {
        self.db_type = Some(db_type);
        self
    }
}

/// Column metadata reported by the live database schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbField {
    pub name: String,
    pub data_type: DataType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_identity: bool,
    #[serde(default)]
    pub size: Option<u32>,
}

fn default_nullable() -> bool {
    true
}

impl DbField {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            is_primary: false,
            is_identity: false,
            size: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self.nullable = false;
        self
    }

    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Column names are compared the way SQL catalogs treat unquoted identifiers.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_field_builder() {
        let field = DbField::new("Id", DataType::Integer).primary().identity();
        assert!(field.is_primary);
        assert!(field.is_identity);
        assert!(!field.nullable);
        assert!(field.matches_name("ID"));
        assert!(!field.matches_name("Ident"));
    }

    #[test]
    fn test_db_field_deserialize_defaults() {
        let field: DbField =
            serde_json::from_str(r#"{"name":"email","data_type":"text"}"#).unwrap();
        assert!(field.nullable);
        assert!(!field.is_identity);
        assert_eq!(field.size, None);
    }

    #[test]
    fn test_default_command_type() {
        assert_eq!(CommandType::default(), CommandType::Text);
    }
}
