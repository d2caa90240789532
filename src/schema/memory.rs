use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::connection::ConnectionKey;
use crate::core::{DbField, Result};
use super::SchemaProvider;

/// Schema provider backed by table definitions held in memory.
///
/// Table names match case-insensitively, like unquoted SQL identifiers.
#[derive(Debug, Default)]
pub struct InMemorySchemaProvider {
    tables: DashMap<(ConnectionKey, String), Vec<DbField>>,
    queries: AtomicUsize,
}

impl InMemorySchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or redefines) a table on `connection`.
    pub fn define_table(&self, connection: &ConnectionKey, table: &str, fields: Vec<DbField>) {
        self.tables
            .insert((connection.clone(), table.to_ascii_lowercase()), fields);
    }

    pub fn drop_table(&self, connection: &ConnectionKey, table: &str) -> bool {
        self.tables
            .remove(&(connection.clone(), table.to_ascii_lowercase()))
            .is_some()
    }

    /// Number of catalog queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl SchemaProvider for InMemorySchemaProvider {
    fn fields(&self, connection: &ConnectionKey, table: &str) -> Result<Vec<DbField>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let key = (connection.clone(), table.to_ascii_lowercase());
        Ok(self
            .tables
            .get(&key)
            .map(|fields| fields.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;

    #[test]
    fn test_lookup_is_case_insensitive_per_connection() {
        let provider = InMemorySchemaProvider::new();
        let a = ConnectionKey::new("tenant_a").unwrap();
        let b = ConnectionKey::new("tenant_b").unwrap();
        provider.define_table(&a, "Customers", vec![DbField::new("id", DataType::Integer)]);

        assert_eq!(provider.fields(&a, "customers").unwrap().len(), 1);
        assert!(provider.fields(&b, "customers").unwrap().is_empty());
        assert_eq!(provider.query_count(), 2);
    }

    #[test]
    fn test_drop_table() {
        let provider = InMemorySchemaProvider::new();
        let conn = ConnectionKey::new("db").unwrap();
        provider.define_table(&conn, "t", vec![]);
        assert!(provider.drop_table(&conn, "T"));
        assert!(!provider.drop_table(&conn, "T"));
    }
}
