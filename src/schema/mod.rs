//! Schema introspection: column metadata read from a live database catalog.

pub mod memory;

use crate::connection::ConnectionKey;
use crate::core::{DbField, MetaError, Result};

pub use memory::InMemorySchemaProvider;

/// Queries a database catalog for the columns of one table.
///
/// Calls block the calling thread for the duration of the round-trip. Timeouts
/// and retries are the provider's business; failures should be reported as
/// [`MetaError::SchemaQueryError`] and are propagated unchanged.
pub trait SchemaProvider: Send + Sync {
    /// Columns of `table` in declaration order. An unknown table yields an
    /// empty list rather than an error.
    fn fields(&self, connection: &ConnectionKey, table: &str) -> Result<Vec<DbField>>;
}

/// Placeholder provider for contexts that never touch the schema.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredSchemaProvider;

impl SchemaProvider for UnconfiguredSchemaProvider {
    fn fields(&self, connection: &ConnectionKey, table: &str) -> Result<Vec<DbField>> {
        Err(MetaError::SchemaQueryError(format!(
            "no schema provider configured (table '{}' on '{}')",
            table, connection
        )))
    }
}
