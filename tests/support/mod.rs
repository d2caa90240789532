//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use entitymeta::prelude::*;
use entitymeta::{DeclaredReflection, InMemorySchemaProvider, ReflectionProvider, SchemaProvider};

/// Reflection provider that counts how often it is asked to describe a type.
#[derive(Default)]
pub struct CountingReflection {
    calls: AtomicUsize,
}

impl CountingReflection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReflectionProvider for CountingReflection {
    fn describe(&self, entity: &EntityType) -> Result<EntityDefinition> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        DeclaredReflection.describe(entity)
    }
}

/// Schema provider that fails a fixed number of times before delegating.
pub struct FlakySchemaProvider {
    pub inner: InMemorySchemaProvider,
    failures_left: AtomicUsize,
}

impl FlakySchemaProvider {
    pub fn new(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemorySchemaProvider::new(),
            failures_left: AtomicUsize::new(failures),
        })
    }
}

impl SchemaProvider for FlakySchemaProvider {
    fn fields(&self, connection: &ConnectionKey, table: &str) -> Result<Vec<DbField>> {
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(MetaError::SchemaQueryError(format!(
                "connection to '{}' refused",
                connection
            )));
        }
        self.inner.fields(connection, table)
    }
}

#[derive(Entity)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Entity)]
#[entity(table = "sales_orders")]
pub struct Order {
    #[column(name = "order_id", primary, identity)]
    pub order_id: i64,
    #[column(name = "customer_ref")]
    pub customer_id: i64,
    #[column(db_type = "float")]
    pub total: f64,
}

/// Two convention-primary properties, the second carrying the explicit marker.
#[derive(Entity)]
pub struct Account {
    #[column(name = "Id")]
    pub id: i64,
    #[column(primary)]
    pub account_id: i64,
}

/// Two convention-primary properties, neither marked.
#[derive(Entity)]
pub struct Ledger {
    pub id: i64,
    pub ledger_id: i64,
    pub label: String,
}

/// No primary candidates at all.
#[derive(Entity)]
pub struct AuditEntry {
    pub message: String,
    pub created_at: i64,
}

pub fn connection(name: &str) -> ConnectionKey {
    ConnectionKey::new(name).unwrap()
}
