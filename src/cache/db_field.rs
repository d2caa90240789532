use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::connection::ConnectionKey;
use crate::core::{Command, DbField, Result};
use crate::entity::{EntityKey, EntityType};
use crate::schema::SchemaProvider;
use super::{MappedNameCache, MemoCache, PrimaryCache};

type SchemaKey = (EntityKey, Command, ConnectionKey);

/// Live column definitions per (entity type, command, connection).
///
/// A miss issues a catalog query through the schema provider. Query failures
/// propagate and leave no entry behind, so the next call retries. An empty
/// answer (table not found) is returned but not stored.
pub struct DbFieldCache {
    names: Arc<MappedNameCache>,
    schema: Arc<dyn SchemaProvider>,
    entries: MemoCache<SchemaKey, Arc<[DbField]>>,
    generation: AtomicU64,
}

impl DbFieldCache {
    pub fn new(names: Arc<MappedNameCache>, schema: Arc<dyn SchemaProvider>) -> Self {
        Self {
            names,
            schema,
            entries: MemoCache::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn get(
        &self,
        entity: &EntityType,
        command: Command,
        connection: &ConnectionKey,
    ) -> Result<Arc<[DbField]>> {
        entity.validate()?;
        let key = (entity.key().clone(), command, connection.clone());
        if let Some(hit) = self.entries.peek(&key) {
            return Ok(hit);
        }

        let table = self.names.get(entity)?;
        let fields: Arc<[DbField]> = Arc::from(self.schema.fields(connection, &table)?);
        debug!(
            "Fetched {} fields of table '{}' on '{}'",
            fields.len(),
            table,
            connection
        );

        if fields.is_empty() {
            return Ok(fields);
        }
        Ok(self.entries.insert_if_absent(key, fields))
    }

    pub fn contains(&self, entity: &EntityType, command: Command, connection: &ConnectionKey) -> bool {
        self.entries
            .contains(&(entity.key().clone(), command, connection.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of flushes so far. Answers derived from this cache are stale once
    /// the generation they were computed under has passed.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Also flushes the mapped names the schema queries were issued for.
    pub fn flush(&self) {
        debug!("Flushing {} cached schema entries", self.entries.len());
        self.entries.clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.names.flush();
    }
}

/// Whether an entity's primary property is also an identity column in the
/// live schema.
///
/// The primary property's mapped column is matched against the schema's
/// column names case-insensitively. Answers are tagged with the
/// [`DbFieldCache::generation`] they were computed under, so flushing the
/// field cache invalidates them too.
pub struct PrimaryIdentityCache {
    primaries: Arc<PrimaryCache>,
    db_fields: Arc<DbFieldCache>,
    entries: MemoCache<SchemaKey, (u64, bool)>,
}

impl PrimaryIdentityCache {
    pub fn new(primaries: Arc<PrimaryCache>, db_fields: Arc<DbFieldCache>) -> Self {
        Self {
            primaries,
            db_fields,
            entries: MemoCache::new(),
        }
    }

    pub fn get(
        &self,
        entity: &EntityType,
        command: Command,
        connection: &ConnectionKey,
    ) -> Result<bool> {
        entity.validate()?;
        let key = (entity.key().clone(), command, connection.clone());
        let generation = self.db_fields.generation();
        if let Some((stored, hit)) = self.entries.peek(&key) {
            if stored == generation {
                return Ok(hit);
            }
            self.entries.remove_if(&key, |(stored, _)| *stored != generation);
        }

        let Some(primary) = self.primaries.get(entity)? else {
            return Ok(self.entries.insert_if_absent(key, (generation, false)).1);
        };

        let fields = self.db_fields.get(entity, command, connection)?;
        if fields.is_empty() {
            return Ok(false);
        }

        let is_identity = fields
            .iter()
            .any(|field| field.is_identity && field.matches_name(primary.mapped_name()));
        Ok(self.entries.insert_if_absent(key, (generation, is_identity)).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Also flushes the primary and field caches this one is derived from.
    pub fn flush(&self) {
        self.entries.clear();
        self.primaries.flush();
        self.db_fields.flush();
    }
}
