//! Assembled metadata subsystem: one registry snapshot, its collaborators and
//! every resolution cache wired over them.

pub mod config;

use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use log::debug;

use crate::cache::{
    ClassProperty, CommandTypeCache, DbFieldCache, FieldCache, IdentityCache, MappedNameCache,
    PrimaryCache, PrimaryIdentityCache, PropertyCache, PropertyHandlerCache,
};
use crate::connection::ConnectionKey;
use crate::core::{Command, DbField, Result};
use crate::entity::{DeclaredReflection, Entity, NamingConvention, ReflectionProvider};
use crate::handler::HandlerFactory;
use crate::mapping::MappingRegistry;
use crate::schema::{SchemaProvider, UnconfiguredSchemaProvider};

pub use config::MetadataConfig;

// Process-wide default, replaced wholesale by `MetadataContext::install`.
lazy_static! {
    static ref GLOBAL_CONTEXT: RwLock<Arc<MetadataContext>> =
        RwLock::new(Arc::new(MetadataContext::builder().build_default()));
}

/// The metadata resolution subsystem.
///
/// Construct one per application (or per test) with [`MetadataContext::builder`].
/// The registry it was built from is frozen for the context's lifetime.
pub struct MetadataContext {
    config: MetadataConfig,
    registry: Arc<MappingRegistry>,
    mapped_names: Arc<MappedNameCache>,
    properties: Arc<PropertyCache>,
    fields: Arc<FieldCache>,
    primaries: Arc<PrimaryCache>,
    identities: Arc<IdentityCache>,
    db_fields: Arc<DbFieldCache>,
    primary_identities: Arc<PrimaryIdentityCache>,
    command_types: Arc<CommandTypeCache>,
    handlers: Arc<PropertyHandlerCache>,
}

impl MetadataContext {
    pub fn builder() -> MetadataContextBuilder {
        MetadataContextBuilder::default()
    }

    /// The process-wide default context.
    ///
    /// Until [`MetadataContext::install`] is called this is an empty context with
    /// no schema provider.
    pub fn global() -> Result<Arc<MetadataContext>> {
        Ok(GLOBAL_CONTEXT.read()?.clone())
    }

    /// Replaces the process-wide default. Callers still holding the previous
    /// context keep using it.
    pub fn install(context: MetadataContext) -> Result<Arc<MetadataContext>> {
        let context = Arc::new(context);
        *GLOBAL_CONTEXT.write()? = context.clone();
        debug!("Installed global metadata context");
        Ok(context)
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    pub fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    pub fn mapped_names(&self) -> &MappedNameCache {
        &self.mapped_names
    }

    pub fn properties(&self) -> &PropertyCache {
        &self.properties
    }

    pub fn fields(&self) -> &FieldCache {
        &self.fields
    }

    pub fn primaries(&self) -> &PrimaryCache {
        &self.primaries
    }

    pub fn identities(&self) -> &IdentityCache {
        &self.identities
    }

    pub fn db_fields(&self) -> &DbFieldCache {
        &self.db_fields
    }

    pub fn primary_identities(&self) -> &PrimaryIdentityCache {
        &self.primary_identities
    }

    pub fn command_types(&self) -> &CommandTypeCache {
        &self.command_types
    }

    pub fn handlers(&self) -> &PropertyHandlerCache {
        &self.handlers
    }

    pub fn mapped_name<T: Entity>(&self) -> Result<Arc<str>> {
        self.mapped_names.get(&T::entity_type())
    }

    pub fn primary<T: Entity>(&self) -> Result<Option<ClassProperty>> {
        self.primaries.get(&T::entity_type())
    }

    pub fn identity<T: Entity>(&self) -> Result<Option<ClassProperty>> {
        self.identities.get(&T::entity_type())
    }

    pub fn db_fields_of<T: Entity>(
        &self,
        command: Command,
        connection: &ConnectionKey,
    ) -> Result<Arc<[DbField]>> {
        self.db_fields.get(&T::entity_type(), command, connection)
    }

    /// Clears every cache. The registry is untouched.
    pub fn flush_all(&self) {
        self.mapped_names.flush();
        self.properties.flush();
        self.fields.flush();
        self.primaries.flush();
        self.identities.flush();
        self.db_fields.flush();
        self.primary_identities.flush();
        self.command_types.flush();
        self.handlers.flush();
        debug!("Flushed all metadata caches");
    }
}

/// Collects configuration and collaborators for a [`MetadataContext`].
#[derive(Default)]
pub struct MetadataContextBuilder {
    config: MetadataConfig,
    registry: MappingRegistry,
    handlers: HandlerFactory,
    reflection: Option<Arc<dyn ReflectionProvider>>,
    naming: Option<Arc<dyn NamingConvention>>,
    schema: Option<Arc<dyn SchemaProvider>>,
}

impl MetadataContextBuilder {
    pub fn config(mut self, config: MetadataConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(mut self, registry: MappingRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn handlers(mut self, handlers: HandlerFactory) -> Self {
        self.handlers = handlers;
        self
    }

    /// Overrides the default [`DeclaredReflection`].
    pub fn reflection(mut self, reflection: Arc<dyn ReflectionProvider>) -> Self {
        self.reflection = Some(reflection);
        self
    }

    /// Overrides the naming style selected in the configuration.
    pub fn naming(mut self, naming: Arc<dyn NamingConvention>) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn schema_provider(mut self, schema: Arc<dyn SchemaProvider>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn build(mut self) -> Result<MetadataContext> {
        self.config.apply_to(&mut self.registry)?;
        Ok(self.assemble())
    }

    /// Builds without applying configuration rules; used for the empty global.
    fn build_default(self) -> MetadataContext {
        self.assemble()
    }

    fn assemble(self) -> MetadataContext {
        let config = self.config;
        let registry = Arc::new(self.registry);
        let reflection = self
            .reflection
            .unwrap_or_else(|| Arc::new(DeclaredReflection));
        let naming = self.naming.unwrap_or_else(|| Arc::new(config.naming));
        let schema = self
            .schema
            .unwrap_or_else(|| Arc::new(UnconfiguredSchemaProvider));

        let mapped_names = Arc::new(MappedNameCache::new(
            registry.clone(),
            reflection.clone(),
            naming,
        ));
        let properties = Arc::new(
            PropertyCache::new(registry.clone(), reflection)
                .with_primary_conventions(config.primary_conventions),
        );
        let fields = Arc::new(FieldCache::new(properties.clone()));
        let primaries = Arc::new(PrimaryCache::new(registry.clone(), properties.clone()));
        let identities = Arc::new(IdentityCache::new(registry.clone(), properties.clone()));
        let db_fields = Arc::new(DbFieldCache::new(mapped_names.clone(), schema));
        let primary_identities = Arc::new(PrimaryIdentityCache::new(
            primaries.clone(),
            db_fields.clone(),
        ));
        let command_types = Arc::new(CommandTypeCache::new(
            registry.clone(),
            config.default_command_type,
        ));
        let handlers = Arc::new(PropertyHandlerCache::new(
            Arc::new(self.handlers),
            properties.clone(),
        ));

        MetadataContext {
            config,
            registry,
            mapped_names,
            properties,
            fields,
            primaries,
            identities,
            db_fields,
            primary_identities,
            command_types,
            handlers,
        }
    }
}
