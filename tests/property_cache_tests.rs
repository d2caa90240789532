/// Property, field, primary and identity cache tests
///
/// These caches work purely on declared metadata plus registry overrides.
/// Run with: cargo test --test property_cache_tests
mod support;

use std::sync::Arc;

use entitymeta::prelude::*;
use entitymeta::{Field, ReflectionProvider};
use support::{Account, AuditEntry, CountingReflection, Customer, Ledger, Order, connection};

fn context() -> MetadataContext {
    MetadataContext::builder().build().unwrap()
}

#[test]
fn test_primary_prefers_explicit_marker() {
    let primary = context().primary::<Account>().unwrap().unwrap();
    assert_eq!(primary.name(), "account_id");
    assert!(primary.has_primary_marker());
}

#[test]
fn test_primary_falls_back_to_declaration_order() {
    let primary = context().primary::<Ledger>().unwrap().unwrap();
    assert_eq!(primary.name(), "id");
    assert!(!primary.has_primary_marker());
}

#[test]
fn test_primary_absent_is_not_an_error() {
    let context = context();
    assert!(context.primary::<AuditEntry>().unwrap().is_none());
    // The absent answer is memoized like any other.
    assert_eq!(context.primaries().len(), 1);
}

#[test]
fn test_registry_primary_rule_wins() {
    let mut registry = MappingRegistry::new();
    registry.entity::<Account>().primary("id").finish().unwrap();
    let context = MetadataContext::builder().registry(registry).build().unwrap();

    let primary = context.primary::<Account>().unwrap().unwrap();
    assert_eq!(primary.name(), "id");
    assert_eq!(primary.mapped_name(), "Id");
}

#[test]
fn test_registry_primary_rule_for_unknown_property_falls_back() {
    let mut registry = MappingRegistry::new();
    registry.entity::<Ledger>().primary("does_not_exist").finish().unwrap();
    let context = MetadataContext::builder().registry(registry).build().unwrap();

    assert_eq!(context.primary::<Ledger>().unwrap().unwrap().name(), "id");
}

#[test]
fn test_primary_conventions_can_be_disabled() {
    let context = MetadataContext::builder()
        .config(MetadataConfig::default().primary_conventions(false))
        .build()
        .unwrap();

    assert!(context.primary::<Customer>().unwrap().is_none());
    assert_eq!(context.primary::<Account>().unwrap().unwrap().name(), "account_id");
}

#[test]
fn test_identity_resolution() {
    let mut registry = MappingRegistry::new();
    registry.entity::<Ledger>().identity("ledger_id").finish().unwrap();
    let context = MetadataContext::builder().registry(registry).build().unwrap();

    assert_eq!(context.identity::<Order>().unwrap().unwrap().name(), "order_id");
    assert_eq!(context.identity::<Ledger>().unwrap().unwrap().name(), "ledger_id");
    assert!(context.identity::<Customer>().unwrap().is_none());
}

#[test]
fn test_column_and_type_precedence() {
    let mut registry = MappingRegistry::new();
    registry
        .entity::<Order>()
        .column("customer_id", "cust_no")
        .db_type("total", DataType::Integer)
        .finish()
        .unwrap();
    registry.map_declared_type("i64", DataType::Integer).unwrap();
    registry.map_declared_type("f64", DataType::Float).unwrap();
    let context = MetadataContext::builder().registry(registry).build().unwrap();

    let fields = context.fields().get(&Order::entity_type()).unwrap();
    assert_eq!(
        &*fields,
        &[
            Field::new("order_id").with_type(DataType::Integer),
            Field::new("cust_no").with_type(DataType::Integer),
            Field::new("total").with_type(DataType::Integer),
        ]
    );
}

#[test]
fn test_declared_types_from_config() {
    let context = MetadataContext::builder()
        .config(MetadataConfig::default().declared_type("Option<String>", DataType::Text))
        .build()
        .unwrap();

    let properties = context.properties().get(&Customer::entity_type()).unwrap();
    let email = properties.iter().find(|p| p.name() == "email").unwrap();
    assert_eq!(email.declared_type(), "Option<String>");
    assert_eq!(email.db_type(), Some(DataType::Text));
    assert_eq!(properties.iter().find(|p| p.name() == "name").unwrap().db_type(), None);
}

#[test]
fn test_properties_reflected_once_across_caches() {
    let reflection = CountingReflection::new();
    let context = MetadataContext::builder()
        .reflection(reflection.clone() as Arc<dyn ReflectionProvider>)
        .build()
        .unwrap();
    let customer = Customer::entity_type();

    context.properties().get(&customer).unwrap();
    context.fields().get(&customer).unwrap();
    context.primaries().get(&customer).unwrap();
    context.identities().get(&customer).unwrap();
    context.fields().get(&customer).unwrap();

    assert_eq!(reflection.calls(), 1);
}

#[test]
fn test_no_schema_round_trip_needed() {
    // Default context has no schema provider: schema lookups fail, these do not.
    let context = context();
    let tenant = connection("tenant_a");

    let err = context.db_fields_of::<Order>(Command::Insert, &tenant).unwrap_err();
    assert!(matches!(err, MetaError::SchemaQueryError(_)));

    let first = context.primary::<Order>().unwrap();
    let second = context.primary::<Order>().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.unwrap().mapped_name(), "order_id");
}

#[test]
fn test_named_entity_has_no_properties() {
    let context = context();
    let events = EntityType::named("events");

    assert!(context.properties().get(&events).unwrap().is_empty());
    assert!(context.primaries().get(&events).unwrap().is_none());
}

#[test]
fn test_flush_all_clears_every_cache() {
    let context = context();
    context.fields().get(&Customer::entity_type()).unwrap();
    context.primary::<Customer>().unwrap();
    context.mapped_name::<Customer>().unwrap();
    assert!(!context.properties().is_empty());

    context.flush_all();

    assert!(context.properties().is_empty());
    assert!(context.fields().is_empty());
    assert!(context.primaries().is_empty());
    assert!(context.mapped_names().is_empty());
}

#[test]
fn test_derived_cache_flush_reflects_again() {
    let reflection = CountingReflection::new();
    let context = MetadataContext::builder()
        .reflection(reflection.clone() as Arc<dyn ReflectionProvider>)
        .build()
        .unwrap();
    let customer = Customer::entity_type();

    assert_eq!(context.primary::<Customer>().unwrap().unwrap().name(), "id");
    assert_eq!(reflection.calls(), 1);

    context.primaries().flush();
    assert!(!context.properties().contains(&customer));
    assert_eq!(context.primary::<Customer>().unwrap().unwrap().name(), "id");
    assert_eq!(reflection.calls(), 2);

    context.identities().flush();
    context.identity::<Customer>().unwrap();
    assert_eq!(reflection.calls(), 3);

    context.fields().flush();
    assert_eq!(context.fields().get(&customer).unwrap().len(), 3);
    assert_eq!(reflection.calls(), 4);
}
