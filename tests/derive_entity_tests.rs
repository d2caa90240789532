/// Entity derive tests
///
/// Run with: cargo test --test derive_entity_tests
use entitymeta::prelude::*;

#[derive(Default)]
struct Passthrough;

impl PropertyHandler for Passthrough {
    fn get(&self, input: Value, _property: &ClassProperty) -> Result<Value> {
        Ok(input)
    }

    fn set(&self, input: Value, _property: &ClassProperty) -> Result<Value> {
        Ok(input)
    }
}

#[allow(dead_code)]
#[derive(Entity)]
#[entity(table = "people")]
struct Person {
    #[column(name = "person_id", primary, identity, db_type = "bigint")]
    id: i64,
    #[column(handler = Passthrough)]
    display_name: Option<String>,
    #[column(skip)]
    cached_score: f64,
    r#type: String,
}

#[allow(dead_code)]
#[derive(Entity)]
struct Plain {
    value: Vec<u8>,
}

#[test]
fn test_derived_definition() {
    let definition = Person::definition();

    assert_eq!(definition.table_name(), Some("people"));
    let names: Vec<&str> = definition.properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["id", "display_name", "type"]);

    let id = definition.property_named("id").unwrap();
    assert_eq!(id.column.as_deref(), Some("person_id"));
    assert_eq!(id.db_type, Some(DataType::Integer));
    assert!(id.primary);
    assert!(id.identity);
    assert_eq!(id.declared_type, "i64");

    let display = definition.property_named("display_name").unwrap();
    assert_eq!(display.declared_type, "Option<String>");
    assert_eq!(display.handler, Some(entitymeta::HandlerKey::of::<Passthrough>()));
    assert!(!display.primary);
}

#[test]
fn test_derived_entity_without_attributes() {
    let definition = Plain::definition();

    assert_eq!(definition.table_name(), None);
    assert_eq!(
        definition.properties(),
        &[PropertyDescriptor::new("value", "Vec<u8>")]
    );
    assert_eq!(Plain::entity_type().name(), "Plain");
}
