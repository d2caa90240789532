/// Concurrent access tests
///
/// Parallel first-time lookups against shared caches.
/// Run with: cargo test --test concurrent_access_tests
mod support;

use std::sync::{Arc, Barrier};

use entitymeta::prelude::*;
use entitymeta::{InMemorySchemaProvider, ReflectionProvider};
use support::{CountingReflection, Customer, Ledger, connection};

const NUM_TASKS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_lookup_single_entry() {
    let reflection = CountingReflection::new();
    let context = Arc::new(
        MetadataContext::builder()
            .reflection(reflection.clone() as Arc<dyn ReflectionProvider>)
            .build()
            .unwrap(),
    );
    let barrier = Arc::new(Barrier::new(NUM_TASKS));

    let mut handles = vec![];
    for _ in 0..NUM_TASKS {
        let context = Arc::clone(&context);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::task::spawn_blocking(move || {
            barrier.wait();
            context.mapped_name::<Customer>().unwrap()
        }));
    }

    let mut names = vec![];
    for handle in handles {
        names.push(handle.await.unwrap());
    }

    // Every caller returns the one stored value, not merely an equal one.
    for name in &names {
        assert!(Arc::ptr_eq(name, &names[0]));
    }
    assert_eq!(&*names[0], "Customer");
    assert_eq!(context.mapped_names().len(), 1);
    assert!(reflection.calls() >= 1);
    assert!(reflection.calls() <= NUM_TASKS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_primary_and_schema_lookups() {
    let schema = Arc::new(InMemorySchemaProvider::new());
    let tenant = connection("tenant_a");
    schema.define_table(
        &tenant,
        "Ledger",
        vec![
            DbField::new("ID", DataType::Integer).primary().identity(),
            DbField::new("ledger_id", DataType::Integer),
        ],
    );
    let context = Arc::new(
        MetadataContext::builder()
            .schema_provider(schema.clone())
            .build()
            .unwrap(),
    );
    let barrier = Arc::new(Barrier::new(NUM_TASKS));

    let mut handles = vec![];
    for _ in 0..NUM_TASKS {
        let context = Arc::clone(&context);
        let barrier = Arc::clone(&barrier);
        let tenant = tenant.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            barrier.wait();
            let primary = context.primary::<Ledger>().unwrap().unwrap();
            let is_identity = context
                .primary_identities()
                .get(&Ledger::entity_type(), Command::Insert, &tenant)
                .unwrap();
            (primary.name().to_string(), is_identity)
        }));
    }

    for handle in handles {
        let (primary, is_identity) = handle.await.unwrap();
        assert_eq!(primary, "id");
        assert!(is_identity);
    }

    assert_eq!(context.primaries().len(), 1);
    assert_eq!(context.db_fields().len(), 1);
    assert_eq!(context.primary_identities().len(), 1);
    // Redundant catalog queries are allowed, but never more than one per caller.
    assert!(schema.query_count() >= 1);
    assert!(schema.query_count() <= NUM_TASKS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_flush_during_lookups() {
    let context = Arc::new(MetadataContext::builder().build().unwrap());
    let rounds = 200;

    let reader = {
        let context = Arc::clone(&context);
        tokio::task::spawn_blocking(move || {
            for _ in 0..rounds {
                let fields = context.fields().get(&Customer::entity_type()).unwrap();
                assert_eq!(fields.len(), 3);
                assert_eq!(&*context.mapped_name::<Customer>().unwrap(), "Customer");
            }
        })
    };

    let flusher = {
        let context = Arc::clone(&context);
        tokio::task::spawn_blocking(move || {
            for _ in 0..rounds {
                context.flush_all();
            }
        })
    };

    reader.await.unwrap();
    flusher.await.unwrap();

    // Whatever survived the last flush is still a complete answer.
    assert_eq!(context.fields().get(&Customer::entity_type()).unwrap().len(), 3);
}
