use std::sync::Arc;

use parking_lot::Mutex;

use stockfs_core_store::{
    ChangeEvent, ChangeNotifier, CloseDecision, EditorSession, Error, MemoryStore,
    ProductActions, ProductList, ProductValues, RejectReason, Resolver, ResolverConfig,
    ResourceId, ResourceKind, RowActions, RowId, DEFAULT_IMAGE_REF,
};

fn resolver() -> Arc<Resolver> {
    Arc::new(Resolver::new(
        MemoryStore::new(),
        Arc::new(ChangeNotifier::new()),
        ResolverConfig::default(),
    ))
}

#[test]
fn editor_to_list_round_trip() {
    let resolver = resolver();
    let list = ProductList::bind(&resolver).unwrap();

    let mut session = EditorSession::new();
    assert_eq!(session.request_close(), CloseDecision::CloseNow);
    session.set_name("Widget");
    session.set_price("500");
    session.set_quantity("3");
    assert_eq!(session.request_close(), CloseDecision::ConfirmDiscard);
    let id = session.save(&resolver).unwrap();

    let rows = list.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].price_display, "500");
    assert_eq!(rows[0].image_ref, DEFAULT_IMAGE_REF);

    let row = resolver.query_one(id).unwrap().unwrap();
    ProductActions::new(&resolver).sell(&row).unwrap();
    assert_eq!(list.find(id).unwrap().quantity_display, "2");

    let session = EditorSession::open(&resolver, &resolver.item(id)).unwrap();
    assert!(session.can_delete());
    session.delete(&resolver).unwrap();
    assert!(list.is_empty());
}

#[test]
fn item_subscriber_sees_only_its_row() {
    let resolver = resolver();
    let first = resolver
        .insert(&resolver.collection(), ProductValues::new().name("a"))
        .unwrap();
    let second = resolver
        .insert(&resolver.collection(), ProductValues::new().name("b"))
        .unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    resolver
        .subscribe(
            first.clone(),
            Arc::new(move |event: &ChangeEvent<'_>| {
                sink.lock().push(event.resource().clone());
            }),
        )
        .unwrap();

    resolver
        .update(&second, &ProductValues::new().quantity(1))
        .unwrap();
    assert!(seen.lock().is_empty());

    resolver
        .update(&first, &ProductValues::new().quantity(1))
        .unwrap();
    assert_eq!(*seen.lock(), vec![first.clone()]);

    resolver.delete(&resolver.collection()).unwrap();
    assert_eq!(
        *seen.lock(),
        vec![first, ResourceId::collection("products")]
    );
}

#[test]
fn identifiers_from_text() {
    let resolver = resolver();
    let collection: ResourceId = "products".parse().unwrap();
    assert_eq!(resolver.kind(&collection).unwrap(), ResourceKind::List);

    let item = resolver
        .insert(&collection, ProductValues::new().name("Widget"))
        .unwrap();
    assert_eq!(item.to_string(), "products/1");
    assert_eq!(resolver.kind(&item).unwrap(), ResourceKind::Item);

    let orders: ResourceId = "orders/1".parse().unwrap();
    assert!(matches!(
        resolver.delete(&orders),
        Err(Error::NoRoute { .. })
    ));
}

#[test]
fn custom_default_image_and_collection() {
    let resolver = Resolver::new(
        MemoryStore::new(),
        Arc::new(ChangeNotifier::new()),
        ResolverConfig {
            collection: "stock".to_string(),
            default_image_ref: "res://shop/placeholder".to_string(),
        },
    );

    let mut session = EditorSession::new();
    session.set_name("Gadget");
    let id = session.save(&resolver).unwrap();
    assert_eq!(id, RowId(1));
    assert_eq!(
        resolver.query_one(id).unwrap().unwrap().image_ref,
        "res://shop/placeholder"
    );
    assert_eq!(resolver.item(id).to_string(), "stock/1");
    assert!(matches!(
        resolver.query(&ResourceId::collection("products")),
        Err(Error::NoRoute { .. })
    ));
}

#[test]
fn rejected_save_keeps_the_session() {
    let resolver = resolver();
    let mut session = EditorSession::new();
    session.set_name("Widget");
    session.set_price("5.00");

    let rejected = session.save(&resolver).unwrap_err();
    assert!(matches!(
        rejected.reason,
        RejectReason::InvalidArgument { .. }
    ));

    let mut session = rejected.session;
    session.set_price("500");
    let id = session.save(&resolver).unwrap();
    assert_eq!(resolver.query_one(id).unwrap().unwrap().price, 500);
}

#[test]
fn writers_on_many_threads_keep_ids_unique() {
    let resolver = resolver();
    let list = ProductList::bind(&resolver).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let resolver = resolver.clone();
            std::thread::spawn(move || {
                (0..10)
                    .map(|i| {
                        let item = resolver
                            .insert(
                                &resolver.collection(),
                                ProductValues::new().name(format!("{}-{}", t, i)),
                            )
                            .unwrap();
                        item.id().unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<RowId> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 80);
    assert_eq!(list.len(), 80);
}

#[test]
fn binding_while_another_thread_inserts_sees_the_row() {
    for _ in 0..200 {
        let resolver = resolver();
        let start = Arc::new(std::sync::Barrier::new(2));

        let writer = {
            let resolver = resolver.clone();
            let start = start.clone();
            std::thread::spawn(move || {
                start.wait();
                resolver
                    .insert(&resolver.collection(), ProductValues::new().name("Widget"))
                    .unwrap();
            })
        };

        start.wait();
        let list = ProductList::bind(&resolver).unwrap();
        writer.join().unwrap();

        assert_eq!(list.len(), resolver.query_all().unwrap().len());
        assert_eq!(list.len(), 1);
    }
}
