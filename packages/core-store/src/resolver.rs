//! The resource resolver.
//!
//! A [`Resolver`] turns operations on resource identifiers into record store
//! calls and announces every committed write through a [`ChangeNotifier`]:
//!
//! | operation | identifier | store call   | notifies                      |
//! |-----------|------------|--------------|-------------------------------|
//! | insert    | collection | `insert`     | collection                    |
//! | query     | collection | `query_all`  | -                             |
//! | query     | item       | `query_one`  | -                             |
//! | update    | item       | `update`     | item + collection, if changed |
//! | delete    | item       | `delete`     | item + collection, if changed |
//! | delete    | collection | `clear`      | collection, if changed        |
//!
//! The store sits behind one read/write lock: queries share it, writes hold
//! it exclusively, and the lock is released before handlers run so they can
//! query the fresh state.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, RwLock};

use crate::notifier::{DeferredWrite, Handler, SubscriptionId};
use crate::product::{DEFAULT_IMAGE_REF, PRODUCTS};
use crate::{
    ChangeNotifier, ContentValues, Error, Product, ProductValues, RecordStore, ResourceId,
    ResourceKind, Result, RowId, Rows, StoreBox,
};

/// Settings the resolver applies to every operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Name of the collection served.
    pub collection: String,
    /// Image reference written when an insert does not name one.
    pub default_image_ref: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            collection: PRODUCTS.to_string(),
            default_image_ref: DEFAULT_IMAGE_REF.to_string(),
        }
    }
}

/// Result of [`Resolver::query`]; its shape follows the identifier's kind.
#[derive(Clone, Debug)]
pub enum QueryResult {
    /// Collection query: snapshot of every row.
    Rows(Rows),
    /// Item query: the row, or `None` if it does not exist.
    Row(Option<Product>),
}

impl QueryResult {
    /// The rows of a collection query.
    pub fn into_rows(self) -> Option<Rows> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            QueryResult::Row(_) => None,
        }
    }

    /// The row of an item query.
    pub fn into_row(self) -> Option<Product> {
        match self {
            QueryResult::Row(row) => row,
            QueryResult::Rows(_) => None,
        }
    }
}

/// Resource-addressed access to a record store.
pub struct Resolver {
    store: RwLock<StoreBox>,
    notifier: Arc<ChangeNotifier>,
    config: ResolverConfig,
    dispatching: Mutex<Vec<ThreadId>>,
}

impl Resolver {
    /// Build a resolver over `store`, announcing writes on `notifier`.
    pub fn new(
        store: impl RecordStore + 'static,
        notifier: Arc<ChangeNotifier>,
        config: ResolverConfig,
    ) -> Self {
        Self::from_box(Box::new(store), notifier, config)
    }

    /// Build a resolver over an already boxed store.
    pub fn from_box(store: StoreBox, notifier: Arc<ChangeNotifier>, config: ResolverConfig) -> Self {
        Self {
            store: RwLock::new(store),
            notifier,
            config,
            dispatching: Mutex::new(Vec::new()),
        }
    }

    pub fn notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Identifier of the served collection.
    pub fn collection(&self) -> ResourceId {
        ResourceId::collection(self.config.collection.as_str())
    }

    /// Identifier of one row of the served collection.
    pub fn item(&self, id: RowId) -> ResourceId {
        ResourceId::item(self.config.collection.as_str(), id)
    }

    /// Classify an identifier, failing for collections this resolver does
    /// not serve.
    pub fn kind(&self, resource: &ResourceId) -> Result<ResourceKind> {
        self.route(resource)?;
        Ok(resource.kind())
    }

    /// MIME-equivalent type string of an identifier.
    pub fn mime_type(&self, resource: &ResourceId) -> Result<String> {
        Ok(self.kind(resource)?.mime_type(resource.collection_name()))
    }

    /// Register a change handler for a served identifier.
    pub fn subscribe(&self, resource: ResourceId, handler: Handler) -> Result<SubscriptionId> {
        self.route(&resource)?;
        Ok(self.notifier.subscribe(resource, handler))
    }

    /// Insert a row into a collection and return the new row's identifier.
    ///
    /// When `values` names no image, the configured default image reference
    /// is written instead.
    pub fn insert(&self, collection: &ResourceId, values: ProductValues) -> Result<ResourceId> {
        let (item, deferred) = self.insert_inner(collection, values)?;
        self.run_deferred(deferred);
        Ok(item)
    }

    /// [`insert`](Self::insert) with an untyped payload.
    pub fn insert_values(&self, collection: &ResourceId, values: &ContentValues) -> Result<ResourceId> {
        let values = self.validate(collection, values)?;
        self.insert(collection, values)
    }

    /// Query a collection (every row) or an item (one row).
    pub fn query(&self, resource: &ResourceId) -> Result<QueryResult> {
        self.route(resource)?;
        let store = self.store.read();
        match resource {
            ResourceId::Collection(_) => Ok(QueryResult::Rows(store.query_all()?)),
            ResourceId::Item(_, id) => Ok(QueryResult::Row(store.query_one(*id)?)),
        }
    }

    /// Snapshot of every row of the served collection.
    pub fn query_all(&self) -> Result<Rows> {
        self.store.read().query_all()
    }

    /// One row of the served collection.
    pub fn query_one(&self, id: RowId) -> Result<Option<Product>> {
        self.store.read().query_one(id)
    }

    /// Merge `values` into the addressed row.
    ///
    /// Returns the number of rows affected; 0 when the row does not exist
    /// or no column was provided, in which case nothing is notified.
    pub fn update(&self, item: &ResourceId, values: &ProductValues) -> Result<usize> {
        let (affected, deferred) = self.update_inner(item, values)?;
        self.run_deferred(deferred);
        Ok(affected)
    }

    /// [`update`](Self::update) with an untyped payload.
    pub fn update_values(&self, item: &ResourceId, values: &ContentValues) -> Result<usize> {
        let values = self.validate(item, values)?;
        self.update(item, &values)
    }

    /// Delete the addressed row, or every row for a collection identifier.
    pub fn delete(&self, resource: &ResourceId) -> Result<usize> {
        let (affected, deferred) = self.delete_inner(resource)?;
        self.run_deferred(deferred);
        Ok(affected)
    }

    fn insert_inner(
        &self,
        collection: &ResourceId,
        mut values: ProductValues,
    ) -> Result<(ResourceId, Vec<DeferredWrite>)> {
        self.route(collection)?;
        self.check_not_dispatching(collection)?;
        if !collection.is_collection() {
            return Err(Error::InvalidPath {
                message: format!("insert needs a collection identifier, got '{}'", collection),
            });
        }

        if values.image_ref.is_none() {
            values.image_ref = Some(self.config.default_image_ref.clone());
        }

        let id = self
            .store
            .write()
            .insert(values)
            .map_err(|e| match e {
                Error::InvalidArgument { .. } => e,
                other => Error::failed(format!("insert into '{}': {}", collection, other)),
            })?;

        let item = ResourceId::item(collection.collection_name(), id);
        tracing::debug!(%item, "inserted");
        let deferred = self.dispatch(&[collection.clone()]);
        Ok((item, deferred))
    }

    fn update_inner(
        &self,
        item: &ResourceId,
        values: &ProductValues,
    ) -> Result<(usize, Vec<DeferredWrite>)> {
        self.route(item)?;
        self.check_not_dispatching(item)?;
        let ResourceId::Item(_, id) = item else {
            return Err(Error::InvalidPath {
                message: format!("update needs an item identifier, got '{}'", item),
            });
        };

        if values.is_empty() {
            return Ok((0, Vec::new()));
        }
        values.check_counts()?;

        let affected = self.store.write().update(*id, values)?;
        tracing::debug!(%item, affected, "updated");
        if affected == 0 {
            return Ok((0, Vec::new()));
        }
        let deferred = self.dispatch(&[item.clone(), item.owning_collection()]);
        Ok((affected, deferred))
    }

    fn delete_inner(&self, resource: &ResourceId) -> Result<(usize, Vec<DeferredWrite>)> {
        self.route(resource)?;
        self.check_not_dispatching(resource)?;

        let (affected, changed) = match resource {
            ResourceId::Item(_, id) => {
                let affected = self.store.write().delete(*id)?;
                (affected, vec![resource.clone(), resource.owning_collection()])
            }
            ResourceId::Collection(_) => {
                let affected = self.store.write().clear()?;
                (affected, vec![resource.clone()])
            }
        };
        tracing::debug!(%resource, affected, "deleted");

        if affected == 0 {
            return Ok((0, Vec::new()));
        }
        let deferred = self.dispatch(&changed);
        Ok((affected, deferred))
    }

    fn validate(&self, resource: &ResourceId, values: &ContentValues) -> Result<ProductValues> {
        ProductValues::try_from(values).inspect_err(|e| {
            tracing::warn!(%resource, error = %e, "rejected write");
        })
    }

    fn route(&self, resource: &ResourceId) -> Result<()> {
        if resource.collection_name() == self.config.collection {
            Ok(())
        } else {
            Err(Error::NoRoute {
                path: resource.to_path(),
            })
        }
    }

    fn check_not_dispatching(&self, resource: &ResourceId) -> Result<()> {
        if self.dispatching.lock().contains(&thread::current().id()) {
            tracing::warn!(%resource, "refusing write from inside a change handler");
            return Err(Error::ReentrantWrite {
                resource: resource.clone(),
            });
        }
        Ok(())
    }

    fn dispatch(&self, changed: &[ResourceId]) -> Vec<DeferredWrite> {
        let _guard = DispatchGuard::enter(&self.dispatching);
        self.notifier.notify_all(changed)
    }

    /// Run writes deferred by handlers, in order, including any they defer
    /// in turn. Their failures have no caller left to report to, so they
    /// are logged.
    fn run_deferred(&self, deferred: Vec<DeferredWrite>) {
        let mut queue: VecDeque<DeferredWrite> = deferred.into();
        while let Some(write) = queue.pop_front() {
            let result = match &write {
                DeferredWrite::Insert { collection, values } => self
                    .insert_inner(collection, values.clone())
                    .map(|(_, more)| more),
                DeferredWrite::Update { item, values } => {
                    self.update_inner(item, values).map(|(_, more)| more)
                }
                DeferredWrite::Delete { resource } => {
                    self.delete_inner(resource).map(|(_, more)| more)
                }
            };
            match result {
                Ok(more) => queue.extend(more),
                Err(e) => tracing::warn!(?write, error = %e, "deferred write failed"),
            }
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

/// Marks the current thread as dispatching for as long as it lives.
struct DispatchGuard<'a> {
    threads: &'a Mutex<Vec<ThreadId>>,
    id: ThreadId,
}

impl<'a> DispatchGuard<'a> {
    fn enter(threads: &'a Mutex<Vec<ThreadId>>) -> Self {
        let id = thread::current().id();
        threads.lock().push(id);
        Self { threads, id }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        let mut threads = self.threads.lock();
        if let Some(pos) = threads.iter().position(|t| *t == self.id) {
            threads.swap_remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::ChangeEvent;
    use crate::MemoryStore;

    fn resolver() -> Resolver {
        Resolver::new(
            MemoryStore::new(),
            Arc::new(ChangeNotifier::new()),
            ResolverConfig::default(),
        )
    }

    fn widget() -> ProductValues {
        ProductValues::new().name("Widget").price(500).quantity(3)
    }

    /// Records the identifier of every change it sees.
    fn watch(resolver: &Resolver, resource: ResourceId) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        resolver
            .subscribe(
                resource,
                Arc::new(move |event: &ChangeEvent<'_>| {
                    sink.lock().push(event.resource().to_string());
                }),
            )
            .unwrap();
        log
    }

    /// A store whose writes always fail.
    struct BrokenStore;

    impl RecordStore for BrokenStore {
        fn insert(&mut self, _values: ProductValues) -> Result<RowId> {
            Err(Error::Other {
                message: "disk full".to_string(),
            })
        }
        fn query_all(&self) -> Result<Rows> {
            Ok(Rows::default())
        }
        fn query_one(&self, _id: RowId) -> Result<Option<Product>> {
            Ok(None)
        }
        fn update(&mut self, _id: RowId, _values: &ProductValues) -> Result<usize> {
            Err(Error::failed("disk full"))
        }
        fn delete(&mut self, _id: RowId) -> Result<usize> {
            Err(Error::failed("disk full"))
        }
        fn clear(&mut self) -> Result<usize> {
            Err(Error::failed("disk full"))
        }
        fn reset(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn insert_returns_item_and_notifies_collection() {
        let resolver = resolver();
        let log = watch(&resolver, resolver.collection());

        let item = resolver.insert(&resolver.collection(), widget()).unwrap();
        assert_eq!(item, ResourceId::item("products", RowId(1)));
        assert_eq!(*log.lock(), vec!["products"]);

        let row = resolver.query(&item).unwrap().into_row().unwrap();
        assert_eq!(row.name, "Widget");
        assert_eq!(row.quantity, 3);
    }

    #[test]
    fn insert_substitutes_default_image() {
        let resolver = resolver();
        let item = resolver.insert(&resolver.collection(), widget()).unwrap();
        let row = resolver.query(&item).unwrap().into_row().unwrap();
        assert_eq!(row.image_ref, DEFAULT_IMAGE_REF);

        let chosen = resolver
            .insert(&resolver.collection(), widget().image_ref("content://img/7"))
            .unwrap();
        let row = resolver.query(&chosen).unwrap().into_row().unwrap();
        assert_eq!(row.image_ref, "content://img/7");
    }

    #[test]
    fn insert_against_item_is_rejected() {
        let resolver = resolver();
        let err = resolver
            .insert(&resolver.item(RowId(1)), widget())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    fn store_fault_on_insert_is_failed() {
        let resolver = Resolver::new(
            BrokenStore,
            Arc::new(ChangeNotifier::new()),
            ResolverConfig::default(),
        );
        let log = watch(&resolver, resolver.collection());
        let err = resolver.insert(&resolver.collection(), widget()).unwrap_err();
        assert!(matches!(err, Error::Failed { .. }));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn query_shape_follows_identifier() {
        let resolver = resolver();
        resolver.insert(&resolver.collection(), widget()).unwrap();

        let rows = resolver.query(&resolver.collection()).unwrap().into_rows();
        assert_eq!(rows.map(|r| r.len()), Some(1));

        assert!(resolver
            .query(&resolver.item(RowId(42)))
            .unwrap()
            .into_row()
            .is_none());
    }

    #[test]
    fn update_notifies_item_and_collection_only_when_changed() {
        let resolver = resolver();
        let item = resolver.insert(&resolver.collection(), widget()).unwrap();
        let list = watch(&resolver, resolver.collection());
        let row = watch(&resolver, item.clone());

        let affected = resolver
            .update(&item, &ProductValues::new().quantity(2))
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(*list.lock(), vec!["products"]);
        assert_eq!(*row.lock(), vec!["products/1"]);

        let missing = resolver
            .update(&resolver.item(RowId(9)), &ProductValues::new().quantity(2))
            .unwrap();
        assert_eq!(missing, 0);
        assert_eq!(list.lock().len(), 1);
    }

    #[test]
    fn update_of_missing_row_on_empty_store() {
        let resolver = resolver();
        let log = watch(&resolver, resolver.collection());

        let affected = resolver
            .update(&resolver.item(RowId(99)), &ProductValues::new().quantity(5))
            .unwrap();

        assert_eq!(affected, 0);
        assert!(log.lock().is_empty());
        assert!(resolver.query_all().unwrap().is_empty());
    }

    #[test]
    fn update_without_columns_is_a_no_op() {
        let resolver = resolver();
        let item = resolver.insert(&resolver.collection(), widget()).unwrap();
        let log = watch(&resolver, resolver.collection());
        assert_eq!(resolver.update(&item, &ProductValues::new()).unwrap(), 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn update_against_collection_is_rejected() {
        let resolver = resolver();
        let err = resolver
            .update(&resolver.collection(), &ProductValues::new().quantity(1))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    fn delete_twice_reports_one_then_zero() {
        let resolver = resolver();
        let item = resolver.insert(&resolver.collection(), widget()).unwrap();
        let log = watch(&resolver, resolver.collection());

        assert_eq!(resolver.delete(&item).unwrap(), 1);
        assert_eq!(resolver.delete(&item).unwrap(), 0);
        assert_eq!(log.lock().len(), 1);
        assert!(resolver.query(&item).unwrap().into_row().is_none());
    }

    #[test]
    fn delete_collection_removes_every_row() {
        let resolver = resolver();
        for _ in 0..3 {
            resolver.insert(&resolver.collection(), widget()).unwrap();
        }
        let log = watch(&resolver, resolver.collection());

        assert_eq!(resolver.delete(&resolver.collection()).unwrap(), 3);
        assert_eq!(resolver.delete(&resolver.collection()).unwrap(), 0);
        assert_eq!(*log.lock(), vec!["products"]);

        let next = resolver.insert(&resolver.collection(), widget()).unwrap();
        assert_eq!(next.id(), Some(RowId(4)));
    }

    #[test]
    fn unknown_collection_has_no_route() {
        let resolver = resolver();
        let orders = ResourceId::collection("orders");
        assert!(matches!(
            resolver.query(&orders),
            Err(Error::NoRoute { .. })
        ));
        assert!(matches!(
            resolver.insert(&orders, widget()),
            Err(Error::NoRoute { .. })
        ));
        assert!(matches!(resolver.kind(&orders), Err(Error::NoRoute { .. })));
    }

    #[test]
    fn kind_and_mime_type() {
        let resolver = resolver();
        assert_eq!(
            resolver.kind(&resolver.collection()).unwrap(),
            ResourceKind::List
        );
        assert_eq!(
            resolver.mime_type(&resolver.item(RowId(3))).unwrap(),
            "vnd.stockfs.item/products"
        );
    }

    #[test]
    fn content_values_are_validated_before_the_store() {
        let resolver = resolver();
        let log = watch(&resolver, resolver.collection());
        let bad = ContentValues::new().with("price", "five hundred");

        let err = resolver
            .insert_values(&resolver.collection(), &bad)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { ref column, .. } if column == "price"));
        assert!(resolver.query_all().unwrap().is_empty());
        assert!(log.lock().is_empty());

        let good = ContentValues::new().with("name", "Widget").with("price", "500");
        let item = resolver.insert_values(&resolver.collection(), &good).unwrap();
        assert_eq!(
            resolver
                .update_values(&item, &ContentValues::new().with("quantity", 4i64))
                .unwrap(),
            1
        );
        let row = resolver.query_one(RowId(1)).unwrap().unwrap();
        assert_eq!((row.price, row.quantity), (500, 4));
    }

    #[test]
    fn counts_above_max_count_are_rejected() {
        let resolver = resolver();
        let log = watch(&resolver, resolver.collection());

        let err = resolver
            .insert(&resolver.collection(), widget().price(crate::MAX_COUNT + 1))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { ref column, .. } if column == "price"));
        assert!(log.lock().is_empty());

        let item = resolver
            .insert(&resolver.collection(), widget().quantity(crate::MAX_COUNT))
            .unwrap();
        let err = resolver
            .update(&item, &ProductValues::new().quantity(u64::MAX))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { ref column, .. } if column == "quantity"));

        let row = resolver.query(&item).unwrap().into_row().unwrap();
        assert_eq!(row.quantity, crate::MAX_COUNT);
        assert_eq!(
            ProductValues::try_from(row.to_values().to_content_values()).unwrap(),
            row.to_values()
        );
    }

    #[test]
    fn handlers_can_query_during_dispatch() {
        let resolver = Arc::new(resolver());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let weak = Arc::downgrade(&resolver);
        let sink = seen.clone();
        resolver
            .subscribe(
                resolver.collection(),
                Arc::new(move |_event: &ChangeEvent<'_>| {
                    if let Some(resolver) = weak.upgrade() {
                        sink.lock().push(resolver.query_all().unwrap().len());
                    }
                }),
            )
            .unwrap();

        resolver.insert(&resolver.collection(), widget()).unwrap();
        resolver.insert(&resolver.collection(), widget()).unwrap();
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn inline_writes_from_handlers_are_refused() {
        let resolver = Arc::new(resolver());
        let outcome = Arc::new(Mutex::new(None));
        let weak = Arc::downgrade(&resolver);
        let sink = outcome.clone();
        resolver
            .subscribe(
                resolver.collection(),
                Arc::new(move |_event: &ChangeEvent<'_>| {
                    if let Some(resolver) = weak.upgrade() {
                        let result = resolver.delete(&resolver.item(RowId(1)));
                        *sink.lock() = Some(matches!(result, Err(Error::ReentrantWrite { .. })));
                    }
                }),
            )
            .unwrap();

        resolver.insert(&resolver.collection(), widget()).unwrap();
        assert_eq!(*outcome.lock(), Some(true));
        assert_eq!(resolver.query_all().unwrap().len(), 1);
    }

    #[test]
    fn deferred_writes_run_after_dispatch() {
        let resolver = resolver();
        let item = resolver.insert(&resolver.collection(), widget()).unwrap();
        let log = watch(&resolver, resolver.collection());

        // Restock to 10 whenever the row sells out.
        let row_id = item.clone();
        let seen = log.clone();
        resolver
            .subscribe(
                item.clone(),
                Arc::new(move |event: &ChangeEvent<'_>| {
                    if seen.lock().len() == 1 {
                        event.defer(DeferredWrite::Update {
                            item: row_id.clone(),
                            values: ProductValues::new().quantity(10),
                        });
                    }
                }),
            )
            .unwrap();

        resolver
            .update(&item, &ProductValues::new().quantity(0))
            .unwrap();

        assert_eq!(resolver.query_one(RowId(1)).unwrap().unwrap().quantity, 10);
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn failing_deferred_write_does_not_fail_the_original() {
        let resolver = resolver();
        resolver
            .subscribe(
                resolver.collection(),
                Arc::new(|event: &ChangeEvent<'_>| {
                    if event.resource().is_collection() {
                        event.defer(DeferredWrite::Insert {
                            collection: ResourceId::collection("orders"),
                            values: ProductValues::new(),
                        });
                    }
                }),
            )
            .unwrap();

        let item = resolver.insert(&resolver.collection(), widget()).unwrap();
        assert_eq!(item.id(), Some(RowId(1)));
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let resolver = Arc::new(resolver());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let resolver = resolver.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        resolver.insert(&resolver.collection(), widget()).unwrap();
                        let _ = resolver.query_all().unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let rows = resolver.query_all().unwrap();
        assert_eq!(rows.len(), 100);
        let mut ids: Vec<u64> = rows.iter().map(|r| r.id.get()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }
}
