//! Core stockfs: the resource-addressed product store
//!
//! Product records are resources reachable by identifier:
//! - `ResourceId`: `products` (the collection) or `products/<id>` (one row)
//! - `RecordStore`: owner of the `products` table
//! - `Resolver`: maps identifiers to store calls and announces writes
//! - `ChangeNotifier`: synchronous publish/subscribe for committed writes
//! - `ProductList` / `RowActions`: what a list view binds to
//! - `EditorSession`: one in-progress edit, committed as a single write
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stockfs_core_store::{
//!     ChangeNotifier, MemoryStore, ProductActions, ProductList, ProductValues, Resolver,
//!     ResolverConfig, RowActions,
//! };
//!
//! let resolver = Arc::new(Resolver::new(
//!     MemoryStore::new(),
//!     Arc::new(ChangeNotifier::new()),
//!     ResolverConfig::default(),
//! ));
//! let list = ProductList::bind(&resolver).unwrap();
//!
//! let item = resolver
//!     .insert(&resolver.collection(), ProductValues::new().name("Widget").quantity(3))
//!     .unwrap();
//! assert_eq!(list.len(), 1);
//!
//! let row = resolver.query(&item).unwrap().into_row().unwrap();
//! ProductActions::new(&resolver).sell(&row).unwrap();
//! assert_eq!(list.rows()[0].quantity_display, "2");
//! ```

mod editor;
mod error;
mod memory;
mod notifier;
mod path;
mod product;
mod projection;
mod resolver;
mod resource;
mod rows;
mod traits;
mod value;

pub use editor::{CloseDecision, EditorSession, EditorState, RejectReason, Rejected};
pub use error::{Error, Result};
pub use memory::{MemoryStore, Table};
pub use notifier::{ChangeEvent, ChangeNotifier, DeferredWrite, Handler, SubscriptionId};
pub use path::{Path, PathError};
pub use product::{
    columns, parse_count, Product, ProductValues, RowId, DEFAULT_IMAGE_REF, MAX_COUNT, PRODUCTS,
};
pub use projection::{project, ProductActions, ProductList, RowActions, ViewModel};
pub use resolver::{QueryResult, Resolver, ResolverConfig};
pub use resource::{ResourceId, ResourceKind};
pub use rows::{RowIter, Rows};
pub use traits::{RecordStore, StoreBox};
pub use value::{ContentValues, Value};
