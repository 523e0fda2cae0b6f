//! In-memory table and store.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{Error, Product, ProductValues, RecordStore, Result, RowId, Rows};

/// The rows of the `products` table plus its id counter.
///
/// Rows are held behind `Arc` and replaced copy-on-write, so snapshots
/// handed out by [`snapshot`](Table::snapshot) never change underneath
/// their readers. Cloning a table is cheap enough to stage a write on a
/// copy and commit it only once it has been persisted, which is how
/// durable stores avoid leaving partial state behind.
#[derive(Clone, Debug)]
pub struct Table {
    rows: BTreeMap<RowId, Arc<Product>>,
    next_id: u64,
}

impl Table {
    /// An empty table whose first row gets id 1.
    pub fn new() -> Self {
        Table {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Rebuild a table from persisted parts.
    ///
    /// `next_id` is raised past the largest row id if needed, so a damaged
    /// counter can never hand out a live id again.
    pub fn from_parts(rows: impl IntoIterator<Item = Product>, next_id: u64) -> Self {
        let rows: BTreeMap<RowId, Arc<Product>> =
            rows.into_iter().map(|row| (row.id, Arc::new(row))).collect();
        let floor = rows.keys().next_back().map_or(1, |id| id.0 + 1);
        Table {
            rows,
            next_id: next_id.max(floor),
        }
    }

    /// The id the next insert will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: RowId) -> Option<&Product> {
        self.rows.get(&id).map(Arc::as_ref)
    }

    /// Immutable snapshot of every row in id order.
    pub fn snapshot(&self) -> Rows {
        Rows::from_snapshot(self.rows.values().cloned().collect())
    }

    pub fn insert(&mut self, values: ProductValues) -> Result<RowId> {
        let id = RowId(self.next_id);
        let row = Product::from_values(id, values)?;
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| Error::failed("row id space exhausted"))?;

        self.rows.insert(id, Arc::new(row));
        self.next_id = next_id;
        Ok(id)
    }

    pub fn update(&mut self, id: RowId, values: &ProductValues) -> usize {
        match self.rows.get_mut(&id) {
            Some(row) => {
                Arc::make_mut(row).apply(values);
                1
            }
            None => 0,
        }
    }

    pub fn delete(&mut self, id: RowId) -> usize {
        usize::from(self.rows.remove(&id).is_some())
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.rows.len();
        self.rows.clear();
        removed
    }

    pub fn reset(&mut self) {
        *self = Table::new();
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// A store that keeps the `products` table in memory.
///
/// # Example
///
/// ```rust
/// use stockfs_core_store::{MemoryStore, ProductValues, RecordStore};
///
/// let mut store = MemoryStore::new();
/// let id = store
///     .insert(ProductValues::new().name("Widget").price(500).image_ref("img"))
///     .unwrap();
///
/// let row = store.query_one(id).unwrap().unwrap();
/// assert_eq!(row.price, 500);
/// assert_eq!(row.quantity, 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Table,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial rows.
    pub fn with_rows(rows: impl IntoIterator<Item = Product>) -> Self {
        Self {
            table: Table::from_parts(rows, 1),
        }
    }

    /// Get a reference to the underlying table.
    pub fn table(&self) -> &Table {
        &self.table
    }
}

impl RecordStore for MemoryStore {
    fn insert(&mut self, values: ProductValues) -> Result<RowId> {
        let id = self.table.insert(values)?;
        tracing::debug!(%id, "inserted row");
        Ok(id)
    }

    fn query_all(&self) -> Result<Rows> {
        Ok(self.table.snapshot())
    }

    fn query_one(&self, id: RowId) -> Result<Option<Product>> {
        Ok(self.table.get(id).cloned())
    }

    fn update(&mut self, id: RowId, values: &ProductValues) -> Result<usize> {
        let affected = self.table.update(id, values);
        tracing::debug!(%id, affected, "updated row");
        Ok(affected)
    }

    fn delete(&mut self, id: RowId) -> Result<usize> {
        let affected = self.table.delete(id);
        tracing::debug!(%id, affected, "deleted row");
        Ok(affected)
    }

    fn clear(&mut self) -> Result<usize> {
        Ok(self.table.clear())
    }

    fn reset(&mut self) -> Result<()> {
        self.table.reset();
        Ok(())
    }
}
