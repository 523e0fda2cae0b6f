//! Restartable row sequences over immutable snapshots.

use std::sync::Arc;

use crate::{Product, RowId};

/// The result of a collection query.
///
/// A `Rows` value is a snapshot taken when the query ran: later writes to
/// the store do not show up in it. Rows are shared with the store rather
/// than copied, and a `Rows` can be iterated any number of times.
///
/// ```rust
/// use stockfs_core_store::{MemoryStore, ProductValues, RecordStore};
///
/// let mut store = MemoryStore::new();
/// store.insert(ProductValues::new().name("Widget").image_ref("img")).unwrap();
///
/// let rows = store.query_all().unwrap();
/// assert_eq!(rows.iter().count(), 1);
/// assert_eq!(rows.iter().count(), 1); // restartable
/// ```
#[derive(Clone, Debug, Default)]
pub struct Rows {
    rows: Arc<[Arc<Product>]>,
}

impl Rows {
    /// Wrap rows that are already in id order.
    pub fn from_snapshot(rows: Vec<Arc<Product>>) -> Self {
        Rows { rows: rows.into() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the snapshot from the start.
    pub fn iter(&self) -> RowIter<'_> {
        RowIter {
            inner: self.rows.iter(),
        }
    }

    /// Row at a position in the snapshot.
    pub fn get(&self, index: usize) -> Option<&Product> {
        self.rows.get(index).map(Arc::as_ref)
    }

    /// Row with the given id, if it is part of the snapshot.
    pub fn find(&self, id: RowId) -> Option<&Product> {
        self.rows
            .binary_search_by_key(&id, |row| row.id)
            .ok()
            .map(|index| self.rows[index].as_ref())
    }

    /// Copy every row out of the snapshot.
    pub fn to_vec(&self) -> Vec<Product> {
        self.iter().cloned().collect()
    }
}

/// Borrowing iterator over a [`Rows`] snapshot.
pub struct RowIter<'a> {
    inner: std::slice::Iter<'a, Arc<Product>>,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = &'a Product;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Arc::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for RowIter<'_> {}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Product;
    type IntoIter = RowIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
