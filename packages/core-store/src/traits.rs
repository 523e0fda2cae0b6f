//! The record store interface.

use crate::{Product, ProductValues, Result, RowId, Rows};

/// Owner of the `products` table.
///
/// A store deals in row ids only; it knows nothing about resource
/// identifiers or notifications. Input is already typed and validated by
/// the time it arrives here.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn RecordStore>`.
pub trait RecordStore: Send + Sync {
    /// Add a row and return its newly assigned id.
    ///
    /// Missing `price` and `quantity` default to 0. A missing image
    /// reference is an `InvalidArgument`. Ids are never reused within the
    /// lifetime of a store.
    fn insert(&mut self, values: ProductValues) -> Result<RowId>;

    /// Snapshot of every row in id (insertion) order.
    fn query_all(&self) -> Result<Rows>;

    /// The row with this id, if any.
    fn query_one(&self, id: RowId) -> Result<Option<Product>>;

    /// Merge the provided columns into a row.
    ///
    /// # Returns
    ///
    /// * `Ok(0)` - No row has this id. Nothing changed.
    /// * `Ok(1)` - The row was updated.
    fn update(&mut self, id: RowId, values: &ProductValues) -> Result<usize>;

    /// Permanently remove a row. Returns the number of rows removed (0 or 1).
    fn delete(&mut self, id: RowId) -> Result<usize>;

    /// Remove every row. Ids handed out so far stay retired.
    fn clear(&mut self) -> Result<usize>;

    /// Empty the table and restart id assignment at 1.
    fn reset(&mut self) -> Result<()>;
}

/// A boxed, type-erased store.
pub type StoreBox = Box<dyn RecordStore>;

// Blanket implementations for references and boxes

impl<T: RecordStore + ?Sized> RecordStore for &mut T {
    fn insert(&mut self, values: ProductValues) -> Result<RowId> {
        (**self).insert(values)
    }

    fn query_all(&self) -> Result<Rows> {
        (**self).query_all()
    }

    fn query_one(&self, id: RowId) -> Result<Option<Product>> {
        (**self).query_one(id)
    }

    fn update(&mut self, id: RowId, values: &ProductValues) -> Result<usize> {
        (**self).update(id, values)
    }

    fn delete(&mut self, id: RowId) -> Result<usize> {
        (**self).delete(id)
    }

    fn clear(&mut self) -> Result<usize> {
        (**self).clear()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    fn insert(&mut self, values: ProductValues) -> Result<RowId> {
        self.as_mut().insert(values)
    }

    fn query_all(&self) -> Result<Rows> {
        self.as_ref().query_all()
    }

    fn query_one(&self, id: RowId) -> Result<Option<Product>> {
        self.as_ref().query_one(id)
    }

    fn update(&mut self, id: RowId, values: &ProductValues) -> Result<usize> {
        self.as_mut().update(id, values)
    }

    fn delete(&mut self, id: RowId) -> Result<usize> {
        self.as_mut().delete(id)
    }

    fn clear(&mut self) -> Result<usize> {
        self.as_mut().clear()
    }

    fn reset(&mut self) -> Result<()> {
        self.as_mut().reset()
    }
}
