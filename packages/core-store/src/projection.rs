//! Row projection: view models and row actions for list presentation.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::notifier::{ChangeEvent, Handler, SubscriptionId};
use crate::{Product, ProductValues, Resolver, Result, RowId, MAX_COUNT};

/// What a list renders for one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewModel {
    pub id: RowId,
    pub name: String,
    pub price_display: String,
    pub quantity_display: String,
    pub image_ref: String,
}

/// Project a row into its view model.
pub fn project(row: &Product) -> ViewModel {
    ViewModel {
        id: row.id,
        name: row.name.clone(),
        price_display: row.price.to_string(),
        quantity_display: row.quantity.to_string(),
        image_ref: row.image_ref.clone(),
    }
}

/// The actions a list row offers.
///
/// Each action issues exactly one quantity update and returns the number of
/// rows affected.
pub trait RowActions {
    /// Sell one unit. Stays at 0 when sold out.
    fn sell(&self, row: &Product) -> Result<usize>;

    /// Add one unit. Stays at the largest count when full.
    fn increment(&self, row: &Product) -> Result<usize>;

    /// Remove one unit. Stays at 0 when empty.
    fn decrement(&self, row: &Product) -> Result<usize>;
}

/// [`RowActions`] that write through a [`Resolver`].
#[derive(Clone, Copy, Debug)]
pub struct ProductActions<'a> {
    resolver: &'a Resolver,
}

impl<'a> ProductActions<'a> {
    pub fn new(resolver: &'a Resolver) -> Self {
        Self { resolver }
    }

    fn set_quantity(&self, row: &Product, quantity: u64) -> Result<usize> {
        self.resolver.update(
            &self.resolver.item(row.id),
            &ProductValues::new().quantity(quantity),
        )
    }
}

impl RowActions for ProductActions<'_> {
    fn sell(&self, row: &Product) -> Result<usize> {
        self.set_quantity(row, row.quantity.saturating_sub(1))
    }

    fn increment(&self, row: &Product) -> Result<usize> {
        self.set_quantity(row, row.quantity.saturating_add(1).min(MAX_COUNT))
    }

    fn decrement(&self, row: &Product) -> Result<usize> {
        self.set_quantity(row, row.quantity.saturating_sub(1))
    }
}

/// A list bound to the product collection.
///
/// The list re-projects every row whenever a write under the collection
/// commits, and stops listening when dropped.
pub struct ProductList {
    resolver: Weak<Resolver>,
    rows: Arc<RwLock<Vec<ViewModel>>>,
    subscription: SubscriptionId,
}

impl ProductList {
    /// Subscribe to the collection, then load the current rows.
    ///
    /// A write that commits while binding is seen either by the initial load
    /// or by the subscription.
    pub fn bind(resolver: &Arc<Resolver>) -> Result<Self> {
        let rows = Arc::new(RwLock::new(Vec::new()));

        let weak = Arc::downgrade(resolver);
        let target = rows.clone();
        let handler: Handler = Arc::new(move |event: &ChangeEvent<'_>| {
            let Some(resolver) = weak.upgrade() else {
                return;
            };
            if let Err(e) = refresh(&resolver, &target) {
                tracing::warn!(resource = %event.resource(), error = %e, "list refresh failed");
            }
        });
        let subscription = resolver.subscribe(resolver.collection(), handler)?;

        if let Err(e) = refresh(resolver, &rows) {
            resolver.notifier().unsubscribe(subscription);
            return Err(e);
        }

        Ok(Self {
            resolver: Arc::downgrade(resolver),
            rows,
            subscription,
        })
    }

    /// The projected rows as of the last refresh.
    pub fn rows(&self) -> Vec<ViewModel> {
        self.rows.read().clone()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Projected row with this id.
    pub fn find(&self, id: RowId) -> Option<ViewModel> {
        self.rows.read().iter().find(|vm| vm.id == id).cloned()
    }
}

impl Drop for ProductList {
    fn drop(&mut self) {
        if let Some(resolver) = self.resolver.upgrade() {
            resolver.notifier().unsubscribe(self.subscription);
        }
    }
}

impl std::fmt::Debug for ProductList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductList")
            .field("rows", &self.len())
            .field("subscription", &self.subscription)
            .finish()
    }
}

fn refresh(resolver: &Resolver, rows: &RwLock<Vec<ViewModel>>) -> Result<()> {
    // Query under the lock so concurrent refreshes land in query order.
    let mut rows = rows.write();
    *rows = resolver.query_all()?.iter().map(project).collect();
    Ok(())
}
