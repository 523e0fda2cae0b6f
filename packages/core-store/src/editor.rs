//! Editor sessions: in-progress edits of one product.
//!
//! A session starts either **New** (no target row) or **Editing** (opened on
//! an existing row). Field setters record text exactly as typed and mark the
//! session dirty; nothing reaches the store until [`EditorSession::save`],
//! which turns the form into one complete write.

use crate::product::{columns, parse_count};
use crate::{Error, ProductValues, Resolver, ResourceId, Result, RowId};

/// Which kind of write a save will perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    /// Creating a new product.
    New,
    /// Changing an existing product.
    Editing(RowId),
}

/// Answer to a close request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseDecision {
    /// Nothing was touched; leave immediately.
    CloseNow,
    /// Unsaved changes exist; ask before discarding them.
    ConfirmDiscard,
}

/// Why a save or delete did not happen.
#[derive(Debug, thiserror::Error)]
pub enum RejectReason {
    /// A new session with nothing entered. No store call was made.
    #[error("nothing to save")]
    Empty,

    /// A field failed validation. No store call was made.
    #[error("invalid value for column '{column}': {message}")]
    InvalidArgument { column: String, message: String },

    /// The target row no longer exists.
    #[error("no product with id {id}")]
    NotFound { id: RowId },

    /// The session has no target row to delete.
    #[error("product has not been saved yet")]
    Unsaved,

    /// The write failed.
    #[error(transparent)]
    Failed(Error),
}

impl From<Error> for RejectReason {
    fn from(e: Error) -> Self {
        match e {
            Error::InvalidArgument { column, message } => {
                RejectReason::InvalidArgument { column, message }
            }
            Error::NotFound { id } => RejectReason::NotFound { id },
            other => RejectReason::Failed(other),
        }
    }
}

/// A rejected save or delete, handing the session back unchanged.
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct Rejected {
    pub reason: RejectReason,
    pub session: EditorSession,
}

impl Rejected {
    fn new(reason: impl Into<RejectReason>, session: EditorSession) -> Self {
        Self {
            reason: reason.into(),
            session,
        }
    }
}

/// In-progress edits for one product.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorSession {
    target: Option<RowId>,
    dirty: bool,
    pending_image_ref: Option<String>,
    name: String,
    price: String,
    quantity: String,
}

impl EditorSession {
    /// A blank session for a new product.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session on an existing product, with the form filled from its row.
    ///
    /// Loading does not count as a touch.
    pub fn open(resolver: &Resolver, item: &ResourceId) -> Result<Self> {
        let ResourceId::Item(_, id) = item else {
            return Err(Error::InvalidPath {
                message: format!("an editor opens an item identifier, got '{}'", item),
            });
        };
        let row = resolver
            .query(item)?
            .into_row()
            .ok_or(Error::NotFound { id: *id })?;

        Ok(Self {
            target: Some(row.id),
            dirty: false,
            pending_image_ref: Some(row.image_ref),
            name: row.name,
            price: row.price.to_string(),
            quantity: row.quantity.to_string(),
        })
    }

    pub fn state(&self) -> EditorState {
        match self.target {
            Some(id) => EditorState::Editing(id),
            None => EditorState::New,
        }
    }

    pub fn target(&self) -> Option<RowId> {
        self.target
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the session as changed.
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_text(&self) -> &str {
        &self.price
    }

    pub fn quantity_text(&self) -> &str {
        &self.quantity
    }

    pub fn pending_image_ref(&self) -> Option<&str> {
        self.pending_image_ref.as_deref()
    }

    pub fn set_name(&mut self, text: impl Into<String>) {
        self.name = text.into();
        self.touch();
    }

    pub fn set_price(&mut self, text: impl Into<String>) {
        self.price = text.into();
        self.touch();
    }

    pub fn set_quantity(&mut self, text: impl Into<String>) {
        self.quantity = text.into();
        self.touch();
    }

    /// Record an already resolved image reference.
    pub fn choose_image(&mut self, image_ref: impl Into<String>) {
        self.pending_image_ref = Some(image_ref.into());
        self.touch();
    }

    pub fn request_close(&self) -> CloseDecision {
        if self.dirty {
            CloseDecision::ConfirmDiscard
        } else {
            CloseDecision::CloseNow
        }
    }

    /// Whether a delete affordance makes sense. Never for a product that
    /// does not exist yet.
    pub fn can_delete(&self) -> bool {
        self.target.is_some()
    }

    /// Commit the form as one complete write.
    ///
    /// Inserts for a new session, updates for an editing one. On rejection
    /// the session comes back so the caller can keep editing.
    pub fn save(self, resolver: &Resolver) -> std::result::Result<RowId, Rejected> {
        if self.target.is_none() && self.is_blank() {
            return Err(Rejected::new(RejectReason::Empty, self));
        }

        let values = match self.complete_values(resolver) {
            Ok(values) => values,
            Err(e) => return Err(Rejected::new(e, self)),
        };

        match self.target {
            None => match resolver.insert(&resolver.collection(), values) {
                Ok(item) => match item.id() {
                    Some(id) => Ok(id),
                    None => Err(Rejected::new(
                        Error::failed("insert did not produce a row id"),
                        self,
                    )),
                },
                Err(e) => Err(Rejected::new(e, self)),
            },
            Some(id) => match resolver.update(&resolver.item(id), &values) {
                Ok(0) => Err(Rejected::new(RejectReason::NotFound { id }, self)),
                Ok(_) => Ok(id),
                Err(e) => Err(Rejected::new(e, self)),
            },
        }
    }

    /// Delete the product being edited.
    pub fn delete(self, resolver: &Resolver) -> std::result::Result<RowId, Rejected> {
        let Some(id) = self.target else {
            return Err(Rejected::new(RejectReason::Unsaved, self));
        };
        match resolver.delete(&resolver.item(id)) {
            Ok(0) => Err(Rejected::new(RejectReason::NotFound { id }, self)),
            Ok(_) => Ok(id),
            Err(e) => Err(Rejected::new(e, self)),
        }
    }

    fn is_blank(&self) -> bool {
        self.pending_image_ref.is_none()
            && self.name.trim().is_empty()
            && self.price.trim().is_empty()
            && self.quantity.trim().is_empty()
    }

    fn complete_values(&self, resolver: &Resolver) -> Result<ProductValues> {
        let price = parse_count(columns::PRICE, &self.price)?.unwrap_or(0);
        let quantity = parse_count(columns::QUANTITY, &self.quantity)?.unwrap_or(0);
        let image_ref = self
            .pending_image_ref
            .clone()
            .unwrap_or_else(|| resolver.config().default_image_ref.clone());

        Ok(ProductValues::new()
            .name(self.name.trim())
            .price(price)
            .quantity(quantity)
            .image_ref(image_ref))
    }
}
