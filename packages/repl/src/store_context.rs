//! Inventory context for the REPL.
//!
//! The context owns the resolver, a list binding that follows every write,
//! and at most one open editor session.

use std::path::PathBuf;
use std::sync::Arc;

use stockfs_core_store::{
    ChangeNotifier, EditorSession, Error as StoreError, MemoryStore, Product, ProductList,
    Resolver, ResolverConfig, ResourceId, RowId, StoreBox,
};
use stockfs_json_store::{LocalDiskStore, LocalStoreError};

#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Local store error: {0}")]
    LocalStore(#[from] LocalStoreError),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("{0}")]
    Session(String),
}

/// Where the products table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Local { path: PathBuf },
}

/// Settings for building an [`InventoryContext`].
#[derive(Debug, Clone)]
pub struct ContextConfig {
    pub backend: Backend,
    pub resolver: ResolverConfig,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            resolver: ResolverConfig::default(),
        }
    }
}

/// Manages the REPL's resolver, list view and editor session
pub struct InventoryContext {
    resolver: Arc<Resolver>,
    list: ProductList,
    session: Option<EditorSession>,
}

impl InventoryContext {
    pub fn new(config: ContextConfig) -> Result<Self, ContextError> {
        let store: StoreBox = match &config.backend {
            Backend::Memory => Box::new(MemoryStore::new()),
            Backend::Local { path } => {
                std::fs::create_dir_all(path).map_err(|error| {
                    LocalStoreError::RootPathInvalid {
                        path: path.clone(),
                        error,
                    }
                })?;
                Box::new(LocalDiskStore::new(path.clone())?)
            }
        };
        tracing::debug!(backend = ?config.backend, "opening inventory");

        let resolver = Arc::new(Resolver::from_box(
            store,
            Arc::new(ChangeNotifier::new()),
            config.resolver,
        ));
        let list = ProductList::bind(&resolver)?;

        Ok(Self {
            resolver,
            list,
            session: None,
        })
    }

    /// A context over an empty in-memory store.
    pub fn in_memory() -> Result<Self, ContextError> {
        Self::new(ContextConfig::default())
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// The list view bound to the collection.
    pub fn list(&self) -> &ProductList {
        &self.list
    }

    /// Parse a resource argument.
    ///
    /// A bare number is shorthand for an item of the served collection;
    /// anything else is parsed as a full identifier.
    pub fn parse_resource(&self, arg: &str) -> Result<ResourceId, ContextError> {
        let arg = arg.trim();
        if arg.is_empty() {
            return Err(ContextError::InvalidResource(
                "expected an id or resource".to_string(),
            ));
        }
        if let Ok(id) = arg.parse::<u64>() {
            return Ok(self.resolver.item(RowId(id)));
        }
        Ok(ResourceId::parse(arg)?)
    }

    /// Parse an argument that must address a single row.
    pub fn parse_item(&self, arg: &str) -> Result<ResourceId, ContextError> {
        let resource = self.parse_resource(arg)?;
        if resource.is_item() {
            Ok(resource)
        } else {
            Err(ContextError::InvalidResource(format!(
                "'{}' is a collection, expected a single product",
                resource
            )))
        }
    }

    /// The current row at an item identifier.
    pub fn row(&self, item: &ResourceId) -> Result<Product, ContextError> {
        let id = item
            .id()
            .ok_or_else(|| ContextError::InvalidResource(item.to_string()))?;
        self.resolver
            .query(item)?
            .into_row()
            .ok_or(ContextError::Store(StoreError::NotFound { id }))
    }

    pub fn session(&self) -> Option<&EditorSession> {
        self.session.as_ref()
    }

    /// The open session, or an error telling the user to open one.
    pub fn session_mut(&mut self) -> Result<&mut EditorSession, ContextError> {
        self.session
            .as_mut()
            .ok_or_else(|| ContextError::Session("No editor open. Use 'new' or 'edit <id>'.".to_string()))
    }

    /// Open a session, refusing to replace one with unsaved changes.
    pub fn open_session(&mut self, session: EditorSession) -> Result<(), ContextError> {
        if self.session.as_ref().is_some_and(EditorSession::is_dirty) {
            return Err(ContextError::Session(
                "The open editor has unsaved changes. Use 'save' or 'discard' first.".to_string(),
            ));
        }
        self.session = Some(session);
        Ok(())
    }

    /// Take the open session out of the context.
    pub fn take_session(&mut self) -> Result<EditorSession, ContextError> {
        self.session
            .take()
            .ok_or_else(|| ContextError::Session("No editor open. Use 'new' or 'edit <id>'.".to_string()))
    }

    /// Put a session back, e.g. after a rejected save.
    pub fn restore_session(&mut self, session: EditorSession) {
        self.session = Some(session);
    }
}
