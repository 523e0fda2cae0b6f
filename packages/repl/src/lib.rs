//! # stockfs-repl
//!
//! An interactive shell over the stockfs inventory.
//!
//! The shell binds a product list to the resolver, so `list` always shows
//! the rows as of the last committed write, and drives editor sessions
//! through `new`, `edit`, `save` and friends.
//!
//! ## Usage
//!
//! ```bash
//! stockfs --data-dir ~/inventory
//!
//! # Inside the REPL:
//! > add {"name": "Widget", "price": 500, "quantity": 3}
//! > sell 1
//! > edit 1
//! > qty 10
//! > save
//! > list
//! ```

pub mod commands;
pub mod completer;
pub mod highlighter;
pub mod host;
pub mod io;
pub mod repl;
pub mod store_context;

pub use host::EditMode;
pub use repl::ReplCore;
pub use store_context::{Backend, ContextConfig, ContextError, InventoryContext};

use host::TerminalHost;

/// Error returned by [`run`].
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Io(#[from] io::IoError),
}

/// Open the inventory and run the REPL on the terminal until the user exits.
pub fn run(config: ContextConfig, mode: EditMode) -> Result<(), RunError> {
    let ctx = InventoryContext::new(config)?;
    let mut host = TerminalHost::new(mode)?;
    let reason = ReplCore::new(ctx).run(&mut host)?;
    tracing::debug!(?reason, "repl exited");
    Ok(())
}
