//! Error types for the core layer.

use crate::path::{Path, PathError};
use crate::product::RowId;
use crate::resource::ResourceId;

/// Errors at the core layer.
///
/// "Row not found" is deliberately absent from the write paths: update and
/// delete against a missing id report `0` rows affected instead. `NotFound`
/// exists for callers that need a row to proceed (opening an editor on an
/// existing product, for example).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path validation error.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// A path parsed, but it does not name a resource.
    #[error("invalid path: {message}")]
    InvalidPath { message: String },

    /// No collection is registered under this path.
    #[error("no route for path: {path}")]
    NoRoute { path: Path },

    /// A column value failed validation before reaching the store.
    #[error("invalid value for column '{column}': {message}")]
    InvalidArgument { column: String, message: String },

    /// The addressed row does not exist.
    #[error("no product with id {id}")]
    NotFound { id: RowId },

    /// The store could not complete the operation. No partial state was kept.
    #[error("store failure: {message}")]
    Failed { message: String },

    /// A change handler tried to write inline while notifications were
    /// being dispatched.
    #[error("write to '{resource}' attempted during change dispatch; defer it instead")]
    ReentrantWrite { resource: ResourceId },

    /// Generic error with message.
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Build an `InvalidArgument` error for a column.
    pub fn invalid_argument(column: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Build a `Failed` error.
    pub fn failed(message: impl Into<String>) -> Self {
        Error::Failed {
            message: message.into(),
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use std::error::Error as StdError;

    #[test]
    fn no_route_display() {
        let e = Error::NoRoute {
            path: path!("orders"),
        };
        assert!(e.to_string().contains("orders"));
    }

    #[test]
    fn invalid_argument_display() {
        let e = Error::invalid_argument("price", "expected a non-negative integer, got 'abc'");
        let display = e.to_string();
        assert!(display.contains("price"));
        assert!(display.contains("abc"));
    }

    #[test]
    fn not_found_display() {
        let e = Error::NotFound { id: RowId(7) };
        assert_eq!(e.to_string(), "no product with id 7");
    }

    #[test]
    fn failed_display() {
        let e = Error::failed("disk full");
        assert_eq!(e.to_string(), "store failure: disk full");
    }

    #[test]
    fn other_error_display() {
        let e = Error::Other {
            message: "something went wrong".to_string(),
        };
        assert_eq!(e.to_string(), "something went wrong");
    }

    #[test]
    fn path_errors_convert_and_chain() {
        let e: Error = crate::Path::parse("products/bad name").unwrap_err().into();
        assert!(matches!(e, Error::Path(PathError::InvalidComponent { position: 1, .. })));
        assert!(StdError::source(&e).is_some());

        let other = Error::Other {
            message: "test".to_string(),
        };
        assert!(StdError::source(&other).is_none());
    }
}
