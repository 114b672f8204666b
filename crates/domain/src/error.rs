//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The body mode name is not one of the known modes.
    #[error("unknown body mode: {0}")]
    UnknownBodyMode(String),

    /// No item with the given id exists in the tree.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// A collection item has an invalid structure or the edit would break the tree.
    #[error("invalid collection item: {0}")]
    InvalidCollectionItem(String),

    /// An index path does not address an item.
    #[error("invalid item position: {0}")]
    InvalidPosition(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
