//! Output formatters for translated collections.
//!
//! - [`to_structured_map`]: nested map keyed by item name
//! - [`to_http_file`]: `.http` text consumable by REST-client style editors

mod http_file;
mod structured;

pub use http_file::{FORM_BOUNDARY, to_http_file};
pub use structured::to_structured_map;

use thiserror::Error;

use crate::serialization::SerializationError;

/// What the structured formatter does with same-named siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateNamePolicy {
    /// The later sibling replaces the earlier one in place.
    #[default]
    Overwrite,
    /// Fail with [`ExportError::DuplicateName`].
    Reject,
}

/// Export error type.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Two siblings share a name under [`DuplicateNamePolicy::Reject`].
    #[error("Duplicate item name '{name}' in '{parent}'")]
    DuplicateName {
        /// The repeated name.
        name: String,
        /// Folder path of the siblings; empty at the root.
        parent: String,
    },
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
}
