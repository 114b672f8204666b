//! ID generation utilities.

use uuid::Uuid;

/// Generates a new time-ordered id for collections, folders and routes.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}
