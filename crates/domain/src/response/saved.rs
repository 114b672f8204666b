//! Example response stored next to a route.

use serde::{Deserialize, Serialize};

use crate::request::KeyValuePair;

/// A response kept as documentation for a route; never produced by execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResponseSpec {
    /// Example name.
    #[serde(default)]
    pub name: String,
    /// Status code.
    #[serde(default)]
    pub status: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,
    /// Body text.
    #[serde(default)]
    pub body: String,
}
