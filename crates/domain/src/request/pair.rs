//! Key/value pairs used for headers, query params and form fields.

use serde::{Deserialize, Serialize};

/// A single key/value entry that can be switched off without being deleted.
///
/// Disabled pairs stay in storage and are skipped when a request is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Entry name.
    pub key: String,
    /// Entry value.
    #[serde(default)]
    pub value: String,
    /// Whether this entry takes part in execution.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl KeyValuePair {
    /// Creates a new enabled pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a disabled pair.
    #[must_use]
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key, value)
        }
    }

    /// Returns true when the pair is enabled and has a non-blank key.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.key.trim().is_empty()
    }
}

/// Iterates over the pairs that take part in execution.
pub fn active_pairs(pairs: &[KeyValuePair]) -> impl Iterator<Item = &KeyValuePair> {
    pairs.iter().filter(|p| p.is_active())
}
