//! Environment variables used for `{{name}}` substitution.

use serde::{Deserialize, Serialize};

/// One substitution entry. Environments are flat: values are never nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    /// Variable name, matched exactly and case-sensitively.
    pub name: String,
    /// Replacement text.
    #[serde(default)]
    pub value: String,
    /// Disabled entries are never used for lookup.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl EnvironmentVariable {
    /// Creates an enabled variable.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a disabled variable.
    #[must_use]
    pub fn disabled(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(name, value)
        }
    }
}

/// A named set of variables, as imported from an environment file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Environment {
    /// Environment name.
    pub name: String,
    /// Variables in declaration order.
    #[serde(default)]
    pub variables: Vec<EnvironmentVariable>,
}

/// Returns the value of the first enabled entry named `name`.
#[must_use]
pub fn lookup<'a>(entries: &'a [EnvironmentVariable], name: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|v| v.enabled && v.name == name)
        .map(|v| v.value.as_str())
}
