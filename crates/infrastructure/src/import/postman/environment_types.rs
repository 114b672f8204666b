//! Postman Environment Type Definitions

use serde::{Deserialize, Serialize};

use super::types::{lenient, lenient_vec};

/// Root structure for a Postman environment export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanEnvironment {
    /// Environment name
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    /// Environment variables
    #[serde(default, deserialize_with = "lenient_vec")]
    pub values: Vec<PostmanEnvVariable>,
}

/// Postman environment variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEnvVariable {
    /// Variable key/name
    pub key: String,
    /// Variable value
    #[serde(default, deserialize_with = "lenient")]
    pub value: String,
    /// Whether the variable is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

const fn default_true() -> bool {
    true
}
