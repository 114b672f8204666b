//! Normalized authentication descriptor.
//!
//! Imported auth schemes are flattened into a named credential plus where it
//! goes on the wire. The name `"none"` switches auth off.

use serde::{Deserialize, Serialize};

/// Where an auth credential is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthPlacement {
    /// Sent as a request header.
    #[default]
    Header,
    /// Merged into the request body as a field.
    Body,
}

/// Credential details of an [`AuthSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Header or body field name, e.g. `Authorization` or `api_key`.
    #[serde(default)]
    pub key: String,
    /// Where the credential is placed.
    #[serde(rename = "type", default)]
    pub placement: AuthPlacement,
    /// The credential written under `key`.
    #[serde(default)]
    pub value: String,
}

/// Auth attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSpec {
    /// Scheme name (`bearer`, `basic`, `apikey`, ...) or `none`.
    pub name: String,
    /// Credential and placement.
    #[serde(default)]
    pub config: AuthConfig,
}

impl AuthSpec {
    /// Name that disables auth.
    pub const NONE: &'static str = "none";

    /// Auth switched off.
    #[must_use]
    pub fn none() -> Self {
        Self {
            name: Self::NONE.to_string(),
            config: AuthConfig::default(),
        }
    }

    /// A credential sent as a header.
    #[must_use]
    pub fn header(name: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: AuthConfig {
                key: key.into(),
                placement: AuthPlacement::Header,
                value: value.into(),
            },
        }
    }

    /// A credential merged into the body.
    #[must_use]
    pub fn body(name: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: AuthConfig {
                key: key.into(),
                placement: AuthPlacement::Body,
                value: value.into(),
            },
        }
    }

    /// Returns true when this auth writes nothing.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.name.is_empty() || self.name == Self::NONE || self.config.key.is_empty()
    }
}

impl Default for AuthSpec {
    fn default() -> Self {
        Self::none()
    }
}
