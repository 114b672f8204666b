//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Pretty-prints with a 2-space indent and no trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Serializes a whole document: 2-space indent plus a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializationError> {
    let mut json = to_json_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use courier_domain::ClientSettings;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_two_space_indent_and_newline() {
        let json = to_json_stable(&json!({"b": 1, "a": [true]})).unwrap();
        assert_eq!(json, "{\n  \"b\": 1,\n  \"a\": [\n    true\n  ]\n}\n");
        assert!(!to_json_pretty(&json!({})).unwrap().ends_with('\n'));
    }

    #[test]
    fn test_settings_survive_a_write_and_read() {
        let settings = ClientSettings {
            timeout_ms: 1_500,
            ..ClientSettings::default()
        };
        let restored: ClientSettings = from_json(&to_json_stable(&settings).unwrap()).unwrap();
        assert_eq!(restored, settings);
    }
}
