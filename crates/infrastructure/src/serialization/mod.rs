//! Deterministic JSON output.
//!
//! Used for CLI output, exported files and the settings file:
//! - 2-space indentation
//! - key order as produced by the source types (insertion order for maps)
//! - trailing newline for whole documents

mod json;

pub use json::{SerializationError, from_json, to_json_pretty, to_json_stable};
