//! Courier Infrastructure - Adapters and implementations
//!
//! This crate provides the concrete side of the request engine: the reqwest
//! executor, body building and worker offload, the Postman translator, the
//! output formatters and the settings file.

pub mod adapters;
pub mod export;
pub mod http;
pub mod import;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestExecutor, SAVE_PATH_HEADER};
pub use export::{DuplicateNamePolicy, ExportError, FORM_BOUNDARY, to_http_file, to_structured_map};
pub use http::{BodyBuildError, BuiltBody, WorkerClassifier, build_body, validate_file_path};
pub use import::{
    TranslateError, TranslatedBody, TranslatedCollection, TranslatedItem, TranslatedRequest,
    TranslationWarning, WarningSeverity, WarningStats, translate, translate_environment,
    translate_str,
};
pub use persistence::{SettingsError, SettingsRepository};
pub use serialization::{SerializationError, from_json, to_json_pretty, to_json_stable};
