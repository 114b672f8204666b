//! Postman Import Module
//!
//! Translates Postman Collection v2.x and environment exports into the
//! Courier model.

pub mod environment_types;
pub mod model;
pub mod translator;
pub mod types;
pub mod warning;

pub use environment_types::PostmanEnvironment;
pub use model::{TranslatedBody, TranslatedCollection, TranslatedItem, TranslatedRequest};
pub use translator::{
    TranslateError, build_url, extract_body, process_auth, translate, translate_environment,
    translate_str,
};
pub use types::PostmanCollection;
pub use warning::{TranslationWarning, WarningSeverity, WarningStats};
