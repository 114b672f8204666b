//! Import of external collection formats.

pub mod postman;

pub use postman::{
    TranslateError, TranslatedBody, TranslatedCollection, TranslatedItem, TranslatedRequest,
    TranslationWarning, WarningSeverity, WarningStats, translate, translate_environment,
    translate_str,
};
