//! Persistence adapters.

mod settings_repository;

pub use settings_repository::{SettingsError, SettingsRepository};
