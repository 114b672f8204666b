//! Translation warnings
//!
//! Anything the translator cannot carry over is recorded here instead of
//! aborting the import.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Skipped, nothing on the wire changes.
    Info,
    /// The request will not behave exactly like the source.
    Warning,
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Something the translator dropped or approximated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationWarning {
    /// Item path, e.g. `Users / Create user`.
    pub path: String,
    /// What happened.
    pub message: String,
    /// Severity level
    pub severity: WarningSeverity,
}

impl TranslationWarning {
    /// Create an info-level warning
    pub fn info(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: WarningSeverity::Info,
        }
    }

    /// Create a warning-level warning
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: WarningSeverity::Warning,
        }
    }
}

impl fmt::Display for TranslationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.path, self.message)
    }
}

/// Counts per severity.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WarningStats {
    /// Informational warnings.
    pub info_count: usize,
    /// Warning-level warnings.
    pub warning_count: usize,
}

impl WarningStats {
    /// Calculate stats from a list of warnings
    #[must_use]
    pub fn from_warnings(warnings: &[TranslationWarning]) -> Self {
        warnings.iter().fold(Self::default(), |mut stats, w| {
            match w.severity {
                WarningSeverity::Info => stats.info_count += 1,
                WarningSeverity::Warning => stats.warning_count += 1,
            }
            stats
        })
    }

    /// Total count of all warnings
    #[must_use]
    pub const fn total(&self) -> usize {
        self.info_count + self.warning_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let warning = TranslationWarning::warning("Users / Login", "digest auth not supported");
        assert_eq!(
            warning.to_string(),
            "[warning] Users / Login: digest auth not supported"
        );
    }

    #[test]
    fn test_warning_stats() {
        let warnings = vec![
            TranslationWarning::info("a", "info"),
            TranslationWarning::warning("b", "warn"),
            TranslationWarning::warning("c", "warn"),
        ];
        let stats = WarningStats::from_warnings(&warnings);
        assert_eq!(stats.info_count, 1);
        assert_eq!(stats.warning_count, 2);
        assert_eq!(stats.total(), 3);
    }
}
