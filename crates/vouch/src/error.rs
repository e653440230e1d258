//! Error types for the validation engine.

use crate::finding::Finding;
use thiserror::Error;

/// Wiring errors: a malformed rule configuration or an invalid label.
///
/// These are always returned, whatever the throw-mode, because they are
/// mistakes in how the validator was set up rather than findings about the
/// subject.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Rule configuration must be an object, got {0}")]
    NotAnObject(&'static str),

    #[error("Malformed rule configuration: {0}")]
    Malformed(String),

    #[error("Configuration value for `{key}` must be a finite number")]
    NonFinite { key: &'static str },

    #[error("Invalid label {label:?}: labels may not contain control characters, ':', ',', '<' or '>'")]
    InvalidLabel { label: String },

    #[error("No `{key}` rule is configured")]
    MissingRule { key: &'static str },
}

/// Raised by a predicate in throw-mode.
///
/// The message is the full report text at the moment of the failing call,
/// including every finding recorded earlier in the same session.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{report}")]
pub struct ValidationFailure {
    report: String,
    findings: Vec<Finding>,
}

impl ValidationFailure {
    pub(crate) fn new(report: String, findings: Vec<Finding>) -> Self {
        Self { report, findings }
    }

    /// The rendered report text.
    pub fn report(&self) -> &str {
        &self.report
    }

    /// The findings recorded up to and including the failing one.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Failed(#[from] ValidationFailure),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Predicate outcome: `Ok(passed)`, or `Err` when throw-mode escalates a
/// finding.
pub type Outcome = std::result::Result<bool, ValidationFailure>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Domain, FindingKind};

    #[test]
    fn failure_displays_report_text() {
        let findings = vec![Finding::new(FindingKind::TooLong, Domain::String)];
        let failure = ValidationFailure::new("tooLong failure in string".to_string(), findings);

        assert_eq!(failure.to_string(), "tooLong failure in string");
        assert_eq!(failure.findings().len(), 1);
    }

    #[test]
    fn config_errors_convert_into_crate_error() {
        let error: Error = ConfigError::UnknownKey("colour".to_string()).into();
        assert_eq!(error.to_string(), "Unknown configuration key: colour");
    }
}
