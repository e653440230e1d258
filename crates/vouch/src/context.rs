//! The validation context shared by every predicate in a session.

use crate::error::{ConfigError, Outcome, ValidationFailure};
use crate::finding::{render_text, Domain, Finding, FindingKind};
use crate::value::Value;
use std::collections::HashMap;

/// Check a display label.
///
/// Labels prefix every report line, so they may not contain control
/// characters or the `:`, `,`, `<`, `>` separators.
pub fn check_label(label: &str) -> Result<(), ConfigError> {
    let forbidden = |c: char| c.is_control() || matches!(c, ':' | ',' | '<' | '>');
    if label.chars().any(forbidden) {
        return Err(ConfigError::InvalidLabel {
            label: label.to_string(),
        });
    }
    Ok(())
}

/// Mutable state for one validation session: the subject, its label, the
/// throw-mode flag and the findings recorded so far.
///
/// Findings are append-only. They are cleared only by [`reset`](Self::reset).
///
/// ## Example
///
/// ```rust
/// use vouch::{Domain, Finding, FindingKind, ValidationContext};
///
/// let mut ctx = ValidationContext::builder("hi")
///     .label("greeting")
///     .build()
///     .unwrap();
///
/// ctx.record(Finding::new(FindingKind::TooShort, Domain::String)).unwrap();
/// assert_eq!(ctx.render_report_as_text(), "greeting: tooShort failure in string");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    subject: Value,
    label: Option<String>,
    throw_on_failure: bool,
    findings: Vec<Finding>,
    /// Memoized domain type checks, so selecting a domain twice never
    /// records its type finding twice.
    type_checks: HashMap<Domain, bool>,
}

impl ValidationContext {
    /// Create a context for `subject` with no label and throw-mode off.
    pub fn new(subject: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Create a builder for constructing a validation context.
    pub fn builder(subject: impl Into<Value>) -> ValidationContextBuilder {
        ValidationContextBuilder::new(subject)
    }

    pub fn subject(&self) -> &Value {
        &self.subject
    }

    /// Replace the subject. Memoized type checks are dropped; findings are
    /// kept.
    pub fn set_value(&mut self, subject: impl Into<Value>) {
        self.subject = subject.into();
        self.type_checks.clear();
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> Result<(), ConfigError> {
        let label = label.into();
        check_label(&label)?;
        self.label = Some(label);
        Ok(())
    }

    pub fn clear_label(&mut self) {
        self.label = None;
    }

    pub fn throw_on_failure(&self) -> bool {
        self.throw_on_failure
    }

    pub fn set_throw_on_failure(&mut self, throw_on_failure: bool) {
        self.throw_on_failure = throw_on_failure;
    }

    /// Append a finding, stamped with the context label.
    ///
    /// In throw-mode this returns a [`ValidationFailure`] carrying the full
    /// report, including everything recorded before this finding.
    pub fn record(&mut self, finding: Finding) -> Result<(), ValidationFailure> {
        let finding = finding.labelled(self.label.as_deref());
        tracing::debug!(
            kind = %finding.kind,
            domain = %finding.domain,
            index = ?finding.at_index,
            "validation finding recorded"
        );
        self.findings.push(finding);

        if self.throw_on_failure {
            tracing::debug!(
                findings = self.findings.len(),
                "throw-mode raising validation failure"
            );
            return Err(ValidationFailure::new(
                self.render_report_as_text(),
                self.findings.clone(),
            ));
        }
        Ok(())
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Whether any finding was recorded in `domain`.
    pub fn has_findings_in(&self, domain: Domain) -> bool {
        self.findings.iter().any(|f| f.domain == domain)
    }

    /// The findings recorded so far, in order.
    pub fn render_report(&self) -> &[Finding] {
        &self.findings
    }

    /// One line per finding; empty when nothing was recorded.
    pub fn render_report_as_text(&self) -> String {
        render_text(&self.findings)
    }

    /// Drop all findings and memoized type checks. Label and throw-mode are
    /// kept.
    pub fn reset(&mut self) {
        tracing::trace!(cleared = self.findings.len(), "validation report cleared");
        self.findings.clear();
        self.type_checks.clear();
    }

    /// Record every finding in order; passes only when there were none.
    pub(crate) fn settle(&mut self, findings: impl IntoIterator<Item = Finding>) -> Outcome {
        let mut passed = true;
        for finding in findings {
            passed = false;
            self.record(finding)?;
        }
        Ok(passed)
    }

    /// Run the type check for `domain` once per session.
    ///
    /// Null and undefined subjects record their own finding kinds before
    /// any domain-specific check.
    pub(crate) fn ensure_type(&mut self, domain: Domain) -> Outcome {
        if let Some(passed) = self.type_checks.get(&domain) {
            return Ok(*passed);
        }
        let violation = type_violation(&self.subject, domain);
        self.type_checks.insert(domain, violation.is_none());
        self.settle(violation)
    }
}

/// The finding a value earns when it is not of `domain`'s type.
pub(crate) fn type_violation(value: &Value, domain: Domain) -> Option<Finding> {
    let kind = match (value, domain) {
        (Value::Undefined, _) => FindingKind::UndefinedEncountered,
        (Value::Null, _) => FindingKind::NullEncountered,
        (Value::Number(n), Domain::Number) if n.is_nan() => FindingKind::NaNEncountered,
        (Value::String(_), Domain::String)
        | (Value::Number(_), Domain::Number)
        | (Value::Object(_), Domain::Object)
        | (Value::Array(_), Domain::Array) => return None,
        _ => {
            return Some(
                Finding::new(FindingKind::UnexpectedType, domain)
                    .actual(value.kind_name())
                    .expected(domain.as_str()),
            )
        }
    };
    Some(Finding::new(kind, domain))
}

/// Builder for constructing a `ValidationContext`.
#[derive(Debug, Default)]
pub struct ValidationContextBuilder {
    subject: Value,
    label: Option<String>,
    throw_on_failure: bool,
}

impl ValidationContextBuilder {
    pub fn new(subject: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Set the display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Enable or disable throw-mode.
    pub fn throw_on_failure(mut self, throw_on_failure: bool) -> Self {
        self.throw_on_failure = throw_on_failure;
        self
    }

    /// Build the validation context, rejecting an invalid label.
    pub fn build(self) -> Result<ValidationContext, ConfigError> {
        if let Some(label) = &self.label {
            check_label(label)?;
        }
        Ok(self.build_unchecked())
    }

    /// Build without re-checking a label that was validated upstream.
    pub(crate) fn build_unchecked(self) -> ValidationContext {
        ValidationContext {
            subject: self.subject,
            label: self.label,
            throw_on_failure: self.throw_on_failure,
            findings: Vec::new(),
            type_checks: HashMap::new(),
        }
    }
}
