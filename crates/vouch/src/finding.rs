//! Findings: structured records of failed predicates.

use crate::context::check_label;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The taxonomy of violations a predicate can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    #[serde(rename = "unexpectedType")]
    UnexpectedType,
    #[serde(rename = "missingProperty")]
    MissingProperty,
    #[serde(rename = "unexpectedProperty")]
    UnexpectedProperty,
    #[serde(rename = "missingValue")]
    MissingValue,
    #[serde(rename = "unexpectedValue")]
    UnexpectedValue,
    #[serde(rename = "unexpectedValueType")]
    UnexpectedValueType,
    #[serde(rename = "faultyLength")]
    FaultyLength,
    #[serde(rename = "tooShort")]
    TooShort,
    #[serde(rename = "tooLong")]
    TooLong,
    #[serde(rename = "nullEncountered")]
    NullEncountered,
    #[serde(rename = "undefinedEncountered")]
    UndefinedEncountered,
    #[serde(rename = "NaNEncountered")]
    NaNEncountered,
}

impl FindingKind {
    pub const ALL: [FindingKind; 12] = [
        FindingKind::UnexpectedType,
        FindingKind::MissingProperty,
        FindingKind::UnexpectedProperty,
        FindingKind::MissingValue,
        FindingKind::UnexpectedValue,
        FindingKind::UnexpectedValueType,
        FindingKind::FaultyLength,
        FindingKind::TooShort,
        FindingKind::TooLong,
        FindingKind::NullEncountered,
        FindingKind::UndefinedEncountered,
        FindingKind::NaNEncountered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::UnexpectedType => "unexpectedType",
            FindingKind::MissingProperty => "missingProperty",
            FindingKind::UnexpectedProperty => "unexpectedProperty",
            FindingKind::MissingValue => "missingValue",
            FindingKind::UnexpectedValue => "unexpectedValue",
            FindingKind::UnexpectedValueType => "unexpectedValueType",
            FindingKind::FaultyLength => "faultyLength",
            FindingKind::TooShort => "tooShort",
            FindingKind::TooLong => "tooLong",
            FindingKind::NullEncountered => "nullEncountered",
            FindingKind::UndefinedEncountered => "undefinedEncountered",
            FindingKind::NaNEncountered => "NaNEncountered",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FindingKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FindingKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// The data domain a check ran in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    String,
    Number,
    Object,
    Array,
}

impl Domain {
    pub const ALL: [Domain; 4] = [Domain::String, Domain::Number, Domain::Object, Domain::Array];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::String => "string",
            Domain::Number => "number",
            Domain::Object => "object",
            Domain::Array => "array",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or(())
    }
}

/// One recorded violation.
///
/// Renders as a single report line:
/// `[label: ]<kind> failure in <domain>[, at <index>][, is <actual>][, expected <expected>]`.
/// Line breaks and backslashes inside the actual and expected descriptions
/// are escaped so every finding occupies exactly one line. A comma in the
/// actual description that would read as `, expected ` is escaped as `\,`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub domain: Domain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl Finding {
    pub fn new(kind: FindingKind, domain: Domain) -> Self {
        Self {
            kind,
            domain,
            label: None,
            actual: None,
            at_index: None,
            expected: None,
        }
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn at(mut self, index: usize) -> Self {
        self.at_index = Some(index);
        self
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn labelled(mut self, label: Option<&str>) -> Self {
        self.label = label.map(str::to_string);
        self
    }

    /// Parse a rendered report line back into a finding.
    ///
    /// This is the inverse of the `Display` rendering.
    pub fn parse_line(line: &str) -> Option<Self> {
        if let Some(finding) = Self::parse_unlabelled(line) {
            return Some(finding);
        }
        // Labels never contain `:` or `,`, so the first `: ` ends the label.
        let (label, body) = line.split_once(": ")?;
        check_label(label).ok()?;
        let mut finding = Self::parse_unlabelled(body)?;
        finding.label = Some(label.to_string());
        Some(finding)
    }

    fn parse_unlabelled(line: &str) -> Option<Self> {
        let (kind, rest) = line.split_once(" failure in ")?;
        let kind = kind.parse().ok()?;

        let (domain, mut rest) = rest.split_once(", ").unwrap_or((rest, ""));
        let domain = domain.parse().ok()?;

        let mut finding = Finding::new(kind, domain);

        if let Some(after) = rest.strip_prefix("at ") {
            let (index, remainder) = after.split_once(", ").unwrap_or((after, ""));
            finding.at_index = Some(index.parse().ok()?);
            rest = remainder;
        }

        if let Some(after) = rest.strip_prefix("is ") {
            match find_unescaped(after, EXPECTED_SEPARATOR) {
                Some(pos) => {
                    finding.actual = Some(unescape(&after[..pos]));
                    rest = &after[pos + 2..];
                }
                None => {
                    finding.actual = Some(unescape(after));
                    rest = "";
                }
            }
        }

        if let Some(after) = rest.strip_prefix("expected ") {
            finding.expected = Some(unescape(after));
        } else if !rest.is_empty() {
            return None;
        }

        Some(finding)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label}: ")?;
        }
        write!(f, "{} failure in {}", self.kind, self.domain)?;
        if let Some(index) = self.at_index {
            write!(f, ", at {index}")?;
        }
        if let Some(actual) = &self.actual {
            write!(f, ", is {}", escape(actual, Some(EXPECTED_SEPARATOR)))?;
        }
        if let Some(expected) = &self.expected {
            write!(f, ", expected {}", escape(expected, None))?;
        }
        Ok(())
    }
}

/// Render findings as report text, one line per finding.
pub fn render_text(findings: &[Finding]) -> String {
    findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse report text produced by [`render_text`].
///
/// Returns `None` if any line is not a rendered finding.
pub fn parse_text(text: &str) -> Option<Vec<Finding>> {
    if text.is_empty() {
        return Some(Vec::new());
    }
    text.lines().map(Finding::parse_line).collect()
}

const EXPECTED_SEPARATOR: &str = ", expected ";

/// Escape line breaks and backslashes; a comma that starts `separator` is
/// escaped too.
fn escape(s: &str, separator: Option<&str>) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ',' if separator.is_some_and(|sep| s[i..].starts_with(sep)) => out.push_str("\\,"),
            other => out.push(other),
        }
    }
    out
}

/// Byte offset of the first occurrence of `pattern` not preceded by an
/// escaping backslash.
fn find_unescaped(s: &str, pattern: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if s[i..].starts_with(pattern) {
            return Some(i);
        }
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
