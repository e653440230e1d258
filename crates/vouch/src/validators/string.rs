//! String predicates.

use super::Measured;
use crate::context::ValidationContext;
use crate::error::{Outcome, ValidationFailure};
use crate::finding::{Domain, Finding, FindingKind};
use regex::Regex;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._-]+@(?:[A-Za-z0-9_-]+\.)+[A-Za-z]{2,6}$").unwrap()
    })
}

/// Predicates over text subjects.
#[derive(Debug)]
pub struct StringValidator<'a> {
    ctx: &'a mut ValidationContext,
}

impl<'a> StringValidator<'a> {
    pub fn new(ctx: &'a mut ValidationContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ValidationContext {
        self.ctx
    }

    /// The subject must be a string.
    pub fn is_type(&mut self) -> Outcome {
        self.ctx.ensure_type(Domain::String)
    }

    /// Type-check, then run `check` against the text.
    fn evaluate<F>(&mut self, check: F) -> Outcome
    where
        F: FnOnce(&str) -> Option<Finding>,
    {
        if !self.is_type()? {
            return Ok(false);
        }
        let finding = self.ctx.subject().as_str().and_then(check);
        self.ctx.settle(finding)
    }

    pub fn that_includes(&mut self, needle: &str) -> Outcome {
        self.evaluate(|s| {
            (!s.contains(needle)).then(|| {
                Finding::new(FindingKind::MissingValue, Domain::String)
                    .actual(s)
                    .expected(format!("to include {needle:?}"))
            })
        })
    }

    pub fn that_does_not_include(&mut self, needle: &str) -> Outcome {
        self.evaluate(|s| {
            s.contains(needle).then(|| {
                Finding::new(FindingKind::UnexpectedValue, Domain::String)
                    .actual(s)
                    .expected(format!("not to include {needle:?}"))
            })
        })
    }

    /// Passes when the text equals its upper-cased form, so text without
    /// cased characters passes vacuously.
    pub fn that_is_in_capital_letters(&mut self) -> Outcome {
        self.evaluate(|s| {
            (s.to_uppercase() != s).then(|| unexpected(s, "to be in capital letters"))
        })
    }

    pub fn that_is_in_small_letters(&mut self) -> Outcome {
        self.evaluate(|s| {
            (s.to_lowercase() != s).then(|| unexpected(s, "to be in small letters"))
        })
    }

    /// The first non-whitespace character must equal its upper-cased form.
    /// Blank text has no first letter and fails.
    pub fn first_letter_is_capital(&mut self) -> Outcome {
        self.evaluate(|s| match s.trim_start().chars().next() {
            None => Some(
                Finding::new(FindingKind::MissingValue, Domain::String)
                    .actual(s)
                    .expected("a first letter"),
            ),
            Some(first) if !first.to_uppercase().eq(std::iter::once(first)) => {
                Some(unexpected(s, "first letter to be capital"))
            }
            Some(_) => None,
        })
    }

    pub fn that_starts_with(&mut self, prefix: &str) -> Outcome {
        self.evaluate(|s| {
            (!s.starts_with(prefix)).then(|| unexpected(s, format!("to start with {prefix:?}")))
        })
    }

    pub fn that_ends_with(&mut self, suffix: &str) -> Outcome {
        self.evaluate(|s| {
            (!s.ends_with(suffix)).then(|| unexpected(s, format!("to end with {suffix:?}")))
        })
    }

    /// Staged email check. Evaluation stops at the first failing stage:
    ///
    /// 1. both `@` and `.` are present
    /// 2. at least two characters precede the `@`
    /// 3. the last `.` follows the `@` and has at least two characters after it
    /// 4. the whole address matches `local@labels.tld` with a 2 to 6 letter TLD
    pub fn that_is_an_email(&mut self) -> Outcome {
        self.evaluate(|s| email_violation(s).map(|expected| unexpected(s, expected)))
    }

    /// The text must parse as an absolute URL.
    pub fn that_is_a_url(&mut self) -> Outcome {
        self.evaluate(|s| {
            url::Url::parse(s)
                .is_err()
                .then(|| unexpected(s, "to be a valid URL"))
        })
    }
}

impl Measured for StringValidator<'_> {
    const DOMAIN: Domain = Domain::String;

    fn measure(&mut self) -> Result<Option<usize>, ValidationFailure> {
        if !self.is_type()? {
            return Ok(None);
        }
        Ok(self.ctx.subject().as_str().map(|s| s.chars().count()))
    }

    fn context_mut(&mut self) -> &mut ValidationContext {
        self.ctx
    }
}

fn unexpected(actual: &str, expected: impl Into<String>) -> Finding {
    Finding::new(FindingKind::UnexpectedValue, Domain::String)
        .actual(actual)
        .expected(expected)
}

fn email_violation(s: &str) -> Option<&'static str> {
    let (Some(at), Some(dot)) = (s.find('@'), s.rfind('.')) else {
        return Some("to contain '@' and '.'");
    };
    if s[..at].chars().count() < 2 {
        return Some("at least 2 characters before '@'");
    }
    if dot < at || s[dot + 1..].chars().count() < 2 {
        return Some("a '.' after '@' followed by at least 2 characters");
    }
    if !email_regex().is_match(s) {
        return Some("to be a valid email");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn check<F>(subject: impl Into<Value>, predicate: F) -> (bool, ValidationContext)
    where
        F: FnOnce(&mut StringValidator<'_>) -> Outcome,
    {
        let mut ctx = ValidationContext::new(subject);
        let passed = predicate(&mut StringValidator::new(&mut ctx)).unwrap();
        (passed, ctx)
    }

    #[test]
    fn non_strings_fail_the_type_check_once() {
        let mut ctx = ValidationContext::new(12);
        let mut validator = StringValidator::new(&mut ctx);

        assert!(!validator.is_type().unwrap());
        assert!(!validator.with_minimum_length(1).unwrap());
        assert!(!validator.that_includes("1").unwrap());

        let report = ctx.render_report();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].kind, FindingKind::UnexpectedType);
    }

    #[test]
    fn null_subject_records_null_encountered() {
        let (passed, ctx) = check(Value::Null, |v| v.that_is_a_url());
        assert!(!passed);
        assert_eq!(ctx.render_report()[0].kind, FindingKind::NullEncountered);
    }

    #[test]
    fn length_bounds() {
        assert!(check("abc", |v| v.with_minimum_length(3)).0);
        assert!(check("abc", |v| v.with_maximum_length(3)).0);
        assert!(check("abc", |v| v.with_exact_length(3)).0);

        let (passed, ctx) = check("ab", |v| v.with_minimum_length(3));
        assert!(!passed);
        assert_eq!(
            ctx.render_report_as_text(),
            "tooShort failure in string, is length 2, expected minimum length 3"
        );

        let (_, ctx) = check("abcd", |v| v.with_maximum_length(3));
        assert_eq!(ctx.render_report()[0].kind, FindingKind::TooLong);

        let (_, ctx) = check("abcd", |v| v.with_exact_length(3));
        assert_eq!(ctx.render_report()[0].kind, FindingKind::FaultyLength);
    }

    #[test]
    fn length_counts_characters() {
        assert!(check("héllo", |v| v.with_exact_length(5)).0);
    }

    #[test]
    fn substring_checks() {
        assert!(check("hello world", |v| v.that_includes("o w")).0);
        assert!(check("hello", |v| v.that_includes("")).0);
        assert!(!check("hello", |v| v.that_includes("Hello")).0);
        assert!(check("hello", |v| v.that_does_not_include("x")).0);
        assert!(!check("hello", |v| v.that_does_not_include("")).0);
    }

    #[test]
    fn case_checks_pass_vacuously_without_cased_characters() {
        assert!(check("HELLO", |v| v.that_is_in_capital_letters()).0);
        assert!(!check("Hello", |v| v.that_is_in_capital_letters()).0);
        assert!(check("hello", |v| v.that_is_in_small_letters()).0);
        assert!(check("1234!", |v| v.that_is_in_capital_letters()).0);
        assert!(check("1234!", |v| v.that_is_in_small_letters()).0);
    }

    #[test]
    fn first_letter() {
        assert!(check("Hello", |v| v.first_letter_is_capital()).0);
        assert!(check("  Hello", |v| v.first_letter_is_capital()).0);
        assert!(!check("hello", |v| v.first_letter_is_capital()).0);
        assert!(!check("   ", |v| v.first_letter_is_capital()).0);
    }

    #[test]
    fn prefixes_and_suffixes() {
        assert!(check("vouch.rs", |v| v.that_starts_with("vouch")).0);
        assert!(check("vouch.rs", |v| v.that_ends_with(".rs")).0);
        assert!(check("vouch.rs", |v| v.that_ends_with("")).0);
        assert!(!check("vouch.rs", |v| v.that_starts_with(".rs")).0);
    }

    #[test]
    fn email_stages() {
        assert!(check("hello@world.com", |v| v.that_is_an_email()).0);
        assert!(check("first.last@mail.example.org", |v| v.that_is_an_email()).0);

        let stage = |s: &str| {
            let (passed, ctx) = check(s, |v| v.that_is_an_email());
            assert!(!passed, "{s} should be rejected");
            assert_eq!(ctx.render_report().len(), 1);
            ctx.render_report()[0].expected.clone().unwrap()
        };

        assert_eq!(stage("helloworld"), "to contain '@' and '.'");
        assert_eq!(stage("h@world.com"), "at least 2 characters before '@'");
        assert_eq!(stage("hello@world."), "a '.' after '@' followed by at least 2 characters");
        assert_eq!(stage("hello.world@ts"), "a '.' after '@' followed by at least 2 characters");
        assert_eq!(stage("he llo@world.com"), "to be a valid email");
        assert_eq!(stage("hello@world.c0m"), "to be a valid email");
    }

    #[test]
    fn urls() {
        for good in ["http://hello.world", "ftp://hello.world.com", "ftps://hello.world"] {
            assert!(check(good, |v| v.that_is_a_url()).0, "{good}");
        }
        let (passed, ctx) = check("hello@world.com", |v| v.that_is_a_url());
        assert!(!passed);
        assert_eq!(ctx.render_report()[0].kind, FindingKind::UnexpectedValue);
        assert_eq!(
            ctx.render_report()[0].expected.as_deref(),
            Some("to be a valid URL")
        );
    }
}
