//! Array predicates.

use super::object::list_values;
use super::{list, Measured};
use crate::context::{type_violation, ValidationContext};
use crate::error::{Outcome, ValidationFailure};
use crate::finding::{Domain, Finding, FindingKind};
use crate::value::{Value, ValueType};
use std::fmt;

/// What every element of an array must be.
///
/// The four domain kinds reuse that domain's type check and report every
/// failing element. The remaining kinds use a direct type predicate and stop
/// at the first failing element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    String,
    Number,
    Object,
    Array,
    Boolean,
    Function,
    Symbol,
    Date,
}

impl ElementKind {
    fn domain(self) -> Option<Domain> {
        match self {
            ElementKind::String => Some(Domain::String),
            ElementKind::Number => Some(Domain::Number),
            ElementKind::Object => Some(Domain::Object),
            ElementKind::Array => Some(Domain::Array),
            _ => None,
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (ElementKind::Boolean, Value::Bool(_))
            | (ElementKind::Function, Value::Function(_))
            | (ElementKind::Symbol, Value::Symbol(_))
            | (ElementKind::Date, Value::Date(_)) => true,
            (kind, value) => kind
                .domain()
                .is_some_and(|domain| type_violation(value, domain).is_none()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::String => "string",
            ElementKind::Number => "number",
            ElementKind::Object => "object",
            ElementKind::Array => "array",
            ElementKind::Boolean => "boolean",
            ElementKind::Function => "function",
            ElementKind::Symbol => "symbol",
            ElementKind::Date => "date",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicates over array subjects.
#[derive(Debug)]
pub struct ArrayValidator<'a> {
    ctx: &'a mut ValidationContext,
}

impl<'a> ArrayValidator<'a> {
    pub fn new(ctx: &'a mut ValidationContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ValidationContext {
        self.ctx
    }

    pub fn is_type(&mut self) -> Outcome {
        self.ctx.ensure_type(Domain::Array)
    }

    fn evaluate<F>(&mut self, check: F) -> Outcome
    where
        F: FnOnce(&[Value]) -> Vec<Finding>,
    {
        if !self.is_type()? {
            return Ok(false);
        }
        let findings = self.ctx.subject().as_array().map(check).unwrap_or_default();
        self.ctx.settle(findings)
    }

    /// Every element must be of `kind`.
    pub fn of(&mut self, kind: ElementKind) -> Outcome {
        self.evaluate(|items| match kind.domain() {
            Some(domain) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    type_violation(item, domain).map(|finding| element_finding(finding, index))
                })
                .collect(),
            None => items
                .iter()
                .position(|item| !kind.accepts(item))
                .map(|index| {
                    Finding::new(FindingKind::UnexpectedType, Domain::Array)
                        .at(index)
                        .actual(items[index].kind_name())
                        .expected(kind.as_str())
                })
                .into_iter()
                .collect(),
        })
    }

    pub fn of_strings(&mut self) -> Outcome {
        self.of(ElementKind::String)
    }

    pub fn of_numbers(&mut self) -> Outcome {
        self.of(ElementKind::Number)
    }

    pub fn of_objects(&mut self) -> Outcome {
        self.of(ElementKind::Object)
    }

    pub fn of_arrays(&mut self) -> Outcome {
        self.of(ElementKind::Array)
    }

    pub fn of_booleans(&mut self) -> Outcome {
        self.of(ElementKind::Boolean)
    }

    pub fn of_functions(&mut self) -> Outcome {
        self.of(ElementKind::Function)
    }

    pub fn of_symbols(&mut self) -> Outcome {
        self.of(ElementKind::Symbol)
    }

    pub fn of_dates(&mut self) -> Outcome {
        self.of(ElementKind::Date)
    }

    /// Every element must be structurally equal to one of `allowed`.
    pub fn that_must_have_sanctioned_values(&mut self, allowed: &[Value]) -> Outcome {
        self.evaluate(|items| {
            items
                .iter()
                .enumerate()
                .filter(|(_, item)| !allowed.contains(item))
                .map(|(index, item)| {
                    Finding::new(FindingKind::UnexpectedValue, Domain::Array)
                        .at(index)
                        .actual(item.render())
                        .expected(format!("one of {}", list_values(allowed)))
                })
                .collect()
        })
    }

    /// Every element's runtime type name must be in `allowed`. Nested arrays
    /// read as `object`, but are also accepted when `allowed` holds the
    /// [`ValueType::Array`] marker.
    pub fn that_must_have_sanctioned_value_types(&mut self, allowed: &[ValueType]) -> Outcome {
        let arrays_allowed = allowed.contains(&ValueType::Array);
        self.evaluate(|items| {
            items
                .iter()
                .enumerate()
                .filter(|(_, item)| {
                    let nested_array = arrays_allowed && matches!(item, Value::Array(_));
                    !nested_array && !allowed.contains(&item.type_name())
                })
                .map(|(index, item)| {
                    Finding::new(FindingKind::UnexpectedValueType, Domain::Array)
                        .at(index)
                        .actual(item.type_name().as_str())
                        .expected(format!("one of {}", list(allowed)))
                })
                .collect()
        })
    }
}

impl Measured for ArrayValidator<'_> {
    const DOMAIN: Domain = Domain::Array;

    fn measure(&mut self) -> Result<Option<usize>, ValidationFailure> {
        if !self.is_type()? {
            return Ok(None);
        }
        Ok(self.ctx.subject().as_array().map(<[Value]>::len))
    }

    fn context_mut(&mut self) -> &mut ValidationContext {
        self.ctx
    }
}

/// Re-home an element's type finding into the array domain.
fn element_finding(finding: Finding, index: usize) -> Finding {
    let mut element = Finding::new(finding.kind, Domain::Array).at(index);
    element.actual = finding.actual;
    element.expected = finding.expected;
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FunctionRef, Object, Symbol};
    use chrono::Utc;

    fn check<F>(subject: impl Into<Value>, predicate: F) -> (bool, ValidationContext)
    where
        F: FnOnce(&mut ArrayValidator<'_>) -> Outcome,
    {
        let mut ctx = ValidationContext::new(subject);
        let passed = predicate(&mut ArrayValidator::new(&mut ctx)).unwrap();
        (passed, ctx)
    }

    fn mixed() -> Value {
        Value::Array(vec![Value::from(1), Value::from("a"), Value::from(3)])
    }

    #[test]
    fn objects_are_not_arrays() {
        let (passed, ctx) = check(Object::new(), |v| v.is_type());
        assert!(!passed);
        assert_eq!(ctx.render_report()[0].expected.as_deref(), Some("array"));
    }

    #[test]
    fn length_counts_elements() {
        assert!(check(mixed(), |v| v.with_exact_length(3)).0);
        assert!(!check(mixed(), |v| v.with_maximum_length(2)).0);
        assert!(check(Value::Array(Vec::new()), |v| v.with_maximum_length(0)).0);
    }

    #[test]
    fn of_numbers_reports_failing_index() {
        assert!(check(vec![1, 2, 3], |v| v.of_numbers()).0);

        let (passed, ctx) = check(mixed(), |v| v.of_numbers());
        assert!(!passed);
        assert_eq!(
            ctx.render_report_as_text(),
            "unexpectedType failure in array, at 1, is string, expected number"
        );
    }

    #[test]
    fn of_numbers_rejects_nan_elements() {
        let (passed, ctx) = check(vec![1.0, f64::NAN], |v| v.of_numbers());
        assert!(!passed);
        assert_eq!(ctx.render_report()[0].kind, FindingKind::NaNEncountered);
        assert_eq!(ctx.render_report()[0].at_index, Some(1));
    }

    #[test]
    fn domain_element_checks_report_every_failure() {
        let subject = Value::Array(vec![
            Value::from(1),
            Value::from("ok"),
            Value::Null,
            Value::from(vec!["nested"]),
        ]);
        let (passed, ctx) = check(subject, |v| v.of_strings());
        assert!(!passed);
        let indices: Vec<_> = ctx.render_report().iter().map(|f| f.at_index).collect();
        assert_eq!(indices, vec![Some(0), Some(2), Some(3)]);
        assert_eq!(ctx.render_report()[1].kind, FindingKind::NullEncountered);
    }

    #[test]
    fn nested_array_and_object_elements() {
        let nested = Value::Array(vec![Value::from(vec![1]), Value::from(vec![2])]);
        assert!(check(nested, |v| v.of_arrays()).0);

        let objects = Value::Array(vec![Value::from(Object::new()), Value::from(vec![1])]);
        let (passed, ctx) = check(objects, |v| v.of_objects());
        assert!(!passed);
        assert_eq!(ctx.render_report()[0].at_index, Some(1));
    }

    #[test]
    fn direct_element_checks_stop_at_first_failure() {
        assert!(check(vec![true, false], |v| v.of_booleans()).0);

        let subject = Value::Array(vec![
            Value::from(true),
            Value::from(1),
            Value::from("x"),
        ]);
        let (passed, ctx) = check(subject, |v| v.of_booleans());
        assert!(!passed);
        assert_eq!(ctx.render_report().len(), 1);
        assert_eq!(ctx.render_report()[0].at_index, Some(1));
    }

    #[test]
    fn functions_symbols_and_dates() {
        let functions = Value::Array(vec![Value::from(FunctionRef::new("f"))]);
        assert!(check(functions, |v| v.of_functions()).0);

        let symbols = Value::Array(vec![Value::from(Symbol::new(None))]);
        assert!(check(symbols, |v| v.of_symbols()).0);

        let dates = Value::Array(vec![Value::from(Utc::now()), Value::from("2024-01-01")]);
        let (passed, ctx) = check(dates, |v| v.of_dates());
        assert!(!passed);
        assert_eq!(ctx.render_report()[0].expected.as_deref(), Some("date"));
    }

    #[test]
    fn sanctioned_values_per_element() {
        let allowed = [Value::from("a"), Value::from(1)];
        assert!(check(Value::Array(vec![Value::from(1), Value::from("a")]), |v| {
            v.that_must_have_sanctioned_values(&allowed)
        })
        .0);

        let (passed, ctx) = check(mixed(), |v| v.that_must_have_sanctioned_values(&allowed));
        assert!(!passed);
        assert_eq!(ctx.render_report().len(), 1);
        assert_eq!(ctx.render_report()[0].at_index, Some(2));
    }

    #[test]
    fn sanctioned_types_accept_nested_arrays_with_marker() {
        let subject = Value::Array(vec![Value::from(1), Value::from(vec![2])]);

        let (passed, ctx) = check(subject.clone(), |v| {
            v.that_must_have_sanctioned_value_types(&[ValueType::Number])
        });
        assert!(!passed);
        assert_eq!(ctx.render_report()[0].actual.as_deref(), Some("object"));

        assert!(check(subject, |v| {
            v.that_must_have_sanctioned_value_types(&[ValueType::Number, ValueType::Array])
        })
        .0);
    }
}
