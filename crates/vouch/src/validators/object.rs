//! Object predicates.

use super::{list, Measured};
use crate::context::ValidationContext;
use crate::error::{Outcome, ValidationFailure};
use crate::finding::{Domain, Finding, FindingKind};
use crate::value::{Class, Object, Value, ValueType};

/// Predicates over object subjects. Arrays and null are not objects here.
#[derive(Debug)]
pub struct ObjectValidator<'a> {
    ctx: &'a mut ValidationContext,
}

impl<'a> ObjectValidator<'a> {
    pub fn new(ctx: &'a mut ValidationContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ValidationContext {
        self.ctx
    }

    pub fn is_type(&mut self) -> Outcome {
        self.ctx.ensure_type(Domain::Object)
    }

    /// Type-check, then collect every finding `check` reports.
    fn evaluate<F>(&mut self, check: F) -> Outcome
    where
        F: FnOnce(&Object) -> Vec<Finding>,
    {
        if !self.is_type()? {
            return Ok(false);
        }
        let findings = self.ctx.subject().as_object().map(check).unwrap_or_default();
        self.ctx.settle(findings)
    }

    /// The subject must be an instance of `class` or one of its subclasses.
    pub fn that_is_instance_of(&mut self, class: &Class) -> Outcome {
        self.evaluate(|object| {
            if object.is_instance_of(class) {
                return Vec::new();
            }
            vec![Finding::new(FindingKind::UnexpectedType, Domain::Object)
                .actual(object.class_name())
                .expected(class.name())]
        })
    }

    /// Every own property must be listed in `allowed`. Each extra property is
    /// its own finding.
    pub fn that_may_have_properties(&mut self, allowed: &[&str]) -> Outcome {
        self.evaluate(|object| unexpected_properties(object, allowed))
    }

    /// The own properties must be exactly `required`: each missing name and
    /// each extra property is reported, both passes always run.
    pub fn that_must_have_properties(&mut self, required: &[&str]) -> Outcome {
        self.evaluate(|object| {
            let mut findings: Vec<Finding> = required
                .iter()
                .filter(|name| !object.contains_key(name))
                .map(|name| {
                    Finding::new(FindingKind::MissingProperty, Domain::Object).expected(*name)
                })
                .collect();
            findings.extend(unexpected_properties(object, required));
            findings
        })
    }

    /// Every own property value must be structurally equal to one of
    /// `allowed`.
    pub fn that_must_have_sanctioned_values(&mut self, allowed: &[Value]) -> Outcome {
        self.evaluate(|object| {
            object
                .values()
                .filter(|value| !allowed.contains(value))
                .map(|value| {
                    Finding::new(FindingKind::UnexpectedValue, Domain::Object)
                        .actual(value.render())
                        .expected(format!("one of {}", list_values(allowed)))
                })
                .collect()
        })
    }

    /// Every own property value's runtime type name must be in `allowed`.
    pub fn that_must_have_sanctioned_value_types(&mut self, allowed: &[ValueType]) -> Outcome {
        self.evaluate(|object| {
            object
                .values()
                .map(Value::type_name)
                .filter(|type_name| !allowed.contains(type_name))
                .map(|type_name| {
                    Finding::new(FindingKind::UnexpectedValueType, Domain::Object)
                        .actual(type_name.as_str())
                        .expected(format!("one of {}", list(allowed)))
                })
                .collect()
        })
    }
}

impl Measured for ObjectValidator<'_> {
    const DOMAIN: Domain = Domain::Object;

    fn measure(&mut self) -> Result<Option<usize>, ValidationFailure> {
        if !self.is_type()? {
            return Ok(None);
        }
        Ok(self.ctx.subject().as_object().map(Object::len))
    }

    fn context_mut(&mut self) -> &mut ValidationContext {
        self.ctx
    }
}

fn unexpected_properties(object: &Object, allowed: &[&str]) -> Vec<Finding> {
    object
        .keys()
        .filter(|key| !allowed.contains(key))
        .map(|key| {
            Finding::new(FindingKind::UnexpectedProperty, Domain::Object)
                .actual(key)
                .expected(format!("one of {}", list(allowed)))
        })
        .collect()
}

pub(crate) fn list_values(values: &[Value]) -> String {
    let rendered: Vec<String> = values.iter().map(Value::render).collect();
    list(&rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FunctionRef;

    fn user() -> Object {
        Object::new().with("name", "ada").with("age", 36)
    }

    fn check<F>(subject: impl Into<Value>, predicate: F) -> (bool, ValidationContext)
    where
        F: FnOnce(&mut ObjectValidator<'_>) -> Outcome,
    {
        let mut ctx = ValidationContext::new(subject);
        let passed = predicate(&mut ObjectValidator::new(&mut ctx)).unwrap();
        (passed, ctx)
    }

    #[test]
    fn arrays_and_null_are_not_objects() {
        let (_, ctx) = check(Value::from(vec![1]), |v| v.is_type());
        assert_eq!(ctx.render_report()[0].kind, FindingKind::UnexpectedType);
        assert_eq!(ctx.render_report()[0].actual.as_deref(), Some("array"));

        let (_, ctx) = check(Value::Null, |v| v.is_type());
        assert_eq!(ctx.render_report()[0].kind, FindingKind::NullEncountered);
    }

    #[test]
    fn length_counts_own_properties() {
        assert!(check(user(), |v| v.with_exact_length(2)).0);
        assert!(!check(user(), |v| v.with_minimum_length(3)).0);
        assert!(!check(user(), |v| v.with_maximum_length(1)).0);
    }

    #[test]
    fn instance_of_reports_expected_class() {
        let animal = Class::new("Animal");
        let dog = Class::extending("Dog", &animal);

        assert!(check(Object::instance_of(dog.clone()), |v| v.that_is_instance_of(&animal)).0);

        let (passed, ctx) = check(Object::new(), |v| v.that_is_instance_of(&dog));
        assert!(!passed);
        assert_eq!(
            ctx.render_report_as_text(),
            "unexpectedType failure in object, is Object, expected Dog"
        );
    }

    #[test]
    fn may_have_properties_reports_each_extra() {
        assert!(check(user(), |v| v.that_may_have_properties(&["name", "age", "email"])).0);

        let (passed, ctx) = check(user(), |v| v.that_may_have_properties(&["email"]));
        assert!(!passed);
        let report = ctx.render_report();
        assert_eq!(report.len(), 2);
        assert!(report.iter().all(|f| f.kind == FindingKind::UnexpectedProperty));
        assert_eq!(report[0].actual.as_deref(), Some("name"));
        assert_eq!(report[1].actual.as_deref(), Some("age"));
    }

    #[test]
    fn must_have_properties_runs_both_passes() {
        assert!(check(user(), |v| v.that_must_have_properties(&["age", "name"])).0);

        let (passed, ctx) = check(user(), |v| v.that_must_have_properties(&["name", "email"]));
        assert!(!passed);
        let kinds: Vec<_> = ctx.render_report().iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FindingKind::MissingProperty, FindingKind::UnexpectedProperty]
        );
    }

    #[test]
    fn sanctioned_values_are_structural() {
        let object = Object::new()
            .with("a", 1)
            .with("b", Value::from(vec![1, 2]))
            .with("c", f64::NAN);
        let allowed = [Value::from(1), Value::from(vec![1, 2]), Value::Number(f64::NAN)];
        assert!(check(object, |v| v.that_must_have_sanctioned_values(&allowed)).0);

        let (passed, ctx) = check(user(), |v| {
            v.that_must_have_sanctioned_values(&[Value::from("ada"), Value::from(true)])
        });
        assert!(!passed);
        assert_eq!(
            ctx.render_report_as_text(),
            "unexpectedValue failure in object, is 36, expected one of [ada, true]"
        );
    }

    #[test]
    fn sanctioned_value_types() {
        let allowed = [ValueType::String, ValueType::Number];
        assert!(check(user(), |v| v.that_must_have_sanctioned_value_types(&allowed)).0);

        let object = user()
            .with("tags", Value::from(vec!["x"]))
            .with("greet", FunctionRef::new("greet"));
        let (passed, ctx) = check(object, |v| v.that_must_have_sanctioned_value_types(&allowed));
        assert!(!passed);
        let actual: Vec<_> = ctx
            .render_report()
            .iter()
            .map(|f| f.actual.clone().unwrap())
            .collect();
        assert_eq!(actual, vec!["object", "function"]);
    }
}
