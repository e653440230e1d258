//! Fluent predicate chains over one validation session.
//!
//! [`validate`] opens a [`Chain`] that owns a fresh [`ValidationContext`].
//! Domain selectors hand out chain objects borrowing that context; every
//! predicate consumes the chain object and returns it again, so a session
//! reads as one expression:
//!
//! ```rust
//! use vouch::prelude::*;
//!
//! let mut chain = validate("hello@world.com");
//! let passed = chain
//!     .is_string()?
//!     .with_minimum_length(5)?
//!     .that_is_an_email()?
//!     .confirm();
//!
//! assert!(passed);
//! assert!(chain.report().is_empty());
//! # Ok::<(), vouch::ValidationFailure>(())
//! ```
//!
//! With throw-mode on, the first failing predicate returns
//! `Err(ValidationFailure)` and `?` ends the chain there.

use crate::context::ValidationContext;
use crate::error::{ConfigError, ValidationFailure};
use crate::finding::{Domain, Finding};
use crate::validators::{
    ArrayValidator, ElementKind, Measured, NumberValidator, ObjectValidator, StringValidator,
};
use crate::value::{Class, Value, ValueType};

/// Open a validation session for `subject`.
pub fn validate(subject: impl Into<Value>) -> Chain {
    Chain::new(subject)
}

/// One validation session: a subject, its context and its report.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    ctx: ValidationContext,
}

impl Chain {
    pub fn new(subject: impl Into<Value>) -> Self {
        Self::from_context(ValidationContext::new(subject))
    }

    /// Continue a session on an existing context.
    pub fn from_context(ctx: ValidationContext) -> Self {
        tracing::trace!(
            subject = ctx.subject().kind_name(),
            label = ?ctx.label(),
            "validation session started"
        );
        Self { ctx }
    }

    /// Set the display label prefixed to every subsequent finding.
    pub fn set_label(&mut self, label: impl Into<String>) -> Result<(), ConfigError> {
        self.ctx.set_label(label)
    }

    pub fn set_throw_on_failure(&mut self, throw_on_failure: bool) {
        self.ctx.set_throw_on_failure(throw_on_failure);
    }

    /// Builder form of [`set_label`](Self::set_label).
    pub fn labelled(mut self, label: impl Into<String>) -> Result<Self, ConfigError> {
        self.set_label(label)?;
        Ok(self)
    }

    /// Builder form of [`set_throw_on_failure`](Self::set_throw_on_failure).
    pub fn throwing(mut self, throw_on_failure: bool) -> Self {
        self.set_throw_on_failure(throw_on_failure);
        self
    }

    pub fn is_string(&mut self) -> Result<StringChain<'_>, ValidationFailure> {
        self.ctx.ensure_type(Domain::String)?;
        Ok(StringChain { ctx: &mut self.ctx })
    }

    pub fn is_number(&mut self) -> Result<NumberChain<'_>, ValidationFailure> {
        self.ctx.ensure_type(Domain::Number)?;
        Ok(NumberChain { ctx: &mut self.ctx })
    }

    pub fn is_object(&mut self) -> Result<ObjectChain<'_>, ValidationFailure> {
        self.ctx.ensure_type(Domain::Object)?;
        Ok(ObjectChain { ctx: &mut self.ctx })
    }

    pub fn is_array(&mut self) -> Result<ArrayChain<'_>, ValidationFailure> {
        self.ctx.ensure_type(Domain::Array)?;
        Ok(ArrayChain { ctx: &mut self.ctx })
    }

    /// The findings recorded so far, in call order.
    pub fn report(&self) -> &[Finding] {
        self.ctx.render_report()
    }

    pub fn report_as_text(&self) -> String {
        self.ctx.render_report_as_text()
    }

    /// The findings as a JSON array.
    pub fn report_as_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self.report())
    }

    /// Forget every finding. Label and throw-mode are kept.
    pub fn clear_reports(&mut self) {
        self.ctx.reset();
    }

    /// Whole-session verdict: no findings in any domain.
    pub fn confirm(&self) -> bool {
        !self.ctx.has_findings()
    }

    pub fn context(&self) -> &ValidationContext {
        &self.ctx
    }

    pub fn into_context(self) -> ValidationContext {
        self.ctx
    }

    /// `Ok` when nothing was recorded, otherwise the full report as a
    /// [`ValidationFailure`].
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.confirm() {
            return Ok(());
        }
        Err(ValidationFailure::new(
            self.report_as_text(),
            self.ctx.render_report().to_vec(),
        ))
    }
}

/// A chain object bound to one domain of a session.
pub trait DomainChain: Sized {
    const DOMAIN: Domain;

    fn context(&self) -> &ValidationContext;

    /// `true` iff no finding was recorded in this chain's domain.
    fn confirm(&self) -> bool {
        !self.context().has_findings_in(Self::DOMAIN)
    }
}

/// Length predicates of the string, object and array chains.
pub trait LengthChain: DomainChain {
    fn with_minimum_length(self, minimum: usize) -> Result<Self, ValidationFailure>;

    fn with_maximum_length(self, maximum: usize) -> Result<Self, ValidationFailure>;

    fn with_exact_length(self, exact: usize) -> Result<Self, ValidationFailure>;
}

/// Generate chain methods that run one validator predicate and hand the
/// chain back.
macro_rules! forward {
    ($validator:ident { $( $(#[$meta:meta])* fn $name:ident($($arg:ident: $ty:ty),*); )* }) => {
        $(
            $(#[$meta])*
            pub fn $name(self, $($arg: $ty),*) -> Result<Self, ValidationFailure> {
                $validator::new(&mut *self.ctx).$name($($arg),*)?;
                Ok(self)
            }
        )*
    };
}

macro_rules! domain_chain {
    ($chain:ident, $validator:ident, $domain:expr) => {
        impl DomainChain for $chain<'_> {
            const DOMAIN: Domain = $domain;

            fn context(&self) -> &ValidationContext {
                self.ctx
            }
        }
    };
    ($chain:ident, $validator:ident, $domain:expr, measured) => {
        domain_chain!($chain, $validator, $domain);

        impl LengthChain for $chain<'_> {
            fn with_minimum_length(self, minimum: usize) -> Result<Self, ValidationFailure> {
                $validator::new(&mut *self.ctx).with_minimum_length(minimum)?;
                Ok(self)
            }

            fn with_maximum_length(self, maximum: usize) -> Result<Self, ValidationFailure> {
                $validator::new(&mut *self.ctx).with_maximum_length(maximum)?;
                Ok(self)
            }

            fn with_exact_length(self, exact: usize) -> Result<Self, ValidationFailure> {
                $validator::new(&mut *self.ctx).with_exact_length(exact)?;
                Ok(self)
            }
        }
    };
}

/// String predicates of a session.
#[derive(Debug)]
pub struct StringChain<'c> {
    ctx: &'c mut ValidationContext,
}

impl StringChain<'_> {
    forward!(StringValidator {
        fn that_includes(needle: &str);
        fn that_does_not_include(needle: &str);
        fn that_is_in_capital_letters();
        fn that_is_in_small_letters();
        fn first_letter_is_capital();
        fn that_starts_with(prefix: &str);
        fn that_ends_with(suffix: &str);
        /// Staged email check; only the first failing stage is reported.
        fn that_is_an_email();
        fn that_is_a_url();
    });
}

domain_chain!(StringChain, StringValidator, Domain::String, measured);

/// Number predicates of a session.
#[derive(Debug)]
pub struct NumberChain<'c> {
    ctx: &'c mut ValidationContext,
}

impl NumberChain<'_> {
    forward!(NumberValidator {
        fn that_is_positive();
        fn that_is_negative();
        /// Inclusive; a value under `min` is reported without checking `max`.
        fn that_is_between_min_max(min: f64, max: f64);
        fn that_is_over_minimum(min: f64);
        fn that_is_under_maximum(max: f64);
        fn that_is_exactly(expected: f64);
        fn that_is_even();
        fn that_is_odd();
        fn that_is_not_zero();
        fn that_is_not_one();
        fn that_is_not_negative_one();
        fn that_is_evenly_divisible();
        fn that_is_evenly_divisible_by(divisor: f64);
        fn that_is_a_prime_number();
        fn that_is_not_a_prime_number();
    });
}

domain_chain!(NumberChain, NumberValidator, Domain::Number);

/// Object predicates of a session.
#[derive(Debug)]
pub struct ObjectChain<'c> {
    ctx: &'c mut ValidationContext,
}

impl ObjectChain<'_> {
    forward!(ObjectValidator {
        fn that_is_instance_of(class: &Class);
        fn that_may_have_properties(allowed: &[&str]);
        fn that_must_have_properties(required: &[&str]);
        fn that_must_have_sanctioned_values(allowed: &[Value]);
        fn that_must_have_sanctioned_value_types(allowed: &[ValueType]);
    });
}

domain_chain!(ObjectChain, ObjectValidator, Domain::Object, measured);

/// Array predicates of a session.
#[derive(Debug)]
pub struct ArrayChain<'c> {
    ctx: &'c mut ValidationContext,
}

impl ArrayChain<'_> {
    forward!(ArrayValidator {
        /// Every element must be of `kind`.
        fn of(kind: ElementKind);
        fn of_strings();
        fn of_numbers();
        fn of_objects();
        fn of_arrays();
        fn of_booleans();
        fn of_functions();
        fn of_symbols();
        fn of_dates();
        fn that_must_have_sanctioned_values(allowed: &[Value]);
        /// Nested arrays pass when `allowed` holds the `array` marker.
        fn that_must_have_sanctioned_value_types(allowed: &[ValueType]);
    });
}

domain_chain!(ArrayChain, ArrayValidator, Domain::Array, measured);
