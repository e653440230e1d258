//! Number predicates.

use crate::context::ValidationContext;
use crate::error::Outcome;
use crate::finding::{Domain, Finding, FindingKind};
use crate::value::{Value, MAX_SAFE_INTEGER};

/// Primality by trial division over odd candidates up to `sqrt(n)`.
///
/// Only integers from 2 upwards can be prime; in particular `1` is not.
/// Integers beyond 2^53 are not exactly representable and are never
/// reported prime.
pub fn is_prime(n: f64) -> bool {
    if n.fract() != 0.0 || !(2.0..=MAX_SAFE_INTEGER).contains(&n) {
        return false;
    }
    if n == 2.0 || n == 3.0 {
        return true;
    }
    if n % 2.0 == 0.0 {
        return false;
    }
    let mut candidate = 3.0;
    while candidate * candidate <= n {
        if n % candidate == 0.0 {
            return false;
        }
        candidate += 2.0;
    }
    true
}

/// Predicates over numeric subjects. NaN fails the type check with its own
/// finding kind.
#[derive(Debug)]
pub struct NumberValidator<'a> {
    ctx: &'a mut ValidationContext,
}

impl<'a> NumberValidator<'a> {
    pub fn new(ctx: &'a mut ValidationContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ValidationContext {
        self.ctx
    }

    pub fn is_type(&mut self) -> Outcome {
        self.ctx.ensure_type(Domain::Number)
    }

    /// Type-check, then require `holds` of the number.
    fn require<F>(&mut self, holds: F, expected: impl FnOnce() -> String) -> Outcome
    where
        F: FnOnce(f64) -> bool,
    {
        if !self.is_type()? {
            return Ok(false);
        }
        let finding = self
            .ctx
            .subject()
            .as_f64()
            .filter(|n| !holds(*n))
            .map(|n| {
                Finding::new(FindingKind::UnexpectedValue, Domain::Number)
                    .actual(Value::Number(n).render())
                    .expected(expected())
            });
        self.ctx.settle(finding)
    }

    pub fn that_is_positive(&mut self) -> Outcome {
        self.require(|n| n > 0.0, || "a positive number".to_string())
    }

    pub fn that_is_negative(&mut self) -> Outcome {
        self.require(|n| n < 0.0, || "a negative number".to_string())
    }

    /// Inclusive on both bounds. A value under `min` is reported without
    /// checking `max`.
    pub fn that_is_between_min_max(&mut self, min: f64, max: f64) -> Outcome {
        if !self.that_is_over_minimum(min)? {
            return Ok(false);
        }
        self.that_is_under_maximum(max)
    }

    /// Inclusive lower bound.
    pub fn that_is_over_minimum(&mut self, min: f64) -> Outcome {
        self.require(|n| n >= min, || format!("at least {}", Value::Number(min)))
    }

    /// Inclusive upper bound.
    pub fn that_is_under_maximum(&mut self, max: f64) -> Outcome {
        self.require(|n| n <= max, || format!("at most {}", Value::Number(max)))
    }

    pub fn that_is_exactly(&mut self, expected: f64) -> Outcome {
        self.require(|n| n == expected, || Value::Number(expected).render())
    }

    /// `n % 2 == 0` with truncating remainder.
    pub fn that_is_even(&mut self) -> Outcome {
        self.require(|n| n % 2.0 == 0.0, || "an even number".to_string())
    }

    /// `n % 2 == 1` with truncating remainder, so negative odd numbers and
    /// fractions do not qualify.
    pub fn that_is_odd(&mut self) -> Outcome {
        self.require(|n| n % 2.0 == 1.0, || "an odd number".to_string())
    }

    pub fn that_is_not_zero(&mut self) -> Outcome {
        self.require(|n| n != 0.0, || "not 0".to_string())
    }

    pub fn that_is_not_one(&mut self) -> Outcome {
        self.require(|n| n != 1.0, || "not 1".to_string())
    }

    pub fn that_is_not_negative_one(&mut self) -> Outcome {
        self.require(|n| n != -1.0, || "not -1".to_string())
    }

    /// Passes for even numbers and for numbers that are not prime; only odd
    /// primes fail.
    pub fn that_is_evenly_divisible(&mut self) -> Outcome {
        self.require(
            |n| n % 2.0 == 0.0 || !is_prime(n),
            || "an evenly divisible number".to_string(),
        )
    }

    pub fn that_is_evenly_divisible_by(&mut self, divisor: f64) -> Outcome {
        self.require(
            |n| n % divisor == 0.0,
            || format!("divisible by {}", Value::Number(divisor)),
        )
    }

    pub fn that_is_a_prime_number(&mut self) -> Outcome {
        self.require(is_prime, || "a prime number".to_string())
    }

    pub fn that_is_not_a_prime_number(&mut self) -> Outcome {
        self.require(|n| !is_prime(n), || "not a prime number".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check<F>(subject: impl Into<Value>, predicate: F) -> (bool, ValidationContext)
    where
        F: FnOnce(&mut NumberValidator<'_>) -> Outcome,
    {
        let mut ctx = ValidationContext::new(subject);
        let passed = predicate(&mut NumberValidator::new(&mut ctx)).unwrap();
        (passed, ctx)
    }

    #[test]
    fn nan_is_its_own_kind() {
        let (passed, ctx) = check(f64::NAN, |v| v.that_is_positive());
        assert!(!passed);
        assert_eq!(ctx.render_report().len(), 1);
        assert_eq!(ctx.render_report()[0].kind, FindingKind::NaNEncountered);
    }

    #[test]
    fn strings_are_not_numbers() {
        let (passed, ctx) = check("5", |v| v.is_type());
        assert!(!passed);
        assert_eq!(ctx.render_report()[0].kind, FindingKind::UnexpectedType);
    }

    #[test]
    fn sign_checks_are_strict() {
        assert!(check(1, |v| v.that_is_positive()).0);
        assert!(!check(0, |v| v.that_is_positive()).0);
        assert!(!check(0, |v| v.that_is_negative()).0);
        assert!(check(-0.5, |v| v.that_is_negative()).0);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(check(5, |v| v.that_is_between_min_max(5.0, 10.0)).0);
        assert!(check(10, |v| v.that_is_between_min_max(5.0, 10.0)).0);
        assert!(check(5, |v| v.that_is_over_minimum(5.0)).0);
        assert!(check(5, |v| v.that_is_under_maximum(5.0)).0);
        assert!(!check(11, |v| v.that_is_between_min_max(5.0, 10.0)).0);
    }

    #[test]
    fn between_short_circuits_on_lower_bound() {
        let (passed, ctx) = check(1, |v| v.that_is_between_min_max(5.0, 0.0));
        assert!(!passed);
        assert_eq!(ctx.render_report().len(), 1);
        assert_eq!(
            ctx.render_report_as_text(),
            "unexpectedValue failure in number, is 1, expected at least 5"
        );
    }

    #[test]
    fn exact_and_constants() {
        assert!(check(4.5, |v| v.that_is_exactly(4.5)).0);
        assert!(!check(4, |v| v.that_is_exactly(4.5)).0);
        assert!(!check(0, |v| v.that_is_not_zero()).0);
        assert!(!check(1, |v| v.that_is_not_one()).0);
        assert!(!check(-1, |v| v.that_is_not_negative_one()).0);
        assert!(check(2, |v| v.that_is_not_negative_one()).0);
    }

    #[test]
    fn parity_uses_truncating_remainder() {
        assert!(check(4, |v| v.that_is_even()).0);
        assert!(check(7, |v| v.that_is_odd()).0);
        assert!(!check(-3, |v| v.that_is_odd()).0);
        assert!(!check(2.5, |v| v.that_is_even()).0);
        assert!(!check(2.5, |v| v.that_is_odd()).0);
    }

    #[test]
    fn evenly_divisible_fails_only_for_odd_primes() {
        assert!(check(4, |v| v.that_is_evenly_divisible()).0);
        assert!(check(9, |v| v.that_is_evenly_divisible()).0);
        assert!(check(2, |v| v.that_is_evenly_divisible()).0);
        assert!(!check(7, |v| v.that_is_evenly_divisible()).0);
        assert!(check(12, |v| v.that_is_evenly_divisible_by(4.0)).0);
        assert!(!check(12, |v| v.that_is_evenly_divisible_by(5.0)).0);
        assert!(!check(12, |v| v.that_is_evenly_divisible_by(0.0)).0);
    }

    #[test]
    fn one_is_not_prime() {
        // Trial division alone would accept 1; it is rejected explicitly.
        assert!(!is_prime(1.0));
        assert!(!check(1, |v| v.that_is_a_prime_number()).0);
        assert!(check(1, |v| v.that_is_not_a_prime_number()).0);
        assert!(check(1, |v| v.that_is_evenly_divisible()).0);
    }

    #[test]
    fn non_integers_and_negatives_are_not_prime() {
        assert!(!is_prime(0.0));
        assert!(!is_prime(-7.0));
        assert!(!is_prime(7.5));
        assert!(!is_prime(f64::INFINITY));
    }
}
