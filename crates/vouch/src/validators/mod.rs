//! Domain validators.
//!
//! Each validator borrows the session's [`ValidationContext`] and exposes
//! the predicates for one domain. Every predicate first runs the domain type
//! check; when that fails the predicate returns `false` without recording a
//! second finding.

mod array;
mod number;
mod object;
mod string;

pub use array::{ArrayValidator, ElementKind};
pub use number::{is_prime, NumberValidator};
pub use object::ObjectValidator;
pub use string::StringValidator;

use crate::context::ValidationContext;
use crate::error::{Outcome, ValidationFailure};
use crate::finding::{Domain, Finding, FindingKind};

/// Length predicates shared by the string, object and array validators.
///
/// Strings measure characters, objects their own property count, arrays
/// their element count.
pub trait Measured {
    const DOMAIN: Domain;

    /// The subject's length, or `None` when the domain type check failed.
    fn measure(&mut self) -> Result<Option<usize>, ValidationFailure>;

    fn context_mut(&mut self) -> &mut ValidationContext;

    fn with_minimum_length(&mut self, minimum: usize) -> Outcome {
        check_length(self, LengthBound::AtLeast(minimum))
    }

    fn with_maximum_length(&mut self, maximum: usize) -> Outcome {
        check_length(self, LengthBound::AtMost(maximum))
    }

    fn with_exact_length(&mut self, exact: usize) -> Outcome {
        check_length(self, LengthBound::Exactly(exact))
    }
}

#[derive(Debug, Clone, Copy)]
enum LengthBound {
    AtLeast(usize),
    AtMost(usize),
    Exactly(usize),
}

impl LengthBound {
    fn violation(self, length: usize) -> Option<(FindingKind, String)> {
        match self {
            LengthBound::AtLeast(min) if length < min => {
                Some((FindingKind::TooShort, format!("minimum length {min}")))
            }
            LengthBound::AtMost(max) if length > max => {
                Some((FindingKind::TooLong, format!("maximum length {max}")))
            }
            LengthBound::Exactly(exact) if length != exact => {
                Some((FindingKind::FaultyLength, format!("length {exact}")))
            }
            _ => None,
        }
    }
}

fn check_length<M: Measured + ?Sized>(validator: &mut M, bound: LengthBound) -> Outcome {
    let Some(length) = validator.measure()? else {
        return Ok(false);
    };
    let finding = bound.violation(length).map(|(kind, expected)| {
        Finding::new(kind, M::DOMAIN)
            .actual(format!("length {length}"))
            .expected(expected)
    });
    validator.context_mut().settle(finding)
}

/// Render a list of names as `[a, b, c]` for expected descriptions.
pub(crate) fn list<T: std::fmt::Display>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
