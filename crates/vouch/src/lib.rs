//! # Vouch
//!
//! Runtime validation of values of unknown origin. A subject is checked
//! against a chain of predicates (type, length, range, content, format) and
//! every violation is recorded as a structured [`Finding`] with a readable
//! one-line rendering.
//!
//! ## Example
//!
//! ```rust
//! use vouch::prelude::*;
//!
//! let mut chain = validate(vec![Value::from(1), Value::from("a"), Value::from(3)]);
//! let passed = chain.is_array()?.with_maximum_length(5)?.of_numbers()?.confirm();
//!
//! assert!(!passed);
//! assert_eq!(
//!     chain.report_as_text(),
//!     "unexpectedType failure in array, at 1, is string, expected number"
//! );
//! # Ok::<(), vouch::ValidationFailure>(())
//! ```
//!
//! ## Failure Policy
//!
//! Predicates return `Ok(..)` and record findings by default. In throw-mode
//! ([`Chain::set_throw_on_failure`] or `shouldThrow` in a
//! [`RuleConfiguration`]) the first finding returns a [`ValidationFailure`]
//! whose message is the whole report so far.
//!
//! Configuration problems (unknown rule keys, non-finite thresholds, labels
//! containing `:`, `,`, `<`, `>` or control characters) are always returned
//! as [`ConfigError`].
//!
//! ## Finding Kinds
//!
//! `unexpectedType`, `missingProperty`, `unexpectedProperty`, `missingValue`,
//! `unexpectedValue`, `unexpectedValueType`, `faultyLength`, `tooShort`,
//! `tooLong`, `nullEncountered`, `undefinedEncountered`, `NaNEncountered`.

pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod finding;
pub mod validators;
pub mod value;


pub use chain::{
    validate, ArrayChain, Chain, DomainChain, LengthChain, NumberChain, ObjectChain, StringChain,
};
pub use config::{Configured, RuleConfiguration, RuleSession, Validator};
pub use context::{ValidationContext, ValidationContextBuilder};
pub use error::{ConfigError, Error, Outcome, Result, ValidationFailure};
pub use finding::{Domain, Finding, FindingKind};
pub use validators::{ElementKind, Measured};
pub use value::{Class, FunctionRef, Object, Symbol, Value, ValueType};

/// Prelude module for validation sessions
pub mod prelude {
    pub use crate::chain::{validate, Chain, DomainChain, LengthChain};
    pub use crate::config::{RuleConfiguration, Validator};
    pub use crate::error::{ConfigError, Error, ValidationFailure};
    pub use crate::finding::{Domain, Finding, FindingKind};
    pub use crate::validators::ElementKind;
    pub use crate::value::{Class, FunctionRef, Object, Symbol, Value, ValueType};
}
