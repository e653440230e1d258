//! Rule configuration and the configured validator.
//!
//! A [`RuleConfiguration`] names thresholds and whitelists once; a
//! [`Validator`] built from it opens sessions whose chains expose the
//! matching predicates without arguments.
//!
//! ```rust
//! use vouch::prelude::*;
//!
//! let validator = Validator::from_json_str(r#"{ "minimumLength": 3, "name": "username" }"#)?;
//! let mut session = validator.validate("al");
//! let passed = session.is_string()?.with_minimum_length()?.confirm();
//!
//! assert!(!passed);
//! assert_eq!(
//!     session.report_as_text(),
//!     "username: tooShort failure in string, is length 2, expected minimum length 3"
//! );
//! # Ok::<(), vouch::Error>(())
//! ```

use crate::chain::{ArrayChain, Chain, DomainChain, LengthChain, NumberChain, ObjectChain, StringChain};
use crate::context::{check_label, ValidationContext};
use crate::error::{ConfigError, Error, ValidationFailure};
use crate::finding::{Domain, Finding};
use crate::value::{Value, ValueType, MAX_SAFE_INTEGER};
use serde::{Deserialize, Serialize};

/// Every key a rule configuration may carry.
pub const KNOWN_KEYS: [&str; 11] = [
    "minimumLength",
    "maximumLength",
    "exactLength",
    "minimumNumberValue",
    "maximumNumberValue",
    "exactNumberValue",
    "validProperties",
    "validValues",
    "validValueTypes",
    "shouldThrow",
    "name",
];

/// Named thresholds and whitelists for a [`Validator`].
///
/// Every option is optional; a configured predicate whose option is absent
/// fails with [`ConfigError::MissingRule`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_number_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_number_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_number_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_properties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_value_types: Option<Vec<ValueType>>,
    #[serde(default)]
    pub should_throw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RuleConfiguration {
    /// Parse untyped configuration data.
    ///
    /// Runs the key whitelist first, so an unknown key is reported by name
    /// even when other values are malformed.
    /// Integral floats such as `2.0` are accepted for the length options.
    pub fn from_json_value(mut json: serde_json::Value) -> Result<Self, ConfigError> {
        let kind = json_kind(&json);
        let Some(object) = json.as_object_mut() else {
            return Err(ConfigError::NotAnObject(kind));
        };
        if let Some(key) = object.keys().find(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            return Err(ConfigError::UnknownKey(key.clone()));
        }
        for key in LENGTH_KEYS {
            if let Some(value) = object.get_mut(key) {
                integral_length(value);
            }
        }

        let config: Self =
            serde_json::from_value(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let json = serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Self::from_json_value(json)
    }

    /// Reject non-finite numeric options and an invalid label.
    pub fn check(&self) -> Result<(), ConfigError> {
        let numbers = [
            ("minimumNumberValue", self.minimum_number_value),
            ("maximumNumberValue", self.maximum_number_value),
            ("exactNumberValue", self.exact_number_value),
        ];
        for (key, value) in numbers {
            if value.is_some_and(|n| !n.is_finite()) {
                return Err(ConfigError::NonFinite { key });
            }
        }
        if let Some(name) = &self.name {
            check_label(name)?;
        }
        Ok(())
    }
}

const LENGTH_KEYS: [&str; 3] = ["minimumLength", "maximumLength", "exactLength"];

/// Rewrite a whole, non-negative float as an integer so it reads as a length.
fn integral_length(value: &mut serde_json::Value) {
    let n = match value.as_f64() {
        Some(n) if value.is_f64() => n,
        _ => return,
    };
    if n >= 0.0 && n.fract() == 0.0 && n <= MAX_SAFE_INTEGER {
        *value = serde_json::Value::from(n as u64);
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn required<T>(option: Option<T>, key: &'static str) -> Result<T, ConfigError> {
    option.ok_or(ConfigError::MissingRule { key })
}

/// A validator pre-parameterized by a checked [`RuleConfiguration`].
///
/// The validator itself holds no session state; every call to
/// [`validate`](Self::validate) opens an independent session.
#[derive(Debug, Clone)]
pub struct Validator {
    config: RuleConfiguration,
}

impl Validator {
    pub fn new(config: RuleConfiguration) -> Result<Self, ConfigError> {
        config.check()?;
        tracing::debug!(
            label = ?config.name,
            should_throw = config.should_throw,
            "rule configuration accepted"
        );
        Ok(Self { config })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::new(RuleConfiguration::from_json_str(json)?)
    }

    pub fn config(&self) -> &RuleConfiguration {
        &self.config
    }

    /// Open a session for `subject` with the configured label and
    /// throw-mode.
    pub fn validate(&self, subject: impl Into<Value>) -> RuleSession<'_> {
        RuleSession {
            rules: &self.config,
            chain: self.open(subject),
        }
    }

    /// Apply every configured rule that fits `domain` and return the
    /// finished session.
    ///
    /// Object subjects treat `validProperties` as the allowed set.
    pub fn run(&self, subject: impl Into<Value>, domain: Domain) -> Result<Chain, ValidationFailure> {
        let rules = &self.config;
        let mut chain = self.open(subject);
        match domain {
            Domain::String => {
                apply_lengths(chain.is_string()?, rules)?;
            }
            Domain::Number => {
                let mut number = chain.is_number()?;
                if let Some(min) = rules.minimum_number_value {
                    number = number.that_is_over_minimum(min)?;
                }
                if let Some(max) = rules.maximum_number_value {
                    number = number.that_is_under_maximum(max)?;
                }
                if let Some(exact) = rules.exact_number_value {
                    number.that_is_exactly(exact)?;
                }
            }
            Domain::Object => {
                let mut object = apply_lengths(chain.is_object()?, rules)?;
                if let Some(properties) = &rules.valid_properties {
                    let names: Vec<&str> = properties.iter().map(String::as_str).collect();
                    object = object.that_may_have_properties(&names)?;
                }
                if let Some(values) = &rules.valid_values {
                    object = object.that_must_have_sanctioned_values(values)?;
                }
                if let Some(types) = &rules.valid_value_types {
                    object.that_must_have_sanctioned_value_types(types)?;
                }
            }
            Domain::Array => {
                let mut array = apply_lengths(chain.is_array()?, rules)?;
                if let Some(values) = &rules.valid_values {
                    array = array.that_must_have_sanctioned_values(values)?;
                }
                if let Some(types) = &rules.valid_value_types {
                    array.that_must_have_sanctioned_value_types(types)?;
                }
            }
        }
        Ok(chain)
    }

    fn open(&self, subject: impl Into<Value>) -> Chain {
        let mut builder =
            ValidationContext::builder(subject).throw_on_failure(self.config.should_throw);
        if let Some(name) = &self.config.name {
            builder = builder.label(name.clone());
        }
        Chain::from_context(builder.build_unchecked())
    }
}

fn apply_lengths<C: LengthChain>(
    mut chain: C,
    rules: &RuleConfiguration,
) -> Result<C, ValidationFailure> {
    if let Some(minimum) = rules.minimum_length {
        chain = chain.with_minimum_length(minimum)?;
    }
    if let Some(maximum) = rules.maximum_length {
        chain = chain.with_maximum_length(maximum)?;
    }
    if let Some(exact) = rules.exact_length {
        chain = chain.with_exact_length(exact)?;
    }
    Ok(chain)
}

/// A session opened by a [`Validator`].
#[derive(Debug)]
pub struct RuleSession<'v> {
    rules: &'v RuleConfiguration,
    chain: Chain,
}

impl<'v> RuleSession<'v> {
    pub fn is_string(&mut self) -> Result<Configured<'_, StringChain<'_>>, ValidationFailure> {
        let rules = self.rules;
        Ok(Configured::new(rules, self.chain.is_string()?))
    }

    pub fn is_number(&mut self) -> Result<Configured<'_, NumberChain<'_>>, ValidationFailure> {
        let rules = self.rules;
        Ok(Configured::new(rules, self.chain.is_number()?))
    }

    pub fn is_object(&mut self) -> Result<Configured<'_, ObjectChain<'_>>, ValidationFailure> {
        let rules = self.rules;
        Ok(Configured::new(rules, self.chain.is_object()?))
    }

    pub fn is_array(&mut self) -> Result<Configured<'_, ArrayChain<'_>>, ValidationFailure> {
        let rules = self.rules;
        Ok(Configured::new(rules, self.chain.is_array()?))
    }

    pub fn report(&self) -> &[Finding] {
        self.chain.report()
    }

    pub fn report_as_text(&self) -> String {
        self.chain.report_as_text()
    }

    pub fn clear_reports(&mut self) {
        self.chain.clear_reports();
    }

    pub fn confirm(&self) -> bool {
        self.chain.confirm()
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn into_chain(self) -> Chain {
        self.chain
    }
}

/// A domain chain whose predicates read their parameters from the
/// configuration.
///
/// Configured predicates return [`Error`]: `Config` when the option is
/// absent, `Failed` when throw-mode escalates a finding.
#[derive(Debug)]
pub struct Configured<'s, C> {
    rules: &'s RuleConfiguration,
    chain: C,
}

impl<'s, C> Configured<'s, C> {
    fn new(rules: &'s RuleConfiguration, chain: C) -> Self {
        Self { rules, chain }
    }

    /// Run an explicit-argument predicate on the underlying chain.
    pub fn then<F>(self, predicate: F) -> Result<Self, ValidationFailure>
    where
        F: FnOnce(C) -> Result<C, ValidationFailure>,
    {
        Ok(Self::new(self.rules, predicate(self.chain)?))
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn into_chain(self) -> C {
        self.chain
    }

    fn apply<T, F>(self, option: Option<T>, key: &'static str, predicate: F) -> Result<Self, Error>
    where
        F: FnOnce(C, T) -> Result<C, ValidationFailure>,
    {
        let value = required(option, key)?;
        let rules = self.rules;
        Ok(Self::new(rules, predicate(self.chain, value)?))
    }
}

impl<C: DomainChain> Configured<'_, C> {
    /// `true` iff no finding was recorded in this domain.
    pub fn confirm(&self) -> bool {
        self.chain.confirm()
    }
}

impl<C: LengthChain> Configured<'_, C> {
    pub fn with_minimum_length(self) -> Result<Self, Error> {
        let option = self.rules.minimum_length;
        self.apply(option, "minimumLength", C::with_minimum_length)
    }

    pub fn with_maximum_length(self) -> Result<Self, Error> {
        let option = self.rules.maximum_length;
        self.apply(option, "maximumLength", C::with_maximum_length)
    }

    pub fn with_exact_length(self) -> Result<Self, Error> {
        let option = self.rules.exact_length;
        self.apply(option, "exactLength", C::with_exact_length)
    }
}

impl<'s> Configured<'s, NumberChain<'_>> {
    pub fn that_is_over_minimum(self) -> Result<Self, Error> {
        let option = self.rules.minimum_number_value;
        self.apply(option, "minimumNumberValue", NumberChain::that_is_over_minimum)
    }

    pub fn that_is_under_maximum(self) -> Result<Self, Error> {
        let option = self.rules.maximum_number_value;
        self.apply(option, "maximumNumberValue", NumberChain::that_is_under_maximum)
    }

    pub fn that_is_exactly(self) -> Result<Self, Error> {
        let option = self.rules.exact_number_value;
        self.apply(option, "exactNumberValue", NumberChain::that_is_exactly)
    }

    /// Both bounds are required.
    pub fn that_is_between_min_max(self) -> Result<Self, Error> {
        let min = required(self.rules.minimum_number_value, "minimumNumberValue")?;
        let max = required(self.rules.maximum_number_value, "maximumNumberValue")?;
        Ok(self.then(|chain| chain.that_is_between_min_max(min, max))?)
    }
}

impl<'s> Configured<'s, ObjectChain<'_>> {
    pub fn that_may_have_properties(self) -> Result<Self, Error> {
        let rules = self.rules;
        self.apply(
            rules.valid_properties.as_deref(),
            "validProperties",
            |chain, properties| chain.that_may_have_properties(&as_names(properties)),
        )
    }

    pub fn that_must_have_properties(self) -> Result<Self, Error> {
        let rules = self.rules;
        self.apply(
            rules.valid_properties.as_deref(),
            "validProperties",
            |chain, properties| chain.that_must_have_properties(&as_names(properties)),
        )
    }

    pub fn that_must_have_sanctioned_values(self) -> Result<Self, Error> {
        let rules = self.rules;
        self.apply(
            rules.valid_values.as_deref(),
            "validValues",
            ObjectChain::that_must_have_sanctioned_values,
        )
    }

    pub fn that_must_have_sanctioned_value_types(self) -> Result<Self, Error> {
        let rules = self.rules;
        self.apply(
            rules.valid_value_types.as_deref(),
            "validValueTypes",
            ObjectChain::that_must_have_sanctioned_value_types,
        )
    }
}

impl<'s> Configured<'s, ArrayChain<'_>> {
    pub fn that_must_have_sanctioned_values(self) -> Result<Self, Error> {
        let rules = self.rules;
        self.apply(
            rules.valid_values.as_deref(),
            "validValues",
            ArrayChain::that_must_have_sanctioned_values,
        )
    }

    pub fn that_must_have_sanctioned_value_types(self) -> Result<Self, Error> {
        let rules = self.rules;
        self.apply(
            rules.valid_value_types.as_deref(),
            "validValueTypes",
            ArrayChain::that_must_have_sanctioned_value_types,
        )
    }
}

fn as_names(properties: &[String]) -> Vec<&str> {
    properties.iter().map(String::as_str).collect()
}
