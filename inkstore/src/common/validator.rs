use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::collection::Document;
use crate::common::Value;
use crate::errors::{ErrorKind, InkstoreError, InkstoreResult};

/// Contract for implementing document validators.
///
/// # Purpose
/// Defines the interface for validators that gate persistence. A collection
/// may bind one validator; every document body is checked immediately before
/// a write attempt, so the store never observes invalid state, even
/// transiently.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`. They must also be pure: no I/O and
/// no mutable state, since a transaction may invoke them once per retry.
pub trait ValidatorProvider: Send + Sync {
    /// Returns the unique name of this validator.
    fn name(&self) -> String;

    /// Checks a candidate document body.
    ///
    /// # Returns
    /// `Ok(())` when the body is acceptable, or an error with kind
    /// [`ErrorKind::ValidationError`] carrying the reason.
    fn validate(&self, document: &Document) -> InkstoreResult<()>;
}

/// Wraps a validator implementation.
///
/// Provides a type-erased, cloneable wrapper around any `ValidatorProvider`
/// implementation. Uses `Arc` for reference-counted sharing so a collection
/// configuration and the transaction executor can hold the same validator.
#[derive(Clone)]
pub struct Validator {
    inner: Arc<dyn ValidatorProvider>,
}

impl Validator {
    /// Creates a new validator from an implementation.
    pub fn new<T: ValidatorProvider + 'static>(inner: T) -> Self {
        Validator { inner: Arc::new(inner) }
    }

    /// Returns the validator's name.
    pub fn name(&self) -> String {
        self.inner.name()
    }

    /// Checks a candidate document body.
    pub fn validate(&self, document: &Document) -> InkstoreResult<()> {
        self.inner.validate(document)
    }
}

/// Expected primitive shape of a document field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Number,
    Text,
    Document,
    Array,
}

impl FieldType {
    /// Checks whether a value matches this field type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::Bool => value.is_bool(),
            FieldType::Number => value.is_number(),
            FieldType::Text => value.is_string(),
            FieldType::Document => value.is_document(),
            FieldType::Array => value.is_array(),
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Bool => write!(f, "boolean"),
            FieldType::Number => write!(f, "number"),
            FieldType::Text => write!(f, "text"),
            FieldType::Document => write!(f, "document"),
            FieldType::Array => write!(f, "array"),
        }
    }
}

/// A single field-level validation rule.
///
/// Absence of the named field always passes; rules only constrain a field
/// when it is present.
#[derive(Clone)]
pub enum FieldRule {
    /// The field's value, when present, must be in the allow-list.
    OneOf { field: String, allowed: Vec<Value> },
    /// The field's value, when present, must match the expected type.
    TypeOf { field: String, expected: FieldType },
}

/// A validator built from a list of [`FieldRule`]s.
///
/// This covers the common rule family for user-facing settings documents:
/// enumerated fields must come from an allow-list, typed fields must match
/// an expected primitive type, and leaving an optional field blank is fine.
///
/// # Examples
///
/// ```ignore
/// let validator = FieldRuleValidator::new("preferences")
///     .one_of("color", vec!["blue".into(), "red".into(), "green".into()])
///     .type_of("timezone", FieldType::Number)
///     .into_validator();
/// ```
pub struct FieldRuleValidator {
    name: String,
    rules: Vec<FieldRule>,
}

impl FieldRuleValidator {
    pub fn new(name: &str) -> Self {
        FieldRuleValidator {
            name: name.to_string(),
            rules: Vec::new(),
        }
    }

    /// Adds an allow-list rule for a field.
    pub fn one_of(mut self, field: &str, allowed: Vec<Value>) -> Self {
        self.rules.push(FieldRule::OneOf {
            field: field.to_string(),
            allowed,
        });
        self
    }

    /// Adds an expected-type rule for a field.
    pub fn type_of(mut self, field: &str, expected: FieldType) -> Self {
        self.rules.push(FieldRule::TypeOf {
            field: field.to_string(),
            expected,
        });
        self
    }

    /// Wraps this rule set into a type-erased [`Validator`].
    pub fn into_validator(self) -> Validator {
        Validator::new(self)
    }
}

impl ValidatorProvider for FieldRuleValidator {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn validate(&self, document: &Document) -> InkstoreResult<()> {
        for rule in &self.rules {
            match rule {
                FieldRule::OneOf { field, allowed } => {
                    let value = document.get(field);
                    if value.is_null() {
                        continue;
                    }
                    if !allowed.contains(&value) {
                        let message = format!(
                            "Bad {}: {} (expected one of [{}])",
                            field,
                            value,
                            allowed.iter().map(|v| v.to_string()).join(", ")
                        );
                        log::warn!("Validator {} rejected document: {}", self.name, message);
                        return Err(InkstoreError::new(&message, ErrorKind::ValidationError));
                    }
                }
                FieldRule::TypeOf { field, expected } => {
                    let value = document.get(field);
                    if value.is_null() {
                        continue;
                    }
                    if !expected.matches(&value) {
                        let message =
                            format!("Bad {} setting: {} (expected a {})", field, value, expected);
                        log::warn!("Validator {} rejected document: {}", self.name, message);
                        return Err(InkstoreError::new(&message, ErrorKind::ValidationError));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn color_validator() -> Validator {
        FieldRuleValidator::new("test")
            .one_of("color", vec!["blue".into(), "red".into(), "green".into()])
            .type_of("timezone", FieldType::Number)
            .into_validator()
    }

    #[test]
    fn test_validator_name() {
        assert_eq!(color_validator().name(), "test");
    }

    #[test]
    fn test_empty_rule_set_accepts_everything() {
        let validator = FieldRuleValidator::new("open").into_validator();
        let doc = doc!{ anything: "goes", number: 12 };
        assert!(validator.validate(&doc).is_ok());
    }

    #[test]
    fn test_one_of_accepts_allowed_value() {
        let doc = doc!{ color: "blue" };
        assert!(color_validator().validate(&doc).is_ok());
    }

    #[test]
    fn test_one_of_rejects_unknown_value() {
        let doc = doc!{ color: "purple" };
        let err = color_validator().validate(&doc).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
        assert!(err.message().contains("purple"));
        assert!(err.message().contains("color"));
    }

    #[test]
    fn test_absent_field_is_valid() {
        let doc = doc!{ timezone: 2 };
        assert!(color_validator().validate(&doc).is_ok());
    }

    #[test]
    fn test_type_of_accepts_matching_type() {
        let doc = doc!{ timezone: (-5) };
        assert!(color_validator().validate(&doc).is_ok());
    }

    #[test]
    fn test_type_of_rejects_wrong_type() {
        let doc = doc!{ timezone: "UTC" };
        let err = color_validator().validate(&doc).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
        assert!(err.message().contains("timezone"));
    }

    #[test]
    fn test_field_type_matches() {
        assert!(FieldType::Number.matches(&Value::I32(1)));
        assert!(FieldType::Number.matches(&Value::F64(1.5)));
        assert!(!FieldType::Number.matches(&Value::from("1")));
        assert!(FieldType::Text.matches(&Value::from("a")));
        assert!(FieldType::Bool.matches(&Value::Bool(true)));
    }

    #[test]
    fn test_validator_is_pure_across_calls() {
        let validator = color_validator();
        let good = doc!{ color: "red" };
        let bad = doc!{ color: "mauve" };
        for _ in 0..3 {
            assert!(validator.validate(&good).is_ok());
            assert!(validator.validate(&bad).is_err());
        }
    }
}
