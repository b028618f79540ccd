use crate::common::Validator;

/// Configuration of a named document collection.
///
/// A collection configuration binds the behavior the transaction layer
/// applies to a collection's documents:
///
/// - an optional [`Validator`] gating every write,
/// - whether the store maintains `created_at`/`updated_at` timestamps,
/// - whether transactions start from an empty document when the requested
///   id does not exist yet,
/// - which fields carry a precomputed index for lookups.
///
/// Configurations are collected before the database is opened and are
/// immutable afterwards. Changing a validation rule means opening the
/// database with a new configuration, not mutating a running one.
///
/// # Examples
///
/// ```ignore
/// let config = CollectionConfig::new("prefs")
///     .with_validator(my_validator)
///     .with_timestamps(true)
///     .with_auto_create(true);
/// ```
#[derive(Clone)]
pub struct CollectionConfig {
    name: String,
    validator: Option<Validator>,
    timestamps: bool,
    auto_create: bool,
    indexed_fields: Vec<String>,
}

impl CollectionConfig {
    /// Creates a configuration with no validator, no timestamps, no
    /// auto-create, and no indexes.
    pub fn new(name: &str) -> Self {
        CollectionConfig {
            name: name.to_string(),
            validator: None,
            timestamps: false,
            auto_create: false,
            indexed_fields: Vec::new(),
        }
    }

    /// Binds a validator to this collection.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Enables or disables timestamp maintenance.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Enables or disables starting transactions from an empty document
    /// when the requested id does not exist.
    pub fn with_auto_create(mut self, enabled: bool) -> Self {
        self.auto_create = enabled;
        self
    }

    /// Declares a precomputed index on a field. The index is created and
    /// backfilled when the database is opened.
    pub fn with_index(mut self, field: &str) -> Self {
        self.indexed_fields.push(field.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    pub fn is_timestamps(&self) -> bool {
        self.timestamps
    }

    pub fn is_auto_create(&self) -> bool {
        self.auto_create
    }

    pub fn indexed_fields(&self) -> &[String] {
        &self.indexed_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{FieldRuleValidator, FieldType};

    #[test]
    fn test_config_defaults() {
        let config = CollectionConfig::new("prefs");
        assert_eq!(config.name(), "prefs");
        assert!(config.validator().is_none());
        assert!(!config.is_timestamps());
        assert!(!config.is_auto_create());
        assert!(config.indexed_fields().is_empty());
    }

    #[test]
    fn test_config_builder_chain() {
        let validator = FieldRuleValidator::new("v")
            .type_of("timezone", FieldType::Number)
            .into_validator();
        let config = CollectionConfig::new("prefs")
            .with_validator(validator)
            .with_timestamps(true)
            .with_auto_create(true)
            .with_index("slug");
        assert!(config.validator().is_some());
        assert!(config.is_timestamps());
        assert!(config.is_auto_create());
        assert_eq!(config.indexed_fields(), &["slug".to_string()]);
    }
}
