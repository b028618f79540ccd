use std::sync::Arc;

use crate::collection::{CollectionConfig, Document, DocumentCollection};
use crate::common::{FieldRuleValidator, FieldType, Validator};
use crate::errors::InkstoreResult;
use crate::inkstore::Inkstore;

/// Name of the preferences collection.
pub const PREFS_COLLECTION: &str = "prefs";

/// The validator gating preference documents.
///
/// Rules: `color`, when present, must be one of blue, red, or green;
/// `timezone`, when present, must be a number. Leaving either blank is
/// fine.
pub fn preferences_validator() -> Validator {
    FieldRuleValidator::new("preferences")
        .one_of("color", vec!["blue".into(), "red".into(), "green".into()])
        .type_of("timezone", FieldType::Number)
        .into_validator()
}

/// The collection configuration for user preferences: validated,
/// timestamped, and created lazily on first access.
pub fn preferences_collection() -> CollectionConfig {
    CollectionConfig::new(PREFS_COLLECTION)
        .with_validator(preferences_validator())
        .with_timestamps(true)
        .with_auto_create(true)
}

/// Works with per-user preference documents.
///
/// Each user owns one document keyed by user id. Reading creates an empty
/// document on first access; updating merges the submitted fields over the
/// current body inside a transaction, so concurrent updates from two
/// sessions never silently clobber each other and invalid settings never
/// reach the store.
#[derive(Clone)]
pub struct PreferencesService {
    inner: Arc<PreferencesServiceInner>,
}

impl PreferencesService {
    /// Creates the service on top of an open database.
    pub fn new(db: &Inkstore) -> InkstoreResult<Self> {
        Ok(PreferencesService {
            inner: Arc::new(PreferencesServiceInner {
                collection: db.collection(PREFS_COLLECTION)?,
            }),
        })
    }

    /// Returns the user's preferences, creating an empty document on
    /// first access.
    pub fn read_or_create(&self, user_id: &str) -> InkstoreResult<Document> {
        let preferences = self.inner.collection.transaction(user_id, Ok)?;
        log::debug!("Got preferences for {}: {}", user_id, preferences);
        Ok(preferences)
    }

    /// Applies a patch to the user's preferences.
    ///
    /// Every top-level field of the patch overwrites the corresponding
    /// field of the current document; fields not named in the patch keep
    /// their values. The merged document is validated before it is
    /// written, and a rejected patch leaves the stored document untouched.
    pub fn update(&self, user_id: &str, patch: &Document) -> InkstoreResult<Document> {
        let patch = patch.clone();
        let preferences = self.inner.collection.transaction(user_id, move |mut doc| {
            for field in patch.fields() {
                doc.put(field.as_str(), patch.get(&field))?;
            }
            Ok(doc)
        })?;
        log::debug!("Updated preferences for {}: {}", user_id, preferences);
        Ok(preferences)
    }
}

struct PreferencesServiceInner {
    collection: DocumentCollection,
}
