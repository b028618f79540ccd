use std::sync::Arc;

use crate::collection::{CollectionConfig, Document};
use crate::common::Value;
use crate::errors::InkstoreResult;
use crate::store::DocumentStore;
use crate::transaction::{TransactionExecutor, TransactionOptions};

/// Runtime handle to a document collection.
///
/// A `DocumentCollection` bundles a collection's configuration with the
/// store adapter and a transaction executor. Reads go straight to the
/// store; every write goes through a transaction, so validation,
/// timestamping, and conflict retry always apply.
///
/// Handles are cheap to clone and thread-safe; all clones share the same
/// underlying state.
///
/// # Examples
///
/// ```rust,ignore
/// let collection = db.collection("prefs")?;
/// let doc = collection.transaction("alice", |mut doc| {
///     doc.put("color", "blue")?;
///     Ok(doc)
/// })?;
/// ```
#[derive(Clone)]
pub struct DocumentCollection {
    inner: Arc<DocumentCollectionInner>,
}

impl DocumentCollection {
    pub(crate) fn new(config: CollectionConfig, store: DocumentStore) -> Self {
        let executor =
            TransactionExecutor::new(store.clone(), config.name(), config.validator().cloned());
        DocumentCollection {
            inner: Arc::new(DocumentCollectionInner {
                config,
                store,
                executor,
            }),
        }
    }

    /// Returns the collection name.
    pub fn name(&self) -> String {
        self.inner.config.name().to_string()
    }

    /// Retrieves the document with the given id, or `None` if absent.
    pub fn get(&self, id: &str) -> InkstoreResult<Option<Document>> {
        self.inner.store.fetch(self.inner.config.name(), id)
    }

    /// Looks up all documents whose indexed field matches the key, in
    /// index insertion order.
    pub fn find_by(&self, field: &str, key: &Value) -> InkstoreResult<Vec<Document>> {
        self.inner
            .store
            .query_index(self.inner.config.name(), field, key)
    }

    /// Looks up the first document whose indexed field matches the key.
    /// When several documents match, whichever entered the index first
    /// wins; no further disambiguation happens here.
    pub fn find_first_by(&self, field: &str, key: &Value) -> InkstoreResult<Option<Document>> {
        let mut matches = self.find_by(field, key)?;
        if matches.is_empty() {
            Ok(None)
        } else {
            Ok(Some(matches.remove(0)))
        }
    }

    /// Runs a transaction with explicit options.
    pub fn run_transaction<F>(
        &self,
        id: &str,
        options: &TransactionOptions,
        mutate: F,
    ) -> InkstoreResult<Document>
    where
        F: Fn(Document) -> InkstoreResult<Document>,
    {
        self.inner.executor.run(id, options, mutate)
    }

    /// Runs a transaction with options derived from the collection's
    /// configuration: auto-create maps to create-if-missing, the
    /// timestamping flag carries over, and the retry budget is the
    /// default.
    pub fn transaction<F>(&self, id: &str, mutate: F) -> InkstoreResult<Document>
    where
        F: Fn(Document) -> InkstoreResult<Document>,
    {
        let options = TransactionOptions::new(
            self.inner.config.is_auto_create(),
            self.inner.config.is_timestamps(),
            TransactionOptions::default().max_retries(),
        );
        self.inner.executor.run(id, &options, mutate)
    }
}

struct DocumentCollectionInner {
    config: CollectionConfig,
    store: DocumentStore,
    executor: TransactionExecutor,
}

impl std::fmt::Debug for DocumentCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCollection")
            .field("name", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::FieldRuleValidator;
    use crate::doc;
    use crate::errors::ErrorKind;
    use crate::store::memory::{InMemoryStore, InMemoryStoreConfig};
    use crate::store::DocumentStoreProvider;

    fn memory_store() -> DocumentStore {
        let store = InMemoryStore::new(InMemoryStoreConfig::with_name("collection-test"));
        store.open_or_create().unwrap();
        DocumentStore::new(store)
    }

    fn prefs_collection(store: &DocumentStore) -> DocumentCollection {
        let config = CollectionConfig::new("prefs")
            .with_timestamps(true)
            .with_auto_create(true);
        DocumentCollection::new(config, store.clone())
    }

    #[test]
    fn test_name() {
        let store = memory_store();
        assert_eq!(prefs_collection(&store).name(), "prefs");
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = memory_store();
        assert!(prefs_collection(&store).get("alice").unwrap().is_none());
    }

    #[test]
    fn test_transaction_uses_collection_config() {
        let store = memory_store();
        let collection = prefs_collection(&store);

        // auto_create carries over, so the first transaction creates.
        let doc = collection.transaction("alice", Ok).unwrap();
        assert_eq!(doc.id(), Some("alice".to_string()));
        // timestamps carry over as well.
        assert!(doc.created_at().is_some());
    }

    #[test]
    fn test_transaction_without_auto_create_requires_document() {
        let store = memory_store();
        let config = CollectionConfig::new("prefs");
        let collection = DocumentCollection::new(config, store);

        let err = collection.transaction("alice", Ok).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotFound);
    }

    #[test]
    fn test_validator_bound_through_config() {
        let store = memory_store();
        let validator = FieldRuleValidator::new("colors")
            .one_of("color", vec!["blue".into()])
            .into_validator();
        let config = CollectionConfig::new("prefs")
            .with_validator(validator)
            .with_auto_create(true);
        let collection = DocumentCollection::new(config, store);

        let err = collection
            .transaction("alice", |mut doc| {
                doc.put("color", "orange")?;
                Ok(doc)
            })
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_find_first_by_takes_head_of_matches() {
        let store = memory_store();
        store.ensure_index("blogs", "slug").unwrap();
        let config = CollectionConfig::new("blogs").with_auto_create(true);
        let collection = DocumentCollection::new(config, store);

        collection
            .transaction("post-1", |mut doc| {
                doc.merge(&doc!{ slug: "hello", title: "first" })?;
                Ok(doc)
            })
            .unwrap();
        collection
            .transaction("post-2", |mut doc| {
                doc.merge(&doc!{ slug: "hello", title: "second" })?;
                Ok(doc)
            })
            .unwrap();

        let first = collection
            .find_first_by("slug", &Value::from("hello"))
            .unwrap()
            .unwrap();
        assert_eq!(first.get("title"), "first".into());

        let all = collection.find_by("slug", &Value::from("hello")).unwrap();
        assert_eq!(all.len(), 2);

        assert!(collection
            .find_first_by("slug", &Value::from("nope"))
            .unwrap()
            .is_none());
    }
}
