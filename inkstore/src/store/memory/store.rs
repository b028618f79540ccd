use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collection::Document;
use crate::common::{Value, INKSTORE_VERSION};
use crate::errors::{ErrorKind, InkstoreError, InkstoreResult};
use crate::store::memory::{InMemoryCollection, InMemoryStoreConfig};
use crate::store::{DocumentStoreProvider, StoreConfig, StoreConfigProvider};

/// In-memory implementation of a document store.
///
/// # Purpose
/// `InMemoryStore` provides a complete store implementation suitable for
/// testing, demos, and scenarios where persistence is not required. All
/// data is stored in memory using concurrent data structures for
/// thread-safe access.
///
/// # Characteristics
/// - **Thread-Safe**: Fully concurrent with safe data sharing across threads
/// - **Registry Management**: Collections are created on first use
/// - **Temporary Storage**: All data is lost when the store is closed
///
/// # Usage
/// Create a store with an explicit configuration:
/// ```text
/// let store = InMemoryStore::new(InMemoryStoreConfig::with_name("demo"));
/// let document_store = DocumentStore::new(store);
/// document_store.open_or_create().unwrap();
/// ```
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    /// Creates a new in-memory store with the specified configuration.
    pub fn new(store_config: InMemoryStoreConfig) -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::new(store_config)),
        }
    }
}

impl DocumentStoreProvider for InMemoryStore {
    fn open_or_create(&self) -> InkstoreResult<()> {
        self.inner.open_or_create()
    }

    fn is_closed(&self) -> InkstoreResult<bool> {
        Ok(self.inner.closed.load(Ordering::Relaxed))
    }

    fn close(&self) -> InkstoreResult<()> {
        self.inner.close()
    }

    fn has_collection(&self, collection: &str) -> InkstoreResult<bool> {
        Ok(self.inner.collection_registry.contains_key(collection))
    }

    fn fetch(&self, collection: &str, id: &str) -> InkstoreResult<Option<Document>> {
        self.inner.collection(collection)?.fetch(id)
    }

    fn put(&self, collection: &str, document: Document) -> InkstoreResult<Document> {
        self.inner.collection(collection)?.put(document)
    }

    fn ensure_index(&self, collection: &str, field: &str) -> InkstoreResult<()> {
        self.inner.collection(collection)?.ensure_index(field)
    }

    fn query_index(
        &self,
        collection: &str,
        field: &str,
        key: &Value,
    ) -> InkstoreResult<Vec<Document>> {
        self.inner.collection(collection)?.query(field, key)
    }

    fn store_version(&self) -> InkstoreResult<String> {
        Ok(format!("InMemory/{}", INKSTORE_VERSION))
    }

    fn store_config(&self) -> InkstoreResult<StoreConfig> {
        Ok(StoreConfig::new(self.inner.store_config.clone()))
    }
}

struct InMemoryStoreInner {
    closed: AtomicBool,
    store_config: InMemoryStoreConfig,
    collection_registry: DashMap<String, InMemoryCollection>,
}

impl InMemoryStoreInner {
    fn new(store_config: InMemoryStoreConfig) -> InMemoryStoreInner {
        InMemoryStoreInner {
            closed: AtomicBool::from(false),
            store_config,
            collection_registry: DashMap::new(),
        }
    }

    fn check_opened(&self) -> InkstoreResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("Store {} is closed", self.store_config.store_name());
            return Err(InkstoreError::new(
                &format!("Store {} is closed", self.store_config.store_name()),
                ErrorKind::StoreUnavailable,
            ));
        }
        Ok(())
    }

    fn open_or_create(&self) -> InkstoreResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("Cannot reopen a closed in-memory store");
            return Err(InkstoreError::new(
                "Cannot reopen a closed in-memory store",
                ErrorKind::InvalidOperation,
            ));
        }
        log::debug!("Opened in-memory store {}", self.store_config.store_name());
        Ok(())
    }

    fn close(&self) -> InkstoreResult<()> {
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }

        for entry in self.collection_registry.iter() {
            entry.value().close()?;
        }
        self.collection_registry.clear();
        log::debug!("Closed in-memory store {}", self.store_config.store_name());
        Ok(())
    }

    fn collection(&self, name: &str) -> InkstoreResult<InMemoryCollection> {
        self.check_opened()?;
        let collection = self
            .collection_registry
            .entry(name.to_string())
            .or_insert_with(|| InMemoryCollection::new(name));
        Ok(collection.clone())
    }
}
