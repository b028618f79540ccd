use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collection::{CollectionConfig, DocumentCollection};
use crate::errors::{ErrorKind, InkstoreError, InkstoreResult};
use crate::inkstore_builder::InkstoreBuilder;
use crate::inkstore_config::InkstoreConfig;
use crate::store::{DocumentStore, StoreConfig};

/// The main database instance.
///
/// `Inkstore` is the entry point for all database operations. It hands out
/// [`DocumentCollection`] handles, which in turn expose reads and
/// transactions on documents.
///
/// `Inkstore` uses the PIMPL (Pointer to Implementation) design pattern
/// internally. Instances are thread-safe and cheap to clone; all clones
/// share the same underlying state. The database is closed when `close()`
/// is called or when the last clone is dropped.
///
/// # Examples
///
/// ```rust,ignore
/// use inkstore::inkstore::Inkstore;
/// use inkstore::doc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Inkstore::builder()
///     .collection(CollectionConfig::new("prefs").with_auto_create(true))
///     .open_or_create()?;
///
/// let prefs = db.collection("prefs")?;
/// let doc = prefs.transaction("alice", |mut doc| {
///     doc.put("color", "blue")?;
///     Ok(doc)
/// })?;
///
/// db.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Inkstore {
    inner: Arc<InkstoreInner>,
}

impl Inkstore {
    /// Creates a new `InkstoreBuilder` for configuring and opening a
    /// database.
    pub fn builder() -> InkstoreBuilder {
        InkstoreBuilder::new()
    }

    pub(crate) fn open(config: InkstoreConfig) -> InkstoreResult<Inkstore> {
        let store = config.document_store()?;
        store.open_or_create()?;

        // Create declared indexes before any traffic reaches the
        // collections, backfilling from whatever the store already holds.
        for collection_config in config.collection_configs() {
            for field in collection_config.indexed_fields() {
                store.ensure_index(collection_config.name(), field)?;
            }
        }

        config.initialize()?;
        log::debug!("Inkstore opened");

        Ok(Inkstore {
            inner: Arc::new(InkstoreInner {
                config,
                store,
                collections: DashMap::new(),
                closed: AtomicBool::from(false),
            }),
        })
    }

    /// Gets a collection handle by name, creating the collection on first
    /// use.
    ///
    /// A collection registered at build time gets its registered
    /// configuration; any other name gets a permissive default with no
    /// validator, no timestamps, and no auto-create.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is closed or the name is empty.
    pub fn collection(&self, name: &str) -> InkstoreResult<DocumentCollection> {
        self.inner.collection(name)
    }

    /// Checks whether the store currently holds a collection with the
    /// given name.
    pub fn has_collection(&self, name: &str) -> InkstoreResult<bool> {
        self.inner.store.has_collection(name)
    }

    /// Returns the version string of the underlying store.
    pub fn store_version(&self) -> InkstoreResult<String> {
        self.inner.store.store_version()
    }

    /// Returns the configuration of the underlying store.
    pub fn store_config(&self) -> InkstoreResult<StoreConfig> {
        self.inner.store.store_config()
    }

    /// Closes the database and its store. Closing twice is a no-op.
    pub fn close(&self) -> InkstoreResult<()> {
        self.inner.close()
    }

    /// Checks whether the database has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Relaxed)
    }
}

struct InkstoreInner {
    config: InkstoreConfig,
    store: DocumentStore,
    collections: DashMap<String, DocumentCollection>,
    closed: AtomicBool,
}

impl std::fmt::Debug for Inkstore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inkstore")
            .field("closed", &self.inner.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl InkstoreInner {
    fn collection(&self, name: &str) -> InkstoreResult<DocumentCollection> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("Database is closed");
            return Err(InkstoreError::new(
                "Database is closed",
                ErrorKind::InvalidOperation,
            ));
        }

        if name.is_empty() {
            log::error!("Collection name cannot be empty");
            return Err(InkstoreError::new(
                "Collection name cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }

        let collection = self.collections.entry(name.to_string()).or_insert_with(|| {
            let config = self
                .config
                .collection_config(name)
                .unwrap_or_else(|| CollectionConfig::new(name));
            DocumentCollection::new(config, self.store.clone())
        });
        Ok(collection.clone())
    }

    fn close(&self) -> InkstoreResult<()> {
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }

        self.collections.clear();
        self.store.close()?;
        log::debug!("Inkstore closed");
        Ok(())
    }
}

impl Drop for InkstoreInner {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to close database on drop: {:?}", e);
        }
    }
}
