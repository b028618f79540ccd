//! Configuration management for an Inkstore database.

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::collection::CollectionConfig;
use crate::errors::{ErrorKind, InkstoreError, InkstoreResult};
use crate::store::DocumentStore;

/// Public interface for Inkstore database configuration.
///
/// Collects the store and the collection configurations before the
/// database is opened. Once the database initializes, the configuration is
/// frozen: registering further collections or swapping the store fails
/// with `InvalidOperation`. Changing validation rules means opening a new
/// database with a new configuration.
///
/// # Examples
///
/// ```rust,ignore
/// use inkstore::inkstore::Inkstore;
///
/// let db = Inkstore::builder()
///     .collection(preferences_collection())
///     .open_or_create()?;
/// ```
#[derive(Clone)]
pub struct InkstoreConfig {
    /// The pointer to implementation. Uses Arc for cheap cloning and
    /// thread safety.
    inner: Arc<InkstoreConfigInner>,
}

impl Default for InkstoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl InkstoreConfig {
    /// Creates a new configuration instance with no store and no
    /// collections.
    pub fn new() -> Self {
        InkstoreConfig {
            inner: Arc::new(InkstoreConfigInner::new()),
        }
    }

    /// Sets the document store backing the database.
    ///
    /// # Errors
    ///
    /// Returns an error if a store is already set or the configuration has
    /// been initialized.
    pub fn set_document_store(&self, store: DocumentStore) -> InkstoreResult<()> {
        self.inner.set_document_store(store)
    }

    /// Gets the configured document store.
    ///
    /// # Errors
    ///
    /// Returns an error if no store is configured.
    pub fn document_store(&self) -> InkstoreResult<DocumentStore> {
        self.inner.document_store()
    }

    /// Checks whether a document store has been configured.
    pub fn has_document_store(&self) -> bool {
        self.inner.store.get().is_some()
    }

    /// Registers a collection configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration has been initialized or a
    /// collection with the same name is already registered.
    pub fn add_collection(&self, config: CollectionConfig) -> InkstoreResult<()> {
        self.inner.add_collection(config)
    }

    /// Looks up the configuration registered for a collection name.
    pub fn collection_config(&self, name: &str) -> Option<CollectionConfig> {
        self.inner
            .collection_configs
            .get(name)
            .map(|entry| entry.value().clone())
    }

    pub(crate) fn collection_configs(&self) -> Vec<CollectionConfig> {
        self.inner
            .collection_configs
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Freezes the configuration.
    pub(crate) fn initialize(&self) -> InkstoreResult<()> {
        self.inner.configured.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Private implementation of the configuration.
struct InkstoreConfigInner {
    /// Indicates whether this configuration has been initialized
    configured: AtomicBool,
    /// The document store backing the database (set only once)
    store: OnceLock<DocumentStore>,
    /// Registered collection configurations by name
    collection_configs: DashMap<String, CollectionConfig>,
}

impl InkstoreConfigInner {
    fn new() -> Self {
        InkstoreConfigInner {
            configured: AtomicBool::from(false),
            store: OnceLock::new(),
            collection_configs: DashMap::new(),
        }
    }

    fn check_not_configured(&self) -> InkstoreResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("Configuration cannot be changed after initialization");
            return Err(InkstoreError::new(
                "Configuration cannot be changed after initialization",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn set_document_store(&self, store: DocumentStore) -> InkstoreResult<()> {
        self.check_not_configured()?;
        if self.store.set(store).is_err() {
            log::error!("Document store is already configured");
            return Err(InkstoreError::new(
                "Document store is already configured",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn document_store(&self) -> InkstoreResult<DocumentStore> {
        self.store.get().cloned().ok_or_else(|| {
            log::error!("No document store configured");
            InkstoreError::new("No document store configured", ErrorKind::InvalidOperation)
        })
    }

    fn add_collection(&self, config: CollectionConfig) -> InkstoreResult<()> {
        self.check_not_configured()?;
        let name = config.name().to_string();
        if self.collection_configs.contains_key(&name) {
            log::error!("Collection {} is already configured", name);
            return Err(InkstoreError::new(
                &format!("Collection {} is already configured", name),
                ErrorKind::InvalidOperation,
            ));
        }
        self.collection_configs.insert(name, config);
        Ok(())
    }
}
