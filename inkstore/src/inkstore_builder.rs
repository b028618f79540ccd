use crate::collection::CollectionConfig;
use crate::errors::{InkstoreError, InkstoreResult};
use crate::inkstore::Inkstore;
use crate::inkstore_config::InkstoreConfig;
use crate::store::memory::{InMemoryStore, InMemoryStoreConfig};
use crate::store::{DocumentStore, DocumentStoreProvider};

/// Builder for creating and configuring an Inkstore database instance.
///
/// `InkstoreBuilder` provides a fluent API for configuring the database
/// before opening it. It follows the builder pattern and captures errors
/// during configuration so they are propagated when opening the database.
///
/// # Examples
///
/// ```rust,ignore
/// use inkstore::inkstore::Inkstore;
/// use inkstore::store::memory::{InMemoryStore, InMemoryStoreConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Open with default in-memory storage
/// let db = Inkstore::builder().open_or_create()?;
///
/// // Open with an explicit store and collections
/// let db = Inkstore::builder()
///     .store(InMemoryStore::new(InMemoryStoreConfig::with_name("demo")))
///     .collection(preferences_collection())
///     .open_or_create()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct InkstoreBuilder {
    error: Option<InkstoreError>,
    config: InkstoreConfig,
}

impl InkstoreBuilder {
    /// Creates a new `InkstoreBuilder` with default configuration.
    ///
    /// When no store is configured explicitly, an in-memory store with a
    /// default configuration is used.
    pub fn new() -> Self {
        InkstoreBuilder {
            error: None,
            config: InkstoreConfig::new(),
        }
    }

    /// Sets the store backing the database.
    ///
    /// The configuration value is explicit: there is no ambient default a
    /// store implementation could fall back to.
    pub fn store<T: DocumentStoreProvider + 'static>(mut self, provider: T) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_document_store(DocumentStore::new(provider)) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Registers a collection configuration.
    ///
    /// Collections not registered here can still be used through
    /// [`Inkstore::collection`]; they get a permissive default
    /// configuration with no validator, no timestamps, and no auto-create.
    pub fn collection(mut self, config: CollectionConfig) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.add_collection(config) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Opens the database.
    ///
    /// Any error captured while configuring the builder is returned here.
    /// Opening creates the declared collection indexes and freezes the
    /// configuration.
    pub fn open_or_create(self) -> InkstoreResult<Inkstore> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if !self.config.has_document_store() {
            self.config
                .set_document_store(DocumentStore::new(InMemoryStore::new(
                    InMemoryStoreConfig::new(),
                )))?;
        }

        Inkstore::open(self.config)
    }
}
