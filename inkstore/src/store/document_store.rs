use std::sync::Arc;

use crate::collection::Document;
use crate::errors::InkstoreResult;
use crate::store::StoreConfig;

/// Low-level interface for document store implementations.
///
/// # Purpose
/// Defines the contract that all document store backends must implement.
/// Implementers provide concrete storage operations, such as the bundled
/// in-memory store or an adapter for a networked document database.
///
/// # Key Methods
/// - **Data Operations**: `fetch()`, `put()`, `query_index()`
/// - **Index Maintenance**: `ensure_index()`
/// - **Lifecycle**: `open_or_create()`, `close()`, `is_closed()`
/// - **Metadata**: `store_version()`, `store_config()`
///
/// # Concurrency
/// `put` is the store's only serialization point: the presented document
/// carries the revision its writer last read, and the store accepts the
/// write only when that revision is still current. Concurrent writers for
/// the same id are arbitrated by this check alone; no caller-side locking
/// is expected, and none would be correct since fetch and put are separated
/// by caller-supplied logic of unbounded duration.
///
/// # Failure Domains
/// "Not found" is a normal outcome (`Ok(None)` from `fetch`), not an error.
/// A stale revision fails with [`ErrorKind::Conflict`]. Transport and
/// storage failures, including operations on a closed store and timed-out
/// calls in networked implementations, fail with
/// [`ErrorKind::StoreUnavailable`]; they must never be reported as
/// conflicts, because the transaction layer retries conflicts and must not
/// mask an outage behind silent retries.
///
/// # Thread Safety
/// Implementers must be `Send + Sync` for safe use in concurrent contexts.
///
/// [`ErrorKind::Conflict`]: crate::errors::ErrorKind::Conflict
/// [`ErrorKind::StoreUnavailable`]: crate::errors::ErrorKind::StoreUnavailable
pub trait DocumentStoreProvider: Send + Sync {
    /// Opens the store, creating its backing resources if needed.
    fn open_or_create(&self) -> InkstoreResult<()>;

    /// Checks if the store is closed.
    fn is_closed(&self) -> InkstoreResult<bool>;

    /// Closes the store. Closing an already closed store is a no-op.
    fn close(&self) -> InkstoreResult<()>;

    /// Checks whether the store currently holds a collection with the
    /// given name.
    fn has_collection(&self, collection: &str) -> InkstoreResult<bool>;

    /// Retrieves the document with the given id.
    ///
    /// # Returns
    /// * `Ok(Some(document))` if the document exists
    /// * `Ok(None)` if it does not, which is a normal outcome
    /// * `Err` with kind `StoreUnavailable` on storage failure
    fn fetch(&self, collection: &str, id: &str) -> InkstoreResult<Option<Document>>;

    /// Writes a whole document atomically.
    ///
    /// The document must carry an id. Its revision is compared against the
    /// store's current revision for that id: revision 0 means "create",
    /// conflicting when the id already exists; any other revision must
    /// match the stored one exactly. On success the store assigns a fresh
    /// revision, and either the whole document is persisted or nothing
    /// changes.
    ///
    /// The store performs no validation and no timestamping.
    ///
    /// # Returns
    /// * `Ok(document)` with the stored document carrying its new revision
    /// * `Err` with kind `Conflict` when another writer won the race
    /// * `Err` with kind `StoreUnavailable` on storage failure
    fn put(&self, collection: &str, document: Document) -> InkstoreResult<Document>;

    /// Creates a precomputed index on a field and backfills it from the
    /// collection's current documents. Creating an index that already
    /// exists is a no-op.
    fn ensure_index(&self, collection: &str, field: &str) -> InkstoreResult<()>;

    /// Looks up documents whose indexed field matches the given key.
    ///
    /// Results are returned in index insertion order; callers that want
    /// "the first match" take the head of the list. Querying a field with
    /// no index is a contract violation and fails with `InvalidOperation`.
    fn query_index(
        &self,
        collection: &str,
        field: &str,
        key: &crate::common::Value,
    ) -> InkstoreResult<Vec<Document>>;

    /// Returns the version string of the store implementation.
    fn store_version(&self) -> InkstoreResult<String>;

    /// Returns the configuration the store was constructed with.
    fn store_config(&self) -> InkstoreResult<StoreConfig>;
}

/// Wraps a document store implementation.
///
/// Type-erased, cloneable wrapper around any [`DocumentStoreProvider`].
/// All clones share the same underlying store through `Arc`.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<dyn DocumentStoreProvider>,
}

impl DocumentStore {
    /// Creates a new document store from an implementation.
    pub fn new<T: DocumentStoreProvider + 'static>(inner: T) -> Self {
        DocumentStore {
            inner: Arc::new(inner),
        }
    }

    pub fn open_or_create(&self) -> InkstoreResult<()> {
        self.inner.open_or_create()
    }

    pub fn is_closed(&self) -> InkstoreResult<bool> {
        self.inner.is_closed()
    }

    pub fn close(&self) -> InkstoreResult<()> {
        self.inner.close()
    }

    pub fn has_collection(&self, collection: &str) -> InkstoreResult<bool> {
        self.inner.has_collection(collection)
    }

    pub fn fetch(&self, collection: &str, id: &str) -> InkstoreResult<Option<Document>> {
        self.inner.fetch(collection, id)
    }

    pub fn put(&self, collection: &str, document: Document) -> InkstoreResult<Document> {
        self.inner.put(collection, document)
    }

    pub fn ensure_index(&self, collection: &str, field: &str) -> InkstoreResult<()> {
        self.inner.ensure_index(collection, field)
    }

    pub fn query_index(
        &self,
        collection: &str,
        field: &str,
        key: &crate::common::Value,
    ) -> InkstoreResult<Vec<Document>> {
        self.inner.query_index(collection, field, key)
    }

    pub fn store_version(&self) -> InkstoreResult<String> {
        self.inner.store_version()
    }

    pub fn store_config(&self) -> InkstoreResult<StoreConfig> {
        self.inner.store_config()
    }
}
