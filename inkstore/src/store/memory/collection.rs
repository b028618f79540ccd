use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collection::Document;
use crate::common::Value;
use crate::errors::{ErrorKind, InkstoreError, InkstoreResult};

/// In-memory document collection with revision-checked writes.
///
/// # Purpose
/// `InMemoryCollection` holds one collection's documents in a concurrent
/// map and arbitrates concurrent writers through revision comparison. It
/// also maintains the collection's precomputed field indexes.
///
/// # Characteristics
/// - **Thread-Safe**: Can be safely cloned and shared across threads
/// - **Atomic Writes**: The revision check and the insert happen under the
///   map's entry lock, so exactly one writer observes success per revision
/// - **Index Maintenance**: Every successful write removes the document id
///   from the old index key's posting list and appends it to the new one
/// - **Lifecycle**: A closed collection refuses data operations
#[derive(Clone)]
pub struct InMemoryCollection {
    inner: Arc<InMemoryCollectionInner>,
}

impl InMemoryCollection {
    /// Creates a new empty in-memory collection.
    pub fn new(name: &str) -> Self {
        InMemoryCollection {
            inner: Arc::new(InMemoryCollectionInner::new(name)),
        }
    }

    pub fn name(&self) -> String {
        self.inner.name.clone()
    }

    pub fn fetch(&self, id: &str) -> InkstoreResult<Option<Document>> {
        self.inner.fetch(id)
    }

    pub fn put(&self, document: Document) -> InkstoreResult<Document> {
        self.inner.put(document)
    }

    pub fn ensure_index(&self, field: &str) -> InkstoreResult<()> {
        self.inner.ensure_index(field)
    }

    pub fn query(&self, field: &str, key: &Value) -> InkstoreResult<Vec<Document>> {
        self.inner.query(field, key)
    }

    pub fn size(&self) -> InkstoreResult<u64> {
        self.inner.size()
    }

    pub fn is_empty(&self) -> InkstoreResult<bool> {
        Ok(self.size()? == 0)
    }

    pub fn close(&self) -> InkstoreResult<()> {
        self.inner.close()
    }
}

struct InMemoryCollectionInner {
    name: String,
    documents: DashMap<String, Document>,
    // field name -> (index key -> document ids, in insertion order)
    indexes: DashMap<String, DashMap<String, Vec<String>>>,
    closed: AtomicBool,
}

impl InMemoryCollectionInner {
    fn new(name: &str) -> InMemoryCollectionInner {
        InMemoryCollectionInner {
            name: name.to_string(),
            documents: DashMap::new(),
            indexes: DashMap::new(),
            closed: AtomicBool::from(false),
        }
    }

    fn check_opened(&self) -> InkstoreResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("Collection {} is closed", self.name);
            return Err(InkstoreError::new(
                &format!("Collection {} is closed", self.name),
                ErrorKind::StoreUnavailable,
            ));
        }
        Ok(())
    }

    fn fetch(&self, id: &str) -> InkstoreResult<Option<Document>> {
        self.check_opened()?;

        if let Some(entry) = self.documents.get(id) {
            Ok(Some(entry.value().clone()))
        } else {
            Ok(None)
        }
    }

    fn put(&self, mut document: Document) -> InkstoreResult<Document> {
        self.check_opened()?;

        let id = document.id().ok_or_else(|| {
            log::error!("Cannot write a document without an id to {}", self.name);
            InkstoreError::new(
                "Cannot write a document without an id",
                ErrorKind::InvalidOperation,
            )
        })?;
        let presented = document.revision();

        // The revision compare and the insert happen under the entry lock
        // of the document's shard. This is the store's sole serialization
        // point for a given id.
        let previous = match self.documents.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                let current = entry.get().revision();
                if presented != current {
                    log::debug!(
                        "Conflicting write on {}/{}: presented revision {}, current revision {}",
                        self.name,
                        id,
                        presented,
                        current
                    );
                    return Err(InkstoreError::new(
                        &format!("Conflicting write on document {}", id),
                        ErrorKind::Conflict,
                    ));
                }
                let previous = entry.get().clone();
                document.set_revision(current + 1);
                entry.insert(document.clone());
                Some(previous)
            }
            Entry::Vacant(entry) => {
                if presented != 0 {
                    log::debug!(
                        "Conflicting create on {}/{}: presented revision {} but document is absent",
                        self.name,
                        id,
                        presented
                    );
                    return Err(InkstoreError::new(
                        &format!("Conflicting write on document {}", id),
                        ErrorKind::Conflict,
                    ));
                }
                document.set_revision(1);
                entry.insert(document.clone());
                None
            }
        };

        self.update_indexes(&id, previous.as_ref(), &document);
        Ok(document)
    }

    fn update_indexes(&self, id: &str, previous: Option<&Document>, stored: &Document) {
        for index in self.indexes.iter() {
            let field = index.key();
            let postings = index.value();

            let old_key = previous.and_then(|doc| doc.get(field).as_key_string());
            let new_key = stored.get(field).as_key_string();
            if old_key == new_key {
                continue;
            }

            if let Some(old_key) = old_key {
                if let Some(mut posting) = postings.get_mut(&old_key) {
                    posting.retain(|existing| existing != id);
                }
            }
            if let Some(new_key) = new_key {
                postings.entry(new_key).or_default().push(id.to_string());
            }
        }
    }

    fn ensure_index(&self, field: &str) -> InkstoreResult<()> {
        self.check_opened()?;

        if self.indexes.contains_key(field) {
            return Ok(());
        }

        // Backfill from the current documents. Indexes are declared at
        // open time, before transactions run against the collection.
        let postings: DashMap<String, Vec<String>> = DashMap::new();
        for entry in self.documents.iter() {
            if let Some(key) = entry.value().get(field).as_key_string() {
                postings.entry(key).or_default().push(entry.key().clone());
            }
        }
        self.indexes.insert(field.to_string(), postings);
        log::debug!("Created index on {}.{}", self.name, field);
        Ok(())
    }

    fn query(&self, field: &str, key: &Value) -> InkstoreResult<Vec<Document>> {
        self.check_opened()?;

        let postings = self.indexes.get(field).ok_or_else(|| {
            log::error!("No index on field {} in collection {}", field, self.name);
            InkstoreError::new(
                &format!("No index on field {} in collection {}", field, self.name),
                ErrorKind::InvalidOperation,
            )
        })?;

        let key = match key.as_key_string() {
            Some(key) => key,
            None => return Ok(Vec::new()),
        };

        let ids = postings
            .get(&key)
            .map(|posting| posting.value().clone())
            .unwrap_or_default();
        drop(postings);

        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entry) = self.documents.get(&id) {
                result.push(entry.value().clone());
            }
        }
        Ok(result)
    }

    fn size(&self) -> InkstoreResult<u64> {
        self.check_opened()?;
        Ok(self.documents.len() as u64)
    }

    fn close(&self) -> InkstoreResult<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
