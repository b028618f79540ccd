use std::sync::Arc;

use crate::collection::Document;
use crate::common::{get_current_time, Validator, Value, DOC_CREATED, DOC_UPDATED};
use crate::errors::{ErrorKind, InkstoreError, InkstoreResult};
use crate::store::DocumentStore;
use crate::transaction::TransactionOptions;

/// Executes read-modify-write transactions against one collection.
///
/// # Purpose
/// `TransactionExecutor` owns the retry, stamping, and validation policy
/// for document writes. It never talks to storage except through the
/// [`DocumentStore`] adapter, and it holds no lock across the fetch/put
/// round trip; the store's revision check is the sole arbiter between
/// concurrent writers.
///
/// # Algorithm
/// Each attempt runs fetch, mutate, stamp, validate, write, in that order.
/// Validation happens before the write attempt, so the store never observes
/// an invalid document, even transiently. Only a write conflict is retried:
/// a mutation that produces invalid output will produce it again
/// deterministically, and a transport failure is not evidence that retrying
/// will help.
///
/// # Mutation contract
/// The mutation receives a clone of the current document and returns the
/// desired next body. It must be synchronous, free of I/O, and must not
/// rely on running exactly once; contention makes the executor invoke it
/// once per attempt.
#[derive(Clone)]
pub struct TransactionExecutor {
    inner: Arc<TransactionExecutorInner>,
}

impl TransactionExecutor {
    /// Creates an executor for one collection.
    ///
    /// # Arguments
    /// * `store` - The store adapter all reads and writes go through
    /// * `collection` - The collection name
    /// * `validator` - Optional validator gating every write
    pub fn new(store: DocumentStore, collection: &str, validator: Option<Validator>) -> Self {
        TransactionExecutor {
            inner: Arc::new(TransactionExecutorInner {
                store,
                collection: collection.to_string(),
                validator,
            }),
        }
    }

    /// Runs a transaction on the document with the given id.
    ///
    /// # Arguments
    /// * `id` - The document id
    /// * `options` - Creation, timestamping, and retry behavior
    /// * `mutate` - Maps the current document body to the desired next body
    ///
    /// # Returns
    /// The stored document carrying its new revision. When the mutation
    /// returns a body deep-equal to the fetched one and the document
    /// already exists, the fetched document is returned without a write
    /// and the revision is unchanged.
    ///
    /// # Errors
    /// * `NotFound` - absent document and creation not requested
    /// * `ValidationError` - the mutated body was rejected; never retried
    /// * `TooManyConflicts` - the conflict-retry budget was exhausted
    /// * `StoreUnavailable` - storage failure; never retried
    pub fn run<F>(
        &self,
        id: &str,
        options: &TransactionOptions,
        mutate: F,
    ) -> InkstoreResult<Document>
    where
        F: Fn(Document) -> InkstoreResult<Document>,
    {
        self.inner.run(id, options, mutate)
    }
}

struct TransactionExecutorInner {
    store: DocumentStore,
    collection: String,
    validator: Option<Validator>,
}

impl TransactionExecutorInner {
    fn run<F>(&self, id: &str, options: &TransactionOptions, mutate: F) -> InkstoreResult<Document>
    where
        F: Fn(Document) -> InkstoreResult<Document>,
    {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;

            // Fetch the current state, or synthesize an empty document for
            // a creation. A revision of 0 tells the store to create.
            let fetched = self.store.fetch(&self.collection, id)?;
            let creating = fetched.is_none();
            let current = match fetched {
                Some(document) => document,
                None if options.is_create_if_missing() => {
                    let mut document = Document::new();
                    document.set_id(id);
                    document
                }
                None => {
                    log::debug!("Document {}/{} not found", self.collection, id);
                    return Err(InkstoreError::new(
                        &format!("Document {} not found in {}", id, self.collection),
                        ErrorKind::NotFound,
                    ));
                }
            };

            // The mutation works on a clone; it can never reach the
            // executor's own copy of the fetched state.
            let desired = mutate(current.clone())?;

            // An unchanged body on an existing document completes the
            // transaction without a write. The revision stays as read.
            if !creating && desired == current {
                return Ok(current);
            }

            // Re-assert bookkeeping after caller code ran.
            let mut next = desired;
            next.set_id(id);
            next.set_revision(current.revision());

            if options.is_apply_timestamps() {
                let now = get_current_time().map_err(|e| {
                    InkstoreError::new(
                        &format!("System clock error: {}", e),
                        ErrorKind::InternalError,
                    )
                })?;
                next.put(DOC_UPDATED, Value::U128(now))?;
                if creating && next.created_at().is_none() {
                    next.put(DOC_CREATED, Value::U128(now))?;
                }
            }

            // Validate before the write attempt, not after. Retrying a
            // deterministic rejection would change nothing.
            if let Some(validator) = &self.validator {
                validator.validate(&next)?;
            }

            match self.store.put(&self.collection, next) {
                Ok(stored) => return Ok(stored),
                Err(err) if err.is_conflict() => {
                    if attempts > options.max_retries() {
                        log::warn!(
                            "Transaction on {}/{} exhausted {} retries",
                            self.collection,
                            id,
                            options.max_retries()
                        );
                        return Err(InkstoreError::new_with_cause(
                            &format!(
                                "Transaction on document {} gave up after {} attempts",
                                id, attempts
                            ),
                            ErrorKind::TooManyConflicts,
                            err,
                        ));
                    }
                    log::debug!(
                        "Retrying transaction on {}/{} after conflict (attempt {})",
                        self.collection,
                        id,
                        attempts
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
}
