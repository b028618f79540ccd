use im::OrdMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};

use crate::common::{Value, DOC_CREATED, DOC_ID, DOC_REVISION, DOC_UPDATED, RESERVED_FIELDS};
use crate::errors::{ErrorKind, InkstoreError, InkstoreResult};

type FieldVec = SmallVec<[String; 8]>;

/// Represents a document using a lock-free persistent data structure.
///
/// Documents are composed of key-value pairs. The key is always a [String]
/// and the value is a [Value]. Nested documents are plain values; a nested
/// field is read by fetching the parent document value first.
///
/// Below fields are reserved and cannot be set through [`Document::put`]:
///
/// * `_id` - The identifier of the document within its collection. Assigned
///   by the caller of a transaction and immutable once created.
/// * `_revision` - The revision of the document, maintained by the store.
///   Every write presents the revision it last read; the store arbitrates
///   conflicting writers by comparing it.
///
/// Collections that opt into timestamping additionally maintain
/// `created_at` and `updated_at` fields (epoch milliseconds).
///
/// ## Lock-Free Design
///
/// This struct uses `im::OrdMap` (a persistent ordered map):
/// - O(1) cloning via internal Arc sharing
/// - Mutations create new maps via structural sharing
/// - Each mutated document is completely independent
///
/// The transaction executor leans on this: it hands the mutation a clone of
/// the fetched document, so caller code can never touch the executor's
/// bookkeeping state.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    /// Checks if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of entries in the document.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates the specified [Value] with the specified key.
    ///
    /// If the key already exists, its value is updated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The key is empty
    /// * The key is `_id` with a non-string value
    /// * The key is `_revision`, which only the store may assign
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("name", "Alice")?;
    /// doc.put("age", 30)?;
    /// assert_eq!(doc.size(), 2);
    /// ```
    pub fn put<'a, T: Into<Value>>(
        &mut self,
        key: impl Into<Cow<'a, str>>,
        value: T,
    ) -> InkstoreResult<()> {
        let key = key.into();
        // key cannot be empty
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(InkstoreError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();

        if key == DOC_ID && !value.is_string() {
            log::error!("Document id must be a string value");
            return Err(InkstoreError::new(
                "Document id must be a string value",
                ErrorKind::InvalidOperation,
            ));
        }

        if key == DOC_REVISION {
            log::error!("Document revision is maintained by the store and cannot be set manually");
            return Err(InkstoreError::new(
                "Document revision is maintained by the store and cannot be set manually",
                ErrorKind::InvalidOperation,
            ));
        }

        self.data = self.data.update(key.to_string(), value);
        Ok(())
    }

    /// Returns the [Value] associated with the key, or [Value::Null] if the
    /// document contains no mapping for it.
    pub fn get(&self, key: &str) -> Value {
        match self.data.get(key) {
            Some(value) => value.clone(),
            None => Value::Null,
        }
    }

    /// Removes the key and its value from the document.
    ///
    /// Removing a key that does not exist succeeds without error.
    ///
    /// # Errors
    ///
    /// Returns an error when the key is a reserved field.
    pub fn remove(&mut self, key: &str) -> InkstoreResult<()> {
        if RESERVED_FIELDS.contains(&key) {
            log::error!("Field {} is reserved and cannot be removed", key);
            return Err(InkstoreError::new(
                &format!("Field {} is reserved and cannot be removed", key),
                ErrorKind::InvalidOperation,
            ));
        }
        self.data = self.data.without(key);
        Ok(())
    }

    /// Checks if a key exists in the document.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Retrieves all fields of this document, excluding the reserved
    /// bookkeeping fields.
    pub fn fields(&self) -> FieldVec {
        self.data
            .keys()
            .filter(|key| !RESERVED_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect()
    }

    /// Merges a document into this document.
    ///
    /// All key-value pairs from `other` are merged in. If a key already
    /// exists:
    /// - If both values are documents, they are merged recursively
    /// - Otherwise, the value from `other` overwrites the existing value
    ///
    /// Reserved bookkeeping fields of `other` are ignored.
    pub fn merge(&mut self, other: &Document) -> InkstoreResult<()> {
        for (key, value) in other.data.iter() {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            match value {
                Value::Document(obj) => {
                    // if the value is a document, merge it recursively
                    if let Some(Value::Document(mut nested_obj)) = self.data.get(key).cloned() {
                        nested_obj.merge(obj)?;
                        self.data = self.data.update(key.clone(), Value::Document(nested_obj));
                    } else {
                        self.data = self.data.update(key.clone(), value.clone());
                    }
                }
                _ => {
                    self.data = self.data.update(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    /// Returns the document id, if the document has been assigned one.
    pub fn id(&self) -> Option<String> {
        if let Some(Value::String(id)) = self.data.get(DOC_ID) {
            Some(id.clone())
        } else {
            None
        }
    }

    /// Checks if this document has an id.
    pub fn has_id(&self) -> bool {
        self.data.contains_key(DOC_ID)
    }

    /// Gets the document revision.
    ///
    /// Returns 0 if the document has never been persisted. A write that
    /// presents revision 0 asks the store to create the document.
    pub fn revision(&self) -> u64 {
        if let Some(Value::U64(revision)) = self.data.get(DOC_REVISION) {
            *revision
        } else {
            0
        }
    }

    /// Gets the creation time of this document in epoch milliseconds, when
    /// the collection maintains timestamps.
    pub fn created_at(&self) -> Option<u128> {
        self.data.get(DOC_CREATED).and_then(|v| v.as_u128())
    }

    /// Gets the last update time of this document in epoch milliseconds,
    /// when the collection maintains timestamps.
    pub fn updated_at(&self) -> Option<u128> {
        self.data.get(DOC_UPDATED).and_then(|v| v.as_u128())
    }

    pub(crate) fn set_id(&mut self, id: &str) {
        self.data = self
            .data
            .update(DOC_ID.to_string(), Value::String(id.to_string()));
    }

    pub(crate) fn set_revision(&mut self, revision: u64) {
        self.data = self
            .data
            .update(DOC_REVISION.to_string(), Value::U64(revision));
    }

    /// Converts this document to a [BTreeMap].
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Renders the document as compact JSON.
    pub fn to_json(&self) -> String {
        let entries: Vec<String> = self
            .data
            .iter()
            .map(|(key, value)| format!("{:?}:{}", key, value.to_json()))
            .collect();
        format!("{{{}}}", entries.join(","))
    }

    /// Gets an iterator over the key-value pairs of this document.
    pub fn iter(&self) -> DocumentIter {
        DocumentIter {
            keys: self.data.keys().cloned().collect(),
            data: self.clone(),
            index: 0,
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Iterator over the key-value pairs of a [Document].
pub struct DocumentIter {
    keys: Vec<String>,
    data: Document,
    index: usize,
}

impl Iterator for DocumentIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.keys.len() {
            let key = self.keys[self.index].clone();
            let value = self.data.get(&key);
            self.index += 1;
            Some((key, value))
        } else {
            None
        }
    }
}

/// Strips the quotes `stringify!` leaves around string-literal keys in the
/// `doc!` macro.
pub fn normalize(key: &str) -> String {
    key.trim_matches('"').to_string()
}

/// Creates a [Document] from key-value pairs.
///
/// Keys can be identifiers or string literals; values can be literals,
/// parenthesized expressions, nested documents, or arrays.
///
/// # Examples
///
/// ```ignore
/// let doc = doc!{
///     title: "Hello World",
///     slug: "hello-world",
///     meta: {
///         author: "alice",
///         tags: ["intro", "news"]
///     }
/// };
/// ```
#[macro_export]
macro_rules! doc {
    // match an empty document
    () => {
        $crate::collection::Document::new()
    };

    // match a document with key value pairs
    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                    .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the `doc!` macro.
/// Handles nested documents, arrays, and expressions.
#[macro_export]
macro_rules! doc_value {
    // match a nested document
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    // match an expression (variable, arithmetic in parens, literals, etc.)
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
