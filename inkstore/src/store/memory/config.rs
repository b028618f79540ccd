use std::any::Any;
use std::sync::Arc;

use crate::store::StoreConfigProvider;

/// Configuration for an in-memory store.
///
/// # Purpose
/// `InMemoryStoreConfig` is the explicit configuration value passed to
/// `InMemoryStore::new()`. It carries the store's logical name, which shows
/// up in logs and lets tests tell stores apart. There is no shared default
/// configuration; every store gets its own value.
///
/// # Usage
/// ```text
/// let config = InMemoryStoreConfig::with_name("demo");
/// let store = InMemoryStore::new(config);
/// ```
#[derive(Clone)]
pub struct InMemoryStoreConfig {
    inner: Arc<InMemoryStoreConfigInner>,
}

impl InMemoryStoreConfig {
    /// Creates a new `InMemoryStoreConfig` with the default store name.
    pub fn new() -> InMemoryStoreConfig {
        Self::with_name("inkstore")
    }

    /// Creates a new `InMemoryStoreConfig` with the given store name.
    pub fn with_name(store_name: &str) -> InMemoryStoreConfig {
        InMemoryStoreConfig {
            inner: Arc::new(InMemoryStoreConfigInner {
                store_name: store_name.to_string(),
            }),
        }
    }
}

impl Default for InMemoryStoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreConfigProvider for InMemoryStoreConfig {
    fn store_name(&self) -> String {
        self.inner.store_name.clone()
    }

    /// In-memory stores are never read-only.
    fn is_read_only(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct InMemoryStoreConfigInner {
    store_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_name() {
        let config = InMemoryStoreConfig::new();
        assert_eq!(config.store_name(), "inkstore");
    }

    #[test]
    fn test_custom_store_name() {
        let config = InMemoryStoreConfig::with_name("demo");
        assert_eq!(config.store_name(), "demo");
    }

    #[test]
    fn test_never_read_only() {
        let config = InMemoryStoreConfig::new();
        assert!(!config.is_read_only());
    }

    #[test]
    fn test_as_any_downcast() {
        let config = InMemoryStoreConfig::with_name("demo");
        let any = config.as_any();
        assert!(any.downcast_ref::<InMemoryStoreConfig>().is_some());
    }
}
