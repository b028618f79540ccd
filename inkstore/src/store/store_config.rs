use std::any::Any;
use std::sync::Arc;

/// Low-level interface for store configuration values.
///
/// # Purpose
/// Connection and naming details differ per backend, so each store
/// implementation carries its own configuration type behind this trait.
/// Configuration is resolved by the caller and passed explicitly into the
/// store's constructor.
pub trait StoreConfigProvider: Send + Sync {
    /// Returns the logical name of the store.
    fn store_name(&self) -> String;

    /// Checks if the store is in read-only mode.
    fn is_read_only(&self) -> bool;

    /// Returns the concrete configuration for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Wraps a store configuration implementation.
///
/// Type-erased, cloneable wrapper around any [`StoreConfigProvider`].
#[derive(Clone)]
pub struct StoreConfig {
    inner: Arc<dyn StoreConfigProvider>,
}

impl StoreConfig {
    /// Creates a new store configuration from an implementation.
    pub fn new<T: StoreConfigProvider + 'static>(inner: T) -> Self {
        StoreConfig {
            inner: Arc::new(inner),
        }
    }

    /// Returns the logical name of the store.
    pub fn store_name(&self) -> String {
        self.inner.store_name()
    }

    /// Checks if the store is in read-only mode.
    pub fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }

    /// Returns the concrete configuration for downcasting.
    pub fn as_any(&self) -> &dyn Any {
        self.inner.as_any()
    }
}
